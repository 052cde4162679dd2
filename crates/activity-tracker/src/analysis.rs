//! Per-frame analysis results

use serde::Serialize;

use crate::gaze::Gaze;
use crate::head::HeadPose;
use crate::posture::Posture;
use crate::state::SaveReason;

/// What the recorder concluded for one frame
#[derive(Debug, Clone, Default, Serialize)]
pub struct FrameAnalysis {
    /// Whether the model reported a subject
    pub subject_detected: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_pose: Option<HeadPose>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gaze: Option<Gaze>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub posture: Option<Posture>,

    /// Distraction flag after this frame
    pub distracted: bool,

    /// The day ended on this frame
    pub rolled_over: bool,

    /// Frame time accumulated in the current day
    pub day_elapsed_secs: f64,

    /// Set when the record should be written now
    #[serde(skip)]
    pub save: Option<SaveReason>,
}

impl FrameAnalysis {
    pub fn save_due(&self) -> bool {
        self.save.is_some()
    }

    /// One-line summary for overlays and logs
    pub fn caption(&self) -> String {
        if !self.subject_detected {
            return "no subject".to_string();
        }
        let posture = self.posture.map_or("unknown", |p| p.as_str());
        let gaze = match self.gaze {
            Some(Gaze::LookingAway) => "away",
            _ => "at screen",
        };
        if self.distracted {
            format!("{} | {} | DISTRACTED", posture, gaze)
        } else {
            format!("{} | {}", posture, gaze)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption() {
        assert_eq!(FrameAnalysis::default().caption(), "no subject");

        let analysis = FrameAnalysis {
            subject_detected: true,
            gaze: Some(Gaze::LookingAway),
            posture: Some(Posture::Sitting),
            distracted: true,
            ..Default::default()
        };
        assert_eq!(analysis.caption(), "sitting | away | DISTRACTED");
    }
}
