//! Optional preview window

use activity_tracker::FrameAnalysis;
use anyhow::Result;
use camera_capture::VideoFrame;
use pose_inference::PoseDetection;

/// Keypoints below this visibility are not drawn
#[cfg(feature = "opencv")]
const MIN_VISIBILITY: f32 = 0.5;

#[cfg(feature = "opencv")]
pub struct Preview {
    window: camera_capture::PreviewWindow,
}

#[cfg(feature = "opencv")]
impl Preview {
    pub fn open(show: bool) -> Result<Option<Self>> {
        if !show {
            return Ok(None);
        }
        let window = camera_capture::PreviewWindow::new("posewatch")?;
        Ok(Some(Self { window }))
    }

    /// Returns `false` when the user closed the preview
    pub fn show(
        &self,
        frame: &VideoFrame,
        detection: Option<&PoseDetection>,
        analysis: &FrameAnalysis,
    ) -> Result<bool> {
        use camera_capture::OverlayPoint;

        let points: Vec<OverlayPoint> = detection
            .map(|d| {
                d.keypoints
                    .points()
                    .iter()
                    .map(|k| OverlayPoint {
                        x: k.x,
                        y: k.y,
                        visible: k.confidence >= MIN_VISIBILITY,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(self
            .window
            .show(frame, &points, &pose_inference::SKELETON, &analysis.caption())?)
    }
}

/// No window support in this build
#[cfg(not(feature = "opencv"))]
pub enum Preview {}

#[cfg(not(feature = "opencv"))]
impl Preview {
    pub fn open(show: bool) -> Result<Option<Self>> {
        if show {
            tracing::warn!("--show needs a build with the `opencv` feature; running without a window");
        }
        Ok(None)
    }

    pub fn show(
        &self,
        _frame: &VideoFrame,
        _detection: Option<&PoseDetection>,
        _analysis: &FrameAnalysis,
    ) -> Result<bool> {
        match *self {}
    }
}
