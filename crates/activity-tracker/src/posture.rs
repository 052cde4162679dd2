//! Posture classification from body segment geometry

use pose_inference::{KeypointKind, PoseKeypoints};
use serde::{Deserialize, Serialize};

/// Coarse body posture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Posture {
    Lying,
    Standing,
    Sitting,
}

impl Posture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Posture::Lying => "lying",
            Posture::Standing => "standing",
            Posture::Sitting => "sitting",
        }
    }
}

/// Displacement between an upper and a lower landmark group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Absolute horizontal distance
    pub horizontal: f32,
    /// How far the lower group sits below the upper one (image y grows down)
    pub vertical: f32,
}

impl Segment {
    fn between(upper: (f32, f32), lower: (f32, f32)) -> Self {
        Self {
            horizontal: (upper.0 - lower.0).abs(),
            vertical: lower.1 - upper.1,
        }
    }

    fn is_upright(&self) -> bool {
        self.vertical > self.horizontal
    }

    fn is_flat(&self) -> bool {
        self.horizontal > self.vertical
    }
}

/// Head-to-hips, hips-to-knees and knees-to-feet segments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySegments {
    pub torso: Segment,
    pub thigh: Segment,
    pub shin: Segment,
}

impl BodySegments {
    pub fn from_keypoints(kps: &PoseKeypoints) -> Self {
        let head = kps.centroid(&KeypointKind::HEAD);
        let hips = kps.centroid(&KeypointKind::HIPS);
        let knees = kps.centroid(&KeypointKind::KNEES);
        let feet = kps.centroid(&KeypointKind::FEET);

        Self {
            torso: Segment::between(head, hips),
            thigh: Segment::between(hips, knees),
            shin: Segment::between(knees, feet),
        }
    }

    /// Lying wins over the upright checks; `None` when nothing matches
    pub fn classify(&self) -> Option<Posture> {
        if self.torso.is_flat() && self.thigh.is_flat() {
            Some(Posture::Lying)
        } else if self.torso.is_upright() && self.thigh.is_upright() && self.shin.is_upright() {
            Some(Posture::Standing)
        } else if self.torso.is_upright() && self.thigh.is_flat() {
            Some(Posture::Sitting)
        } else {
            None
        }
    }
}

/// Classify the posture of one subject
pub fn classify(kps: &PoseKeypoints) -> Option<Posture> {
    BodySegments::from_keypoints(kps).classify()
}
