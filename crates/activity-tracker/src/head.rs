//! Head pose from eye and nose keypoints

use pose_inference::{KeypointKind, PoseKeypoints};
use serde::{Deserialize, Serialize};

const MIN_SPAN: f32 = 1e-6;

/// Head orientation in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadPose {
    /// Left-right rotation
    pub yaw: f32,
    /// Side tilt
    pub roll: f32,
}

impl HeadPose {
    /// Estimate from the eye line and the nose offset below it.
    ///
    /// Roll is the angle of the eye line. Yaw is the angle by which the nose
    /// leaves the perpendicular of the eye line: zero for a frontal face,
    /// growing as the head turns and the nose slides toward one eye.
    /// Returns `None` when the eyes coincide or the nose sits on the eye center.
    pub fn from_keypoints(kps: &PoseKeypoints) -> Option<Self> {
        let nose = kps.get(KeypointKind::Nose);
        let left = kps.get(KeypointKind::LeftEye);
        let right = kps.get(KeypointKind::RightEye);

        let (hx, hy) = normalize(left.x - right.x, left.y - right.y)?;
        let (cx, cy) = ((left.x + right.x) / 2.0, (left.y + right.y) / 2.0);
        let (vx, vy) = normalize(nose.x - cx, nose.y - cy)?;

        let roll = hy.atan2(hx).to_degrees();
        let yaw = (vx * hx + vy * hy).clamp(-1.0, 1.0).asin().to_degrees();

        Some(Self { yaw, roll })
    }
}

fn normalize(x: f32, y: f32) -> Option<(f32, f32)> {
    let norm = (x * x + y * y).sqrt();
    if !norm.is_finite() || norm < MIN_SPAN {
        return None;
    }
    Some((x / norm, y / norm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pose_inference::KEYPOINT_COUNT;

    fn face(nose: (f32, f32), left_eye: (f32, f32), right_eye: (f32, f32)) -> PoseKeypoints {
        let mut rows = [[0.0f32, 0.0, 1.0]; KEYPOINT_COUNT];
        rows[0] = [nose.0, nose.1, 1.0];
        rows[1] = [left_eye.0, left_eye.1, 1.0];
        rows[2] = [right_eye.0, right_eye.1, 1.0];
        PoseKeypoints::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_frontal_face() {
        // subject's left eye appears on the image right
        let pose = HeadPose::from_keypoints(&face((100.0, 120.0), (120.0, 100.0), (80.0, 100.0)))
            .unwrap();
        assert!(pose.yaw.abs() < 1e-4);
        assert!(pose.roll.abs() < 1e-4);
    }

    #[test]
    fn test_turned_head() {
        // nose slid halfway toward the left eye at 45 degrees
        let pose = HeadPose::from_keypoints(&face((120.0, 120.0), (120.0, 100.0), (80.0, 100.0)))
            .unwrap();
        assert!((pose.yaw - 45.0).abs() < 1e-3);

        let pose = HeadPose::from_keypoints(&face((80.0, 120.0), (120.0, 100.0), (80.0, 100.0)))
            .unwrap();
        assert!((pose.yaw + 45.0).abs() < 1e-3);
    }

    #[test]
    fn test_tilted_head_keeps_zero_yaw() {
        // eye line rotated 90 degrees, nose perpendicular to it
        let pose = HeadPose::from_keypoints(&face((80.0, 100.0), (100.0, 120.0), (100.0, 80.0)))
            .unwrap();
        assert!((pose.roll - 90.0).abs() < 1e-3);
        assert!(pose.yaw.abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_geometry() {
        assert!(HeadPose::from_keypoints(&face((1.0, 2.0), (5.0, 5.0), (5.0, 5.0))).is_none());
        assert!(HeadPose::from_keypoints(&face((5.0, 5.0), (6.0, 5.0), (4.0, 5.0))).is_none());
    }
}
