//! COCO body keypoints

/// Number of keypoints in the COCO pose layout
pub const KEYPOINT_COUNT: usize = 17;

/// COCO-Pose skeleton (pairs of keypoint indices) for drawing
pub const SKELETON: [[usize; 2]; 19] = [
    [15, 13],
    [13, 11],
    [16, 14],
    [14, 12],
    [11, 12],
    [5, 11],
    [6, 12],
    [5, 6],
    [5, 7],
    [6, 8],
    [7, 9],
    [8, 10],
    [1, 2],
    [0, 1],
    [0, 2],
    [1, 3],
    [2, 4],
    [3, 5],
    [4, 6],
];

/// Body landmark, in COCO index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeypointKind {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl KeypointKind {
    /// Index into the model output
    pub fn index(self) -> usize {
        self as usize
    }

    /// Nose and both eyes
    pub const HEAD: [KeypointKind; 3] = [
        KeypointKind::Nose,
        KeypointKind::LeftEye,
        KeypointKind::RightEye,
    ];
    pub const HIPS: [KeypointKind; 2] = [KeypointKind::LeftHip, KeypointKind::RightHip];
    pub const KNEES: [KeypointKind; 2] = [KeypointKind::LeftKnee, KeypointKind::RightKnee];
    /// Ankles stand in for feet
    pub const FEET: [KeypointKind; 2] = [KeypointKind::LeftAnkle, KeypointKind::RightAnkle];
}

/// One landmark in source-frame pixels (y down)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    /// Visibility score (0-1)
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }
}

/// The 17 keypoints of one subject
#[derive(Debug, Clone, PartialEq)]
pub struct PoseKeypoints {
    points: [Keypoint; KEYPOINT_COUNT],
}

impl PoseKeypoints {
    pub fn new(points: [Keypoint; KEYPOINT_COUNT]) -> Self {
        Self { points }
    }

    /// Build from `(x, y, confidence)` rows. Needs exactly 17 rows.
    pub fn from_rows(rows: &[[f32; 3]]) -> Option<Self> {
        if rows.len() != KEYPOINT_COUNT {
            return None;
        }
        let mut points = [Keypoint::default(); KEYPOINT_COUNT];
        for (point, row) in points.iter_mut().zip(rows) {
            *point = Keypoint::new(row[0], row[1], row[2]);
        }
        Some(Self { points })
    }

    pub fn get(&self, kind: KeypointKind) -> Keypoint {
        self.points[kind.index()]
    }

    pub fn points(&self) -> &[Keypoint; KEYPOINT_COUNT] {
        &self.points
    }

    /// Mean position of a landmark group
    pub fn centroid(&self, kinds: &[KeypointKind]) -> (f32, f32) {
        if kinds.is_empty() {
            return (0.0, 0.0);
        }
        let (sx, sy) = kinds.iter().fold((0.0, 0.0), |(sx, sy), kind| {
            let p = self.get(*kind);
            (sx + p.x, sy + p.y)
        });
        let n = kinds.len() as f32;
        (sx / n, sy / n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_follow_coco() {
        assert_eq!(KeypointKind::Nose.index(), 0);
        assert_eq!(KeypointKind::RightEye.index(), 2);
        assert_eq!(KeypointKind::LeftHip.index(), 11);
        assert_eq!(KeypointKind::RightAnkle.index(), 16);
    }

    #[test]
    fn test_from_rows_requires_17() {
        assert!(PoseKeypoints::from_rows(&[[0.0; 3]; 5]).is_none());

        let mut rows = [[0.0f32; 3]; KEYPOINT_COUNT];
        rows[13] = [10.0, 20.0, 0.9];
        let kps = PoseKeypoints::from_rows(&rows).unwrap();
        assert_eq!(kps.get(KeypointKind::LeftKnee), Keypoint::new(10.0, 20.0, 0.9));
    }

    #[test]
    fn test_centroid() {
        let mut rows = [[0.0f32; 3]; KEYPOINT_COUNT];
        rows[0] = [3.0, 9.0, 1.0];
        rows[1] = [0.0, 6.0, 1.0];
        rows[2] = [6.0, 6.0, 1.0];
        let kps = PoseKeypoints::from_rows(&rows).unwrap();

        assert_eq!(kps.centroid(&KeypointKind::HEAD), (3.0, 7.0));
        assert_eq!(kps.centroid(&[]), (0.0, 0.0));
    }

    #[test]
    fn test_skeleton_in_range() {
        assert!(SKELETON
            .iter()
            .all(|[a, b]| *a < KEYPOINT_COUNT && *b < KEYPOINT_COUNT));
    }
}
