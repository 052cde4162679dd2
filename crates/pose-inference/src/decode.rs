//! YOLO-pose output decoding
//!
//! The exported head emits `[1, 56, N]`: per candidate a box (cx, cy, w, h),
//! a person score and 17 keypoints as (x, y, visibility). Some exports are
//! transposed to `[1, N, 56]`; both layouts are accepted.

use ndarray::ArrayViewD;

use crate::keypoints::{Keypoint, PoseKeypoints, KEYPOINT_COUNT};
use crate::preprocess::Letterbox;
use crate::PoseError;

/// Values per candidate: 4 box + 1 score + 17 * 3 keypoints
pub const CHANNELS: usize = 5 + KEYPOINT_COUNT * 3;

/// The single subject reported for a frame
#[derive(Debug, Clone, PartialEq)]
pub struct PoseDetection {
    /// Person score (0-1)
    pub score: f32,
    /// Bounding box in source pixels: x1, y1, x2, y2
    pub bbox: [f32; 4],
    pub keypoints: PoseKeypoints,
}

/// Pick the highest-scoring candidate at or above `threshold`
pub fn decode_best(
    output: ArrayViewD<'_, f32>,
    threshold: f32,
    letterbox: &Letterbox,
) -> Result<Option<PoseDetection>, PoseError> {
    let shape = output.shape().to_vec();
    if shape.len() != 3 || shape[0] != 1 {
        return Err(PoseError::OutputShape(format!("{:?}", shape)));
    }

    let channels_first = if shape[1] == CHANNELS {
        true
    } else if shape[2] == CHANNELS {
        false
    } else {
        return Err(PoseError::OutputShape(format!("{:?}", shape)));
    };
    let candidates = if channels_first { shape[2] } else { shape[1] };

    let at = |channel: usize, candidate: usize| -> f32 {
        if channels_first {
            output[[0, channel, candidate]]
        } else {
            output[[0, candidate, channel]]
        }
    };

    let best = (0..candidates)
        .map(|i| (i, at(4, i)))
        .filter(|(_, score)| *score >= threshold)
        .max_by(|a, b| a.1.total_cmp(&b.1));

    let Some((index, score)) = best else {
        return Ok(None);
    };

    let (cx, cy, w, h) = (at(0, index), at(1, index), at(2, index), at(3, index));
    let (x1, y1) = letterbox.to_source(cx - w / 2.0, cy - h / 2.0);
    let (x2, y2) = letterbox.to_source(cx + w / 2.0, cy + h / 2.0);

    let mut points = [Keypoint::default(); KEYPOINT_COUNT];
    for (k, point) in points.iter_mut().enumerate() {
        let base = 5 + k * 3;
        let (x, y) = letterbox.to_source(at(base, index), at(base + 1, index));
        *point = Keypoint::new(x, y, at(base + 2, index));
    }

    Ok(Some(PoseDetection {
        score,
        bbox: [x1, y1, x2, y2],
        keypoints: PoseKeypoints::new(points),
    }))
}
