//! Pose Estimation
//!
//! Runs a YOLO-pose ONNX export with ONNX Runtime and reports the keypoints
//! of the most confident subject in each frame.

pub mod decode;
pub mod keypoints;
pub mod model;
pub mod preprocess;

pub use decode::PoseDetection;
pub use keypoints::{Keypoint, KeypointKind, PoseKeypoints, KEYPOINT_COUNT, SKELETON};
pub use model::{resolve_model_path, OnnxPoseModel, PoseModelConfig, DEFAULT_MODEL};

use camera_capture::VideoFrame;
use thiserror::Error;

/// Pose estimation errors
#[derive(Error, Debug)]
pub enum PoseError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Unexpected model output shape {0}")]
    OutputShape(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),
}

/// Anything that turns a frame into at most one subject's keypoints
pub trait PoseEstimator {
    fn estimate(&mut self, frame: &VideoFrame) -> Result<Option<PoseDetection>, PoseError>;
}

impl<T: PoseEstimator + ?Sized> PoseEstimator for Box<T> {
    fn estimate(&mut self, frame: &VideoFrame) -> Result<Option<PoseDetection>, PoseError> {
        (**self).estimate(frame)
    }
}
