//! ONNX Runtime pose model

use std::path::{Path, PathBuf};

use camera_capture::VideoFrame;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use tracing::{debug, error, info, warn};

use crate::decode::{decode_best, PoseDetection};
use crate::preprocess::letterbox;
use crate::{PoseError, PoseEstimator};

/// Model used when the configured one is missing
pub const DEFAULT_MODEL: &str = "yolo11n-pose.onnx";

/// Pose model configuration
#[derive(Debug, Clone)]
pub struct PoseModelConfig {
    /// Path to the ONNX export
    pub model_path: PathBuf,
    /// Square model input size in pixels
    pub input_size: u32,
    /// Minimum person score to report a subject
    pub confidence_threshold: f32,
}

impl Default for PoseModelConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL),
            input_size: 640,
            confidence_threshold: 0.25,
        }
    }
}

/// Use `requested` if it exists, otherwise fall back to [`DEFAULT_MODEL`]
pub fn resolve_model_path(requested: &Path) -> PathBuf {
    if requested.exists() {
        return requested.to_path_buf();
    }
    warn!(
        "Model not found at {}. Using default model: {}",
        requested.display(),
        DEFAULT_MODEL
    );
    PathBuf::from(DEFAULT_MODEL)
}

fn load_error(path: &Path, e: impl std::fmt::Display) -> PoseError {
    error!("Failed to load pose model {}: {}", path.display(), e);
    PoseError::ModelLoad(format!("{}: {}", path.display(), e))
}

/// YOLO-pose model running on ONNX Runtime
pub struct OnnxPoseModel {
    session: Session,
    output_name: String,
    input_size: u32,
    confidence_threshold: f32,
}

impl OnnxPoseModel {
    /// Load the configured model, falling back to the default model name
    pub fn load(config: &PoseModelConfig) -> Result<Self, PoseError> {
        if config.input_size == 0 {
            return Err(PoseError::Config("input_size must be positive".into()));
        }

        let path = resolve_model_path(&config.model_path);
        info!("Loading pose model from {}", path.display());

        let session = Session::builder()
            .map_err(|e| load_error(&path, e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| load_error(&path, e))?
            .commit_from_file(&path)
            .map_err(|e| load_error(&path, e))?;

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| PoseError::ModelLoad("model has no outputs".into()))?;

        Ok(Self {
            session,
            output_name,
            input_size: config.input_size,
            confidence_threshold: config.confidence_threshold,
        })
    }
}

impl PoseEstimator for OnnxPoseModel {
    fn estimate(&mut self, frame: &VideoFrame) -> Result<Option<PoseDetection>, PoseError> {
        let (input, lb) = letterbox(frame, self.input_size)?;
        let tensor = Tensor::from_array(input).map_err(|e| PoseError::Inference(e.to_string()))?;

        let outputs = self
            .session
            .run(ort::inputs![tensor])
            .map_err(|e| PoseError::Inference(e.to_string()))?;

        let output = outputs[self.output_name.as_str()]
            .try_extract_array::<f32>()
            .map_err(|e| PoseError::Inference(e.to_string()))?;

        let detection = decode_best(output, self.confidence_threshold, &lb)?;
        match &detection {
            Some(d) => debug!("Frame {}: subject score {:.2}", frame.sequence, d.score),
            None => debug!("Frame {}: no subject", frame.sequence),
        }
        Ok(detection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_existing_model() {
        let path = std::env::temp_dir().join(format!("pose-{}.onnx", uuid::Uuid::new_v4()));
        std::fs::write(&path, b"onnx").unwrap();
        assert_eq!(resolve_model_path(&path), path);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_resolve_missing_model_falls_back() {
        let resolved = resolve_model_path(Path::new("/no/such/model.onnx"));
        assert_eq!(resolved, PathBuf::from(DEFAULT_MODEL));
    }

    #[test]
    fn test_zero_input_size_rejected() {
        let config = PoseModelConfig {
            input_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            OnnxPoseModel::load(&config),
            Err(PoseError::Config(_))
        ));
    }
}
