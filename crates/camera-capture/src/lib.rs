//! Camera Capture Library for Pose Monitoring
//!
//! Provides the frame sources the monitor can read from:
//! - Webcam by index (OpenCV, `opencv` feature)
//! - Video file (OpenCV, `opencv` feature)
//! - Single still image
//! - Directory of still images, read in file-name order

pub mod frame;
pub mod source;

#[cfg(feature = "opencv")]
pub mod capture;
#[cfg(feature = "opencv")]
pub mod preview;

pub use frame::VideoFrame;
pub use source::{open_source, FrameSource, ImageSequence, SourceSpec};

#[cfg(feature = "opencv")]
pub use capture::OpenCvCapture;
#[cfg(feature = "opencv")]
pub use preview::{OverlayPoint, PreviewWindow};

use thiserror::Error;

/// Camera error types
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Failed to open source: {0}")]
    Open(String),

    #[error("Failed to decode frame: {0}")]
    Decode(String),

    #[error("Streaming error: {0}")]
    Stream(String),

    #[error("Unsupported source: {0}")]
    Unsupported(String),

    #[error("Display error: {0}")]
    Display(String),
}
