//! Webcam and video-file capture through OpenCV

use std::path::Path;
use std::time::Instant;

use opencv::{
    core::Mat,
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};
use tracing::info;

use crate::{CameraError, FrameSource, VideoFrame};

/// OpenCV `VideoCapture` wrapped as a frame source
pub struct OpenCvCapture {
    capture: VideoCapture,
    label: String,
    sequence: u32,
    started: Instant,
}

impl OpenCvCapture {
    /// Open a webcam by device index
    pub fn webcam(index: i32) -> Result<Self, CameraError> {
        let capture = VideoCapture::new(index, videoio::CAP_ANY)
            .map_err(|e| CameraError::Open(e.to_string()))?;
        Self::from_capture(capture, format!("webcam {}", index))
    }

    /// Open a video file
    pub fn file(path: &Path) -> Result<Self, CameraError> {
        let name = path
            .to_str()
            .ok_or_else(|| CameraError::Open(format!("non UTF-8 path {}", path.display())))?;
        let capture = VideoCapture::from_file(name, videoio::CAP_ANY)
            .map_err(|e| CameraError::Open(e.to_string()))?;
        Self::from_capture(capture, name.to_string())
    }

    fn from_capture(capture: VideoCapture, label: String) -> Result<Self, CameraError> {
        let opened = capture
            .is_opened()
            .map_err(|e| CameraError::Open(e.to_string()))?;
        if !opened {
            return Err(CameraError::Open(format!("failed to open {}", label)));
        }

        info!("Opened {}", label);
        Ok(Self {
            capture,
            label,
            sequence: 0,
            started: Instant::now(),
        })
    }
}

impl FrameSource for OpenCvCapture {
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, CameraError> {
        let mut bgr = Mat::default();
        let grabbed = self
            .capture
            .read(&mut bgr)
            .map_err(|e| CameraError::Stream(e.to_string()))?;

        if !grabbed || bgr.empty() {
            return Ok(None);
        }

        let mut rgb = Mat::default();
        imgproc::cvt_color_def(&bgr, &mut rgb, imgproc::COLOR_BGR2RGB)
            .map_err(|e| CameraError::Decode(e.to_string()))?;

        let data = rgb
            .data_bytes()
            .map_err(|e| CameraError::Decode(e.to_string()))?
            .to_vec();

        let frame = VideoFrame::new(
            data,
            rgb.cols() as u32,
            rgb.rows() as u32,
            self.started.elapsed().as_nanos() as u64,
            self.sequence,
        );
        self.sequence = self.sequence.wrapping_add(1);
        Ok(Some(frame))
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
