//! Letterbox preprocessing for square-input pose models

use camera_capture::VideoFrame;
use image::imageops::{self, FilterType};
use ndarray::Array4;

use crate::PoseError;

/// Gray used by YOLO exports for padding
const PAD_VALUE: f32 = 114.0 / 255.0;

/// Mapping between source-frame pixels and model-input pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    /// Source to model scale factor
    pub scale: f32,
    /// Horizontal padding in model pixels
    pub pad_x: f32,
    /// Vertical padding in model pixels
    pub pad_y: f32,
}

impl Letterbox {
    /// Fit a `width` x `height` frame into a `size` x `size` square, centered
    pub fn fit(width: u32, height: u32, size: u32) -> Self {
        let scale = (size as f32 / width as f32).min(size as f32 / height as f32);
        let new_w = (width as f32 * scale).round();
        let new_h = (height as f32 * scale).round();
        Self {
            scale,
            pad_x: ((size as f32 - new_w) / 2.0).floor(),
            pad_y: ((size as f32 - new_h) / 2.0).floor(),
        }
    }

    /// Map a model-input point back to the source frame
    pub fn to_source(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.pad_x) / self.scale, (y - self.pad_y) / self.scale)
    }
}

/// Resize, pad and normalize a frame into a 1x3xSxS tensor
pub fn letterbox(frame: &VideoFrame, size: u32) -> Result<(Array4<f32>, Letterbox), PoseError> {
    if frame.width == 0 || frame.height == 0 {
        return Err(PoseError::ImageProcessing("empty frame".into()));
    }
    let img = frame
        .as_rgb_image()
        .ok_or_else(|| PoseError::ImageProcessing("Failed to create image buffer".into()))?;

    let lb = Letterbox::fit(frame.width, frame.height, size);
    let new_w = ((frame.width as f32 * lb.scale).round() as u32).clamp(1, size);
    let new_h = ((frame.height as f32 * lb.scale).round() as u32).clamp(1, size);
    let resized = imageops::resize(&img, new_w, new_h, FilterType::Triangle);

    let s = size as usize;
    let mut input = Array4::<f32>::from_elem((1, 3, s, s), PAD_VALUE);
    let (ox, oy) = (lb.pad_x as usize, lb.pad_y as usize);
    for (x, y, pixel) in resized.enumerate_pixels() {
        let (cx, cy) = (ox + x as usize, oy + y as usize);
        if cx >= s || cy >= s {
            continue;
        }
        input[[0, 0, cy, cx]] = pixel[0] as f32 / 255.0;
        input[[0, 1, cy, cx]] = pixel[1] as f32 / 255.0;
        input[[0, 2, cy, cx]] = pixel[2] as f32 / 255.0;
    }

    Ok((input, lb))
}
