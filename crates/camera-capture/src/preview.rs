//! Preview window with a skeleton overlay

use opencv::{
    core::{Mat, Point, Scalar},
    highgui, imgproc,
    prelude::*,
};

use crate::{CameraError, VideoFrame};

const KEY_ESC: i32 = 27;

/// A point to draw, in frame pixels
#[derive(Debug, Clone, Copy)]
pub struct OverlayPoint {
    pub x: f32,
    pub y: f32,
    pub visible: bool,
}

/// HighGUI window showing frames and detected keypoints
pub struct PreviewWindow {
    name: String,
}

impl PreviewWindow {
    pub fn new(name: &str) -> Result<Self, CameraError> {
        highgui::named_window(name, highgui::WINDOW_AUTOSIZE)
            .map_err(|e| CameraError::Display(e.to_string()))?;
        Ok(Self {
            name: name.to_string(),
        })
    }

    /// Draw one frame. Returns `false` once the user pressed `q` or Esc.
    pub fn show(
        &self,
        frame: &VideoFrame,
        points: &[OverlayPoint],
        edges: &[[usize; 2]],
        caption: &str,
    ) -> Result<bool, CameraError> {
        let display = |e: opencv::Error| CameraError::Display(e.to_string());

        let flat = Mat::from_slice(&frame.data).map_err(display)?;
        let rgb = flat.reshape(3, frame.height as i32).map_err(display)?;
        let mut canvas = Mat::default();
        imgproc::cvt_color_def(&rgb, &mut canvas, imgproc::COLOR_RGB2BGR).map_err(display)?;

        let limb = Scalar::new(255.0, 128.0, 0.0, 0.0);
        let joint = Scalar::new(0.0, 255.0, 0.0, 0.0);

        for [a, b] in edges {
            let (Some(pa), Some(pb)) = (points.get(*a), points.get(*b)) else {
                continue;
            };
            if pa.visible && pb.visible {
                imgproc::line(
                    &mut canvas,
                    Point::new(pa.x as i32, pa.y as i32),
                    Point::new(pb.x as i32, pb.y as i32),
                    limb,
                    2,
                    imgproc::LINE_8,
                    0,
                )
                .map_err(display)?;
            }
        }

        for p in points.iter().filter(|p| p.visible) {
            imgproc::circle(
                &mut canvas,
                Point::new(p.x as i32, p.y as i32),
                4,
                joint,
                -1,
                imgproc::LINE_8,
                0,
            )
            .map_err(display)?;
        }

        imgproc::put_text(
            &mut canvas,
            caption,
            Point::new(10, 24),
            imgproc::FONT_HERSHEY_SIMPLEX,
            0.7,
            Scalar::new(255.0, 255.0, 255.0, 0.0),
            2,
            imgproc::LINE_8,
            false,
        )
        .map_err(display)?;

        highgui::imshow(&self.name, &canvas).map_err(display)?;
        let key = highgui::wait_key(1).map_err(display)?;
        Ok(key != KEY_ESC && key != 'q' as i32)
    }
}

impl Drop for PreviewWindow {
    fn drop(&mut self) {
        let _ = highgui::destroy_window(&self.name);
    }
}
