//! Frame source selection and still-image sources

use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use image::ImageFormat;
use tracing::{debug, info};

use crate::{CameraError, VideoFrame};

/// A stream of frames, ended by `Ok(None)`.
pub trait FrameSource {
    /// Read the next frame
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, CameraError>;

    /// Human readable description for logs
    fn describe(&self) -> String;
}

/// Where frames come from, as given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// Webcam device index
    Webcam(i32),
    /// Video file, image file or directory of images
    Path(PathBuf),
}

impl FromStr for SourceSpec {
    type Err = CameraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CameraError::Open("empty source".to_string()));
        }
        match s.parse::<i32>() {
            Ok(index) => Ok(SourceSpec::Webcam(index)),
            Err(_) => Ok(SourceSpec::Path(PathBuf::from(s))),
        }
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceSpec::Webcam(index) => write!(f, "webcam {}", index),
            SourceSpec::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Open the frame source described by `spec`
pub fn open_source(spec: &SourceSpec) -> Result<Box<dyn FrameSource>, CameraError> {
    match spec {
        SourceSpec::Webcam(index) => open_webcam(*index),
        SourceSpec::Path(path) => {
            if path.is_dir() {
                return Ok(Box::new(ImageSequence::from_dir(path)?));
            }
            if !path.exists() {
                return Err(CameraError::Open(format!("{} does not exist", path.display())));
            }
            if is_image_file(path) {
                Ok(Box::new(ImageSequence::single(path)))
            } else {
                open_video(path)
            }
        }
    }
}

#[cfg(feature = "opencv")]
fn open_webcam(index: i32) -> Result<Box<dyn FrameSource>, CameraError> {
    Ok(Box::new(crate::OpenCvCapture::webcam(index)?))
}

#[cfg(not(feature = "opencv"))]
fn open_webcam(index: i32) -> Result<Box<dyn FrameSource>, CameraError> {
    Err(CameraError::Unsupported(format!(
        "webcam {} requires building with the `opencv` feature",
        index
    )))
}

#[cfg(feature = "opencv")]
fn open_video(path: &Path) -> Result<Box<dyn FrameSource>, CameraError> {
    Ok(Box::new(crate::OpenCvCapture::file(path)?))
}

#[cfg(not(feature = "opencv"))]
fn open_video(path: &Path) -> Result<Box<dyn FrameSource>, CameraError> {
    Err(CameraError::Unsupported(format!(
        "video file {} requires building with the `opencv` feature",
        path.display()
    )))
}

fn is_image_file(path: &Path) -> bool {
    ImageFormat::from_path(path).is_ok()
}

/// Still images played back as a stream
pub struct ImageSequence {
    label: String,
    pending: VecDeque<PathBuf>,
    sequence: u32,
    started: Instant,
}

impl ImageSequence {
    /// A one-frame stream
    pub fn single(path: &Path) -> Self {
        Self::from_paths(path.display().to_string(), vec![path.to_path_buf()])
    }

    /// Every image file in `dir`, sorted by file name
    pub fn from_dir(dir: &Path) -> Result<Self, CameraError> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| CameraError::Open(format!("{}: {}", dir.display(), e)))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| CameraError::Open(format!("{}: {}", dir.display(), e)))?
                .path();
            if path.is_file() && is_image_file(&path) {
                paths.push(path);
            }
        }

        if paths.is_empty() {
            return Err(CameraError::Open(format!(
                "no image files in {}",
                dir.display()
            )));
        }

        paths.sort();
        info!("Found {} images in {}", paths.len(), dir.display());
        Ok(Self::from_paths(dir.display().to_string(), paths))
    }

    fn from_paths(label: String, paths: Vec<PathBuf>) -> Self {
        Self {
            label,
            pending: paths.into(),
            sequence: 0,
            started: Instant::now(),
        }
    }

    /// Frames not yet read
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl FrameSource for ImageSequence {
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, CameraError> {
        let Some(path) = self.pending.pop_front() else {
            return Ok(None);
        };

        debug!("Decoding {}", path.display());
        let image = image::open(&path)
            .map_err(|e| CameraError::Decode(format!("{}: {}", path.display(), e)))?
            .to_rgb8();

        let timestamp_ns = self.started.elapsed().as_nanos() as u64;
        let frame = VideoFrame::from_rgb_image(image, timestamp_ns, self.sequence);
        self.sequence = self.sequence.wrapping_add(1);
        Ok(Some(frame))
    }

    fn describe(&self) -> String {
        format!("images from {}", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("camera-capture-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        RgbImage::new(width, height).save(path).unwrap();
    }

    #[test]
    fn test_parse_source_spec() {
        assert_eq!("0".parse::<SourceSpec>().unwrap(), SourceSpec::Webcam(0));
        assert_eq!(" 2 ".parse::<SourceSpec>().unwrap(), SourceSpec::Webcam(2));
        assert_eq!(
            "videos/desk.mp4".parse::<SourceSpec>().unwrap(),
            SourceSpec::Path(PathBuf::from("videos/desk.mp4"))
        );
        assert!("".parse::<SourceSpec>().is_err());
    }

    #[test]
    fn test_directory_sorted_and_filtered() {
        let dir = scratch_dir();
        write_png(&dir.join("b.png"), 3, 2);
        write_png(&dir.join("a.png"), 5, 4);
        std::fs::write(dir.join("notes.txt"), "not an image").unwrap();

        let mut seq = ImageSequence::from_dir(&dir).unwrap();
        assert_eq!(seq.remaining(), 2);

        let first = seq.next_frame().unwrap().unwrap();
        assert_eq!((first.width, first.height), (5, 4));
        assert_eq!(first.sequence, 0);

        let second = seq.next_frame().unwrap().unwrap();
        assert_eq!((second.width, second.height), (3, 2));
        assert_eq!(second.sequence, 1);

        assert!(seq.next_frame().unwrap().is_none());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_empty_directory_rejected() {
        let dir = scratch_dir();
        assert!(matches!(
            ImageSequence::from_dir(&dir),
            Err(CameraError::Open(_))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_open_source_single_image() {
        let dir = scratch_dir();
        let path = dir.join("still.png");
        write_png(&path, 8, 6);

        let mut source = open_source(&SourceSpec::Path(path)).unwrap();
        let frame = source.next_frame().unwrap().unwrap();
        assert!(frame.is_well_formed());
        assert!(source.next_frame().unwrap().is_none());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_path() {
        let spec = SourceSpec::Path(PathBuf::from("/definitely/not/here.png"));
        assert!(matches!(open_source(&spec), Err(CameraError::Open(_))));
    }

    #[cfg(not(feature = "opencv"))]
    #[test]
    fn test_webcam_needs_opencv() {
        assert!(matches!(
            open_source(&SourceSpec::Webcam(0)),
            Err(CameraError::Unsupported(_))
        ));
    }
}
