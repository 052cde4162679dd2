//! Command line arguments

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Real-time posture and attention monitoring from pose keypoints
#[derive(Parser, Debug, Default)]
#[command(name = "posewatch", version, about)]
pub struct Cli {
    /// Path to the ONNX pose model [default: yolo11n-pose.onnx]
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// JSON file holding the activity record [default: records/action_data.json]
    #[arg(long = "file-path", alias = "file_path", value_name = "PATH")]
    pub file_path: Option<PathBuf>,

    /// Webcam index, or path to a video, an image or a directory of images [default: 0]
    #[arg(long)]
    pub source: Option<String>,

    /// Show the detection results in a window
    #[arg(long)]
    pub show: bool,

    /// Frame rate of the input; each frame counts as 1/fps seconds [default: 30]
    #[arg(long)]
    pub fps: Option<u32>,

    /// Optional TOML settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Maximum log level (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,
}
