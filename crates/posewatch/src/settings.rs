//! Layered settings: defaults, optional TOML file, environment, then flags

use std::path::{Path, PathBuf};

use activity_tracker::TrackerConfig;
use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use pose_inference::{PoseModelConfig, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, LogFormat};

/// Environment prefix, e.g. `POSEWATCH__TRACKER__YAW_THRESHOLD_DEGREES=35`
pub const ENV_PREFIX: &str = "POSEWATCH";

/// Pose model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub path: PathBuf,
    pub input_size: u32,
    pub confidence_threshold: f32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_MODEL),
            input_size: 640,
            confidence_threshold: 0.25,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub format: LogFormat,
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            level: "info".to_string(),
        }
    }
}

/// Everything the monitor needs to run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub record_path: PathBuf,
    pub source: String,
    pub show: bool,
    pub fps: u32,
    pub model: ModelSettings,
    pub tracker: TrackerConfig,
    pub log: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            record_path: PathBuf::from("records/action_data.json"),
            source: "0".to_string(),
            show: false,
            fps: 30,
            model: ModelSettings::default(),
            tracker: TrackerConfig::default(),
            log: LogSettings::default(),
        }
    }
}

impl Settings {
    /// Merge defaults, the optional file and `POSEWATCH__*` variables
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&Settings::default()).context("default settings")?);

        if let Some(path) = file {
            if !path.exists() {
                bail!("settings file {} does not exist", path.display());
            }
            builder = builder.add_source(File::from(path.to_path_buf()));
        }

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read settings")?
            .try_deserialize()
            .context("invalid settings")?;

        Ok(settings)
    }

    /// Flags given on the command line win over every other layer
    pub fn apply_cli(mut self, cli: &Cli) -> Self {
        if let Some(model) = &cli.model {
            self.model.path = model.clone();
        }
        if let Some(path) = &cli.file_path {
            self.record_path = path.clone();
        }
        if let Some(source) = &cli.source {
            self.source = source.clone();
        }
        if cli.show {
            self.show = true;
        }
        if let Some(fps) = cli.fps {
            self.fps = fps;
        }
        if let Some(format) = cli.log_format {
            self.log.format = format;
        }
        if let Some(level) = &cli.log_level {
            self.log.level = level.clone();
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            bail!("fps must be at least 1");
        }
        if self.model.input_size == 0 {
            bail!("model.input_size must be positive");
        }
        self.tracker.validate().context("invalid tracker settings")?;
        Ok(())
    }

    /// Seconds each frame accounts for
    pub fn frame_interval(&self) -> f64 {
        1.0 / self.fps as f64
    }

    pub fn model_config(&self) -> PoseModelConfig {
        PoseModelConfig {
            model_path: self.model.path.clone(),
            input_size: self.model.input_size,
            confidence_threshold: self.model.confidence_threshold,
        }
    }
}
