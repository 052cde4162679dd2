//! posewatch
//!
//! Watches a webcam, video or image sequence, runs a pose model on every
//! frame and keeps a JSON record of posture time, gaze and distraction.

pub mod cli;
pub mod display;
pub mod logging;
pub mod monitor;
pub mod settings;

pub use cli::{Cli, LogFormat};
pub use logging::init_logging;
pub use monitor::{Monitor, RunSummary};
pub use settings::Settings;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use activity_tracker::ActivityRecord;
use anyhow::{Context, Result};
use camera_capture::{open_source, SourceSpec};
use pose_inference::OnnxPoseModel;
use storage::JsonStore;
use tracing::info;

use crate::display::Preview;

/// Run a full session with the ONNX model until the source ends or `stop` is set
pub fn run(settings: Settings, stop: Arc<AtomicBool>) -> Result<RunSummary> {
    settings.validate()?;

    let spec: SourceSpec = settings.source.parse()?;
    let mut source = open_source(&spec).with_context(|| format!("cannot read from {}", spec))?;

    let model = OnnxPoseModel::load(&settings.model_config())?;
    info!(
        "Frame interval {:.4}s ({} fps), record at {}",
        settings.frame_interval(),
        settings.fps,
        settings.record_path.display()
    );

    let store = JsonStore::<ActivityRecord>::new(&settings.record_path);
    let mut monitor = Monitor::new(
        model,
        store,
        settings.tracker.clone(),
        settings.frame_interval(),
    )?
    .with_preview(Preview::open(settings.show)?)
    .with_stop_flag(stop);

    monitor.run(source.as_mut())
}
