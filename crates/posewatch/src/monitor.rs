//! Frame loop: source -> pose model -> recorder -> record file

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use activity_tracker::{ActivityRecord, ActivityRecorder, FrameAnalysis, TrackerConfig};
use anyhow::{Context, Result};
use camera_capture::{FrameSource, VideoFrame};
use pose_inference::PoseEstimator;
use storage::{JsonStore, LoadOutcome};
use tracing::{debug, info};

use crate::display::Preview;

/// Totals for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub frames_with_subject: u64,
    pub saves: u64,
}

/// Drives one session over a frame source
pub struct Monitor<E> {
    estimator: E,
    recorder: ActivityRecorder,
    store: JsonStore<ActivityRecord>,
    frame_interval: f64,
    preview: Option<Preview>,
    stop: Arc<AtomicBool>,
    summary: RunSummary,
}

impl<E: PoseEstimator> Monitor<E> {
    /// Load (or create) the record and set up the recorder
    pub fn new(
        estimator: E,
        store: JsonStore<ActivityRecord>,
        config: TrackerConfig,
        frame_interval: f64,
    ) -> Result<Self> {
        let (record, outcome) = store
            .load_or_default()
            .context("failed to prepare the record file")?;

        if outcome == LoadOutcome::Loaded {
            let [avg_stand, avg_sit, avg_lying] = record.average_days;
            info!(
                "Resuming: sit={:.1}s stand={:.1}s lying={:.1}s look_away={:.1}s look_at={:.1}s distracted={} avg=[{:.1}, {:.1}, {:.1}]",
                record.sit,
                record.stand,
                record.lying,
                record.look_away,
                record.look_at,
                record.distracted,
                avg_stand,
                avg_sit,
                avg_lying
            );
        } else {
            info!("Starting a new record at {}", store.path().display());
        }

        Ok(Self {
            estimator,
            recorder: ActivityRecorder::new(config, record)?,
            store,
            frame_interval,
            preview: None,
            stop: Arc::new(AtomicBool::new(false)),
            summary: RunSummary::default(),
        })
    }

    pub fn with_preview(mut self, preview: Option<Preview>) -> Self {
        self.preview = preview;
        self
    }

    /// Share a flag that asks the loop to stop after the current frame
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    /// Process frames until the source is exhausted or a stop is requested,
    /// then write the record one last time
    pub fn run(&mut self, source: &mut dyn FrameSource) -> Result<RunSummary> {
        info!("Reading frames from {}", source.describe());

        while !self.stop.load(Ordering::Relaxed) {
            let Some(frame) = source.next_frame().context("failed to read frame")? else {
                info!("Source exhausted");
                break;
            };

            let keep_going = self.process_frame(&frame)?;
            if !keep_going {
                info!("Preview closed");
                break;
            }
        }

        self.save()?;
        info!(
            "Processed {} frames ({} with a subject), {} saves",
            self.summary.frames, self.summary.frames_with_subject, self.summary.saves
        );
        Ok(self.summary.clone())
    }

    /// Run one frame through the model and the recorder. Returns `false`
    /// when the preview asked to quit.
    pub fn process_frame(&mut self, frame: &VideoFrame) -> Result<bool> {
        let started = Instant::now();

        let detection = self
            .estimator
            .estimate(frame)
            .with_context(|| format!("pose estimation failed on frame {}", frame.sequence))?;

        let analysis: FrameAnalysis = self.recorder.observe(
            detection.as_ref().map(|d| &d.keypoints),
            self.frame_interval,
            started.elapsed(),
        )?;

        self.summary.frames += 1;
        if analysis.subject_detected {
            self.summary.frames_with_subject += 1;
        }

        if let Some(reason) = analysis.save {
            debug!("Saving record ({:?})", reason);
            self.save()?;
        }

        match &self.preview {
            Some(preview) => preview.show(frame, detection.as_ref(), &analysis),
            None => Ok(true),
        }
    }

    fn save(&mut self) -> Result<()> {
        self.store
            .save(self.recorder.record())
            .context("failed to save the record")?;
        self.recorder.mark_saved();
        self.summary.saves += 1;
        Ok(())
    }

    pub fn record(&self) -> &ActivityRecord {
        self.recorder.record()
    }
}
