//! Activity Tracker
//!
//! Turns per-frame keypoints into time-accumulated behavior statistics:
//! - Posture (sitting / standing / lying) time per day
//! - Looking-at / looking-away runs with a hysteresis distraction flag
//! - Daily rollover into a moving average of posture totals
//! - Throttled save decisions for the persisted record

pub mod analysis;
pub mod config;
pub mod gaze;
pub mod head;
pub mod posture;
pub mod record;
pub mod state;

pub use analysis::FrameAnalysis;
pub use config::TrackerConfig;
pub use gaze::Gaze;
pub use head::HeadPose;
pub use posture::Posture;
pub use record::ActivityRecord;
pub use state::{SaveReason, SaveThrottle, SessionClock};

use std::time::Duration;

use pose_inference::PoseKeypoints;
use thiserror::Error;
use tracing::{debug, info};

/// Tracker error types
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Frame interval must be positive and finite, got {0}")]
    InvalidInterval(f64),
}

/// Stateful recorder fed one frame at a time
pub struct ActivityRecorder {
    config: TrackerConfig,
    record: ActivityRecord,
    clock: SessionClock,
    throttle: SaveThrottle,
}

impl ActivityRecorder {
    /// Continue from `record` (fresh or loaded from disk)
    pub fn new(config: TrackerConfig, record: ActivityRecord) -> Result<Self, TrackerError> {
        config.validate()?;
        Ok(Self {
            throttle: SaveThrottle::new(config.save_interval_secs),
            clock: SessionClock::default(),
            config,
            record,
        })
    }

    /// Account for one frame lasting `dt` seconds.
    ///
    /// `subject` is the detected subject, if any; frames without one only
    /// advance the clock. `processing` is how long the frame took to process
    /// and feeds the save throttle.
    pub fn observe(
        &mut self,
        subject: Option<&PoseKeypoints>,
        dt: f64,
        processing: Duration,
    ) -> Result<FrameAnalysis, TrackerError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(TrackerError::InvalidInterval(dt));
        }

        let mut analysis = FrameAnalysis {
            subject_detected: subject.is_some(),
            ..Default::default()
        };

        if let Some(kps) = subject {
            let was_distracted = self.record.distracted;

            let head_pose = HeadPose::from_keypoints(kps);
            let gaze = Gaze::from_yaw(head_pose.map(|p| p.yaw), self.config.yaw_threshold_degrees);
            gaze::update(&mut self.record, gaze, dt, &self.config);

            let posture = posture::classify(kps);
            match posture {
                Some(Posture::Lying) => self.record.lying += dt,
                Some(Posture::Standing) => self.record.stand += dt,
                Some(Posture::Sitting) => self.record.sit += dt,
                None => {}
            }

            if self.record.distracted != was_distracted {
                if self.record.distracted {
                    info!("Distracted: looking away for {:.1}s", self.record.look_away);
                } else {
                    info!("Attention back after {:.1}s", self.record.look_at);
                }
            }

            analysis.head_pose = head_pose;
            analysis.gaze = Some(gaze);
            analysis.posture = posture;
        }

        if self.clock.tick(dt, self.config.day_length_secs) {
            self.roll_over();
            analysis.rolled_over = true;
        }

        let throttled = self.throttle.observe(processing, self.clock.elapsed_secs);
        analysis.save = if analysis.rolled_over {
            Some(SaveReason::Rollover)
        } else {
            throttled
        };
        analysis.distracted = self.record.distracted;
        analysis.day_elapsed_secs = self.clock.elapsed_secs;

        debug!(
            "Frame: posture={:?} gaze={:?} day={:.2}s save={:?}",
            analysis.posture, analysis.gaze, analysis.day_elapsed_secs, analysis.save
        );
        Ok(analysis)
    }

    fn roll_over(&mut self) {
        self.record.roll_over(self.config.average_weight());
        self.throttle.reset();
        let [stand, sit, lying] = self.record.last_day;
        info!(
            "Day closed: stand={:.0}s sit={:.0}s lying={:.0}s",
            stand, sit, lying
        );
    }

    /// Tell the throttle the record was just written
    pub fn mark_saved(&mut self) {
        self.throttle.saved_at(self.clock.elapsed_secs);
    }

    pub fn record(&self) -> &ActivityRecord {
        &self.record
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn into_record(self) -> ActivityRecord {
        self.record
    }
}
