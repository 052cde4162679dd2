//! Gaze direction and the distraction flag

use serde::{Deserialize, Serialize};

use crate::config::TrackerConfig;
use crate::record::ActivityRecord;

/// Where the subject is looking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gaze {
    LookingAt,
    LookingAway,
}

impl Gaze {
    /// Classify a yaw angle. Frames without a head pose count as looking at.
    pub fn from_yaw(yaw: Option<f32>, threshold_degrees: f32) -> Self {
        match yaw {
            Some(yaw) if yaw.abs() > threshold_degrees => Gaze::LookingAway,
            _ => Gaze::LookingAt,
        }
    }
}

/// Advance the look-away / look-at runs by `dt` seconds.
///
/// Looking away zeroes the look-at run and raises the flag once the
/// look-away run passes `distraction_after_secs`. Looking at only zeroes the
/// look-away run (and clears the flag) once the look-at run passes
/// `attention_after_secs`, so short glances back do not reset distraction.
pub fn update(record: &mut ActivityRecord, gaze: Gaze, dt: f64, config: &TrackerConfig) {
    match gaze {
        Gaze::LookingAway => {
            record.look_away += dt;
            record.look_at = 0.0;
            if record.look_away > config.distraction_after_secs {
                record.distracted = true;
            }
        }
        Gaze::LookingAt => {
            record.look_at += dt;
            if record.look_at > config.attention_after_secs {
                record.look_away = 0.0;
                record.distracted = false;
            }
        }
    }
}
