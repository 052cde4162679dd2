//! Tracker configuration

use serde::{Deserialize, Serialize};

use crate::TrackerError;

/// Tracker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Head yaw beyond which the subject is looking away (degrees)
    pub yaw_threshold_degrees: f32,

    /// Continuous looking-away time that raises the distraction flag (seconds)
    pub distraction_after_secs: f64,

    /// Continuous looking-at time that clears the distraction flag (seconds)
    pub attention_after_secs: f64,

    /// Accumulated frame time per day (seconds)
    pub day_length_secs: f64,

    /// Window of the daily exponential moving average (days)
    pub average_window_days: u32,

    /// Longest gap between saves (seconds of frame time)
    pub save_interval_secs: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            yaw_threshold_degrees: 40.0,
            distraction_after_secs: 10.0,
            attention_after_secs: 5.0,
            day_length_secs: 86_400.0,
            average_window_days: 14,
            save_interval_secs: 5.0,
        }
    }
}

impl TrackerConfig {
    /// Weight of the newest day in the moving average
    pub fn average_weight(&self) -> f64 {
        1.0 / self.average_window_days as f64
    }

    /// Reject values that would stall or corrupt the counters
    pub fn validate(&self) -> Result<(), TrackerError> {
        if !(self.yaw_threshold_degrees > 0.0 && self.yaw_threshold_degrees < 90.0) {
            return Err(TrackerError::Config(format!(
                "yaw_threshold_degrees must be in (0, 90), got {}",
                self.yaw_threshold_degrees
            )));
        }
        if !(self.day_length_secs > 0.0) {
            return Err(TrackerError::Config(format!(
                "day_length_secs must be positive, got {}",
                self.day_length_secs
            )));
        }
        if self.average_window_days == 0 {
            return Err(TrackerError::Config(
                "average_window_days must be at least 1".to_string(),
            ));
        }
        if self.distraction_after_secs < 0.0
            || self.attention_after_secs < 0.0
            || self.save_interval_secs < 0.0
        {
            return Err(TrackerError::Config(
                "dwell and save intervals must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TrackerConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.average_weight() - 1.0 / 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_zero_window() {
        let config = TrackerConfig {
            average_window_days: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TrackerError::Config(_))));
    }

    #[test]
    fn test_rejects_nan_day() {
        let config = TrackerConfig {
            day_length_secs: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
