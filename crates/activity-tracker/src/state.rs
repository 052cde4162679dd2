//! Session clock and save throttling

use std::time::Duration;

/// Accumulated frame time of the current day
#[derive(Debug, Clone, Default)]
pub struct SessionClock {
    /// Seconds of frame time since the day started
    pub elapsed_secs: f64,
    /// Frames since the day started
    pub frames: u64,
}

impl SessionClock {
    /// Add one frame interval. Returns `true` when the day is over, in which
    /// case the clock has already wrapped around to the new day.
    pub fn tick(&mut self, dt: f64, day_length_secs: f64) -> bool {
        self.elapsed_secs += dt;
        self.frames += 1;

        if self.elapsed_secs >= day_length_secs {
            self.elapsed_secs %= day_length_secs;
            self.frames = 0;
            true
        } else {
            false
        }
    }
}

/// Why a save is due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveReason {
    /// The day rolled over
    Rollover,
    /// This frame was processed faster than average
    FastFrame,
    /// Too long since the last save
    Interval,
}

/// Decides when the record should be written.
///
/// Saves happen on frames processed faster than the running average
/// processing time, or once more than `interval_secs` of frame time passed
/// since the last save.
#[derive(Debug, Clone)]
pub struct SaveThrottle {
    interval_secs: f64,
    total_processing: Duration,
    samples: u32,
    last_save_secs: f64,
}

impl SaveThrottle {
    pub fn new(interval_secs: f64) -> Self {
        Self {
            interval_secs,
            total_processing: Duration::ZERO,
            samples: 0,
            last_save_secs: 0.0,
        }
    }

    /// Running average processing time, including the latest sample
    pub fn average_processing(&self) -> Option<Duration> {
        (self.samples > 0).then(|| self.total_processing / self.samples)
    }

    /// Record this frame's processing time and check whether to save at `now_secs`
    pub fn observe(&mut self, processing: Duration, now_secs: f64) -> Option<SaveReason> {
        self.total_processing = self.total_processing.saturating_add(processing);
        self.samples = self.samples.saturating_add(1);

        let faster = self
            .average_processing()
            .is_some_and(|avg| processing < avg);

        if faster {
            Some(SaveReason::FastFrame)
        } else if now_secs - self.last_save_secs > self.interval_secs {
            Some(SaveReason::Interval)
        } else {
            None
        }
    }

    /// Note a save at `now_secs`
    pub fn saved_at(&mut self, now_secs: f64) {
        self.last_save_secs = now_secs;
    }

    /// Start a new day: forget the processing statistics
    pub fn reset(&mut self) {
        self.total_processing = Duration::ZERO;
        self.samples = 0;
        self.last_save_secs = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_wraps_at_day_length() {
        let mut clock = SessionClock::default();
        assert!(!clock.tick(3.0, 10.0));
        assert!(!clock.tick(3.0, 10.0));
        assert!(!clock.tick(3.0, 10.0));
        assert!(clock.tick(3.0, 10.0));
        assert_eq!(clock.elapsed_secs, 2.0);
        assert_eq!(clock.frames, 0);
    }

    #[test]
    fn test_clock_wraps_exactly_at_boundary() {
        let mut clock = SessionClock::default();
        assert!(clock.tick(10.0, 10.0));
        assert_eq!(clock.elapsed_secs, 0.0);
    }

    #[test]
    fn test_fast_frame_saves() {
        let mut throttle = SaveThrottle::new(5.0);
        assert_eq!(throttle.observe(Duration::from_millis(40), 0.1), None);
        assert_eq!(
            throttle.observe(Duration::from_millis(20), 0.2),
            Some(SaveReason::FastFrame)
        );
        assert_eq!(throttle.average_processing(), Some(Duration::from_millis(30)));
    }

    #[test]
    fn test_steady_frames_save_on_interval() {
        let mut throttle = SaveThrottle::new(5.0);
        let frame = Duration::from_millis(30);

        let mut saves = Vec::new();
        for i in 1..=48 {
            let now = i as f64 * 0.25;
            if throttle.observe(frame, now).is_some() {
                throttle.saved_at(now);
                saves.push(i);
            }
        }
        // more than 5 s after the last save: at 5.25 s and 10.5 s
        assert_eq!(saves, vec![21, 42]);
    }

    #[test]
    fn test_reset_clears_statistics() {
        let mut throttle = SaveThrottle::new(5.0);
        throttle.observe(Duration::from_millis(10), 1.0);
        throttle.saved_at(1.0);
        throttle.reset();
        assert_eq!(throttle.average_processing(), None);
    }
}
