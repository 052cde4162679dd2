//! Persisted activity record

use serde::{Deserialize, Serialize};

/// Running statistics written to the JSON record file.
///
/// Every key is required and no other key is accepted, so anything else on
/// disk fails to parse and gets replaced with the default record. The
/// three-element arrays are ordered `[stand, sit, lying]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActivityRecord {
    /// Seconds sitting today
    pub sit: f64,
    /// Seconds standing today
    pub stand: f64,
    /// Seconds lying today
    pub lying: f64,
    /// Current run of seconds looking away
    pub look_away: f64,
    /// Yesterday's totals
    pub last_day: [f64; 3],
    /// Current run of seconds looking at the screen
    pub look_at: f64,
    pub distracted: bool,
    /// Moving average of daily totals
    #[serde(rename = "14days_avg_action")]
    pub average_days: [f64; 3],
}

impl ActivityRecord {
    /// Today's posture totals, `[stand, sit, lying]`
    pub fn day_totals(&self) -> [f64; 3] {
        [self.stand, self.sit, self.lying]
    }

    /// Close the day: fold today's totals into the moving average with
    /// weight `weight`, keep them as `last_day` and zero the posture counters.
    pub fn roll_over(&mut self, weight: f64) {
        let today = self.day_totals();
        for (avg, day) in self.average_days.iter_mut().zip(today) {
            *avg = weight * day + (1.0 - weight) * *avg;
        }
        self.last_day = today;
        self.stand = 0.0;
        self.sit = 0.0;
        self.lying = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_json_keys() {
        let json = serde_json::to_value(ActivityRecord::default()).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            [
                "14days_avg_action",
                "distracted",
                "last_day",
                "look_at",
                "look_away",
                "lying",
                "sit",
                "stand"
            ]
        );
    }

    #[test]
    fn test_accepts_integer_counters() {
        let text = r#"{"sit": 0, "stand": 12, "lying": 0, "look_away": 0,
            "last_day": [0, 0, 0], "look_at": 3.5, "distracted": false,
            "14days_avg_action": [1, 2, 3]}"#;
        let record: ActivityRecord = serde_json::from_str(text).unwrap();
        assert_eq!(record.stand, 12.0);
        assert_eq!(record.average_days, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_rejects_wrong_shapes() {
        let missing = r#"{"sit": 0, "stand": 0, "lying": 0}"#;
        assert!(serde_json::from_str::<ActivityRecord>(missing).is_err());

        let extra = r#"{"sit": 0, "stand": 0, "lying": 0, "look_away": 0,
            "last_day": [0, 0, 0], "look_at": 0, "distracted": false,
            "14days_avg_action": [0, 0, 0], "mood": "calm"}"#;
        assert!(serde_json::from_str::<ActivityRecord>(extra).is_err());

        let short = r#"{"sit": 0, "stand": 0, "lying": 0, "look_away": 0,
            "last_day": [0, 0], "look_at": 0, "distracted": false,
            "14days_avg_action": [0, 0, 0]}"#;
        assert!(serde_json::from_str::<ActivityRecord>(short).is_err());

        assert!(serde_json::from_str::<ActivityRecord>("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_roll_over() {
        let mut record = ActivityRecord {
            stand: 1400.0,
            sit: 2800.0,
            lying: 0.0,
            average_days: [14.0, 0.0, 140.0],
            distracted: true,
            ..Default::default()
        };
        record.roll_over(1.0 / 14.0);

        assert_eq!(record.last_day, [1400.0, 2800.0, 0.0]);
        assert_eq!(record.day_totals(), [0.0, 0.0, 0.0]);
        assert!((record.average_days[0] - 113.0).abs() < 1e-9);
        assert!((record.average_days[1] - 200.0).abs() < 1e-9);
        assert!((record.average_days[2] - 130.0).abs() < 1e-9);
        // gaze state is not part of the day
        assert!(record.distracted);
    }

    proptest! {
        #[test]
        fn prop_average_is_convex(
            prev in prop::array::uniform3(0.0f64..1e6),
            day in prop::array::uniform3(0.0f64..86_400.0),
            window in 1u32..60,
        ) {
            let weight = 1.0 / window as f64;
            let mut record = ActivityRecord {
                stand: day[0],
                sit: day[1],
                lying: day[2],
                average_days: prev,
                ..Default::default()
            };
            record.roll_over(weight);

            for i in 0..3 {
                let expected = weight * day[i] + (1.0 - weight) * prev[i];
                prop_assert!((record.average_days[i] - expected).abs() <= 1e-6 * expected.max(1.0));
                let lo = prev[i].min(day[i]);
                let hi = prev[i].max(day[i]);
                prop_assert!(record.average_days[i] >= lo - 1e-6 && record.average_days[i] <= hi + 1e-6);
            }
        }
    }
}
