//! Ad-hoc IoT sensor adapter — manually entered or simulated values.
//!
//! IoT input is taken at face value: fresh at creation, never rescaled, and
//! flagged uncalibrated so the aggregator discounts it heavily.

use airsift_recon::model::{AqiReading, Confidence, DataSource, Freshness, AQI_MAX};
use chrono::{DateTime, Utc};

use crate::SourceAdapter;

/// A single manual or simulated sensor entry.
pub struct IotEntry {
    /// Raw user input; range-checked at fetch time.
    value: i64,
}

impl IotEntry {
    pub fn new(value: i64) -> Self {
        Self { value }
    }
}

impl SourceAdapter for IotEntry {
    fn source(&self) -> DataSource {
        DataSource::IotSensor
    }

    fn fetch(&self, _city: &str, now: DateTime<Utc>) -> AqiReading {
        let in_range = u16::try_from(self.value)
            .ok()
            .filter(|aqi| *aqi <= AQI_MAX);
        let Some(aqi) = in_range else {
            return AqiReading::unavailable(
                DataSource::IotSensor,
                format!("entered value {} is outside 0..={AQI_MAX}", self.value),
            );
        };

        AqiReading {
            source: DataSource::IotSensor,
            aqi: Some(aqi),
            pollutants: Vec::new(),
            timestamp: Some(now),
            // Fresh at creation, by definition.
            freshness: Freshness::Fresh,
            confidence: Confidence::Uncalibrated,
            notes: Some("manually entered sensor value; uncalibrated".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-14T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn in_range_entry_is_fresh_and_uncalibrated() {
        let reading = IotEntry::new(310).fetch("lahore", now());
        assert_eq!(reading.aqi, Some(310));
        assert_eq!(reading.freshness, Freshness::Fresh);
        assert_eq!(reading.confidence, Confidence::Uncalibrated);
        assert_eq!(reading.timestamp, Some(now()));
    }

    #[test]
    fn scale_bounds_are_accepted() {
        assert_eq!(IotEntry::new(0).fetch("lahore", now()).aqi, Some(0));
        assert_eq!(IotEntry::new(500).fetch("lahore", now()).aqi, Some(500));
    }

    #[test]
    fn out_of_range_entry_degrades_to_unavailable() {
        for bad in [-1, 501, 9000] {
            let reading = IotEntry::new(bad).fetch("lahore", now());
            assert!(!reading.is_usable(), "{bad} should not be usable");
            assert!(reading.notes.as_deref().unwrap().contains("outside"));
        }
    }
}
