//! Government monitoring-network adapter.
//!
//! The network publishes on a lag, so readings arrive pre-cached with their
//! recording instant; freshness is classified against `now` at fetch time.

use std::collections::HashMap;

use airsift_recon::config::FreshnessPolicy;
use airsift_recon::freshness;
use airsift_recon::model::{AqiReading, Confidence, DataSource, Pollutant};
use chrono::{DateTime, Utc};

use crate::SourceAdapter;

/// One cached station record.
#[derive(Debug, Clone)]
pub struct StationRecord {
    pub aqi: u16,
    pub pollutants: Vec<Pollutant>,
    pub recorded_at: DateTime<Utc>,
}

pub struct GovernmentCache {
    records: HashMap<String, StationRecord>,
    freshness: FreshnessPolicy,
}

impl GovernmentCache {
    pub fn new(freshness: FreshnessPolicy) -> Self {
        Self {
            records: HashMap::new(),
            freshness,
        }
    }

    pub fn insert(&mut self, city: impl Into<String>, record: StationRecord) {
        self.records.insert(city.into(), record);
    }
}

impl SourceAdapter for GovernmentCache {
    fn source(&self) -> DataSource {
        DataSource::Government
    }

    fn fetch(&self, city: &str, now: DateTime<Utc>) -> AqiReading {
        let Some(record) = self.records.get(city) else {
            return AqiReading::unavailable(
                DataSource::Government,
                format!("no cached station data for '{city}'"),
            );
        };

        AqiReading {
            source: DataSource::Government,
            aqi: Some(record.aqi),
            pollutants: record.pollutants.clone(),
            timestamp: Some(record.recorded_at),
            freshness: freshness::classify(Some(record.recorded_at), now, &self.freshness),
            confidence: Confidence::High,
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airsift_recon::model::Freshness;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-14T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn cache_with(city: &str, aqi: u16, age: Duration) -> GovernmentCache {
        let mut cache = GovernmentCache::new(FreshnessPolicy::default());
        cache.insert(
            city,
            StationRecord {
                aqi,
                pollutants: vec![Pollutant {
                    name: "pm25".to_string(),
                    value: Some(f64::from(aqi) * 0.4),
                    unit: "index".to_string(),
                }],
                recorded_at: now() - age,
            },
        );
        cache
    }

    #[test]
    fn recent_record_is_fresh_and_high_confidence() {
        let cache = cache_with("lahore", 278, Duration::minutes(20));
        let reading = cache.fetch("lahore", now());
        assert_eq!(reading.aqi, Some(278));
        assert_eq!(reading.freshness, Freshness::Fresh);
        assert_eq!(reading.confidence, Confidence::High);
        assert_eq!(reading.pollutants.len(), 1);
    }

    #[test]
    fn lagged_record_classifies_by_age() {
        let cache = cache_with("lahore", 278, Duration::hours(3));
        assert_eq!(cache.fetch("lahore", now()).freshness, Freshness::Aging);

        let cache = cache_with("lahore", 278, Duration::hours(9));
        assert_eq!(cache.fetch("lahore", now()).freshness, Freshness::Stale);
    }

    #[test]
    fn unknown_city_degrades_to_unavailable() {
        let cache = cache_with("lahore", 278, Duration::minutes(20));
        let reading = cache.fetch("karachi", now());
        assert!(!reading.is_usable());
        assert!(reading.notes.as_deref().unwrap().contains("karachi"));
    }
}
