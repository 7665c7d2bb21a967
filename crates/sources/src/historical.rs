//! Historical cache adapter — day-old baselines kept for comparison.
//!
//! Historical readings are stale by definition, whatever the stored age.

use std::collections::HashMap;

use airsift_recon::model::{AqiReading, Confidence, DataSource, Freshness};
use chrono::{DateTime, Utc};

use crate::SourceAdapter;

#[derive(Debug, Clone)]
pub struct Baseline {
    pub aqi: u16,
    pub as_of: DateTime<Utc>,
}

pub struct HistoricalCache {
    baselines: HashMap<String, Baseline>,
}

impl HistoricalCache {
    pub fn new() -> Self {
        Self {
            baselines: HashMap::new(),
        }
    }

    pub fn insert(&mut self, city: impl Into<String>, baseline: Baseline) {
        self.baselines.insert(city.into(), baseline);
    }
}

impl Default for HistoricalCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceAdapter for HistoricalCache {
    fn source(&self) -> DataSource {
        DataSource::Historical
    }

    fn fetch(&self, city: &str, _now: DateTime<Utc>) -> AqiReading {
        let Some(baseline) = self.baselines.get(city) else {
            return AqiReading::unavailable(
                DataSource::Historical,
                format!("no historical baseline for '{city}'"),
            );
        };

        AqiReading {
            source: DataSource::Historical,
            aqi: Some(baseline.aqi),
            pollutants: Vec::new(),
            timestamp: Some(baseline.as_of),
            // Stale by definition, not by measured age.
            freshness: Freshness::Stale,
            confidence: Confidence::Medium,
            notes: Some("cached baseline from a previous day".to_string()),
        }
    }
}
