//! International aggregator adapter.
//!
//! Decodes the WAQI-style JSON document handed over by the transport layer
//! (an HTTP proxy in production) and rescales the US-EPA value toward the
//! reference scale. Any transport or decode failure becomes an unavailable
//! reading; nothing is thrown past this boundary.

use std::collections::BTreeMap;

use airsift_recon::config::{FreshnessPolicy, ScalePolicy};
use airsift_recon::model::{AqiReading, Confidence, DataSource, Pollutant};
use airsift_recon::{freshness, normalize};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::SourceAdapter;

/// Transport collaborator: fetches the raw feed body for a city.
/// HTTP, proxying, timeouts, and retries all live behind this seam.
pub trait FeedTransport: Sync {
    fn feed(&self, city: &str) -> Result<String, String>;
}

impl<F> FeedTransport for F
where
    F: Fn(&str) -> Result<String, String> + Sync,
{
    fn feed(&self, city: &str) -> Result<String, String> {
        self(city)
    }
}

pub struct InternationalSource<T> {
    transport: T,
    scale: ScalePolicy,
    freshness: FreshnessPolicy,
}

impl<T: FeedTransport> InternationalSource<T> {
    pub fn new(transport: T, scale: ScalePolicy, freshness: FreshnessPolicy) -> Self {
        Self {
            transport,
            scale,
            freshness,
        }
    }

    fn decode(&self, body: &str, now: DateTime<Utc>) -> Result<AqiReading, String> {
        let doc: FeedDocument =
            serde_json::from_str(body).map_err(|e| format!("malformed feed document: {e}"))?;
        if doc.status != "ok" {
            return Err(format!("feed returned status '{}'", doc.status));
        }
        let data = doc.data.ok_or_else(|| "feed has no data section".to_string())?;
        let raw = data
            .aqi
            .as_f64()
            .ok_or_else(|| format!("non-numeric aqi value {}", data.aqi))?;

        let timestamp = data
            .time
            .and_then(|t| DateTime::parse_from_rfc3339(&t.iso).ok())
            .map(|t| t.with_timezone(&Utc));

        // BTreeMap keeps pollutant order deterministic across runs.
        let pollutants = data
            .iaqi
            .into_iter()
            .map(|(name, metric)| Pollutant {
                name,
                value: Some(metric.v),
                unit: "index".to_string(),
            })
            .collect();

        Ok(AqiReading {
            source: DataSource::International,
            aqi: Some(normalize::normalize(raw, DataSource::International, &self.scale)),
            pollutants,
            timestamp,
            freshness: freshness::classify(timestamp, now, &self.freshness),
            confidence: Confidence::High,
            notes: Some(format!(
                "rescaled from US-EPA value {raw} (×{:.2})",
                self.scale.international_factor
            )),
        })
    }
}

impl<T: FeedTransport> SourceAdapter for InternationalSource<T> {
    fn source(&self) -> DataSource {
        DataSource::International
    }

    fn fetch(&self, city: &str, now: DateTime<Utc>) -> AqiReading {
        let body = match self.transport.feed(city) {
            Ok(body) => body,
            Err(e) => {
                return AqiReading::unavailable(
                    DataSource::International,
                    format!("transport error: {e}"),
                )
            }
        };
        match self.decode(&body, now) {
            Ok(reading) => reading,
            Err(e) => AqiReading::unavailable(DataSource::International, e),
        }
    }
}

// ---------------------------------------------------------------------------
// Feed schema
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct FeedDocument {
    status: String,
    #[serde(default)]
    data: Option<FeedData>,
}

#[derive(Deserialize)]
struct FeedData {
    /// Number in a healthy feed, `"-"` when the station has no value.
    aqi: serde_json::Value,
    #[serde(default)]
    iaqi: BTreeMap<String, FeedMetric>,
    #[serde(default)]
    time: Option<FeedTime>,
}

#[derive(Deserialize)]
struct FeedMetric {
    v: f64,
}

#[derive(Deserialize)]
struct FeedTime {
    iso: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use airsift_recon::model::Freshness;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-14T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn source_with(body: &'static str) -> InternationalSource<impl FeedTransport> {
        InternationalSource::new(
            move |_city: &str| Ok(body.to_string()),
            ScalePolicy::default(),
            FreshnessPolicy::default(),
        )
    }

    #[test]
    fn healthy_feed_is_decoded_and_rescaled() {
        let source = source_with(
            r#"{
                "status": "ok",
                "data": {
                    "aqi": 265,
                    "iaqi": {
                        "pm25": {"v": 265.0},
                        "pm10": {"v": 180.0},
                        "no2": {"v": 22.4}
                    },
                    "time": {"iso": "2026-03-14T10:00:00Z"}
                }
            }"#,
        );
        let reading = source.fetch("lahore", now());

        assert_eq!(reading.aqi, Some(252)); // 265 × 0.95
        assert_eq!(reading.freshness, Freshness::Aging); // two hours old
        assert_eq!(reading.confidence, Confidence::High);
        assert_eq!(reading.pollutants.len(), 3);
        assert_eq!(reading.pollutants[0].name, "no2"); // BTreeMap order
        assert!(reading.notes.as_deref().unwrap().contains("×0.95"));
    }

    #[test]
    fn error_status_degrades_to_unavailable() {
        let source = source_with(r#"{"status": "error", "data": null}"#);
        let reading = source.fetch("lahore", now());
        assert!(!reading.is_usable());
        assert!(reading.notes.as_deref().unwrap().contains("status 'error'"));
    }

    #[test]
    fn malformed_body_degrades_to_unavailable() {
        let source = source_with("<html>502 Bad Gateway</html>");
        let reading = source.fetch("lahore", now());
        assert!(!reading.is_usable());
        assert!(reading.notes.as_deref().unwrap().contains("malformed"));
    }

    #[test]
    fn dash_aqi_degrades_to_unavailable() {
        let source = source_with(r#"{"status": "ok", "data": {"aqi": "-"}}"#);
        let reading = source.fetch("lahore", now());
        assert!(!reading.is_usable());
        assert!(reading.notes.as_deref().unwrap().contains("non-numeric"));
    }

    #[test]
    fn transport_error_degrades_to_unavailable() {
        let source = InternationalSource::new(
            |_city: &str| Err("connect timeout".to_string()),
            ScalePolicy::default(),
            FreshnessPolicy::default(),
        );
        let reading = source.fetch("lahore", now());
        assert!(!reading.is_usable());
        assert!(reading.notes.as_deref().unwrap().contains("connect timeout"));
    }

    #[test]
    fn missing_time_yields_unavailable_freshness_but_keeps_value() {
        let source = source_with(r#"{"status": "ok", "data": {"aqi": 120}}"#);
        let reading = source.fetch("lahore", now());
        // A value without a timestamp cannot be vouched for: the reading
        // carries the number but classifies as unavailable, so the engine
        // skips it.
        assert_eq!(reading.aqi, Some(114));
        assert_eq!(reading.freshness, Freshness::Unavailable);
        assert!(!reading.is_usable());
    }
}
