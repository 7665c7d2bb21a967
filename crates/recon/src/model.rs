use chrono::{DateTime, Utc};
use serde::Serialize;

/// Upper bound of the AQI scale used throughout the engine.
pub const AQI_MAX: u16 = 500;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// One data provider feeding readings for a city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Government,
    International,
    Historical,
    IotSensor,
}

impl DataSource {
    /// Human-readable provider name for explanations and notes.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Government => "government monitoring network",
            Self::International => "international aggregator",
            Self::Historical => "historical cache",
            Self::IotSensor => "IoT sensor",
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Government => write!(f, "government"),
            Self::International => write!(f, "international"),
            Self::Historical => write!(f, "historical"),
            Self::IotSensor => write!(f, "iot_sensor"),
        }
    }
}

/// Qualitative recency bucket derived from a reading's timestamp age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    Fresh,
    Aging,
    Stale,
    Unavailable,
}

impl std::fmt::Display for Freshness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fresh => write!(f, "fresh"),
            Self::Aging => write!(f, "aging"),
            Self::Stale => write!(f, "stale"),
            Self::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Trust level assigned by the adapter based on source identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
    Uncalibrated,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
            Self::Uncalibrated => write!(f, "uncalibrated"),
        }
    }
}

/// Cross-source consistency classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgreementLevel {
    High,
    Partial,
    Outlier,
    Insufficient,
}

impl std::fmt::Display for AgreementLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Partial => write!(f, "partial"),
            Self::Outlier => write!(f, "outlier"),
            Self::Insufficient => write!(f, "insufficient"),
        }
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single pollutant measurement carried alongside the headline AQI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pollutant {
    pub name: String,
    pub value: Option<f64>,
    pub unit: String,
}

/// The canonical reading exchanged between adapters and the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AqiReading {
    pub source: DataSource,
    /// Headline AQI in `0..=AQI_MAX`, or `None` when the source had no
    /// usable value.
    pub aqi: Option<u16>,
    pub pollutants: Vec<Pollutant>,
    pub timestamp: Option<DateTime<Utc>>,
    pub freshness: Freshness,
    pub confidence: Confidence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AqiReading {
    /// The degraded reading every failing adapter must return instead of
    /// propagating a fault into the fan-out join.
    pub fn unavailable(source: DataSource, notes: impl Into<String>) -> Self {
        Self {
            source,
            aqi: None,
            pollutants: Vec::new(),
            timestamp: None,
            freshness: Freshness::Unavailable,
            confidence: Confidence::Low,
            notes: Some(notes.into()),
        }
    }

    /// Usability predicate shared by the agreement analyzer and the
    /// aggregator: a missing value and an unavailable freshness are
    /// equally "not usable".
    pub fn is_usable(&self) -> bool {
        self.aqi.is_some() && self.freshness != Freshness::Unavailable
    }
}

// ---------------------------------------------------------------------------
// Analyses
// ---------------------------------------------------------------------------

/// Cross-source agreement analysis. Computed fresh on every run.
#[derive(Debug, Clone, Serialize)]
pub struct AgreementAnalysis {
    pub level: AgreementLevel,
    /// `max(aqi) − min(aqi)` over usable readings; `None` below two sources.
    pub spread: Option<u16>,
    /// Population standard deviation over the same set.
    pub std_dev: Option<f64>,
    pub explanation: String,
}

/// Single confidence-weighted AQI derived from all usable readings.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedAqi {
    pub value: Option<u16>,
    /// Actual total weight as a percentage of the best case, in `0..=100`.
    pub confidence: u8,
    /// Contributing sources in input (filter) order.
    pub sources: Vec<DataSource>,
    pub methodology: String,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub run_at: String,
    pub sources_polled: usize,
    pub usable_sources: usize,
}

/// Full reconciliation output: normalized readings echo, agreement
/// analysis, and derived AQI. Request-scoped; nothing persists.
#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub meta: ReconMeta,
    pub readings: Vec<AqiReading>,
    pub agreement: AgreementAnalysis,
    pub derived: DerivedAqi,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_reading_is_not_usable() {
        let reading = AqiReading::unavailable(DataSource::Government, "upstream 503");
        assert!(!reading.is_usable());
        assert_eq!(reading.aqi, None);
        assert_eq!(reading.freshness, Freshness::Unavailable);
        assert_eq!(reading.notes.as_deref(), Some("upstream 503"));
    }

    #[test]
    fn reading_with_value_but_unavailable_freshness_is_not_usable() {
        let mut reading = AqiReading::unavailable(DataSource::Historical, "x");
        reading.aqi = Some(120);
        assert!(!reading.is_usable());
    }

    #[test]
    fn serializes_snake_case_variants() {
        let json = serde_json::to_value(DataSource::IotSensor).unwrap();
        assert_eq!(json, "iot_sensor");
        let json = serde_json::to_value(Freshness::Unavailable).unwrap();
        assert_eq!(json, "unavailable");
        let json = serde_json::to_value(AgreementLevel::Partial).unwrap();
        assert_eq!(json, "partial");
    }

    #[test]
    fn display_matches_wire_names() {
        assert_eq!(DataSource::IotSensor.to_string(), "iot_sensor");
        assert_eq!(Confidence::Uncalibrated.to_string(), "uncalibrated");
        assert_eq!(AgreementLevel::Insufficient.to_string(), "insufficient");
    }
}
