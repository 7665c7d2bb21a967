use serde::Deserialize;

use crate::error::ReconError;
use crate::model::{AqiReading, Confidence, DataSource, Freshness};

// ---------------------------------------------------------------------------
// Top-level policy
// ---------------------------------------------------------------------------

/// Reconciliation policy: freshness thresholds, scale factors, agreement
/// thresholds, and aggregation weights.
///
/// `Default` reproduces the shipped constants; a TOML document may override
/// any subset and keeps the defaults for the rest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReconPolicy {
    pub freshness: FreshnessPolicy,
    pub scale: ScalePolicy,
    pub agreement: AgreementPolicy,
    pub weights: WeightPolicy,
}

impl ReconPolicy {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let policy: ReconPolicy =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        require_positive("freshness.fresh_within_hours", self.freshness.fresh_within_hours)?;
        require_positive("freshness.stale_after_hours", self.freshness.stale_after_hours)?;
        if self.freshness.stale_after_hours <= self.freshness.fresh_within_hours {
            return Err(ReconError::ConfigValidation(format!(
                "stale_after_hours ({}) must exceed fresh_within_hours ({})",
                self.freshness.stale_after_hours, self.freshness.fresh_within_hours
            )));
        }

        require_positive("scale.international_factor", self.scale.international_factor)?;

        if self.agreement.high_spread > self.agreement.partial_spread {
            return Err(ReconError::ConfigValidation(format!(
                "high_spread ({}) must not exceed partial_spread ({})",
                self.agreement.high_spread, self.agreement.partial_spread
            )));
        }
        if !self.agreement.high_std_dev.is_finite()
            || !self.agreement.partial_std_dev.is_finite()
            || self.agreement.high_std_dev > self.agreement.partial_std_dev
        {
            return Err(ReconError::ConfigValidation(format!(
                "high_std_dev ({}) must not exceed partial_std_dev ({})",
                self.agreement.high_std_dev, self.agreement.partial_std_dev
            )));
        }

        let factors = [
            ("weights.reliability.government", self.weights.reliability.government),
            ("weights.reliability.international", self.weights.reliability.international),
            ("weights.reliability.historical", self.weights.reliability.historical),
            ("weights.reliability.iot_sensor", self.weights.reliability.iot_sensor),
            ("weights.freshness.fresh", self.weights.freshness.fresh),
            ("weights.freshness.aging", self.weights.freshness.aging),
            ("weights.freshness.stale", self.weights.freshness.stale),
            ("weights.confidence.high", self.weights.confidence.high),
            ("weights.confidence.medium", self.weights.confidence.medium),
            ("weights.confidence.low", self.weights.confidence.low),
            ("weights.confidence.uncalibrated", self.weights.confidence.uncalibrated),
        ];
        for (name, value) in factors {
            require_positive(name, value)?;
        }

        Ok(())
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), ReconError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ReconError::ConfigValidation(format!(
            "{name} must be a positive finite number, got {value}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Freshness thresholds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FreshnessPolicy {
    /// Readings younger than this many hours classify as fresh.
    pub fresh_within_hours: f64,
    /// Readings at least this many hours old classify as stale.
    pub stale_after_hours: f64,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            fresh_within_hours: 1.0,
            stale_after_hours: 6.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Scale normalization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScalePolicy {
    /// Flat US-EPA → reference-scale approximation applied to the
    /// international aggregator. Not a real cross-standard conversion.
    pub international_factor: f64,
}

impl Default for ScalePolicy {
    fn default() -> Self {
        Self {
            international_factor: 0.95,
        }
    }
}

// ---------------------------------------------------------------------------
// Agreement thresholds
// ---------------------------------------------------------------------------

/// Spread / standard-deviation cutoffs for the agreement classifier.
/// Boundaries are inclusive: a value equal to a cutoff falls into the
/// lower-disagreement bucket.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgreementPolicy {
    pub high_spread: u16,
    pub high_std_dev: f64,
    pub partial_spread: u16,
    pub partial_std_dev: f64,
}

impl Default for AgreementPolicy {
    fn default() -> Self {
        Self {
            high_spread: 20,
            high_std_dev: 10.0,
            partial_spread: 50,
            partial_std_dev: 25.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation weights
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WeightPolicy {
    pub reliability: ReliabilityWeights,
    pub freshness: FreshnessWeights,
    pub confidence: ConfidenceWeights,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReliabilityWeights {
    pub government: f64,
    pub international: f64,
    pub historical: f64,
    pub iot_sensor: f64,
}

impl Default for ReliabilityWeights {
    fn default() -> Self {
        Self {
            government: 1.2,
            international: 1.0,
            historical: 0.6,
            iot_sensor: 0.3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FreshnessWeights {
    pub fresh: f64,
    pub aging: f64,
    pub stale: f64,
}

impl Default for FreshnessWeights {
    fn default() -> Self {
        Self {
            fresh: 1.0,
            aging: 0.7,
            stale: 0.4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConfidenceWeights {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
    pub uncalibrated: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            high: 1.0,
            medium: 0.8,
            low: 0.5,
            uncalibrated: 0.3,
        }
    }
}

impl WeightPolicy {
    pub fn reliability_factor(&self, source: DataSource) -> f64 {
        match source {
            DataSource::Government => self.reliability.government,
            DataSource::International => self.reliability.international,
            DataSource::Historical => self.reliability.historical,
            DataSource::IotSensor => self.reliability.iot_sensor,
        }
    }

    pub fn freshness_factor(&self, freshness: Freshness) -> f64 {
        match freshness {
            Freshness::Fresh => self.freshness.fresh,
            Freshness::Aging => self.freshness.aging,
            Freshness::Stale => self.freshness.stale,
            // Unavailable readings are filtered out before weighting;
            // zero keeps a stray one harmless.
            Freshness::Unavailable => 0.0,
        }
    }

    pub fn confidence_factor(&self, confidence: Confidence) -> f64 {
        match confidence {
            Confidence::High => self.confidence.high,
            Confidence::Medium => self.confidence.medium,
            Confidence::Low => self.confidence.low,
            Confidence::Uncalibrated => self.confidence.uncalibrated,
        }
    }

    /// Multiplicative weight for one reading: strict product of the three
    /// factors, no additive terms.
    pub fn weight(&self, reading: &AqiReading) -> f64 {
        self.reliability_factor(reading.source)
            * self.freshness_factor(reading.freshness)
            * self.confidence_factor(reading.confidence)
    }

    /// Best achievable per-source weight: the top reliability, freshness, and
    /// confidence factors combined. 1.2 with the default tables.
    pub fn best_case(&self) -> f64 {
        let top_reliability = fold_max([
            self.reliability.government,
            self.reliability.international,
            self.reliability.historical,
            self.reliability.iot_sensor,
        ]);
        let top_freshness = fold_max([
            self.freshness.fresh,
            self.freshness.aging,
            self.freshness.stale,
        ]);
        let top_confidence = fold_max([
            self.confidence.high,
            self.confidence.medium,
            self.confidence.low,
            self.confidence.uncalibrated,
        ]);
        top_reliability * top_freshness * top_confidence
    }
}

fn fold_max<const N: usize>(values: [f64; N]) -> f64 {
    values.into_iter().fold(f64::MIN, f64::max)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
