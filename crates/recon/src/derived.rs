//! Derived AQI — a single weighted-average value across usable readings,
//! with a confidence score relating actual weight to the best case.

use crate::config::WeightPolicy;
use crate::model::{AqiReading, DerivedAqi};

/// Compute the confidence-weighted derived AQI for one snapshot of readings.
pub fn derive(readings: &[AqiReading], policy: &WeightPolicy) -> DerivedAqi {
    let usable: Vec<(&AqiReading, u16)> = readings
        .iter()
        .filter(|r| r.is_usable())
        .filter_map(|r| r.aqi.map(|aqi| (r, aqi)))
        .collect();

    if usable.is_empty() {
        return DerivedAqi {
            value: None,
            confidence: 0,
            sources: Vec::new(),
            methodology: "no valid data".to_string(),
        };
    }

    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    let mut sources = Vec::with_capacity(usable.len());
    let mut weight_parts = Vec::with_capacity(usable.len());

    for (reading, aqi) in &usable {
        let weight = policy.weight(reading);
        weighted_sum += f64::from(*aqi) * weight;
        total_weight += weight;
        sources.push(reading.source);
        weight_parts.push(format!("{}={weight:.2}", reading.source));
    }

    let value = (weighted_sum / total_weight).round() as u16;

    // Total weight as a percentage of the theoretical best case: every
    // source carrying the top per-source weight. Capped at 100.
    let n = usable.len() as f64;
    let confidence = (100.0 * total_weight / (n * policy.best_case()))
        .round()
        .min(100.0) as u8;

    DerivedAqi {
        value: Some(value),
        confidence,
        sources,
        methodology: format!(
            "weighted average of {} source(s) [{}]; each weight is the product of \
             source reliability, reading freshness, and stated confidence",
            usable.len(),
            weight_parts.join(", ")
        ),
    }
}
