//! Cross-source agreement analysis — spread and standard deviation over
//! usable readings, classified into consistency levels.

use crate::config::AgreementPolicy;
use crate::model::{AgreementAnalysis, AgreementLevel, AqiReading, DataSource};

/// Analyze cross-source consistency for one snapshot of readings.
///
/// Order-independent and total: under two usable readings the level is
/// `Insufficient`, never an error.
pub fn analyze(readings: &[AqiReading], policy: &AgreementPolicy) -> AgreementAnalysis {
    let usable: Vec<(DataSource, u16)> = readings
        .iter()
        .filter(|r| r.is_usable())
        .filter_map(|r| r.aqi.map(|aqi| (r.source, aqi)))
        .collect();

    match usable.as_slice() {
        [] => AgreementAnalysis {
            level: AgreementLevel::Insufficient,
            spread: None,
            std_dev: None,
            explanation: "no valid data".to_string(),
        },
        [(source, _)] => AgreementAnalysis {
            level: AgreementLevel::Insufficient,
            spread: None,
            std_dev: None,
            explanation: format!(
                "only one usable source ({}); cross-checking needs at least two",
                source.label()
            ),
        },
        values => {
            let min = values.iter().map(|(_, aqi)| *aqi).min().unwrap_or(0);
            let max = values.iter().map(|(_, aqi)| *aqi).max().unwrap_or(0);
            let spread = max - min;
            let std_dev = population_std_dev(values);

            // Inclusive boundaries: exact cutoff values fall into the
            // lower-disagreement bucket.
            let (level, explanation) = if spread <= policy.high_spread
                && std_dev <= policy.high_std_dev
            {
                (
                    AgreementLevel::High,
                    format!("sources agree within {spread} points"),
                )
            } else if spread <= policy.partial_spread && std_dev <= policy.partial_std_dev {
                (
                    AgreementLevel::Partial,
                    format!("partial agreement: readings span {spread} points across sources"),
                )
            } else {
                (
                    AgreementLevel::Outlier,
                    format!(
                        "sources disagree by {spread} points; possible causes include \
                         sensor calibration drift, local pollution hotspots, or stale data"
                    ),
                )
            };

            AgreementAnalysis {
                level,
                spread: Some(spread),
                std_dev: Some(std_dev),
                explanation,
            }
        }
    }
}

fn population_std_dev(values: &[(DataSource, u16)]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().map(|(_, aqi)| f64::from(*aqi)).sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|(_, aqi)| (f64::from(*aqi) - mean).powi(2))
        .sum::<f64>()
        / n;
    variance.sqrt()
}
