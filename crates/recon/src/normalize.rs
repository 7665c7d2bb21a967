//! Scale normalization — adjusts a raw AQI value from a source-specific
//! scale toward the reference scale.

use crate::config::ScalePolicy;
use crate::model::{DataSource, AQI_MAX};

/// Normalize a raw source value, rounding to the nearest integer.
pub fn normalize(raw: f64, source: DataSource, policy: &ScalePolicy) -> u16 {
    let adjusted = match source {
        DataSource::International => raw * policy.international_factor,
        // Government and historical values already use the reference scale;
        // IoT input is uncalibrated and never rescaled.
        DataSource::Government | DataSource::Historical | DataSource::IotSensor => raw,
    };
    // Clamp guards the cast; the adapter contract already bounds the input.
    adjusted.round().clamp(0.0, f64::from(AQI_MAX)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale() -> ScalePolicy {
        ScalePolicy::default()
    }

    #[test]
    fn international_applies_flat_factor() {
        assert_eq!(normalize(265.0, DataSource::International, &scale()), 252);
        assert_eq!(normalize(100.0, DataSource::International, &scale()), 95);
    }

    #[test]
    fn other_sources_pass_through() {
        assert_eq!(normalize(278.0, DataSource::Government, &scale()), 278);
        assert_eq!(normalize(285.0, DataSource::Historical, &scale()), 285);
        assert_eq!(normalize(42.0, DataSource::IotSensor, &scale()), 42);
    }

    #[test]
    fn rounds_to_nearest_integer() {
        // 151 * 0.95 = 143.45 → 143; 153 * 0.95 = 145.35 → 145
        assert_eq!(normalize(151.0, DataSource::International, &scale()), 143);
        assert_eq!(normalize(153.0, DataSource::International, &scale()), 145);
        assert_eq!(normalize(77.5, DataSource::Government, &scale()), 78);
    }

    #[test]
    fn out_of_range_input_clamps_to_scale_bounds() {
        assert_eq!(normalize(-3.0, DataSource::Government, &scale()), 0);
        assert_eq!(normalize(612.0, DataSource::Government, &scale()), 500);
    }

    #[test]
    fn custom_factor_is_honored() {
        let policy = ScalePolicy {
            international_factor: 0.5,
        };
        assert_eq!(normalize(200.0, DataSource::International, &policy), 100);
    }
}
