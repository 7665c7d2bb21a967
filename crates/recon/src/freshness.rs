//! Freshness classification — maps a reading timestamp to a recency bucket.

use chrono::{DateTime, Utc};

use crate::config::FreshnessPolicy;
use crate::model::Freshness;

/// Classify a reading timestamp against `now`.
///
/// `now` is an explicit parameter so callers control the clock; the engine
/// never reads wall time for classification.
pub fn classify(
    timestamp: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    policy: &FreshnessPolicy,
) -> Freshness {
    let Some(timestamp) = timestamp else {
        return Freshness::Unavailable;
    };

    let age_hours = (now - timestamp).num_milliseconds() as f64 / 3_600_000.0;
    if age_hours < policy.fresh_within_hours {
        // Future-dated timestamps land here as well; a negative age is
        // still "less than an hour old".
        Freshness::Fresh
    } else if age_hours < policy.stale_after_hours {
        Freshness::Aging
    } else {
        Freshness::Stale
    }
}
