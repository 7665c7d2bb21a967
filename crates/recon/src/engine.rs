use crate::agreement;
use crate::config::ReconPolicy;
use crate::derived;
use crate::model::{AqiReading, ReconMeta, ReconReport};

/// Reconcile one snapshot of per-source readings.
///
/// Both analyses are recomputed from scratch on every call; nothing is
/// cached between runs. The readings echo lets callers render per-source
/// normalized values next to the derived result.
pub fn run(policy: &ReconPolicy, readings: &[AqiReading]) -> ReconReport {
    let agreement = agreement::analyze(readings, &policy.agreement);
    let derived = derived::derive(readings, &policy.weights);

    ReconReport {
        meta: ReconMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            sources_polled: readings.len(),
            usable_sources: readings.iter().filter(|r| r.is_usable()).count(),
        },
        readings: readings.to_vec(),
        agreement,
        derived,
    }
}
