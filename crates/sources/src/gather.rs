//! Fan-out assembly: poll every adapter concurrently, wait for all.

use std::panic::{catch_unwind, AssertUnwindSafe};

use airsift_recon::model::AqiReading;
use chrono::{DateTime, Utc};

use crate::SourceAdapter;

/// Invoke every adapter concurrently and collect one reading per adapter.
///
/// Output order matches adapter order regardless of completion order, so
/// downstream filter order stays stable. A panicking adapter is absorbed at
/// the join into the degraded reading it should have returned itself. No
/// timeouts, retries, or cancellation live at this layer; those belong to
/// the adapters.
pub fn gather(
    adapters: &[&dyn SourceAdapter],
    city: &str,
    now: DateTime<Utc>,
) -> Vec<AqiReading> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = adapters
            .iter()
            .map(|adapter| {
                scope.spawn(move || catch_unwind(AssertUnwindSafe(|| adapter.fetch(city, now))))
            })
            .collect();

        handles
            .into_iter()
            .zip(adapters)
            .map(|(handle, adapter)| match handle.join() {
                Ok(Ok(reading)) => reading,
                _ => AqiReading::unavailable(
                    adapter.source(),
                    "source adapter panicked during fetch",
                ),
            })
            .collect()
    })
}
