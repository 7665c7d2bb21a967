//! `airsift-sources` — Source adapters producing readings in the common schema.
//!
//! One module per provider:
//! - `government` — monitoring-network cache
//! - `international` — WAQI-style feed decoding (transport stays external)
//! - `historical` — day-old baseline cache
//! - `iot` — manual or simulated sensor entry
//!
//! plus `gather`, the fan-out assembly helper.
//!
//! # Adapter contract
//!
//! Every adapter MUST return a well-formed [`AqiReading`] even on failure:
//! `aqi` `None`, freshness unavailable, and notes explaining what went
//! wrong. Faults never cross the adapter boundary; the reconciliation
//! engine only ever sees data.

pub mod gather;
pub mod government;
pub mod historical;
pub mod international;
pub mod iot;

use airsift_recon::model::{AqiReading, DataSource};
use chrono::{DateTime, Utc};

pub use gather::gather;

/// One provider of city readings.
///
/// `Sync` because adapters are fanned out across threads; `now` is passed
/// explicitly so callers control the clock.
pub trait SourceAdapter: Sync {
    fn source(&self) -> DataSource;

    /// Produce a reading for `city` as of `now`, degrading to
    /// [`AqiReading::unavailable`] on any failure.
    fn fetch(&self, city: &str, now: DateTime<Utc>) -> AqiReading;
}
