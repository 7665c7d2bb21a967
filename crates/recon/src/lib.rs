//! `airsift-recon` — Multi-source AQI reconciliation engine.
//!
//! Pure engine crate: receives pre-assembled readings, returns an agreement
//! analysis and a confidence-weighted derived AQI. No CLI or IO dependencies.

pub mod agreement;
pub mod config;
pub mod derived;
pub mod engine;
pub mod error;
pub mod freshness;
pub mod model;
pub mod normalize;

pub use config::ReconPolicy;
pub use engine::run;
pub use error::ReconError;
pub use model::{AgreementAnalysis, AqiReading, DerivedAqi, ReconReport};
