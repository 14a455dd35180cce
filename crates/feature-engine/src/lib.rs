//! Feature Engineering Engine
//!
//! Provides the building telemetry snapshot and the ordered recomputation of
//! physically-dependent features that must follow any scenario mutation.

mod derived;
pub mod names;
mod snapshot;

pub use derived::{recompute, DerivationStep, COMFORT_REFERENCE_C, DERIVATION_PIPELINE};
pub use snapshot::FeatureSnapshot;

use thiserror::Error;

/// Errors raised while reading or deriving snapshot features
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("Missing required feature: {0}")]
    MissingFeature(String),
}
