//! Data Validation and Normalization
//!
//! Provides snapshot completeness checks, plausibility range checking, and
//! the fitted scalers that feed each model.

mod error;
mod normalizer;
mod validator;

pub use error::ValidationError;
pub use normalizer::{NormalizationMethod, Normalizer};
pub use validator::{FeatureRange, ValidationConfig, ValidationResult, Validator};
