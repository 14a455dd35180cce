//! Validation Error Types

use thiserror::Error;

/// Errors during data validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Value is NaN or infinite
    #[error("{field} value {value} is not finite")]
    NonFinite { field: String, value: f64 },

    /// Vector width does not match the fitted scaler
    #[error("Width mismatch: expected {expected} values, got {actual}")]
    WidthMismatch { expected: usize, actual: usize },

    /// Missing required fields
    #[error("Missing required features: {}", .0.join(", "))]
    MissingFields(Vec<String>),
}
