//! Storage Layer
//!
//! Time-sorted building telemetry loaded once from CSV and served
//! read-only to the request handlers.

mod repository;
mod timestamp;

pub use repository::{SnapshotRepository, TIMESTAMP_COLUMN};
pub use timestamp::{format_timestamp, parse_timestamp, DISPLAY_FORMAT};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing column: {0}")]
    MissingColumn(String),
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("Line {line}: {message}")]
    InvalidRow { line: u64, message: String },
}
