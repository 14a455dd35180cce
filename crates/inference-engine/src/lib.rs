//! Stacked Ensemble Inference Engine
//!
//! Three base regressors (HVAC, lighting, plug loads) each see their own
//! scaled feature subset. Their predictions, together with the unmodelled
//! `Energy_Other_Wh` load, feed a meta regressor that estimates total draw.

mod bundle;
mod engine;
pub mod features;
mod model;
mod onnx;

pub use bundle::{BundleManifest, ModelBundle, ModelStage, StageArtifacts};
pub use engine::{EnsembleOutput, EnsemblePredictor};
pub use model::{FnRegressor, LinearRegressor, ModelRole, Regressor, BASE_ROLES};
pub use onnx::OnnxRegressor;

use data_validator::ValidationError;
use feature_engine::FeatureError;
use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
    #[error(transparent)]
    Feature(#[from] FeatureError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
