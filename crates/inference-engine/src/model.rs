//! Regressor abstraction and model roles

use crate::features::{HVAC_FEATURES, LIGHTING_FEATURES, META_WIDTH, PLUG_FEATURES};
use crate::InferenceError;
use serde::{Deserialize, Serialize};

/// Position of a model in the stacked ensemble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelRole {
    Hvac,
    Lighting,
    Plug,
    Meta,
}

/// First-stage roles, in meta-input order
pub const BASE_ROLES: [ModelRole; 3] = [ModelRole::Hvac, ModelRole::Lighting, ModelRole::Plug];

impl ModelRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelRole::Hvac => "hvac",
            ModelRole::Lighting => "lighting",
            ModelRole::Plug => "plug",
            ModelRole::Meta => "meta",
        }
    }

    /// Snapshot features read by this model, in training order.
    ///
    /// The meta model reads stacked predictions rather than snapshot
    /// features, so its list is empty.
    pub fn feature_names(&self) -> &'static [&'static str] {
        match self {
            ModelRole::Hvac => &HVAC_FEATURES,
            ModelRole::Lighting => &LIGHTING_FEATURES,
            ModelRole::Plug => &PLUG_FEATURES,
            ModelRole::Meta => &[],
        }
    }

    /// Number of input columns
    pub fn input_width(&self) -> usize {
        match self {
            ModelRole::Meta => META_WIDTH,
            role => role.feature_names().len(),
        }
    }
}

/// A fitted single-output regression model.
///
/// Implementations must be safe to call from several threads at once; the
/// bundle is shared read-only across requests.
pub trait Regressor: Send + Sync {
    /// Predict one value from an already scaled input row
    fn predict(&self, inputs: &[f64]) -> Result<f64, InferenceError>;

    /// Short label for logs
    fn kind(&self) -> &'static str;
}

/// Linear model `w · x + b`.
///
/// Used for lightweight deployments and as a deterministic stand-in for
/// the tree and network models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub weights: Vec<f64>,
    #[serde(default)]
    pub bias: f64,
}

impl LinearRegressor {
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    /// Ignores its inputs and always predicts `value`
    pub fn constant(width: usize, value: f64) -> Self {
        Self::new(vec![0.0; width], value)
    }

    /// Sums its inputs
    pub fn sum(width: usize) -> Self {
        Self::new(vec![1.0; width], 0.0)
    }
}

impl Regressor for LinearRegressor {
    fn predict(&self, inputs: &[f64]) -> Result<f64, InferenceError> {
        if inputs.len() != self.weights.len() {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("[{}]", self.weights.len()),
                actual: format!("[{}]", inputs.len()),
            });
        }
        Ok(self.bias + self.weights.iter().zip(inputs).map(|(w, x)| w * x).sum::<f64>())
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

/// Regressor backed by a closure
pub struct FnRegressor<F> {
    f: F,
}

impl<F> FnRegressor<F>
where
    F: Fn(&[f64]) -> Result<f64, InferenceError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Regressor for FnRegressor<F>
where
    F: Fn(&[f64]) -> Result<f64, InferenceError> + Send + Sync,
{
    fn predict(&self, inputs: &[f64]) -> Result<f64, InferenceError> {
        (self.f)(inputs)
    }

    fn kind(&self) -> &'static str {
        "fn"
    }
}
