//! ONNX regressor using tract

use crate::model::Regressor;
use crate::InferenceError;
use std::path::Path;
use tract_onnx::prelude::*;
use tracing::{debug, info};

/// Single-output ONNX model with a `[1, width]` float input
pub struct OnnxRegressor {
    plan: TypedRunnableModel<TypedModel>,
    width: usize,
}

impl OnnxRegressor {
    /// Load and optimize an ONNX model for a fixed input width
    pub fn load(path: &Path, width: usize) -> Result<Self, InferenceError> {
        info!("Loading ONNX model {} (width {})", path.display(), width);

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, width]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| InferenceError::ModelLoadError(format!("{}: {e}", path.display())))?;

        Ok(Self { plan, width })
    }
}

impl Regressor for OnnxRegressor {
    fn predict(&self, inputs: &[f64]) -> Result<f64, InferenceError> {
        if inputs.len() != self.width {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("[1, {}]", self.width),
                actual: format!("[1, {}]", inputs.len()),
            });
        }

        let row: Vec<f32> = inputs.iter().map(|v| *v as f32).collect();
        let tensor = Tensor::from_shape(&[1, self.width], &row)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let view = outputs
            .first()
            .ok_or_else(|| InferenceError::InferenceFailed("model produced no outputs".into()))?
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let value = view
            .iter()
            .next()
            .copied()
            .ok_or_else(|| InferenceError::InferenceFailed("empty output tensor".into()))?;

        debug!("ONNX output {:.4}", value);
        Ok(f64::from(value))
    }

    fn kind(&self) -> &'static str {
        "onnx"
    }
}
