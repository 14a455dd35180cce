//! Model Bundle
//!
//! The four fitted models and their scalers, loaded once and shared
//! read-only by every prediction.

use crate::model::{LinearRegressor, ModelRole, Regressor};
use crate::onnx::OnnxRegressor;
use crate::InferenceError;
use data_validator::Normalizer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One model with the scaler fitted on its training inputs
pub struct ModelStage {
    role: ModelRole,
    regressor: Box<dyn Regressor>,
    scaler: Normalizer,
}

impl ModelStage {
    /// Pair a regressor with its scaler.
    ///
    /// Fails if the scaler width disagrees with the role's input order.
    pub fn new(
        role: ModelRole,
        regressor: Box<dyn Regressor>,
        scaler: Normalizer,
    ) -> Result<Self, InferenceError> {
        if scaler.width() != role.input_width() {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("{} scaler of width {}", role.as_str(), role.input_width()),
                actual: format!("width {}", scaler.width()),
            });
        }
        Ok(Self {
            role,
            regressor,
            scaler,
        })
    }

    pub fn role(&self) -> ModelRole {
        self.role
    }

    /// Scale one input row and run the regressor
    pub fn run(&self, inputs: &[f64]) -> Result<f64, InferenceError> {
        let scaled = self.scaler.transform(inputs)?;
        let value = self.regressor.predict(&scaled).map_err(|e| {
            InferenceError::InferenceFailed(format!("{} model: {e}", self.role.as_str()))
        })?;

        if !value.is_finite() {
            return Err(InferenceError::InferenceFailed(format!(
                "{} model returned non-finite value {value}",
                self.role.as_str()
            )));
        }
        Ok(value)
    }
}

impl fmt::Debug for ModelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelStage")
            .field("role", &self.role)
            .field("regressor", &self.regressor.kind())
            .field("scaler", &self.scaler.method())
            .finish()
    }
}

/// The full stacked ensemble
#[derive(Debug)]
pub struct ModelBundle {
    hvac: ModelStage,
    lighting: ModelStage,
    plug: ModelStage,
    meta: ModelStage,
}

impl ModelBundle {
    /// Assemble a bundle, checking each stage sits in its own slot
    pub fn new(
        hvac: ModelStage,
        lighting: ModelStage,
        plug: ModelStage,
        meta: ModelStage,
    ) -> Result<Self, InferenceError> {
        for (stage, expected) in [
            (&hvac, ModelRole::Hvac),
            (&lighting, ModelRole::Lighting),
            (&plug, ModelRole::Plug),
            (&meta, ModelRole::Meta),
        ] {
            if stage.role() != expected {
                return Err(InferenceError::ModelLoadError(format!(
                    "{} stage placed in {} slot",
                    stage.role().as_str(),
                    expected.as_str()
                )));
            }
        }

        Ok(Self {
            hvac,
            lighting,
            plug,
            meta,
        })
    }

    pub fn stage(&self, role: ModelRole) -> &ModelStage {
        match role {
            ModelRole::Hvac => &self.hvac,
            ModelRole::Lighting => &self.lighting,
            ModelRole::Plug => &self.plug,
            ModelRole::Meta => &self.meta,
        }
    }

    /// Load every artifact named in the manifest
    pub fn load(manifest: &BundleManifest) -> Result<Self, InferenceError> {
        info!("Loading model bundle");
        Self::new(
            manifest.hvac.load(ModelRole::Hvac)?,
            manifest.lighting.load(ModelRole::Lighting)?,
            manifest.plug.load(ModelRole::Plug)?,
            manifest.meta.load(ModelRole::Meta)?,
        )
    }
}

/// Artifact locations for one stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageArtifacts {
    /// `.onnx` graph or `.json` linear model
    pub model: PathBuf,
    /// JSON scaler parameters
    pub scaler: PathBuf,
}

impl StageArtifacts {
    fn load(&self, role: ModelRole) -> Result<ModelStage, InferenceError> {
        debug!(
            "Loading {} stage: model={}, scaler={}",
            role.as_str(),
            self.model.display(),
            self.scaler.display()
        );

        let scaler: Normalizer = serde_json::from_str(&read(&self.scaler)?)
            .map_err(|e| InferenceError::ModelLoadError(format!("{}: {e}", self.scaler.display())))?;

        let regressor: Box<dyn Regressor> =
            match self.model.extension().and_then(|ext| ext.to_str()) {
                Some("onnx") => Box::new(OnnxRegressor::load(&self.model, role.input_width())?),
                Some("json") => {
                    let linear: LinearRegressor = serde_json::from_str(&read(&self.model)?)
                        .map_err(|e| {
                            InferenceError::ModelLoadError(format!("{}: {e}", self.model.display()))
                        })?;
                    Box::new(linear)
                }
                _ => {
                    return Err(InferenceError::ModelLoadError(format!(
                        "unsupported model format: {}",
                        self.model.display()
                    )))
                }
            };

        ModelStage::new(role, regressor, scaler)
    }
}

/// Artifact locations for the whole bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleManifest {
    pub hvac: StageArtifacts,
    pub lighting: StageArtifacts,
    pub plug: StageArtifacts,
    pub meta: StageArtifacts,
}

fn read(path: &Path) -> Result<String, InferenceError> {
    fs::read_to_string(path)
        .map_err(|e| InferenceError::ModelLoadError(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(role: ModelRole) -> ModelStage {
        ModelStage::new(
            role,
            Box::new(LinearRegressor::sum(role.input_width())),
            Normalizer::identity(role.input_width()),
        )
        .unwrap()
    }

    #[test]
    fn test_scaler_width_checked() {
        let result = ModelStage::new(
            ModelRole::Hvac,
            Box::new(LinearRegressor::sum(16)),
            Normalizer::identity(13),
        );
        assert!(matches!(result, Err(InferenceError::InvalidInputShape { .. })));
    }

    #[test]
    fn test_misplaced_stage_rejected() {
        let result = ModelBundle::new(
            stage(ModelRole::Lighting),
            stage(ModelRole::Lighting),
            stage(ModelRole::Plug),
            stage(ModelRole::Meta),
        );
        assert!(matches!(result, Err(InferenceError::ModelLoadError(_))));
    }

    #[test]
    fn test_stage_applies_scaler() {
        let stage = ModelStage::new(
            ModelRole::Meta,
            Box::new(LinearRegressor::sum(4)),
            Normalizer::z_score(vec![1.0; 4], vec![2.0; 4]).unwrap(),
        )
        .unwrap();

        // (3-1)/2 * 4
        assert_eq!(stage.run(&[3.0; 4]).unwrap(), 4.0);
    }

    #[test]
    fn test_unsupported_model_format() {
        let artifacts = StageArtifacts {
            model: PathBuf::from("model.pkl"),
            scaler: PathBuf::from("does-not-exist.json"),
        };
        assert!(matches!(
            artifacts.load(ModelRole::Hvac),
            Err(InferenceError::ModelLoadError(_))
        ));
    }
}
