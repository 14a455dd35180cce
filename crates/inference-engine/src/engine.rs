//! Ensemble Predictor

use crate::bundle::ModelBundle;
use crate::model::{ModelRole, BASE_ROLES};
use crate::InferenceError;
use data_validator::Validator;
use feature_engine::{names, FeatureSnapshot};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Predicted energy components for one snapshot (Wh)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnsembleOutput {
    pub hvac: f64,
    pub lighting: f64,
    pub plug: f64,
    /// Unmodelled load passed through to the meta model
    pub other: f64,
    pub total: f64,
}

/// Runs the three base models and the meta model over a snapshot
#[derive(Clone)]
pub struct EnsemblePredictor {
    bundle: Arc<ModelBundle>,
    validator: Validator,
}

impl EnsemblePredictor {
    pub fn new(bundle: Arc<ModelBundle>) -> Self {
        info!("Creating ensemble predictor: {:?}", bundle);
        Self {
            bundle,
            validator: Validator::default(),
        }
    }

    /// Every snapshot feature read by any model, deduplicated
    pub fn required_features() -> &'static [&'static str] {
        static REQUIRED: OnceLock<Vec<&'static str>> = OnceLock::new();
        REQUIRED.get_or_init(|| {
            let mut required: Vec<&'static str> = Vec::new();
            let listed = BASE_ROLES
                .iter()
                .flat_map(|role| role.feature_names().iter().copied())
                .chain(std::iter::once(names::ENERGY_OTHER_WH));
            for name in listed {
                if !required.contains(&name) {
                    required.push(name);
                }
            }
            required
        })
    }

    /// Predict on the calling thread
    pub fn predict(&self, snapshot: &FeatureSnapshot) -> Result<EnsembleOutput, InferenceError> {
        self.check(snapshot)?;

        let hvac = self.run_base(ModelRole::Hvac, snapshot)?;
        let lighting = self.run_base(ModelRole::Lighting, snapshot)?;
        let plug = self.run_base(ModelRole::Plug, snapshot)?;

        self.combine(hvac, lighting, plug, snapshot.require(names::ENERGY_OTHER_WH)?)
    }

    /// Predict with the three base models on the blocking pool.
    ///
    /// The meta step starts only after all base stages have joined.
    pub async fn predict_concurrent(
        &self,
        snapshot: &FeatureSnapshot,
    ) -> Result<EnsembleOutput, InferenceError> {
        self.check(snapshot)?;

        let hvac = self.spawn_base(ModelRole::Hvac, snapshot)?;
        let lighting = self.spawn_base(ModelRole::Lighting, snapshot)?;
        let plug = self.spawn_base(ModelRole::Plug, snapshot)?;

        let (hvac, lighting, plug) =
            tokio::try_join!(join_stage(hvac), join_stage(lighting), join_stage(plug))?;

        self.combine(hvac, lighting, plug, snapshot.require(names::ENERGY_OTHER_WH)?)
    }

    fn check(&self, snapshot: &FeatureSnapshot) -> Result<(), InferenceError> {
        self.validator.require(snapshot, Self::required_features())?;

        let ranges = self.validator.check_ranges(snapshot);
        for err in &ranges.errors {
            debug!("Implausible input at {}: {}", snapshot.timestamp(), err);
        }
        Ok(())
    }

    fn run_base(&self, role: ModelRole, snapshot: &FeatureSnapshot) -> Result<f64, InferenceError> {
        let inputs = snapshot.select(role.feature_names())?;
        self.bundle.stage(role).run(&inputs)
    }

    fn spawn_base(
        &self,
        role: ModelRole,
        snapshot: &FeatureSnapshot,
    ) -> Result<JoinHandle<Result<f64, InferenceError>>, InferenceError> {
        let inputs = snapshot.select(role.feature_names())?;
        let bundle = Arc::clone(&self.bundle);
        Ok(tokio::task::spawn_blocking(move || {
            bundle.stage(role).run(&inputs)
        }))
    }

    fn combine(
        &self,
        hvac: f64,
        lighting: f64,
        plug: f64,
        other: f64,
    ) -> Result<EnsembleOutput, InferenceError> {
        let total = self
            .bundle
            .stage(ModelRole::Meta)
            .run(&[hvac, lighting, plug, other])?;

        debug!(
            "Ensemble: hvac={:.2} lighting={:.2} plug={:.2} other={:.2} total={:.2}",
            hvac, lighting, plug, other, total
        );

        Ok(EnsembleOutput {
            hvac,
            lighting,
            plug,
            other,
            total,
        })
    }
}

async fn join_stage(
    handle: JoinHandle<Result<f64, InferenceError>>,
) -> Result<f64, InferenceError> {
    handle
        .await
        .map_err(|e| InferenceError::InferenceFailed(format!("base model task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::ModelStage;
    use crate::model::{FnRegressor, LinearRegressor};
    use chrono::NaiveDateTime;
    use data_validator::Normalizer;

    fn stage(role: ModelRole, value: f64) -> ModelStage {
        ModelStage::new(
            role,
            Box::new(LinearRegressor::constant(role.input_width(), value)),
            Normalizer::identity(role.input_width()),
        )
        .unwrap()
    }

    fn summing_meta() -> ModelStage {
        ModelStage::new(
            ModelRole::Meta,
            Box::new(LinearRegressor::sum(4)),
            Normalizer::identity(4),
        )
        .unwrap()
    }

    fn stub_predictor() -> EnsemblePredictor {
        let bundle = ModelBundle::new(
            stage(ModelRole::Hvac, 100.0),
            stage(ModelRole::Lighting, 50.0),
            stage(ModelRole::Plug, 30.0),
            summing_meta(),
        )
        .unwrap();
        EnsemblePredictor::new(Arc::new(bundle))
    }

    fn full_snapshot() -> FeatureSnapshot {
        EnsemblePredictor::required_features()
            .iter()
            .fold(FeatureSnapshot::new(NaiveDateTime::default()), |s, name| {
                s.with(*name, 1.0)
            })
            .with(names::ENERGY_OTHER_WH, 20.0)
    }

    #[test]
    fn test_stacked_total() {
        let output = stub_predictor().predict(&full_snapshot()).unwrap();

        assert_eq!(output.hvac, 100.0);
        assert_eq!(output.lighting, 50.0);
        assert_eq!(output.plug, 30.0);
        assert_eq!(output.other, 20.0);
        assert_eq!(output.total, 200.0);
    }

    #[test]
    fn test_required_features_union() {
        let required = EnsemblePredictor::required_features();
        // 16 + 13 + 17 columns with overlap, plus the passthrough load
        assert_eq!(required.len(), 27);
        assert_eq!(required.last(), Some(&names::ENERGY_OTHER_WH));
    }

    #[test]
    fn test_missing_feature_fails_before_inference() {
        let snapshot = FeatureSnapshot::new(NaiveDateTime::default()).with(names::HOUR, 10.0);

        let err = stub_predictor().predict(&snapshot).unwrap_err();
        match err {
            InferenceError::Validation(data_validator::ValidationError::MissingFields(missing)) => {
                assert!(missing.contains(&names::ENERGY_OTHER_WH.to_string()));
                assert!(missing.contains(&names::HVAC_LOAD_ESTIMATE.to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_base_models_see_training_order() {
        // HVAC model echoes its first column, which must be HVAC_Load_Estimate
        let hvac = ModelStage::new(
            ModelRole::Hvac,
            Box::new(FnRegressor::new(|x: &[f64]| Ok(x[0]))),
            Normalizer::identity(16),
        )
        .unwrap();
        let bundle = ModelBundle::new(
            hvac,
            stage(ModelRole::Lighting, 0.0),
            stage(ModelRole::Plug, 0.0),
            summing_meta(),
        )
        .unwrap();

        let snapshot = full_snapshot().with(names::HVAC_LOAD_ESTIMATE, 42.0);
        let output = EnsemblePredictor::new(Arc::new(bundle)).predict(&snapshot).unwrap();
        assert_eq!(output.hvac, 42.0);
    }

    #[test]
    fn test_model_failure_surfaces() {
        let broken = ModelStage::new(
            ModelRole::Plug,
            Box::new(FnRegressor::new(|_: &[f64]| {
                Err(InferenceError::InferenceFailed("boom".into()))
            })),
            Normalizer::identity(17),
        )
        .unwrap();
        let bundle = ModelBundle::new(
            stage(ModelRole::Hvac, 1.0),
            stage(ModelRole::Lighting, 1.0),
            broken,
            summing_meta(),
        )
        .unwrap();

        let err = EnsemblePredictor::new(Arc::new(bundle))
            .predict(&full_snapshot())
            .unwrap_err();
        assert!(err.to_string().contains("plug model"));
    }

    #[tokio::test]
    async fn test_concurrent_matches_sequential() {
        let predictor = stub_predictor();
        let snapshot = full_snapshot();

        let sequential = predictor.predict(&snapshot).unwrap();
        let concurrent = predictor.predict_concurrent(&snapshot).await.unwrap();
        assert_eq!(sequential, concurrent);
    }
}
