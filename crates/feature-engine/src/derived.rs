//! Derived Feature Recalculation
//!
//! Temperature deviation and occupancy interaction terms are functions of the
//! primary signals. Any change to a primary signal invalidates them, so every
//! scenario path runs [`recompute`] before prediction.

use crate::names::*;
use crate::{FeatureError, FeatureSnapshot};
use serde::Serialize;
use tracing::trace;

/// Indoor comfort reference temperature (°C)
pub const COMFORT_REFERENCE_C: f64 = 22.0;

/// One step of the derivation pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DerivationStep {
    /// `|Indoor_Temp_C - 22|`
    IndoorTempDeviation,
    /// `|OutsideWeather_Temp_C - Indoor_Temp_C|`
    TempDeviation,
    /// `Temp_Deviation * Total_Occupancy_Count`
    TempOccupancyInteraction,
}

/// Steps in evaluation order. Later steps read the outputs of earlier ones.
pub const DERIVATION_PIPELINE: [DerivationStep; 3] = [
    DerivationStep::IndoorTempDeviation,
    DerivationStep::TempDeviation,
    DerivationStep::TempOccupancyInteraction,
];

impl DerivationStep {
    /// Feature written by this step
    pub fn output(&self) -> &'static str {
        match self {
            DerivationStep::IndoorTempDeviation => INDOOR_TEMP_DEVIATION,
            DerivationStep::TempDeviation => TEMP_DEVIATION,
            DerivationStep::TempOccupancyInteraction => TEMP_OCCUPANCY_INTERACTION,
        }
    }

    /// Features read by this step
    pub fn inputs(&self) -> &'static [&'static str] {
        match self {
            DerivationStep::IndoorTempDeviation => &[INDOOR_TEMP_C],
            DerivationStep::TempDeviation => &[OUTSIDE_TEMP_C, INDOOR_TEMP_C],
            DerivationStep::TempOccupancyInteraction => &[TEMP_DEVIATION, TOTAL_OCCUPANCY],
        }
    }

    fn compute(&self, snapshot: &FeatureSnapshot) -> Result<f64, FeatureError> {
        let value = match self {
            DerivationStep::IndoorTempDeviation => {
                (snapshot.require(INDOOR_TEMP_C)? - COMFORT_REFERENCE_C).abs()
            }
            DerivationStep::TempDeviation => {
                (snapshot.require(OUTSIDE_TEMP_C)? - snapshot.require(INDOOR_TEMP_C)?).abs()
            }
            DerivationStep::TempOccupancyInteraction => {
                snapshot.require(TEMP_DEVIATION)? * snapshot.require(TOTAL_OCCUPANCY)?
            }
        };
        Ok(value)
    }
}

/// Recompute all derived features, returning a new snapshot.
pub fn recompute(snapshot: &FeatureSnapshot) -> Result<FeatureSnapshot, FeatureError> {
    let mut derived = snapshot.clone();
    for step in DERIVATION_PIPELINE {
        let value = step.compute(&derived)?;
        trace!("{} = {:.4}", step.output(), value);
        derived.set(step.output(), value);
    }
    Ok(derived)
}
