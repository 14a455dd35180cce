//! Built-in what-if scenarios

use crate::modifier::{ModificationMode, ModificationSpec};
use crate::ScenarioError;
use feature_engine::names::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Named scenario in the fixed configuration table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKey {
    Baseline,
    Heatwave,
    ColdSnap,
    HighOccupancy,
    RemoteWork,
    EnergyCrisis,
    GreenMode,
    SolarPeak,
    PeakDemand,
}

impl ScenarioKey {
    pub const ALL: [ScenarioKey; 9] = [
        ScenarioKey::Baseline,
        ScenarioKey::Heatwave,
        ScenarioKey::ColdSnap,
        ScenarioKey::HighOccupancy,
        ScenarioKey::RemoteWork,
        ScenarioKey::EnergyCrisis,
        ScenarioKey::GreenMode,
        ScenarioKey::SolarPeak,
        ScenarioKey::PeakDemand,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioKey::Baseline => "baseline",
            ScenarioKey::Heatwave => "heatwave",
            ScenarioKey::ColdSnap => "cold_snap",
            ScenarioKey::HighOccupancy => "high_occupancy",
            ScenarioKey::RemoteWork => "remote_work",
            ScenarioKey::EnergyCrisis => "energy_crisis",
            ScenarioKey::GreenMode => "green_mode",
            ScenarioKey::SolarPeak => "solar_peak",
            ScenarioKey::PeakDemand => "peak_demand",
        }
    }

    /// Modification bound to this scenario
    pub fn spec(&self) -> ModificationSpec {
        use ModificationMode::*;
        match self {
            ScenarioKey::Baseline => ModificationSpec::empty(),
            ScenarioKey::Heatwave => ModificationSpec::new(Add, [(OUTSIDE_TEMP_C, 5.0)]),
            ScenarioKey::ColdSnap => ModificationSpec::new(Add, [(OUTSIDE_TEMP_C, -5.0)]),
            ScenarioKey::HighOccupancy => ModificationSpec::new(Multiply, [(TOTAL_OCCUPANCY, 1.5)]),
            ScenarioKey::RemoteWork => ModificationSpec::new(
                MultiplySet {
                    primary: TOTAL_OCCUPANCY.to_string(),
                },
                [(TOTAL_OCCUPANCY, 0.3), (REMOTE_WORK_FACTOR, 1.0)],
            ),
            ScenarioKey::EnergyCrisis => {
                ModificationSpec::new(Multiply, [(ENERGY_PRICE_USD_KWH, 3.0)])
            }
            ScenarioKey::GreenMode => ModificationSpec::new(Set, [(TOTAL_OCCUPANCY, 1.0)]),
            ScenarioKey::SolarPeak => ModificationSpec::new(Multiply, [(SOLAR_IRRADIANCE, 1.8)]),
            ScenarioKey::PeakDemand => {
                ModificationSpec::new(Multiply, [(ENERGY_PRICE_USD_KWH, 5.0)])
            }
        }
    }
}

impl fmt::Display for ScenarioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioKey {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScenarioKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ScenarioError::UnknownScenario(s.to_string()))
    }
}

/// Look up a scenario by key.
///
/// Unknown keys resolve to the baseline unless `strict` is set.
pub fn resolve_scenario(key: &str, strict: bool) -> Result<ScenarioKey, ScenarioError> {
    match key.parse() {
        Ok(scenario) => Ok(scenario),
        Err(err) if strict => Err(err),
        Err(_) => {
            warn!("Unknown scenario `{}`, falling back to baseline", key);
            Ok(ScenarioKey::Baseline)
        }
    }
}
