//! Scenario Simulation Engine
//!
//! Applies what-if modifications to building snapshots, evaluates the
//! optimization rule catalog, and ranks strategies by predicted savings.

mod catalog;
mod comparison;
pub mod expr;
mod modifier;
mod presets;

pub use catalog::{Assignment, OptimizationCatalog, OptimizationRule};
pub use comparison::{
    annual_kwh, monthly_cost_usd, monthly_kwh, savings_pct, BreakdownComparison,
    ComparisonEngine, ComparisonRecord, ComponentBreakdown, EnergyCost, ModelComparison,
    OptimizationReport, OptimizationResult, RankOptions, ScenarioComparison, SimulationInputs,
    SimulationOutputs, SimulationResult, HOURS_PER_MONTH, HOURS_PER_YEAR,
};
pub use modifier::{ModificationEntry, ModificationMode, ModificationSpec};
pub use presets::{resolve_scenario, ScenarioKey};

use feature_engine::FeatureError;
use inference_engine::InferenceError;
use thiserror::Error;

/// Errors during scenario evaluation
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),
    #[error("Rule index {index} out of range for catalog of {len} rules")]
    RuleIndexOutOfRange { index: usize, len: usize },
    #[error("Rule `{rule}` failed: {source}")]
    Rule {
        rule: String,
        #[source]
        source: FeatureError,
    },
    #[error(transparent)]
    Feature(#[from] FeatureError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}
