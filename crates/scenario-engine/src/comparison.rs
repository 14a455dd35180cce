//! Comparison Engine
//!
//! Runs scenarios and catalog rules through the ensemble and reports
//! energy, cost, and savings against the unmodified snapshot.

use crate::catalog::OptimizationCatalog;
use crate::presets::ScenarioKey;
use crate::ScenarioError;
use feature_engine::names::{ENERGY_PRICE_USD_KWH, OUTSIDE_TEMP_C, TOTAL_OCCUPANCY};
use feature_engine::{recompute, FeatureSnapshot};
use inference_engine::{EnsembleOutput, EnsemblePredictor};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const HOURS_PER_YEAR: f64 = 8760.0;
pub const HOURS_PER_MONTH: f64 = HOURS_PER_YEAR / 12.0;

/// Monthly energy for a sustained hourly draw of `total_wh`
pub fn monthly_kwh(total_wh: f64) -> f64 {
    total_wh * HOURS_PER_MONTH / 1000.0
}

/// Annual energy for a sustained hourly draw of `total_wh`
pub fn annual_kwh(total_wh: f64) -> f64 {
    total_wh * HOURS_PER_YEAR / 1000.0
}

pub fn monthly_cost_usd(total_wh: f64, price_per_kwh: f64) -> f64 {
    total_wh / 1000.0 * price_per_kwh * HOURS_PER_MONTH
}

/// Percentage saved relative to `baseline`; zero when the baseline is not positive
pub fn savings_pct(baseline: f64, scenario: f64) -> f64 {
    if baseline > 0.0 {
        (baseline - scenario) / baseline * 100.0
    } else {
        0.0
    }
}

fn round_int(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Rounds to 2 dp. Negative values that round to zero come out as `+0.0`.
fn round_2dp(value: f64) -> f64 {
    let rounded = (value * 100.0).round_ties_even() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Per-model energy (Wh)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentBreakdown {
    pub hvac: f64,
    pub lighting: f64,
    pub plug: f64,
    pub total: f64,
}

impl From<&EnsembleOutput> for ComponentBreakdown {
    fn from(output: &EnsembleOutput) -> Self {
        Self {
            hvac: output.hvac,
            lighting: output.lighting,
            plug: output.plug,
            total: output.total,
        }
    }
}

/// Scenario inputs echoed back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationInputs {
    pub temp: f64,
    pub occupancy: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutputs {
    pub hvac: f64,
    pub lighting: f64,
    pub plug: f64,
    pub total: f64,
    /// Hourly cost (USD)
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub scenario: ScenarioKey,
    pub inputs: SimulationInputs,
    pub outputs: SimulationOutputs,
}

/// Hourly energy and cost of one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyCost {
    pub energy_wh: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub scenario: ScenarioKey,
    pub energy_wh: f64,
    pub cost: f64,
    pub savings_wh: f64,
    pub savings_cost: f64,
    pub savings_pct: f64,
    pub breakdown: ComponentBreakdown,
}

/// Baseline against a list of flat scenarios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub baseline: EnergyCost,
    pub comparisons: Vec<ScenarioComparison>,
}

/// One ranked catalog rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub scenario: String,
    pub monthly_kwh: i64,
    pub annual_kwh: i64,
    pub savings_kwh: i64,
    pub savings_pct: f64,
    pub monthly_cost_usd: i64,
    pub annual_cost_usd: i64,
    pub cost_savings_usd: i64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelComparison {
    pub model: String,
    pub before: f64,
    pub after: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownComparison {
    pub baseline: ComponentBreakdown,
    #[serde(rename = "modelComparison")]
    pub model_comparison: Vec<ModelComparison>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub scenarios: Vec<OptimizationResult>,
    pub comparison: BreakdownComparison,
}

/// Options for [`ComparisonEngine::rank`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankOptions {
    /// Flat scenario applied before any rule
    pub simulation_scenario: Option<ScenarioKey>,
    /// Catalog index whose component breakdown is reported
    pub capture_index: Option<usize>,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            simulation_scenario: None,
            capture_index: Some(1),
        }
    }
}

/// Evaluates modified snapshots against their baseline
#[derive(Clone)]
pub struct ComparisonEngine {
    predictor: EnsemblePredictor,
}

impl ComparisonEngine {
    pub fn new(predictor: EnsemblePredictor) -> Self {
        Self { predictor }
    }

    pub fn predictor(&self) -> &EnsemblePredictor {
        &self.predictor
    }

    /// Recompute derived features and predict
    pub fn evaluate(&self, snapshot: &FeatureSnapshot) -> Result<EnsembleOutput, ScenarioError> {
        let derived = recompute(snapshot)?;
        Ok(self.predictor.predict(&derived)?)
    }

    /// Apply one flat scenario and predict
    pub fn simulate(
        &self,
        snapshot: &FeatureSnapshot,
        scenario: ScenarioKey,
    ) -> Result<SimulationResult, ScenarioError> {
        let modified = recompute(&scenario.spec().apply(snapshot))?;
        let output = self.predictor.predict(&modified)?;
        let price = modified.require(ENERGY_PRICE_USD_KWH)?;

        debug!("Simulated {}: total={:.2} Wh", scenario, output.total);

        Ok(SimulationResult {
            scenario,
            inputs: SimulationInputs {
                temp: modified.require(OUTSIDE_TEMP_C)?,
                occupancy: modified.require(TOTAL_OCCUPANCY)?,
                price,
            },
            outputs: SimulationOutputs {
                hvac: output.hvac,
                lighting: output.lighting,
                plug: output.plug,
                total: output.total,
                cost: output.total / 1000.0 * price,
            },
        })
    }

    /// Compare each scenario in `scenarios` against the unmodified snapshot
    pub fn compare(
        &self,
        snapshot: &FeatureSnapshot,
        scenarios: &[ScenarioKey],
    ) -> Result<ComparisonRecord, ScenarioError> {
        let baseline = self.evaluate(snapshot)?;
        let baseline_cost = baseline.total / 1000.0 * snapshot.require(ENERGY_PRICE_USD_KWH)?;

        let comparisons = scenarios
            .iter()
            .map(|&scenario| -> Result<ScenarioComparison, ScenarioError> {
                let simulated = self.simulate(snapshot, scenario)?;
                let outputs = simulated.outputs;
                Ok(ScenarioComparison {
                    scenario,
                    energy_wh: outputs.total,
                    cost: outputs.cost,
                    savings_wh: baseline.total - outputs.total,
                    savings_cost: baseline_cost - outputs.cost,
                    savings_pct: savings_pct(baseline.total, outputs.total),
                    breakdown: ComponentBreakdown {
                        hvac: outputs.hvac,
                        lighting: outputs.lighting,
                        plug: outputs.plug,
                        total: outputs.total,
                    },
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ComparisonRecord {
            baseline: EnergyCost {
                energy_wh: baseline.total,
                cost: baseline_cost,
            },
            comparisons,
        })
    }

    /// Evaluate every catalog rule and rank by savings, highest first.
    ///
    /// Rules run in parallel; equal savings keep catalog order.
    pub fn rank(
        &self,
        snapshot: &FeatureSnapshot,
        catalog: &OptimizationCatalog,
        options: &RankOptions,
    ) -> Result<OptimizationReport, ScenarioError> {
        if let Some(index) = options.capture_index {
            if index >= catalog.len() {
                return Err(ScenarioError::RuleIndexOutOfRange {
                    index,
                    len: catalog.len(),
                });
            }
        }

        let base = match options.simulation_scenario {
            Some(scenario) => scenario.spec().apply(snapshot),
            None => snapshot.clone(),
        };
        let base = recompute(&base)?;
        let baseline = self.predictor.predict(&base)?;
        let baseline_kwh = monthly_kwh(baseline.total);
        let baseline_cost = monthly_cost_usd(baseline.total, base.require(ENERGY_PRICE_USD_KWH)?);

        info!(
            "Ranking {} rules against baseline {:.2} Wh",
            catalog.len(),
            baseline.total
        );

        let evaluated = catalog
            .rules()
            .par_iter()
            .map(|rule| -> Result<(EnsembleOutput, f64), ScenarioError> {
                let modified = recompute(&rule.apply(&base)?)?;
                let output = self.predictor.predict(&modified)?;
                let price = modified.require(ENERGY_PRICE_USD_KWH)?;
                debug!("{}: total={:.2} Wh", rule.name, output.total);
                Ok((output, price))
            })
            .collect::<Result<Vec<_>, ScenarioError>>()?;

        let mut scenarios: Vec<OptimizationResult> = catalog
            .rules()
            .iter()
            .zip(&evaluated)
            .map(|(rule, (output, price))| {
                let kwh = monthly_kwh(output.total);
                let cost = monthly_cost_usd(output.total, *price);
                OptimizationResult {
                    scenario: rule.name.clone(),
                    monthly_kwh: round_int(kwh),
                    annual_kwh: round_int(annual_kwh(output.total)),
                    savings_kwh: round_int(baseline_kwh - kwh),
                    savings_pct: round_2dp(savings_pct(baseline_kwh, kwh)),
                    monthly_cost_usd: round_int(cost),
                    annual_cost_usd: round_int(cost * 12.0),
                    cost_savings_usd: round_int(baseline_cost - cost),
                    description: rule.description.clone(),
                }
            })
            .collect();

        // sort_by is stable, so ties stay in catalog order
        scenarios.sort_by(|a, b| b.savings_pct.total_cmp(&a.savings_pct));

        let model_comparison = match options.capture_index {
            Some(index) => {
                let (after, _) = &evaluated[index];
                vec![
                    ModelComparison::new("HVAC", baseline.hvac, after.hvac),
                    ModelComparison::new("Lighting", baseline.lighting, after.lighting),
                    ModelComparison::new("Plug", baseline.plug, after.plug),
                    ModelComparison::new("Total", baseline.total, after.total),
                ]
            }
            None => Vec::new(),
        };

        Ok(OptimizationReport {
            scenarios,
            comparison: BreakdownComparison {
                baseline: ComponentBreakdown::from(&baseline),
                model_comparison,
            },
        })
    }
}

impl ModelComparison {
    fn new(model: &str, before: f64, after: f64) -> Self {
        Self {
            model: model.to_string(),
            before,
            after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use data_validator::Normalizer;
    use feature_engine::names::*;
    use inference_engine::{FnRegressor, LinearRegressor, ModelBundle, ModelRole, ModelStage};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn constant(role: ModelRole, value: f64) -> ModelStage {
        ModelStage::new(
            role,
            Box::new(LinearRegressor::constant(role.input_width(), value)),
            Normalizer::identity(role.input_width()),
        )
        .unwrap()
    }

    /// HVAC echoes its load estimate; lighting 50, plug 30, meta sums
    fn engine_with_meta(meta: ModelStage) -> ComparisonEngine {
        let hvac = ModelStage::new(
            ModelRole::Hvac,
            Box::new(FnRegressor::new(|x: &[f64]| Ok(x[0]))),
            Normalizer::identity(ModelRole::Hvac.input_width()),
        )
        .unwrap();
        let bundle = ModelBundle::new(
            hvac,
            constant(ModelRole::Lighting, 50.0),
            constant(ModelRole::Plug, 30.0),
            meta,
        )
        .unwrap();
        ComparisonEngine::new(EnsemblePredictor::new(Arc::new(bundle)))
    }

    /// Base HVAC load plus a tiny indoor-temperature term, so setpoint
    /// shifts change the total by far less than 0.005%
    fn temperature_sensitive_engine() -> ComparisonEngine {
        let hvac = ModelStage::new(
            ModelRole::Hvac,
            Box::new(FnRegressor::new(|x: &[f64]| Ok(x[0] + 1e-4 * x[5]))),
            Normalizer::identity(ModelRole::Hvac.input_width()),
        )
        .unwrap();
        let meta = ModelStage::new(
            ModelRole::Meta,
            Box::new(LinearRegressor::sum(4)),
            Normalizer::identity(4),
        )
        .unwrap();
        let bundle = ModelBundle::new(
            hvac,
            constant(ModelRole::Lighting, 50.0),
            constant(ModelRole::Plug, 30.0),
            meta,
        )
        .unwrap();
        ComparisonEngine::new(EnsemblePredictor::new(Arc::new(bundle)))
    }

    /// Positions of the ranked rules within the catalog
    fn catalog_positions(
        report: &OptimizationReport,
        catalog: &OptimizationCatalog,
    ) -> Vec<usize> {
        report
            .scenarios
            .iter()
            .map(|r| {
                catalog
                    .rules()
                    .iter()
                    .position(|rule| rule.name == r.scenario)
                    .unwrap()
            })
            .collect()
    }

    fn ties_in_catalog_order(report: &OptimizationReport, catalog: &OptimizationCatalog) -> bool {
        let positions = catalog_positions(report, catalog);
        report
            .scenarios
            .windows(2)
            .zip(positions.windows(2))
            .all(|(r, p)| r[0].savings_pct != r[1].savings_pct || p[0] < p[1])
    }

    fn engine() -> ComparisonEngine {
        engine_with_meta(
            ModelStage::new(
                ModelRole::Meta,
                Box::new(LinearRegressor::sum(4)),
                Normalizer::identity(4),
            )
            .unwrap(),
        )
    }

    fn snapshot() -> FeatureSnapshot {
        EnsemblePredictor::required_features()
            .iter()
            .fold(FeatureSnapshot::new(NaiveDateTime::default()), |s, name| {
                s.with(*name, 1.0)
            })
            .with(HVAC_LOAD_ESTIMATE, 1000.0)
            .with(TOTAL_OCCUPANCY, 60.0)
            .with(OUTSIDE_TEMP_C, 30.0)
            .with(INDOOR_TEMP_C, 22.0)
            .with(HOUR, 12.0)
            .with(IS_WEEKEND, 0.0)
            .with(IS_DAYTIME, 1.0)
            .with(SEASON, 0.0)
            .with(ENERGY_PRICE_USD_KWH, 0.10)
            .with(ENERGY_PLUG_WH, 500.0)
            .with(ENERGY_OTHER_WH, 20.0)
    }

    #[test]
    fn test_energy_helpers() {
        assert_eq!(HOURS_PER_MONTH, 730.0);
        assert_eq!(monthly_kwh(1000.0), 730.0);
        assert_eq!(annual_kwh(1000.0), 8760.0);
        assert!((monthly_cost_usd(1000.0, 0.2) - 146.0).abs() < 1e-9);
        assert_eq!(savings_pct(200.0, 150.0), 25.0);
        assert_eq!(savings_pct(0.0, 150.0), 0.0);
        assert_eq!(savings_pct(-5.0, 1.0), 0.0);
    }

    #[test]
    fn test_rounding_is_half_even() {
        assert_eq!(round_int(2.5), 2);
        assert_eq!(round_int(3.5), 4);
        assert_eq!(round_int(-0.5), 0);
        assert_eq!(round_2dp(54.545454), 54.55);
    }

    #[test]
    fn test_round_2dp_drops_negative_zero() {
        let rounded = round_2dp(-0.0015);
        assert_eq!(rounded, 0.0);
        assert!(rounded.is_sign_positive());
        assert!(round_2dp(-0.0).is_sign_positive());
        assert_eq!(round_2dp(-0.006), -0.01);
    }

    #[test]
    fn test_rank_tiny_losses_tie_with_zero_savings() {
        // Summer setpoint rules raise Indoor_Temp_C and cost a hair more energy
        let s = snapshot()
            .with(SEASON, 3.0)
            .with(TOTAL_OCCUPANCY, 200.0);
        let catalog = OptimizationCatalog::builtin();
        let report = temperature_sensitive_engine()
            .rank(&s, &catalog, &RankOptions::default())
            .unwrap();

        let setpoint = report
            .scenarios
            .iter()
            .find(|r| r.scenario == "HVAC Setpoint Optimization")
            .unwrap();
        assert_eq!(setpoint.savings_pct, 0.0);
        assert!(setpoint.savings_pct.is_sign_positive());
        assert!(report
            .scenarios
            .iter()
            .all(|r| !(r.savings_pct == 0.0 && r.savings_pct.is_sign_negative())));

        let names: Vec<&str> = report.scenarios.iter().map(|r| r.scenario.as_str()).collect();
        let pos = |name: &str| names.iter().position(|n| *n == name).unwrap();
        assert!(pos("Baseline") < pos("HVAC Setpoint Optimization"));
        assert!(pos("HVAC Setpoint Optimization") < pos("LED Lighting Upgrade"));
        assert!(pos("Smart Plug Management") < pos("Aggressive HVAC Optimization"));
        assert!(ties_in_catalog_order(&report, &catalog));
    }

    #[test]
    fn test_stacked_total() {
        let output = engine().evaluate(&snapshot()).unwrap();
        assert_eq!(output.total, 1100.0);
    }

    #[test]
    fn test_rank_sorted_with_stable_ties() {
        let catalog = OptimizationCatalog::builtin();
        let report = engine()
            .rank(&snapshot(), &catalog, &RankOptions::default())
            .unwrap();
        let names: Vec<&str> = report.scenarios.iter().map(|r| r.scenario.as_str()).collect();

        assert_eq!(report.scenarios.len(), catalog.len());
        assert!(report
            .scenarios
            .windows(2)
            .all(|w| w[0].savings_pct >= w[1].savings_pct));

        assert_eq!(
            &names[..7],
            &[
                "Ultimate Energy Saver",
                "Aggressive HVAC Optimization",
                "Combined Aggressive",
                "Occupancy-Based HVAC",
                "Combined Moderate",
                "Zoned Building Control",
                "Peak Demand Shaving",
            ]
        );
        assert_eq!(report.scenarios[0].savings_pct, 72.73);
        assert_eq!(report.scenarios[3].savings_pct, 54.55);

        // Zero-savings rules keep catalog order
        let unchanged: Vec<&str> = report
            .scenarios
            .iter()
            .filter(|r| r.savings_pct == 0.0)
            .map(|r| r.scenario.as_str())
            .collect();
        let in_catalog_order: Vec<&str> = catalog
            .rules()
            .iter()
            .map(|r| r.name.as_str())
            .filter(|name| unchanged.contains(name))
            .collect();
        assert_eq!(unchanged, in_catalog_order);
        assert_eq!(unchanged[0], "Baseline");
    }

    #[test]
    fn test_rank_energy_and_cost_fields() {
        let report = engine()
            .rank(
                &snapshot(),
                &OptimizationCatalog::builtin(),
                &RankOptions::default(),
            )
            .unwrap();

        let baseline = report
            .scenarios
            .iter()
            .find(|r| r.scenario == "Baseline")
            .unwrap();
        assert_eq!(baseline.monthly_kwh, 803);
        assert_eq!(baseline.annual_kwh, 9636);
        assert_eq!(baseline.savings_kwh, 0);
        assert_eq!(baseline.monthly_cost_usd, 80);

        // total 300 Wh
        let best = &report.scenarios[0];
        assert_eq!(best.monthly_kwh, 219);
        assert_eq!(best.annual_kwh, 2628);
        assert_eq!(best.savings_kwh, 584);
        assert_eq!(best.cost_savings_usd, 58);
        assert!(best.description.contains("Maximum savings"));
    }

    #[test]
    fn test_zero_baseline_gives_zero_savings() {
        let engine = engine_with_meta(constant(ModelRole::Meta, 0.0));
        let report = engine
            .rank(
                &snapshot(),
                &OptimizationCatalog::builtin(),
                &RankOptions::default(),
            )
            .unwrap();

        assert!(report.scenarios.iter().all(|r| r.savings_pct == 0.0));
        assert_eq!(report.scenarios[0].scenario, "Baseline");
    }

    #[test]
    fn test_capture_index() {
        let catalog = OptimizationCatalog::builtin();
        let options = RankOptions {
            capture_index: Some(2),
            ..RankOptions::default()
        };
        let report = engine().rank(&snapshot(), &catalog, &options).unwrap();
        let captured = &report.comparison.model_comparison;

        assert_eq!(captured.len(), 4);
        assert_eq!(captured[0].model, "HVAC");
        assert_eq!(captured[0].before, 1000.0);
        assert!((captured[0].after - 400.0).abs() < 1e-9);
        assert_eq!(captured[1].before, captured[1].after);
        assert_eq!(captured[3].model, "Total");
        assert_eq!(report.comparison.baseline.total, 1100.0);
    }

    #[test]
    fn test_capture_disabled_and_out_of_range() {
        let catalog = OptimizationCatalog::builtin();
        let none = RankOptions {
            capture_index: None,
            ..RankOptions::default()
        };
        let report = engine().rank(&snapshot(), &catalog, &none).unwrap();
        assert!(report.comparison.model_comparison.is_empty());

        let too_far = RankOptions {
            capture_index: Some(catalog.len()),
            ..RankOptions::default()
        };
        assert!(matches!(
            engine().rank(&snapshot(), &catalog, &too_far),
            Err(ScenarioError::RuleIndexOutOfRange { index: 19, len: 19 })
        ));
    }

    #[test]
    fn test_simulation_scenario_shifts_baseline() {
        let catalog = OptimizationCatalog::builtin();
        let options = RankOptions {
            simulation_scenario: Some(ScenarioKey::GreenMode),
            ..RankOptions::default()
        };
        let report = engine().rank(&snapshot(), &catalog, &options).unwrap();

        // One occupant puts every occupancy rule into its reduced branch
        let zoned = report
            .scenarios
            .iter()
            .find(|r| r.scenario == "Zoned Building Control")
            .unwrap();
        assert_eq!(zoned.savings_pct, 63.64);
    }

    #[test]
    fn test_baseline_snapshot_untouched() {
        let s = snapshot();
        let _ = engine()
            .rank(&s, &OptimizationCatalog::builtin(), &RankOptions::default())
            .unwrap();
        assert_eq!(s, snapshot());
    }

    #[test]
    fn test_simulate_heatwave() {
        let result = engine().simulate(&snapshot(), ScenarioKey::Heatwave).unwrap();

        assert_eq!(result.inputs.temp, 35.0);
        assert_eq!(result.inputs.occupancy, 60.0);
        assert_eq!(result.outputs.total, 1100.0);
        assert!((result.outputs.cost - 0.11).abs() < 1e-12);
    }

    #[test]
    fn test_compare_energy_crisis() {
        let record = engine()
            .compare(
                &snapshot(),
                &[ScenarioKey::Baseline, ScenarioKey::EnergyCrisis],
            )
            .unwrap();

        assert_eq!(record.baseline.energy_wh, 1100.0);
        assert_eq!(record.comparisons.len(), 2);

        let crisis = &record.comparisons[1];
        assert_eq!(crisis.scenario, ScenarioKey::EnergyCrisis);
        assert_eq!(crisis.savings_wh, 0.0);
        assert_eq!(crisis.savings_pct, 0.0);
        assert!((crisis.savings_cost - (0.11 - 0.33)).abs() < 1e-9);
        assert_eq!(crisis.breakdown.hvac, 1000.0);
    }

    #[test]
    fn test_missing_feature_fails_request() {
        let partial = FeatureSnapshot::new(NaiveDateTime::default())
            .with(INDOOR_TEMP_C, 22.0)
            .with(OUTSIDE_TEMP_C, 20.0)
            .with(TOTAL_OCCUPANCY, 10.0);
        let err = engine()
            .rank(&partial, &OptimizationCatalog::builtin(), &RankOptions::default())
            .unwrap_err();
        assert!(matches!(err, ScenarioError::Inference(_)));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_ranking_sorted(
            load in 0.0f64..5000.0,
            occupancy in 0.0f64..300.0,
            hour in 0u32..24,
            price in 0.05f64..0.3,
            season in 0u32..4,
            indoor in 18.0f64..30.0,
        ) {
            let s = snapshot()
                .with(HVAC_LOAD_ESTIMATE, load)
                .with(TOTAL_OCCUPANCY, occupancy)
                .with(HOUR, f64::from(hour))
                .with(ENERGY_PRICE_USD_KWH, price)
                .with(SEASON, f64::from(season))
                .with(INDOOR_TEMP_C, indoor);
            let catalog = OptimizationCatalog::builtin();
            let report = temperature_sensitive_engine()
                .rank(&s, &catalog, &RankOptions::default())
                .unwrap();

            prop_assert!(report
                .scenarios
                .windows(2)
                .all(|w| w[0].savings_pct >= w[1].savings_pct));
            prop_assert!(ties_in_catalog_order(&report, &catalog));
        }
    }
}
