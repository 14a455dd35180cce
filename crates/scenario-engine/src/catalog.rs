//! Optimization Catalog
//!
//! Fixed table of optimization strategies. Each rule is a list of
//! assignments whose expressions are evaluated against the rule's input
//! snapshot and then written together.

use crate::expr::{Condition, Expr};
use crate::ScenarioError;
use feature_engine::names::*;
use feature_engine::FeatureSnapshot;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// `feature = expr`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub feature: String,
    pub expr: Expr,
}

impl Assignment {
    pub fn new(feature: &str, expr: Expr) -> Self {
        Self {
            feature: feature.to_string(),
            expr,
        }
    }
}

/// One named optimization strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRule {
    pub name: String,
    pub description: String,
    pub assignments: Vec<Assignment>,
}

impl OptimizationRule {
    pub fn new(name: &str, description: &str, assignments: Vec<Assignment>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            assignments,
        }
    }

    /// Apply every assignment to a copy of `snapshot`.
    ///
    /// All right-hand sides read the input snapshot, so assignment order
    /// never matters.
    pub fn apply(&self, snapshot: &FeatureSnapshot) -> Result<FeatureSnapshot, ScenarioError> {
        let values = self
            .assignments
            .iter()
            .map(|assignment| assignment.expr.eval(snapshot).map(|v| (&assignment.feature, v)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| ScenarioError::Rule {
                rule: self.name.clone(),
                source,
            })?;

        let mut modified = snapshot.clone();
        for (feature, value) in values {
            trace!("{}: {} = {:.4}", self.name, feature, value);
            modified.set(feature.clone(), value);
        }
        Ok(modified)
    }
}

/// Ordered catalog of optimization rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationCatalog {
    rules: Vec<OptimizationRule>,
}

impl OptimizationCatalog {
    pub fn new(rules: Vec<OptimizationRule>) -> Self {
        Self { rules }
    }

    /// The built-in strategies, baseline first
    pub fn builtin() -> Self {
        Self::new(vec![
            OptimizationRule::new(
                "Baseline",
                "No optimizations applied - current operational baseline.",
                vec![],
            ),
            OptimizationRule::new(
                "HVAC Setpoint Optimization",
                "Wider temperature bands: +2°C in summer, -2°C in winter. Reduces HVAC cycling.",
                vec![Assignment::new(INDOOR_TEMP_C, setpoint_shift(2.0, 28.0))],
            ),
            OptimizationRule::new(
                "Occupancy-Based HVAC",
                "HVAC reduced by 60% when occupancy < 80 people. Smart zoning.",
                vec![Assignment::new(
                    HVAC_LOAD_ESTIMATE,
                    Expr::feature(HVAC_LOAD_ESTIMATE)
                        .scaled_when(Condition::lt(TOTAL_OCCUPANCY, 80.0), 0.4),
                )],
            ),
            OptimizationRule::new(
                "LED Lighting Upgrade",
                "30% reduction in lighting energy through LED conversion.",
                vec![],
            ),
            OptimizationRule::new(
                "Daylight Harvesting",
                "40% lighting reduction during daylight hours via smart controls.",
                vec![Assignment::new(
                    LIGHTING_OCCUPANCY_RATIO,
                    Expr::feature(LIGHTING_OCCUPANCY_RATIO)
                        .scaled_when(Condition::equals(IS_DAYTIME, 1.0), 0.6),
                )],
            ),
            OptimizationRule::new(
                "Remote Work Integration",
                "50% occupancy reduction with 40% plug load reduction.",
                vec![
                    Assignment::new(TOTAL_OCCUPANCY, Expr::feature(TOTAL_OCCUPANCY).times(0.5)),
                    Assignment::new(
                        DEVICE_USAGE_FACTOR,
                        Expr::feature(DEVICE_USAGE_FACTOR).times(0.6),
                    ),
                ],
            ),
            OptimizationRule::new(
                "Peak Demand Shaving",
                "30% load reduction during peak hours (8am-6pm weekdays).",
                vec![
                    Assignment::new(
                        HVAC_LOAD_ESTIMATE,
                        Expr::feature(HVAC_LOAD_ESTIMATE).scaled_when(weekday_peak(), 0.7),
                    ),
                    Assignment::new(
                        ENERGY_PLUG_WH,
                        Expr::feature(ENERGY_PLUG_WH).scaled_when(weekday_peak(), 0.7),
                    ),
                ],
            ),
            OptimizationRule::new(
                "Night Mode Optimization",
                "70% HVAC reduction and 50% plug reduction during off-hours.",
                vec![
                    Assignment::new(
                        HVAC_LOAD_ESTIMATE,
                        Expr::feature(HVAC_LOAD_ESTIMATE).scaled_when(off_hours(7.0, 19.0), 0.3),
                    ),
                    Assignment::new(
                        ENERGY_PLUG_WH,
                        Expr::feature(ENERGY_PLUG_WH).scaled_when(off_hours(7.0, 19.0), 0.5),
                    ),
                ],
            ),
            OptimizationRule::new(
                "Natural Ventilation Boost",
                "50% HVAC reduction when outdoor temp is 18-26°C (comfort zone).",
                vec![Assignment::new(
                    HVAC_LOAD_ESTIMATE,
                    Expr::feature(HVAC_LOAD_ESTIMATE)
                        .scaled_when(Condition::between(OUTSIDE_TEMP_C, 18.0, 26.0), 0.5),
                )],
            ),
            OptimizationRule::new(
                "Smart Plug Management",
                "40% reduction in plug loads through smart scheduling and power management.",
                vec![
                    Assignment::new(
                        DEVICE_USAGE_FACTOR,
                        Expr::feature(DEVICE_USAGE_FACTOR).times(0.6),
                    ),
                    Assignment::new(ENERGY_PLUG_WH, Expr::feature(ENERGY_PLUG_WH).times(0.6)),
                ],
            ),
            OptimizationRule::new(
                "Aggressive HVAC Optimization",
                "Wider temp bands (±3°C) + 70% reduction when occupancy < 100.",
                vec![
                    Assignment::new(INDOOR_TEMP_C, setpoint_shift(3.0, 30.0)),
                    Assignment::new(
                        HVAC_LOAD_ESTIMATE,
                        Expr::feature(HVAC_LOAD_ESTIMATE)
                            .scaled_when(Condition::lt(TOTAL_OCCUPANCY, 100.0), 0.3),
                    ),
                ],
            ),
            OptimizationRule::new(
                "Price-Responsive Load",
                "30% load reduction when energy price > $0.15/kWh.",
                vec![
                    Assignment::new(
                        HVAC_LOAD_ESTIMATE,
                        Expr::feature(HVAC_LOAD_ESTIMATE)
                            .scaled_when(Condition::gt(ENERGY_PRICE_USD_KWH, 0.15), 0.7),
                    ),
                    Assignment::new(
                        ENERGY_PLUG_WH,
                        Expr::feature(ENERGY_PLUG_WH)
                            .scaled_when(Condition::gt(ENERGY_PRICE_USD_KWH, 0.15), 0.7),
                    ),
                ],
            ),
            OptimizationRule::new(
                "Weekend Optimization",
                "60% HVAC and 50% plug reduction on weekends.",
                vec![
                    Assignment::new(
                        HVAC_LOAD_ESTIMATE,
                        Expr::feature(HVAC_LOAD_ESTIMATE)
                            .scaled_when(Condition::equals(IS_WEEKEND, 1.0), 0.4),
                    ),
                    Assignment::new(
                        ENERGY_PLUG_WH,
                        Expr::feature(ENERGY_PLUG_WH)
                            .scaled_when(Condition::equals(IS_WEEKEND, 1.0), 0.5),
                    ),
                ],
            ),
            OptimizationRule::new(
                "Combined Moderate",
                "Setpoint optimization + occupancy-based HVAC + 25% plug reduction off-hours.",
                vec![
                    Assignment::new(INDOOR_TEMP_C, setpoint_shift(1.5, 28.0)),
                    Assignment::new(
                        HVAC_LOAD_ESTIMATE,
                        Expr::feature(HVAC_LOAD_ESTIMATE)
                            .scaled_when(Condition::lt(TOTAL_OCCUPANCY, 80.0), 0.5),
                    ),
                    Assignment::new(
                        ENERGY_PLUG_WH,
                        Expr::feature(ENERGY_PLUG_WH).scaled_when(off_hours(8.0, 17.0), 0.75),
                    ),
                ],
            ),
            OptimizationRule::new(
                "Combined Aggressive",
                "All optimizations: ±3°C temp, natural ventilation, 70% peak shaving, 50% off-hours.",
                vec![
                    Assignment::new(INDOOR_TEMP_C, setpoint_shift(3.0, 30.0)),
                    Assignment::new(
                        HVAC_LOAD_ESTIMATE,
                        Expr::feature(HVAC_LOAD_ESTIMATE).scaled_by_each([
                            (Condition::lt(TOTAL_OCCUPANCY, 100.0), 0.3),
                            (Condition::between(OUTSIDE_TEMP_C, 18.0, 26.0), 0.4),
                        ]),
                    ),
                    Assignment::new(
                        ENERGY_PLUG_WH,
                        Expr::feature(ENERGY_PLUG_WH).scaled_by_each([
                            (off_hours(8.0, 17.0), 0.5),
                            (Condition::gt(ENERGY_PRICE_USD_KWH, 0.15), 0.7),
                        ]),
                    ),
                ],
            ),
            OptimizationRule::new(
                "Ultimate Energy Saver",
                "Maximum savings: all optimizations combined with 80% HVAC reduction low occupancy.",
                vec![
                    Assignment::new(INDOOR_TEMP_C, setpoint_shift(3.0, 30.0)),
                    Assignment::new(
                        HVAC_LOAD_ESTIMATE,
                        Expr::feature(HVAC_LOAD_ESTIMATE).scaled_by_each([
                            (Condition::lt(TOTAL_OCCUPANCY, 100.0), 0.2),
                            (Condition::between(OUTSIDE_TEMP_C, 18.0, 27.0), 0.2),
                        ]),
                    ),
                    Assignment::new(
                        ENERGY_PLUG_WH,
                        Expr::feature(ENERGY_PLUG_WH).scaled_by_each([
                            (off_hours(7.0, 18.0), 0.3),
                            (Condition::gt(ENERGY_PRICE_USD_KWH, 0.14), 0.6),
                        ]),
                    ),
                    Assignment::new(
                        DEVICE_USAGE_FACTOR,
                        Expr::feature(DEVICE_USAGE_FACTOR).times(0.5),
                    ),
                    Assignment::new(
                        LIGHTING_OCCUPANCY_RATIO,
                        Expr::feature(LIGHTING_OCCUPANCY_RATIO)
                            .scaled_when(Condition::equals(IS_DAYTIME, 1.0), 0.5),
                    ),
                ],
            ),
            OptimizationRule::new(
                "Seasonal Adaptation",
                "Winter: -2°C setpoint, Summer: +2°C setpoint, Spring/Fall: natural ventilation priority.",
                vec![
                    Assignment::new(INDOOR_TEMP_C, seasonal_setpoint()),
                    Assignment::new(
                        HVAC_LOAD_ESTIMATE,
                        Expr::feature(HVAC_LOAD_ESTIMATE).scaled_when(
                            Condition::one_of(SEASON, &[1.0, 3.0])
                                .and(Condition::between(OUTSIDE_TEMP_C, 18.0, 26.0)),
                            0.4,
                        ),
                    ),
                ],
            ),
            OptimizationRule::new(
                "Zoned Building Control",
                "Different zones optimized independently based on occupancy patterns.",
                vec![Assignment::new(
                    HVAC_LOAD_ESTIMATE,
                    Expr::select(
                        Condition::lt(TOTAL_OCCUPANCY, 50.0),
                        Expr::feature(HVAC_LOAD_ESTIMATE).times(0.3),
                        Expr::feature(HVAC_LOAD_ESTIMATE)
                            .scaled_when(Condition::lt(TOTAL_OCCUPANCY, 100.0), 0.6),
                    ),
                )],
            ),
            OptimizationRule::new(
                "Smart Grid Integration",
                "Dynamic load shifting based on grid signals and pricing (40% reduction high-price periods).",
                vec![
                    Assignment::new(
                        HVAC_LOAD_ESTIMATE,
                        Expr::feature(HVAC_LOAD_ESTIMATE)
                            .scaled_when(Condition::gt(ENERGY_PRICE_USD_KWH, 0.12), 0.6),
                    ),
                    Assignment::new(
                        ENERGY_PLUG_WH,
                        Expr::feature(ENERGY_PLUG_WH)
                            .scaled_when(Condition::gt(ENERGY_PRICE_USD_KWH, 0.12), 0.6),
                    ),
                    Assignment::new(
                        DEVICE_USAGE_FACTOR,
                        Expr::feature(DEVICE_USAGE_FACTOR)
                            .scaled_when(Condition::gt(ENERGY_PRICE_USD_KWH, 0.12), 0.7),
                    ),
                ],
            ),
        ])
    }

    pub fn rules(&self) -> &[OptimizationRule] {
        &self.rules
    }

    pub fn get(&self, name: &str) -> Option<&OptimizationRule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for OptimizationCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Raise the indoor setpoint by `delta` in season 3, lower it otherwise,
/// then clamp to `[18, max]`
fn setpoint_shift(delta: f64, max: f64) -> Expr {
    Expr::select(
        Condition::equals(SEASON, 3.0),
        Expr::feature(INDOOR_TEMP_C).plus(delta),
        Expr::feature(INDOOR_TEMP_C).plus(-delta),
    )
    .clamp(18.0, max)
}

fn seasonal_setpoint() -> Expr {
    let shifted = |delta: f64| Expr::feature(INDOOR_TEMP_C).plus(delta);
    Expr::select(
        Condition::equals(SEASON, 0.0),
        shifted(-2.0),
        Expr::select(
            Condition::equals(SEASON, 1.0),
            shifted(1.0),
            Expr::select(Condition::equals(SEASON, 2.0), shifted(2.0), shifted(-1.0)),
        ),
    )
    .clamp(18.0, 28.0)
}

/// Hour outside `[start, end]` or any weekend hour
fn off_hours(start: f64, end: f64) -> Condition {
    Condition::Any(vec![
        Condition::lt(HOUR, start),
        Condition::gt(HOUR, end),
        Condition::equals(IS_WEEKEND, 1.0),
    ])
}

/// Weekdays 8:00 through 18:59
fn weekday_peak() -> Condition {
    Condition::between(HOUR, 8.0, 18.0).and(Condition::equals(IS_WEEKEND, 0.0))
}
