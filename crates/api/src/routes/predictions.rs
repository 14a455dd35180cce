//! Prediction Routes

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use feature_engine::recompute;
use scenario_engine::{resolve_scenario, ComparisonRecord, ScenarioKey, SimulationResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::format_timestamp;
use tracing::debug;

use super::{record_request, select_snapshot, success, Fallback, Success};
use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub timestamp: Option<String>,
}

/// Ensemble output under the telemetry column names
#[derive(Debug, Serialize)]
pub struct Predictions {
    #[serde(rename = "Energy_HVAC_Wh")]
    pub hvac_wh: f64,
    #[serde(rename = "Energy_Lighting_Wh")]
    pub lighting_wh: f64,
    #[serde(rename = "Energy_Plug_Wh")]
    pub plug_wh: f64,
    #[serde(rename = "Energy_Other_Wh")]
    pub other_wh: f64,
    #[serde(rename = "Total_Energy_Wh")]
    pub total_wh: f64,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predictions: Predictions,
    pub timestamp: String,
}

/// Predict all four components for one snapshot
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<Success<PredictResponse>>, ApiError> {
    record_request("predict");
    let Json(request) = payload?;

    let snapshot = select_snapshot(&state, request.timestamp.as_deref(), Fallback::Latest)?;
    let derived = recompute(snapshot)?;
    let output = state.engine.predictor().predict_concurrent(&derived).await?;

    Ok(success(PredictResponse {
        predictions: Predictions {
            hvac_wh: output.hvac,
            lighting_wh: output.lighting,
            plug_wh: output.plug,
            other_wh: output.other,
            total_wh: output.total,
        },
        timestamp: format_timestamp(snapshot.timestamp()),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    #[serde(default = "default_scenario")]
    pub scenario: String,
    pub timestamp: Option<String>,
}

fn default_scenario() -> String {
    ScenarioKey::Baseline.as_str().to_string()
}

#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    pub data: SimulationResult,
}

/// Apply one named scenario and predict
pub async fn simulate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SimulateRequest>, JsonRejection>,
) -> Result<Json<Success<SimulateResponse>>, ApiError> {
    record_request("simulate");
    let Json(request) = payload?;

    let scenario = resolve_scenario(&request.scenario, state.strict_scenarios)?;
    let snapshot = select_snapshot(&state, request.timestamp.as_deref(), Fallback::Latest)?.clone();
    debug!("Simulating {} at {}", scenario, snapshot.timestamp());

    let engine = state.engine.clone();
    let data = tokio::task::spawn_blocking(move || engine.simulate(&snapshot, scenario)).await??;

    Ok(success(SimulateResponse { data }))
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    #[serde(default = "default_scenarios")]
    pub scenarios: Vec<String>,
    pub timestamp: Option<String>,
}

fn default_scenarios() -> Vec<String> {
    vec![default_scenario()]
}

/// Compare named scenarios against the unmodified snapshot
pub async fn compare(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Json<Success<ComparisonRecord>>, ApiError> {
    record_request("comparison");
    let Json(request) = payload?;

    let scenarios = request
        .scenarios
        .iter()
        .map(|key| resolve_scenario(key, state.strict_scenarios))
        .collect::<Result<Vec<_>, _>>()?;
    let snapshot = select_snapshot(&state, request.timestamp.as_deref(), Fallback::Latest)?.clone();

    let engine = state.engine.clone();
    let record =
        tokio::task::spawn_blocking(move || engine.compare(&snapshot, &scenarios)).await??;

    Ok(success(record))
}
