//! Optimization Routes

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use scenario_engine::{
    resolve_scenario, ModificationSpec, OptimizationReport, OptimizationRule, RankOptions,
    ScenarioKey,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use storage::parse_timestamp;
use tracing::{info, warn};

use super::{record_request, success, Success};
use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    /// Flat scenario applied before ranking
    pub simulation_scenario: Option<String>,
    pub timestamp: Option<String>,
    /// Overrides the configured capture index
    pub capture_index: Option<usize>,
}

/// Rank every catalog rule by savings
pub async fn optimize(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Result<Json<Success<OptimizationReport>>, ApiError> {
    record_request("optimize");
    let Json(request) = payload?;

    let simulation_scenario = request
        .simulation_scenario
        .as_deref()
        .map(|key| resolve_scenario(key, state.strict_scenarios))
        .transpose()?;

    // A bad timestamp falls back to the first record rather than failing
    let target = request.timestamp.as_deref().and_then(|raw| {
        parse_timestamp(raw)
            .map_err(|e| warn!("Ignoring optimize timestamp: {}", e))
            .ok()
    });
    let snapshot = match target {
        Some(ts) => state.repository.nearest(ts),
        None => state.repository.first(),
    }
    .ok_or(ApiError::NoData)?
    .clone();

    let options = RankOptions {
        simulation_scenario,
        capture_index: request.capture_index.or(state.capture_index),
    };

    let worker = Arc::clone(&state);
    let started = Instant::now();
    let report = tokio::task::spawn_blocking(move || {
        worker.engine.rank(&snapshot, &worker.catalog, &options)
    })
    .await??;

    let elapsed = started.elapsed();
    metrics::histogram!("catalog_rank_seconds").record(elapsed.as_secs_f64());
    info!(
        "Ranked {} rules in {:?}, best: {}",
        report.scenarios.len(),
        elapsed,
        report
            .scenarios
            .first()
            .map_or("none", |best| best.scenario.as_str())
    );

    Ok(success(report))
}

/// A scenario key with its modification
#[derive(Debug, Serialize)]
pub struct ScenarioEntry {
    pub key: ScenarioKey,
    #[serde(flatten)]
    pub spec: ModificationSpec,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub scenarios: Vec<ScenarioEntry>,
    pub rules: Vec<OptimizationRule>,
}

/// Scenario and rule tables
pub async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<Success<CatalogResponse>> {
    record_request("catalog");

    success(CatalogResponse {
        scenarios: ScenarioKey::ALL
            .into_iter()
            .map(|key| ScenarioEntry {
                key,
                spec: key.spec(),
            })
            .collect(),
        rules: state.catalog.rules().to_vec(),
    })
}
