//! Route handlers

pub mod optimization;
pub mod predictions;
pub mod sensors;

use crate::{ApiError, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use feature_engine::FeatureSnapshot;
use serde::Serialize;
use std::sync::Arc;
use storage::parse_timestamp;

/// `{ "success": true, ...body }`
#[derive(Debug, Serialize)]
pub struct Success<T> {
    success: bool,
    #[serde(flatten)]
    body: T,
}

pub fn success<T: Serialize>(body: T) -> Json<Success<T>> {
    Json(Success {
        success: true,
        body,
    })
}

/// Where to look when the request names no timestamp
#[derive(Debug, Clone, Copy)]
pub enum Fallback {
    First,
    Latest,
}

/// Nearest snapshot to `timestamp`, or the fallback record.
///
/// An unparseable timestamp is a caller error.
pub fn select_snapshot<'a>(
    state: &'a AppState,
    timestamp: Option<&str>,
    fallback: Fallback,
) -> Result<&'a FeatureSnapshot, ApiError> {
    let repository = &state.repository;
    let snapshot = match timestamp {
        Some(raw) => repository.nearest(parse_timestamp(raw)?),
        None => match fallback {
            Fallback::First => repository.first(),
            Fallback::Latest => repository.latest(),
        },
    };
    snapshot.ok_or(ApiError::NoData)
}

pub fn record_request(endpoint: &'static str) {
    metrics::counter!("api_requests_total", "endpoint" => endpoint).increment(1);
}

/// Prometheus exposition
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}
