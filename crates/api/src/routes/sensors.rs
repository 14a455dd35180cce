//! Sensor Routes

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::{Duration, Local};
use feature_engine::names::{
    ENERGY_PRICE_USD_KWH, INDOOR_HUMIDITY_PCT, INDOOR_TEMP_C, OUTSIDE_TEMP_C, TOTAL_OCCUPANCY,
};
use feature_engine::FeatureSnapshot;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use storage::{format_timestamp, parse_timestamp};

use super::{record_request, success, Success};
use crate::{ApiError, AppState};

/// Query parameters for the current-reading endpoint
#[derive(Debug, Deserialize)]
pub struct CurrentQuery {
    /// Defaults to the wall-clock time
    pub timestamp: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CurrentResponse {
    pub data: Map<String, Value>,
    pub requested_time: String,
    pub actual_time: String,
}

/// Reading nearest to the requested time
pub async fn get_current(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CurrentQuery>, QueryRejection>,
) -> Result<Json<Success<CurrentResponse>>, ApiError> {
    record_request("sensor_current");
    let Query(query) = query?;

    let requested_time = query
        .timestamp
        .unwrap_or_else(|| format_timestamp(Local::now().naive_local()));
    let target = parse_timestamp(&requested_time)?;
    let snapshot = state.repository.nearest(target).ok_or(ApiError::NoData)?;

    let actual_time = format_timestamp(snapshot.timestamp());
    let mut data: Map<String, Value> = snapshot
        .iter()
        .map(|(name, value)| (name.to_string(), Value::from(value)))
        .collect();
    data.insert("timestamp".to_string(), Value::from(actual_time.clone()));

    Ok(success(CurrentResponse {
        data,
        requested_time,
        actual_time,
    }))
}

/// Query parameters for the historical endpoint
#[derive(Debug, Deserialize)]
pub struct HistoricalQuery {
    /// Window length ending at `end_time`
    #[serde(default = "default_hours")]
    pub hours: i64,
    /// Defaults to the newest record
    pub end_time: Option<String>,
}

fn default_hours() -> i64 {
    24
}

/// One trimmed historical row
#[derive(Debug, Serialize)]
pub struct HistoricalRow {
    pub timestamp: String,
    #[serde(rename = "Indoor_Temp_C")]
    pub indoor_temp_c: f64,
    #[serde(rename = "Indoor_Humidity_Pct")]
    pub indoor_humidity_pct: f64,
    #[serde(rename = "Total_Occupancy_Count")]
    pub total_occupancy_count: i64,
    #[serde(rename = "OutsideWeather_Temp_C")]
    pub outside_temp_c: f64,
    #[serde(rename = "Energy_Price_USD_kWh")]
    pub energy_price_usd_kwh: f64,
}

impl TryFrom<&FeatureSnapshot> for HistoricalRow {
    type Error = ApiError;

    fn try_from(snapshot: &FeatureSnapshot) -> Result<Self, Self::Error> {
        Ok(Self {
            timestamp: format_timestamp(snapshot.timestamp()),
            indoor_temp_c: snapshot.require(INDOOR_TEMP_C)?,
            indoor_humidity_pct: snapshot.require(INDOOR_HUMIDITY_PCT)?,
            // Truncated like the dashboard expects
            total_occupancy_count: snapshot.require(TOTAL_OCCUPANCY)? as i64,
            outside_temp_c: snapshot.require(OUTSIDE_TEMP_C)?,
            energy_price_usd_kwh: snapshot.require(ENERGY_PRICE_USD_KWH)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct HistoricalResponse {
    pub data: Vec<HistoricalRow>,
    pub count: usize,
}

/// Readings in the `hours` before `end_time`, both ends inclusive
pub async fn get_historical(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HistoricalQuery>, QueryRejection>,
) -> Result<Json<Success<HistoricalResponse>>, ApiError> {
    record_request("historical");
    let Query(query) = query?;

    let end = match query.end_time.as_deref() {
        Some(raw) => parse_timestamp(raw)?,
        None => state
            .repository
            .latest()
            .map(FeatureSnapshot::timestamp)
            .ok_or(ApiError::NoData)?,
    };
    let start = Duration::try_hours(query.hours)
        .and_then(|hours| end.checked_sub_signed(hours))
        .ok_or_else(|| ApiError::BadRequest(format!("hours out of range: {}", query.hours)))?;

    let data = state
        .repository
        .window(start, end)
        .iter()
        .map(HistoricalRow::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(success(HistoricalResponse {
        count: data.len(),
        data,
    }))
}
