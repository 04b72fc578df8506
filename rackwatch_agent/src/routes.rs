//! HTTP handlers for the four telemetry endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rand_distr::NormalError;
use tracing::{debug, error};

use crate::models::{allocation, cooling, fleet, forecast, timestamp};
use crate::state::AppState;
use crate::types::{Allocation, CoolingPlan, Forecast, ForecastInput, StatusInput, SystemStatus};

pub const STATUS_PATH: &str = "/api/system/status";
pub const FORECAST_PATH: &str = "/api/workload/forecast";
pub const ALLOCATE_PATH: &str = "/api/resource/allocate";
pub const COOLING_PATH: &str = "/api/cooling/optimize";

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route(STATUS_PATH, get(system_status))
        .route(FORECAST_PATH, get(workload_forecast))
        .route(ALLOCATE_PATH, post(allocate_resources))
        .route(COOLING_PATH, post(optimize_cooling))
        .with_state(state)
}

async fn system_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let n = state.count_request();
    debug!(request = n, "system status");
    Json(fleet::system_status(timestamp()))
}

type ModelResult<T> = Result<Json<T>, (StatusCode, String)>;

fn model_failed(e: NormalError) -> (StatusCode, String) {
    error!(error = %e, "model distribution rejected");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

async fn workload_forecast(State(state): State<AppState>) -> ModelResult<Forecast> {
    let n = state.count_request();
    let body = state
        .with_rng_mut(|rng| forecast::forecast(rng, timestamp()))
        .map_err(model_failed)?;
    debug!(request = n, points = body.forecasts.len(), "workload forecast");
    Ok(Json(body))
}

async fn allocate_resources(
    State(state): State<AppState>,
    Json(input): Json<ForecastInput>,
) -> ModelResult<Allocation> {
    let n = state.count_request();
    let body = state
        .with_rng_mut(|rng| allocation::allocate(rng, &input, timestamp()))
        .map_err(model_failed)?;
    debug!(request = n, decisions = body.decisions.len(), "resource allocation");
    Ok(Json(body))
}

async fn optimize_cooling(
    State(state): State<AppState>,
    Json(input): Json<StatusInput>,
) -> Json<CoolingPlan> {
    let n = state.count_request();
    let body = cooling::optimize(&input, timestamp());
    debug!(request = n, level = %body.cooling_level, fan = body.fan_speed_percent, "cooling plan");
    Json(body)
}
