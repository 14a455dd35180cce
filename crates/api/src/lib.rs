//! Building Energy Twin API Server
//!
//! REST endpoints for telemetry lookup, ensemble prediction, what-if
//! simulation, and optimization ranking.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use inference_engine::{EnsemblePredictor, ModelBundle};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use scenario_engine::{ComparisonEngine, OptimizationCatalog};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use storage::SnapshotRepository;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub mod config;
mod error;
mod routes;

pub use config::ApiConfig;
pub use error::ApiError;

/// Application state shared across handlers.
///
/// Everything here is read-only after startup.
pub struct AppState {
    pub repository: SnapshotRepository,
    pub engine: ComparisonEngine,
    pub catalog: OptimizationCatalog,
    pub strict_scenarios: bool,
    pub capture_index: Option<usize>,
    pub request_timeout: Duration,
    /// Prometheus render handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
    pub version: String,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(repository: SnapshotRepository, engine: ComparisonEngine) -> Self {
        Self {
            repository,
            engine,
            catalog: OptimizationCatalog::builtin(),
            strict_scenarios: false,
            capture_index: Some(1),
            request_timeout: Duration::from_secs(30),
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
        }
    }

    /// Apply the request-handling options from `config`
    pub fn with_config(mut self, config: &ApiConfig) -> Self {
        self.strict_scenarios = config.strict_scenarios;
        self.capture_index = config.capture_index;
        self.request_timeout = config.request_timeout();
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    pub message: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub models_loaded: bool,
    pub dataset_records: usize,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let timeout = state.request_timeout;

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/sensor/current", get(routes::sensors::get_current))
        .route("/api/historical", get(routes::sensors::get_historical))
        .route("/api/predict", post(routes::predictions::predict))
        .route("/api/simulate", post(routes::predictions::simulate))
        .route("/api/comparison", post(routes::predictions::compare))
        .route("/api/optimize", post(routes::optimization::optimize))
        .route("/api/catalog", get(routes::optimization::get_catalog))
        .route("/metrics", get(routes::metrics_handler))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    routes::record_request("health");

    Json(HealthResponse {
        success: true,
        status: "healthy".to_string(),
        message: "Building Energy Digital Twin API is running".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        models_loaded: true,
        dataset_records: state.repository.len(),
    })
}

/// Initialize logging.
///
/// `RUST_LOG` wins over `default_level`.
pub fn init_logging(default_level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())
            .expect("Failed to set tracing subscriber");
    } else {
        tracing::subscriber::set_global_default(builder.finish())
            .expect("Failed to set tracing subscriber");
    }
}

/// Load artifacts and run the server until it exits
pub async fn run_server(config: ApiConfig) -> anyhow::Result<()> {
    let metrics = PrometheusBuilder::new().install_recorder()?;

    let repository = SnapshotRepository::from_csv(&config.dataset_path)?;
    let bundle = ModelBundle::load(&config.models)?;
    let engine = ComparisonEngine::new(EnsemblePredictor::new(Arc::new(bundle)));

    let state = AppState::new(repository, engine)
        .with_config(&config)
        .with_metrics(metrics);
    let app = create_router(Arc::new(state));

    info!("Starting API server on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
