//! Air Quality Anomaly API Server
//!
//! Read-only REST API over the enriched measurement snapshot. The dataset is
//! loaded and classified once at startup; handlers share it through an `Arc`
//! and never mutate it.

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use dataset::{CsvSource, EnrichedDataset, IqrClassifier, JsonSource, Normalizer};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

mod error;
mod routes;
pub mod settings;
pub mod telemetry;

pub use error::ServerError;
pub use routes::map_data::{MapDataQuery, MapDataResponse};
pub use settings::{DataFormat, DataSettings, LogSettings, QuerySettings, Settings};

/// Application state shared across handlers
pub struct AppState {
    /// Enriched snapshot, immutable after load
    pub dataset: EnrichedDataset,
    /// `/map-data` limits
    pub query: QuerySettings,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: Instant,
    /// Prometheus handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state
    pub fn new(dataset: EnrichedDataset, query: QuerySettings) -> Self {
        Self {
            dataset,
            query,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
            metrics: None,
        }
    }

    /// Expose `/metrics` through this handle
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub data_loaded: bool,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub records: usize,
    pub skipped_rows: usize,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/filters", get(routes::filters::get_filters))
        .route("/map-data", get(routes::map_data::get_map_data))
        .route("/summary", get(routes::summary::get_summary))
        .route("/metrics", get(routes::metrics::get_metrics))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "ok".to_string(),
        data_loaded: !state.dataset.is_empty(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        records: state.dataset.len(),
        skipped_rows: state.dataset.report().skipped_count(),
    })
}

/// Initialize logging
pub fn init_logging(settings: &LogSettings) -> Result<(), ServerError> {
    let level = settings.max_level()?;
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if settings.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Read and classify the configured dataset
pub fn load_dataset(settings: &Settings) -> Result<EnrichedDataset, ServerError> {
    let classifier = IqrClassifier::new(settings.classifier.clone())?;
    let normalizer = Normalizer::new(settings.validator()?);
    let path = &settings.data.path;
    let format = settings.data.format.resolve(path);

    info!(path = %path.display(), ?format, "Loading dataset");

    let dataset = match format {
        DataFormat::Json => {
            EnrichedDataset::load_with(JsonSource::open(path)?, &normalizer, &classifier)?
        }
        DataFormat::Csv | DataFormat::Auto => {
            let source = CsvSource::open(path)?.with_delimiter(settings.data.delimiter_byte()?);
            EnrichedDataset::load_with(source, &normalizer, &classifier)?
        }
    };

    telemetry::record_load(&dataset);
    Ok(dataset)
}

/// Load the dataset, then serve until shutdown
pub async fn run_server(
    settings: Settings,
    metrics: Option<PrometheusHandle>,
) -> Result<(), ServerError> {
    let dataset = load_dataset(&settings)?;

    let mut state = AppState::new(dataset, settings.query.clone());
    if let Some(handle) = metrics {
        state = state.with_metrics(handle);
    }
    let app = create_router(Arc::new(state));

    info!("Starting API server on {}", settings.server.bind_addr);

    let listener = tokio::net::TcpListener::bind(&settings.server.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
