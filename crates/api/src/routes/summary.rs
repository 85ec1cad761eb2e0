//! Summary Routes

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::AppState;
use dataset::SummaryStats;

/// Dataset-wide counts with per-country and per-pollutant breakdowns
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<SummaryStats> {
    ::metrics::counter!("aqi_queries_total", "route" => "summary").increment(1);
    Json(state.dataset.summary().clone())
}
