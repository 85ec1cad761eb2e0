//! Filter Vocabulary Routes

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::AppState;
use dataset::FilterOptions;

/// Distinct countries, cities, and pollutants for dashboard dropdowns
pub async fn get_filters(State(state): State<Arc<AppState>>) -> Json<FilterOptions> {
    ::metrics::counter!("aqi_queries_total", "route" => "filters").increment(1);
    Json(state.dataset.filter_options().clone())
}
