//! Map Data Routes

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::AppState;
use dataset::{EnrichedMeasurement, QueryFilter, Selector};

/// Query parameters for the map endpoint
///
/// `country`, `city`, and `pollutant` accept a comma-separated list;
/// absent, blank, or `all` disables that filter.
#[derive(Debug, Default, Deserialize)]
pub struct MapDataQuery {
    pub country: Option<String>,
    pub city: Option<String>,
    pub pollutant: Option<String>,
    /// Only anomalous records
    #[serde(default)]
    pub only_anomalies: bool,
    /// Maximum number of records, capped by `query.max_limit`
    pub limit: Option<usize>,
    /// Drop records without a coordinate pair
    #[serde(default)]
    pub with_coordinates: bool,
}

impl MapDataQuery {
    /// Dataset filter for these parameters
    pub fn to_filter(&self) -> QueryFilter {
        QueryFilter::all()
            .with_country(Selector::parse(self.country.as_deref()))
            .with_city(Selector::parse(self.city.as_deref()))
            .with_pollutant(Selector::parse(self.pollutant.as_deref()))
            .with_anomalies_only(self.only_anomalies)
    }
}

/// Response for the map endpoint
#[derive(Debug, Serialize)]
pub struct MapDataResponse<'a> {
    /// Records returned
    pub count: usize,
    /// Records matching before the limit
    pub total_matched: usize,
    pub data: Vec<&'a EnrichedMeasurement>,
}

/// Filtered records in dataset order
pub async fn get_map_data(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MapDataQuery>,
) -> Response {
    ::metrics::counter!("aqi_queries_total", "route" => "map-data").increment(1);

    let limit = params
        .limit
        .unwrap_or(state.query.default_limit)
        .min(state.query.max_limit);

    let mut matched = state.dataset.query(&params.to_filter());
    if params.with_coordinates {
        matched.retain(|r| r.has_coordinates());
    }
    let total_matched = matched.len();
    matched.truncate(limit);

    debug!(?params, total_matched, returned = matched.len(), "Map data query");

    // Serialized here while the borrow of `state` is alive
    Json(MapDataResponse {
        count: matched.len(),
        total_matched,
        data: matched,
    })
    .into_response()
}
