//! Prometheus Metrics
//!
//! Load-time gauges plus a per-route query counter
//! (`aqi_queries_total{route}`), rendered at `/metrics`.

use dataset::EnrichedDataset;
use metrics::{counter, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Publish load outcome
pub fn record_load(dataset: &EnrichedDataset) {
    let report = dataset.report();

    gauge!("aqi_rows_loaded").set(report.rows_kept as f64);
    counter!("aqi_rows_skipped_total").increment(report.skipped_count() as u64);
    gauge!("aqi_anomalies").set(dataset.summary().anomaly_count as f64);
    gauge!("aqi_pollutant_groups").set(report.groups as f64);
    gauge!("aqi_classified_groups").set(report.classified_groups as f64);
}
