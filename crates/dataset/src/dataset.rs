//! Enriched Dataset Snapshot

use crate::aggregate::{FilterOptions, SummaryStats};
use crate::query::{self, QueryFilter};
use outlier_engine::{EnrichedMeasurement, Enrichment, GroupBounds, IqrClassifier};
use schema_normalizer::{DataSource, InputFormatError, NormalizedBatch, Normalizer, SkippedRow};
use std::time::Instant;
use tracing::info;

/// What happened during load
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Data rows in the raw source
    pub rows_read: usize,
    /// Rows that became measurements
    pub rows_kept: usize,
    /// Rows dropped by validation
    pub skipped: Vec<SkippedRow>,
    /// Pollutant groups found
    pub groups: usize,
    /// Groups large enough to classify
    pub classified_groups: usize,
}

impl LoadReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Immutable result of the load pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedDataset {
    records: Vec<EnrichedMeasurement>,
    groups: Vec<GroupBounds>,
    filter_options: FilterOptions,
    summary: SummaryStats,
    report: LoadReport,
}

impl EnrichedDataset {
    /// Load with the default normalizer and classifier
    pub fn load<S: DataSource>(source: S) -> Result<Self, InputFormatError> {
        Self::load_with(source, &Normalizer::default(), &IqrClassifier::default())
    }

    /// Read, normalize, partition, and classify a raw source
    pub fn load_with<S: DataSource>(
        source: S,
        normalizer: &Normalizer,
        classifier: &IqrClassifier,
    ) -> Result<Self, InputFormatError> {
        let started = Instant::now();
        let table = source.read_table()?;
        let batch = normalizer.normalize(&table);
        let dataset = Self::from_batch(batch, classifier);

        info!(
            records = dataset.len(),
            skipped = dataset.report.skipped_count(),
            anomalies = dataset.summary.anomaly_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Dataset loaded"
        );
        Ok(dataset)
    }

    /// Classify an already normalized batch
    pub fn from_batch(batch: NormalizedBatch, classifier: &IqrClassifier) -> Self {
        let NormalizedBatch {
            measurements,
            skipped,
            rows_read,
        } = batch;
        let rows_kept = measurements.len();

        let Enrichment { records, groups } = classifier.enrich(measurements);
        let filter_options = FilterOptions::from_records(&records);
        let summary = SummaryStats::from_records(&records);
        let report = LoadReport {
            rows_read,
            rows_kept,
            skipped,
            groups: groups.len(),
            classified_groups: groups.iter().filter(|g| g.bounds.is_some()).count(),
        };

        Self {
            records,
            groups,
            filter_options,
            summary,
            report,
        }
    }

    /// Distinct countries, cities, and pollutants
    pub fn filter_options(&self) -> &FilterOptions {
        &self.filter_options
    }

    pub fn summary(&self) -> &SummaryStats {
        &self.summary
    }

    /// Records matching the filter, in load order
    pub fn query(&self, filter: &QueryFilter) -> Vec<&EnrichedMeasurement> {
        query::query(&self.records, filter)
    }

    /// All records, in load order
    pub fn records(&self) -> &[EnrichedMeasurement] {
        &self.records
    }

    /// Fences per pollutant group
    pub fn groups(&self) -> &[GroupBounds] {
        &self.groups
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
