//! Row Normalization
//!
//! Turns each raw row into zero or one [`Measurement`]. Rows failing
//! validation are recorded as [`SkippedRow`]s and logged as warnings.

use crate::alias::{CanonicalField, ColumnMap};
use crate::error::ValidationError;
use crate::measurement::{Measurement, UNKNOWN, UNKNOWN_SOURCE};
use crate::source::RawTable;
use crate::validator::Validator;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::{debug, info, warn};

/// A row dropped during normalization
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// Zero-based data row index (header excluded)
    pub row: usize,
    pub reason: ValidationError,
}

/// Output of normalizing one table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedBatch {
    pub measurements: Vec<Measurement>,
    pub skipped: Vec<SkippedRow>,
    pub rows_read: usize,
}

impl NormalizedBatch {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Maps raw rows onto the canonical measurement shape
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    validator: Validator,
}

impl Normalizer {
    pub fn new(validator: Validator) -> Self {
        Self { validator }
    }

    /// Normalize every row of a table
    pub fn normalize(&self, table: &RawTable) -> NormalizedBatch {
        let columns = ColumnMap::resolve(table.headers());

        for field in CanonicalField::ALL.into_iter().filter(|f| f.is_required()) {
            if !columns.is_mapped(field) {
                warn!(
                    field = field.name(),
                    headers = ?table.headers(),
                    "No column matches required field, every row will be skipped"
                );
            }
        }

        let mut batch = NormalizedBatch {
            rows_read: table.len(),
            ..Default::default()
        };

        for (row, cells) in table.rows().enumerate() {
            match self.normalize_row(&columns, cells) {
                Ok(measurement) => batch.measurements.push(measurement),
                Err(reason) => {
                    warn!(row, %reason, "Skipping row");
                    batch.skipped.push(SkippedRow { row, reason });
                }
            }
        }

        info!(
            rows = batch.rows_read,
            kept = batch.measurements.len(),
            skipped = batch.skipped_count(),
            "Normalized raw table"
        );
        batch
    }

    /// Normalize a single row against resolved columns
    pub fn normalize_row(
        &self,
        columns: &ColumnMap,
        row: &[Option<String>],
    ) -> Result<Measurement, ValidationError> {
        let text = |field: CanonicalField| columns.lookup(field, row).map(str::to_string);

        let pollutant = self
            .validator
            .require_pollutant(columns.lookup(CanonicalField::Pollutant, row))?;
        let value = self
            .validator
            .require_value(columns.lookup(CanonicalField::Value, row))?;
        let coordinates = self.validator.coordinates(
            columns.lookup(CanonicalField::Latitude, row),
            columns.lookup(CanonicalField::Longitude, row),
        )?;

        let timestamp = columns
            .lookup(CanonicalField::Timestamp, row)
            .and_then(|raw| {
                let parsed = parse_timestamp(raw);
                if parsed.is_none() {
                    debug!(raw, "Unrecognized timestamp format");
                }
                parsed
            });

        Ok(Measurement {
            pollutant: pollutant.to_string(),
            value,
            latitude: coordinates.map(|(lat, _)| lat),
            longitude: coordinates.map(|(_, lon)| lon),
            country: text(CanonicalField::Country).unwrap_or_else(|| UNKNOWN.to_string()),
            country_code: text(CanonicalField::CountryCode),
            city: text(CanonicalField::City).unwrap_or_else(|| UNKNOWN.to_string()),
            location: text(CanonicalField::Location),
            unit: text(CanonicalField::Unit),
            source_name: text(CanonicalField::SourceName)
                .unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
            timestamp,
        })
    }
}

/// Parse the timestamp formats seen in air-quality exports. Naive values are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
