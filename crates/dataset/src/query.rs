//! Filtered Views
//!
//! Criteria combine with logical AND. Results keep dataset order.

use outlier_engine::EnrichedMeasurement;
use schema_normalizer::pollutant_key;

/// Constraint on one field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selector {
    /// No constraint
    #[default]
    All,
    /// Field must equal one of the values
    AnyOf(Vec<String>),
}

impl Selector {
    /// Single exact value
    pub fn exact(value: impl Into<String>) -> Self {
        Selector::AnyOf(vec![value.into()])
    }

    /// Parse a request parameter: absent, blank, or `all` mean no
    /// constraint, otherwise a comma-separated list of values
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Selector::All;
        };

        let values: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();

        if values.is_empty() || values.iter().any(|v| v.eq_ignore_ascii_case("all")) {
            Selector::All
        } else {
            Selector::AnyOf(values)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }

    /// Exact comparison
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selector::All => true,
            Selector::AnyOf(values) => values.iter().any(|v| v == value),
        }
    }

    /// Comparison after normalizing both sides
    fn matches_normalized(&self, value: &str, normalize: fn(&str) -> String) -> bool {
        match self {
            Selector::All => true,
            Selector::AnyOf(values) => {
                let value = normalize(value);
                values.iter().any(|v| normalize(v) == value)
            }
        }
    }
}

/// Query criteria for the enriched dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilter {
    pub country: Selector,
    pub city: Selector,
    /// Compared by pollutant key, so any casing selects the whole group
    pub pollutant: Selector,
    pub anomalies_only: bool,
}

impl QueryFilter {
    /// Filter that matches everything
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_country(mut self, country: Selector) -> Self {
        self.country = country;
        self
    }

    pub fn with_city(mut self, city: Selector) -> Self {
        self.city = city;
        self
    }

    pub fn with_pollutant(mut self, pollutant: Selector) -> Self {
        self.pollutant = pollutant;
        self
    }

    pub fn with_anomalies_only(mut self, anomalies_only: bool) -> Self {
        self.anomalies_only = anomalies_only;
        self
    }

    /// Whether a record satisfies every criterion
    pub fn matches(&self, record: &EnrichedMeasurement) -> bool {
        (!self.anomalies_only || record.is_anomaly())
            && self.country.matches(&record.country)
            && self.city.matches(&record.city)
            && self.pollutant.matches_normalized(&record.pollutant, pollutant_key)
    }
}

/// Records matching the filter, in dataset order
pub fn query<'a>(
    records: &'a [EnrichedMeasurement],
    filter: &QueryFilter,
) -> Vec<&'a EnrichedMeasurement> {
    records.iter().filter(|r| filter.matches(r)).collect()
}
