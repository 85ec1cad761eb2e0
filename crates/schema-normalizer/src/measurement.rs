//! Canonical Measurement Record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel for absent country and city
pub const UNKNOWN: &str = "Unknown";

/// Sentinel for absent data provider
pub const UNKNOWN_SOURCE: &str = "Unknown Source";

/// One normalized input row. `pollutant` and `value` are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Pollutant name as written in the source, trimmed
    pub pollutant: String,
    /// Concentration, always finite
    pub value: f64,
    #[serde(rename = "lat")]
    pub latitude: Option<f64>,
    #[serde(rename = "lon")]
    pub longitude: Option<f64>,
    pub country: String,
    pub country_code: Option<String>,
    pub city: String,
    /// Station or site name
    pub location: Option<String>,
    pub unit: Option<String>,
    pub source_name: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Measurement {
    /// Create a measurement with every optional field absent
    pub fn new(pollutant: impl Into<String>, value: f64) -> Self {
        Self {
            pollutant: pollutant.into(),
            value,
            latitude: None,
            longitude: None,
            country: UNKNOWN.to_string(),
            country_code: None,
            city: UNKNOWN.to_string(),
            location: None,
            unit: None,
            source_name: UNKNOWN_SOURCE.to_string(),
            timestamp: None,
        }
    }

    /// Set country
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Set city
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    /// Set coordinates
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Partition key of this measurement's pollutant
    pub fn pollutant_key(&self) -> String {
        pollutant_key(&self.pollutant)
    }

    /// Whether the record can be placed on a map
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Normalize a pollutant name for grouping and comparison
pub fn pollutant_key(raw: &str) -> String {
    raw.trim().to_uppercase()
}
