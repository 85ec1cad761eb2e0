//! Field Validation and Range Checking

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Latitude valid range (degrees)
    pub latitude_range: (f64, f64),
    /// Longitude valid range (degrees)
    pub longitude_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            latitude_range: (-90.0, 90.0),
            longitude_range: (-180.0, 180.0),
        }
    }
}

/// Validator for the fields of a raw measurement row
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Parse a finite number
    pub fn parse_number(&self, field: &'static str, raw: &str) -> Result<f64, ValidationError> {
        let value: f64 = raw.trim().parse().map_err(|_| ValidationError::InvalidNumber {
            field,
            raw: raw.to_string(),
        })?;

        if value.is_finite() {
            Ok(value)
        } else {
            Err(ValidationError::NonFinite { field, value })
        }
    }

    /// Required pollutant name, trimmed
    pub fn require_pollutant<'a>(&self, raw: Option<&'a str>) -> Result<&'a str, ValidationError> {
        raw.map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(ValidationError::MissingField("pollutant"))
    }

    /// Required concentration value
    pub fn require_value(&self, raw: Option<&str>) -> Result<f64, ValidationError> {
        let raw = raw.ok_or(ValidationError::MissingField("value"))?;
        self.parse_number("value", raw)
    }

    /// Validate latitude
    pub fn validate_latitude(&self, latitude: f64) -> Result<(), ValidationError> {
        self.validate_range("latitude", latitude, self.config.latitude_range)
    }

    /// Validate longitude
    pub fn validate_longitude(&self, longitude: f64) -> Result<(), ValidationError> {
        self.validate_range("longitude", longitude, self.config.longitude_range)
    }

    /// Optional coordinate pair.
    ///
    /// Missing or unparseable halves yield `Ok(None)`. A pair that parses but is
    /// non-finite or out of range rejects the row.
    pub fn coordinates(
        &self,
        latitude: Option<&str>,
        longitude: Option<&str>,
    ) -> Result<Option<(f64, f64)>, ValidationError> {
        let (Some(lat_raw), Some(lon_raw)) = (latitude, longitude) else {
            return Ok(None);
        };
        let (Ok(lat), Ok(lon)) = (lat_raw.trim().parse::<f64>(), lon_raw.trim().parse::<f64>())
        else {
            return Ok(None);
        };

        if !lat.is_finite() {
            return Err(ValidationError::NonFinite { field: "latitude", value: lat });
        }
        if !lon.is_finite() {
            return Err(ValidationError::NonFinite { field: "longitude", value: lon });
        }
        self.validate_latitude(lat)?;
        self.validate_longitude(lon)?;

        Ok(Some((lat, lon)))
    }
}
