//! Service Configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! file (`AQI_CONFIG`, or `aqi.toml` in the working directory), then
//! `AQI__SECTION__KEY` environment variables.

use crate::ServerError;
use config::{Config, ConfigError, Environment, File};
use dataset::{ClassifierConfig, ValidationConfig, Validator};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::Level;

/// Top-level settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub data: DataSettings,
    pub query: QuerySettings,
    pub classifier: ClassifierConfig,
    /// Coordinate ranges; rows outside them are skipped
    #[serde(default)]
    pub validation: ValidationConfig,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Listen address, e.g. `0.0.0.0:8000`
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    /// Raw dataset location
    pub path: PathBuf,
    pub format: DataFormat,
    /// CSV field separator
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_delimiter() -> char {
    ','
}

impl DataSettings {
    /// Delimiter as a byte; must be a single ASCII character
    pub fn delimiter_byte(&self) -> Result<u8, ServerError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| ServerError::InvalidSetting {
                name: "data.delimiter",
                reason: format!("{:?} is not a single ASCII character", self.delimiter),
            })
    }
}

/// Raw dataset encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    /// Pick from the file extension
    Auto,
    Csv,
    Json,
}

impl DataFormat {
    /// Concrete format for a path; `Auto` picks JSON for `.json`, CSV otherwise
    pub fn resolve(self, path: &Path) -> DataFormat {
        match self {
            DataFormat::Auto => {
                let is_json = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
                if is_json {
                    DataFormat::Json
                } else {
                    DataFormat::Csv
                }
            }
            other => other,
        }
    }
}

/// Limits for `/map-data`
#[derive(Debug, Clone, Deserialize)]
pub struct QuerySettings {
    /// Records returned when the request has no `limit`
    pub default_limit: usize,
    /// Upper cap on any requested `limit`
    pub max_limit: usize,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            default_limit: 10_000,
            max_limit: 50_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// trace, debug, info, warn, or error
    pub level: String,
    /// Emit JSON lines instead of text
    pub json: bool,
}

impl LogSettings {
    /// Parsed `level`; an unknown name is a configuration error
    pub fn max_level(&self) -> Result<Level, ServerError> {
        self.level
            .trim()
            .parse::<Level>()
            .map_err(|err| ServerError::LogLevel {
                level: self.level.clone(),
                reason: err.to_string(),
            })
    }
}

impl Settings {
    /// Row validator from the `validation` section
    pub fn validator(&self) -> Result<Validator, ServerError> {
        let ranges = [
            ("validation.latitude_range", self.validation.latitude_range),
            ("validation.longitude_range", self.validation.longitude_range),
        ];
        for (name, (min, max)) in ranges {
            if !(min.is_finite() && max.is_finite() && min <= max) {
                return Err(ServerError::InvalidSetting {
                    name,
                    reason: format!("expected finite [min, max], got [{min}, {max}]"),
                });
            }
        }
        Ok(Validator::new(self.validation.clone()))
    }

    /// Load from `AQI_CONFIG` (if set), `aqi.toml`, and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("AQI_CONFIG").ok();
        Self::load_from(path.as_deref())
    }

    /// Load with an explicit config file, which must then exist
    pub fn load_from(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name("aqi").required(false),
        };

        Config::builder()
            .set_default("server.bind_addr", "0.0.0.0:8000")?
            .set_default("data.path", "preprocessed_openaq_ready.csv")?
            .set_default("data.format", "auto")?
            .set_default("query.default_limit", 10_000_i64)?
            .set_default("query.max_limit", 50_000_i64)?
            .set_default("classifier.fence_multiplier", 1.5)?
            .set_default("classifier.min_group_size", 4_i64)?
            .set_default("classifier.degenerate_score", 1.0)?
            .set_default("log.level", "info")?
            .set_default("log.json", false)?
            .add_source(file)
            .add_source(
                Environment::with_prefix("AQI")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
