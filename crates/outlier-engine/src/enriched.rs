//! Classified Measurement

use schema_normalizer::Measurement;
use serde::Serialize;
use std::ops::Deref;

/// Outcome of classifying one value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub is_anomaly: bool,
    pub score: f64,
}

impl Classification {
    /// Not anomalous, zero score
    pub const NORMAL: Classification = Classification {
        is_anomaly: false,
        score: 0.0,
    };
}

/// A measurement with its anomaly label.
///
/// The label is fixed at construction by the classifier and only readable
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedMeasurement {
    #[serde(flatten)]
    measurement: Measurement,
    is_anomaly: bool,
    anomaly_score: f64,
}

impl EnrichedMeasurement {
    pub(crate) fn new(measurement: Measurement, classification: Classification) -> Self {
        Self {
            measurement,
            is_anomaly: classification.is_anomaly,
            anomaly_score: classification.score,
        }
    }

    pub fn measurement(&self) -> &Measurement {
        &self.measurement
    }

    pub fn is_anomaly(&self) -> bool {
        self.is_anomaly
    }

    pub fn anomaly_score(&self) -> f64 {
        self.anomaly_score
    }
}

impl Deref for EnrichedMeasurement {
    type Target = Measurement;

    fn deref(&self) -> &Measurement {
        &self.measurement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_flat_record() {
        let record = EnrichedMeasurement::new(
            Measurement::new("NO2", 88.0).with_coordinates(51.5, -0.12),
            Classification {
                is_anomaly: true,
                score: 2.5,
            },
        );
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["pollutant"], "NO2");
        assert_eq!(json["value"], 88.0);
        assert_eq!(json["lat"], 51.5);
        assert_eq!(json["lon"], -0.12);
        assert_eq!(json["is_anomaly"], true);
        assert_eq!(json["anomaly_score"], 2.5);
        assert!(json.get("measurement").is_none());
    }

    #[test]
    fn test_deref_exposes_fields() {
        let record = EnrichedMeasurement::new(Measurement::new("CO", 0.4), Classification::NORMAL);
        assert_eq!(record.pollutant, "CO");
        assert!(!record.is_anomaly());
        assert_eq!(record.anomaly_score(), 0.0);
    }
}
