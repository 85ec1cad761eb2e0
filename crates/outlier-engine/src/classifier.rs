//! IQR Outlier Classifier
//!
//! Each pollutant group is classified independently. A value is anomalous
//! when it falls strictly outside `[q1 - k·iqr, q3 + k·iqr]`; its score is
//! the distance beyond the nearest fence in units of IQR. Groups smaller
//! than `min_group_size` are left unclassified.

use crate::enriched::{Classification, EnrichedMeasurement};
use crate::error::ClassifierError;
use crate::partition::Partition;
use crate::statistics::IqrBounds;
use schema_normalizer::Measurement;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Fence distance in IQRs (default: 1.5)
    pub fence_multiplier: f64,
    /// Smallest group that gets classified (default: 4)
    pub min_group_size: usize,
    /// Score for values outside collapsed fences when IQR is zero (default: 1.0)
    pub degenerate_score: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            fence_multiplier: 1.5,
            min_group_size: 4,
            degenerate_score: 1.0,
        }
    }
}

/// Per-group fences retained after classification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupBounds {
    pub key: String,
    pub display: String,
    pub size: usize,
    /// `None` when the group was too small to classify
    pub bounds: Option<IqrBounds>,
    pub anomalies: usize,
}

/// Classified dataset in input order, plus the fences used
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    pub records: Vec<EnrichedMeasurement>,
    pub groups: Vec<GroupBounds>,
}

/// Interquartile-range outlier classifier
#[derive(Debug, Clone)]
pub struct IqrClassifier {
    config: ClassifierConfig,
}

impl IqrClassifier {
    /// Create a classifier, rejecting unusable parameters
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        if !config.fence_multiplier.is_finite() || config.fence_multiplier <= 0.0 {
            return Err(ClassifierError::InvalidParameter {
                name: "fence_multiplier",
                reason: format!("must be positive and finite, got {}", config.fence_multiplier),
            });
        }
        if config.min_group_size < 2 {
            return Err(ClassifierError::InvalidParameter {
                name: "min_group_size",
                reason: format!("must be at least 2, got {}", config.min_group_size),
            });
        }
        if !config.degenerate_score.is_finite() || config.degenerate_score < 0.0 {
            return Err(ClassifierError::InvalidParameter {
                name: "degenerate_score",
                reason: format!(
                    "must be non-negative and finite, got {}",
                    config.degenerate_score
                ),
            });
        }

        Ok(Self { config })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Fences for a group, `None` below the minimum group size or when the
    /// quartile spread is not representable
    pub fn fit(&self, values: &[f64]) -> Option<IqrBounds> {
        if values.len() < self.config.min_group_size {
            return None;
        }
        IqrBounds::compute(values, self.config.fence_multiplier).filter(|b| b.iqr.is_finite())
    }

    /// Classify one value against fitted fences
    pub fn classify_value(&self, bounds: &IqrBounds, value: f64) -> Classification {
        if bounds.contains(value) {
            return Classification::NORMAL;
        }

        let score = if bounds.iqr > 0.0 {
            bounds.excess(value) / bounds.iqr
        } else {
            self.config.degenerate_score
        };

        Classification {
            is_anomaly: true,
            score,
        }
    }

    /// Classify a whole group, in input order
    pub fn classify(&self, values: &[f64]) -> (Option<IqrBounds>, Vec<Classification>) {
        match self.fit(values) {
            Some(bounds) => {
                let labels = values
                    .iter()
                    .map(|&v| self.classify_value(&bounds, v))
                    .collect();
                (Some(bounds), labels)
            }
            None => (None, vec![Classification::NORMAL; values.len()]),
        }
    }

    /// Partition by pollutant and classify every group
    pub fn enrich(&self, measurements: Vec<Measurement>) -> Enrichment {
        let partition = Partition::build(&measurements);
        let mut labels = vec![Classification::NORMAL; measurements.len()];
        let mut groups = Vec::with_capacity(partition.len());

        for group in partition.groups() {
            let values = group.values(&measurements);
            let (bounds, group_labels) = self.classify(&values);

            let mut anomalies = 0;
            for (&idx, label) in group.members().iter().zip(group_labels) {
                anomalies += usize::from(label.is_anomaly);
                labels[idx] = label;
            }

            match &bounds {
                Some(b) => debug!(
                    pollutant = group.key(),
                    size = group.len(),
                    q1 = b.q1,
                    q3 = b.q3,
                    lower = b.lower,
                    upper = b.upper,
                    anomalies,
                    "Classified group"
                ),
                None if group.len() >= self.config.min_group_size => warn!(
                    pollutant = group.key(),
                    size = group.len(),
                    "Quartile spread overflows, group left unclassified"
                ),
                None => debug!(
                    pollutant = group.key(),
                    size = group.len(),
                    "Group below minimum size, left unclassified"
                ),
            }

            groups.push(GroupBounds {
                key: group.key().to_string(),
                display: group.display().to_string(),
                size: group.len(),
                bounds,
                anomalies,
            });
        }

        let records: Vec<EnrichedMeasurement> = measurements
            .into_iter()
            .zip(labels)
            .map(|(m, label)| EnrichedMeasurement::new(m, label))
            .collect();

        info!(
            records = records.len(),
            groups = groups.len(),
            anomalies = groups.iter().map(|g| g.anomalies).sum::<usize>(),
            "Classified measurements"
        );

        Enrichment { records, groups }
    }
}

impl Default for IqrClassifier {
    fn default() -> Self {
        Self {
            config: ClassifierConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(pollutant: &str, values: &[f64]) -> Vec<Measurement> {
        values.iter().map(|&v| Measurement::new(pollutant, v)).collect()
    }

    #[test]
    fn test_flags_single_spike() {
        let classifier = IqrClassifier::default();
        let (bounds, labels) = classifier.classify(&[10.0, 12.0, 11.0, 13.0, 12.0, 90.0]);

        let bounds = bounds.unwrap();
        assert!((bounds.upper - 15.0).abs() < 1e-12);
        let flagged: Vec<bool> = labels.iter().map(|l| l.is_anomaly).collect();
        assert_eq!(flagged, vec![false, false, false, false, false, true]);
        // (90 - 15) / 1.5
        assert!((labels[5].score - 50.0).abs() < 1e-9);
        assert!(labels[..5].iter().all(|l| l.score == 0.0));
    }

    #[test]
    fn test_small_group_unclassified() {
        let classifier = IqrClassifier::default();
        let (bounds, labels) = classifier.classify(&[1.0, 2.0, 1000.0]);
        assert!(bounds.is_none());
        assert!(labels.iter().all(|l| *l == Classification::NORMAL));
    }

    #[test]
    fn test_identical_values_never_flagged() {
        let classifier = IqrClassifier::default();
        let (bounds, labels) = classifier.classify(&[5.0; 5]);
        assert_eq!(bounds.unwrap().iqr, 0.0);
        assert!(labels.iter().all(|l| !l.is_anomaly));
    }

    #[test]
    fn test_degenerate_iqr_uses_sentinel_score() {
        let classifier = IqrClassifier::default();
        let (_, labels) = classifier.classify(&[5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 9.0]);
        assert!(labels[6].is_anomaly);
        assert_eq!(labels[6].score, 1.0);
        assert!(labels[..6].iter().all(|l| !l.is_anomaly));
    }

    #[test]
    fn test_overflowing_spread_left_unclassified() {
        let classifier = IqrClassifier::default();
        let values = [-1.7e308, -1.7e308, 1.7e308, 1.7e308, 1.7e308, 1.7e308];
        let (bounds, labels) = classifier.classify(&values);

        assert!(bounds.is_none());
        assert!(labels.iter().all(|l| *l == Classification::NORMAL));

        let enrichment = classifier.enrich(group("CO", &values));
        assert_eq!(enrichment.groups[0].anomalies, 0);
        assert!(enrichment.groups[0].bounds.is_none());
        assert!(enrichment.records.iter().all(|r| !r.is_anomaly()));
    }

    #[test]
    fn test_large_finite_spread_still_classified() {
        let classifier = IqrClassifier::default();
        let values = [-1e300, -1e300, 0.0, 1e300, 1e300, 1e300, 1e300];
        let (bounds, labels) = classifier.classify(&values);

        let bounds = bounds.unwrap();
        assert!(bounds.iqr.is_finite() && bounds.iqr > 0.0);
        assert!(bounds.q1 <= bounds.q3);
        assert!(labels.iter().all(|l| !l.is_anomaly));
    }

    #[test]
    fn test_negative_values_flag_low_side() {
        let classifier = IqrClassifier::default();
        let (_, labels) = classifier.classify(&[-1.0, -2.0, -1.5, -2.5, -1.0, -40.0]);
        assert!(labels[5].is_anomaly);
        assert!(labels[5].score > 0.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad_multiplier = ClassifierConfig {
            fence_multiplier: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            IqrClassifier::new(bad_multiplier),
            Err(ClassifierError::InvalidParameter { name: "fence_multiplier", .. })
        ));

        let bad_size = ClassifierConfig {
            min_group_size: 1,
            ..Default::default()
        };
        assert!(IqrClassifier::new(bad_size).is_err());

        let bad_score = ClassifierConfig {
            degenerate_score: f64::NAN,
            ..Default::default()
        };
        assert!(IqrClassifier::new(bad_score).is_err());
    }

    #[test]
    fn test_enrich_classifies_groups_independently() {
        let mut measurements = group("PM2.5", &[10.0, 12.0, 11.0, 13.0, 12.0, 90.0]);
        measurements.extend(group("NO2", &[90.0, 91.0, 89.0]));
        measurements.insert(2, Measurement::new("pm2.5", 11.5));

        let enrichment = IqrClassifier::default().enrich(measurements);

        assert_eq!(enrichment.records.len(), 10);
        // input order preserved
        assert_eq!(enrichment.records[2].value, 11.5);
        assert!(enrichment.records[6].is_anomaly());
        // NO2 group has 3 members, unclassified
        assert!(enrichment.records[7..].iter().all(|r| !r.is_anomaly()));

        let no2 = enrichment.groups.iter().find(|g| g.key == "NO2").unwrap();
        assert_eq!(no2.size, 3);
        assert!(no2.bounds.is_none());
        let pm = enrichment.groups.iter().find(|g| g.key == "PM2.5").unwrap();
        assert_eq!(pm.size, 7);
        assert_eq!(pm.display, "PM2.5");
        assert_eq!(pm.anomalies, 1);
    }

    #[test]
    fn test_enrich_empty() {
        let enrichment = IqrClassifier::default().enrich(Vec::new());
        assert!(enrichment.records.is_empty());
        assert!(enrichment.groups.is_empty());
    }
}
