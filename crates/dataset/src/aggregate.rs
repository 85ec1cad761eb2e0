//! Summary Statistics and Filter Vocabularies

use outlier_engine::{EnrichedMeasurement, ValueSummary};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Distinct filterable values, each sorted ascending
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub countries: Vec<String>,
    pub cities: Vec<String>,
    /// One entry per pollutant group, spelled as its first record
    pub pollutants: Vec<String>,
}

impl FilterOptions {
    pub fn from_records(records: &[EnrichedMeasurement]) -> Self {
        let countries: BTreeSet<&str> = records.iter().map(|r| r.country.as_str()).collect();
        let cities: BTreeSet<&str> = records.iter().map(|r| r.city.as_str()).collect();

        let mut pollutants: BTreeMap<String, &str> = BTreeMap::new();
        for record in records {
            pollutants
                .entry(record.pollutant_key())
                .or_insert(record.pollutant.as_str());
        }

        Self {
            countries: countries.into_iter().map(str::to_string).collect(),
            cities: cities.into_iter().map(str::to_string).collect(),
            pollutants: pollutants.into_values().map(str::to_string).collect(),
        }
    }
}

/// Value statistics for one country or pollutant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    pub name: String,
    #[serde(flatten)]
    pub values: ValueSummary,
    pub anomalies: usize,
}

/// Dataset-wide counts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_measurements: usize,
    /// Distinct country labels; the `Unknown` placeholder counts as one
    /// value when present, matching the `/filters` vocabulary
    pub distinct_countries: usize,
    /// Distinct city labels, `Unknown` included as for countries
    pub distinct_cities: usize,
    pub distinct_pollutants: usize,
    pub anomaly_count: usize,
    pub by_country: Vec<BreakdownRow>,
    pub by_pollutant: Vec<BreakdownRow>,
}

impl SummaryStats {
    pub fn from_records(records: &[EnrichedMeasurement]) -> Self {
        let by_country = breakdown(records, |r| (r.country.clone(), r.country.as_str()));
        let by_pollutant = breakdown(records, |r| (r.pollutant_key(), r.pollutant.as_str()));
        let distinct_cities = records
            .iter()
            .map(|r| r.city.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        Self {
            total_measurements: records.len(),
            distinct_countries: by_country.len(),
            distinct_cities,
            distinct_pollutants: by_pollutant.len(),
            anomaly_count: records.iter().filter(|r| r.is_anomaly()).count(),
            by_country,
            by_pollutant,
        }
    }
}

/// Group records by key; the first record of each key names the row
fn breakdown<'a, F>(records: &'a [EnrichedMeasurement], key_of: F) -> Vec<BreakdownRow>
where
    F: Fn(&'a EnrichedMeasurement) -> (String, &'a str),
{
    let mut buckets: BTreeMap<String, (&'a str, Vec<f64>, usize)> = BTreeMap::new();

    for record in records {
        let (key, name) = key_of(record);
        let bucket = buckets.entry(key).or_insert((name, Vec::new(), 0));
        bucket.1.push(record.value);
        bucket.2 += usize::from(record.is_anomaly());
    }

    buckets
        .into_values()
        .map(|(name, values, anomalies)| BreakdownRow {
            name: name.to_string(),
            values: ValueSummary::compute(&values),
            anomalies,
        })
        .collect()
}
