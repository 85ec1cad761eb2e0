//! Pollutant Group Partitioning

use schema_normalizer::{pollutant_key, Measurement};
use std::collections::BTreeMap;

/// Measurements sharing a pollutant, held as indices into the source slice
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    key: String,
    display: String,
    members: Vec<usize>,
}

impl Group {
    /// Normalized pollutant key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Pollutant name as written by the group's first member
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Member indices in input order
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member values in input order
    pub fn values(&self, measurements: &[Measurement]) -> Vec<f64> {
        self.members.iter().map(|&idx| measurements[idx].value).collect()
    }
}

/// Pollutant key to group, iterated in key order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    groups: BTreeMap<String, Group>,
}

impl Partition {
    /// Partition measurements by normalized pollutant
    pub fn build(measurements: &[Measurement]) -> Self {
        let mut groups: BTreeMap<String, Group> = BTreeMap::new();

        for (idx, measurement) in measurements.iter().enumerate() {
            let key = pollutant_key(&measurement.pollutant);
            groups
                .entry(key.clone())
                .or_insert_with(|| Group {
                    key,
                    display: measurement.pollutant.clone(),
                    members: Vec::new(),
                })
                .members
                .push(idx);
        }

        Self { groups }
    }

    /// Look up a group by any spelling of its pollutant
    pub fn get(&self, pollutant: &str) -> Option<&Group> {
        self.groups.get(&pollutant_key(pollutant))
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
