//! Column Alias Table
//!
//! Maps the many spellings of a logical column onto one canonical field.
//! Headers are compared after trimming, lowercasing, and collapsing
//! whitespace runs to `_`, so `" Last Updated "` matches `last_updated`.

/// Logical fields of a measurement row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalField {
    Pollutant,
    Value,
    Latitude,
    Longitude,
    Country,
    CountryCode,
    City,
    Location,
    Unit,
    SourceName,
    Timestamp,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 11] = [
        CanonicalField::Pollutant,
        CanonicalField::Value,
        CanonicalField::Latitude,
        CanonicalField::Longitude,
        CanonicalField::Country,
        CanonicalField::CountryCode,
        CanonicalField::City,
        CanonicalField::Location,
        CanonicalField::Unit,
        CanonicalField::SourceName,
        CanonicalField::Timestamp,
    ];

    /// Canonical field name
    pub fn name(self) -> &'static str {
        match self {
            CanonicalField::Pollutant => "pollutant",
            CanonicalField::Value => "value",
            CanonicalField::Latitude => "latitude",
            CanonicalField::Longitude => "longitude",
            CanonicalField::Country => "country",
            CanonicalField::CountryCode => "country_code",
            CanonicalField::City => "city",
            CanonicalField::Location => "location",
            CanonicalField::Unit => "unit",
            CanonicalField::SourceName => "source_name",
            CanonicalField::Timestamp => "timestamp",
        }
    }

    /// Accepted header spellings, highest priority first
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            CanonicalField::Pollutant => &["pollutant", "parameter"],
            CanonicalField::Value => &["value", "concentration"],
            CanonicalField::Latitude => &["latitude", "lat"],
            CanonicalField::Longitude => &["longitude", "lon", "lng"],
            CanonicalField::Country => &["country_label", "country"],
            CanonicalField::CountryCode => &["country_code", "countrycode", "code"],
            CanonicalField::City => &["city"],
            CanonicalField::Location => &["location", "station", "site"],
            CanonicalField::Unit => &["unit"],
            CanonicalField::SourceName => &["source_name", "sourcename", "source"],
            CanonicalField::Timestamp => &["last_updated", "date_local", "date", "timestamp"],
        }
    }

    /// Rows without this field are dropped
    pub fn is_required(self) -> bool {
        matches!(self, CanonicalField::Pollutant | CanonicalField::Value)
    }
}

/// Canonical form of a raw header
pub fn canonical_header(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Candidate column indices for each canonical field, resolved once per table
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    candidates: [Vec<usize>; 11],
}

impl ColumnMap {
    /// Resolve headers against the alias table
    pub fn resolve(headers: &[String]) -> Self {
        let canonical: Vec<String> = headers.iter().map(|h| canonical_header(h)).collect();
        let mut map = Self::default();

        for field in CanonicalField::ALL {
            let slot = &mut map.candidates[field as usize];
            for alias in field.aliases() {
                slot.extend(
                    canonical
                        .iter()
                        .enumerate()
                        .filter(|(_, header)| header.as_str() == *alias)
                        .map(|(idx, _)| idx),
                );
            }
        }

        map
    }

    /// Column indices for a field, in alias priority order
    pub fn candidates(&self, field: CanonicalField) -> &[usize] {
        &self.candidates[field as usize]
    }

    /// Whether any column maps to the field
    pub fn is_mapped(&self, field: CanonicalField) -> bool {
        !self.candidates(field).is_empty()
    }

    /// First non-empty cell for the field in this row
    pub fn lookup<'r>(&self, field: CanonicalField, row: &'r [Option<String>]) -> Option<&'r str> {
        self.candidates(field)
            .iter()
            .find_map(|&idx| row.get(idx).and_then(|cell| cell.as_deref()))
    }
}
