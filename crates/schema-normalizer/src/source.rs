//! Raw Table and Data Sources
//!
//! Every source is reduced to a [`RawTable`] of named columns and optional
//! string cells before normalization begins.

use crate::error::InputFormatError;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Rows of optional string cells under a header row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Create an empty table with the given headers
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Cells are trimmed, blank cells become `None`, and the
    /// row is padded or truncated to the header width.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let width = self.headers.len();
        let mut row: Vec<Option<String>> = cells
            .into_iter()
            .take(width)
            .map(|cell| cell.and_then(|c| clean_cell(c.as_ref())))
            .collect();
        row.resize(width, None);
        self.rows.push(row);
    }

    /// Builder-style [`RawTable::push_row`]
    pub fn with_row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        self.push_row(cells);
        self
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<String>]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn clean_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Anything that can be read into a [`RawTable`]
pub trait DataSource {
    fn read_table(self) -> Result<RawTable, InputFormatError>;
}

impl DataSource for RawTable {
    fn read_table(self) -> Result<RawTable, InputFormatError> {
        Ok(self)
    }
}

/// CSV reader over any byte stream
pub struct CsvSource<R> {
    reader: R,
    delimiter: u8,
}

impl<R: Read> CsvSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            delimiter: b',',
        }
    }

    /// Use a delimiter other than `,`
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl CsvSource<BufReader<File>> {
    /// Open a CSV file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, InputFormatError> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> DataSource for CsvSource<R> {
    fn read_table(self) -> Result<RawTable, InputFormatError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(self.reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(InputFormatError::NotTabular("missing header row".to_string()));
        }

        let mut table = RawTable::new(headers);
        for result in reader.records() {
            let record = result?;
            table.push_row(record.iter().map(Some));
        }

        debug!(
            columns = table.headers().len(),
            rows = table.len(),
            "Read CSV table"
        );
        Ok(table)
    }
}

/// JSON array of flat objects
pub struct JsonSource {
    value: Value,
}

impl JsonSource {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Parse JSON from any byte stream
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, InputFormatError> {
        serde_json::from_reader(reader)
            .map(Self::new)
            .map_err(|e| InputFormatError::Json(e.to_string()))
    }

    /// Open a JSON file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, InputFormatError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }
}

impl DataSource for JsonSource {
    fn read_table(self) -> Result<RawTable, InputFormatError> {
        let Value::Array(items) = self.value else {
            return Err(InputFormatError::NotTabular(
                "expected a JSON array of records".to_string(),
            ));
        };

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match item {
                Value::Object(map) => records.push(map),
                other => {
                    return Err(InputFormatError::NotTabular(format!(
                        "record {index} is {}, not an object",
                        kind(&other)
                    )))
                }
            }
        }

        // Union of keys across records, first-seen order
        let mut headers: Vec<String> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for record in &records {
            for key in record.keys() {
                if !positions.contains_key(key) {
                    positions.insert(key.clone(), headers.len());
                    headers.push(key.clone());
                }
            }
        }
        if headers.is_empty() && !records.is_empty() {
            return Err(InputFormatError::NotTabular(
                "records have no fields".to_string(),
            ));
        }

        let width = headers.len();
        let mut table = RawTable::new(headers);
        let mut nested_cells = 0usize;
        for record in records {
            let mut cells: Vec<Option<String>> = vec![None; width];
            for (key, value) in record {
                if let Some(&position) = positions.get(&key) {
                    if matches!(value, Value::Array(_) | Value::Object(_)) {
                        nested_cells += 1;
                    }
                    cells[position] = json_cell(value);
                }
            }
            table.push_row(cells);
        }

        debug!(
            columns = width,
            rows = table.len(),
            nested_cells,
            "Read JSON table"
        );
        Ok(table)
    }
}

/// Scalar cell text; nested arrays and objects read as empty
fn json_cell(value: Value) -> Option<String> {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_push_row_pads_and_cleans() {
        let mut table = RawTable::new(["a", "b", "c"]);
        table.push_row([Some(" 1 "), Some("   ")]);

        let row = table.rows().next().unwrap();
        assert_eq!(row, &[Some("1".to_string()), None, None]);
    }

    #[test]
    fn test_push_row_truncates_extra_cells() {
        let mut table = RawTable::new(["a"]);
        table.push_row([Some("1"), Some("2")]);
        assert_eq!(table.rows().next().unwrap().len(), 1);
    }

    #[test]
    fn test_csv_source_reads_ragged_rows() {
        let data = "pollutant,value,city\nPM2.5,12.5,Delhi\nNO2,30\n";
        let table = CsvSource::new(data.as_bytes()).read_table().unwrap();

        assert_eq!(table.headers(), &["pollutant", "value", "city"]);
        assert_eq!(table.len(), 2);
        let second: Vec<_> = table.rows().nth(1).unwrap().to_vec();
        assert_eq!(second[2], None);
    }

    #[test]
    fn test_csv_source_with_delimiter() {
        let data = "pollutant;value\nO3;0.04\n";
        let table = CsvSource::new(data.as_bytes())
            .with_delimiter(b';')
            .read_table()
            .unwrap();
        assert_eq!(table.headers(), &["pollutant", "value"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_csv_source_empty_input_is_not_tabular() {
        let err = CsvSource::new("".as_bytes()).read_table().unwrap_err();
        assert!(matches!(err, InputFormatError::NotTabular(_)));
    }

    #[test]
    fn test_csv_source_rejects_invalid_utf8() {
        let data: &[u8] = b"pollutant,value\nPM10,\xff\xfe\n";
        let err = CsvSource::new(data).read_table().unwrap_err();
        assert!(matches!(err, InputFormatError::Csv(_)));
    }

    #[test]
    fn test_csv_source_open_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "parameter,concentration").unwrap();
        writeln!(file, "SO2,4.2").unwrap();

        let table = CsvSource::open(file.path()).unwrap().read_table().unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_csv_source_missing_file() {
        let result = CsvSource::open("/nonexistent/aqi.csv");
        assert!(matches!(result, Err(InputFormatError::Io(_))));
    }

    #[test]
    fn test_json_source_unions_heterogeneous_keys() {
        let value = json!([
            {"pollutant": "PM10", "value": 20, "lat": 10.5},
            {"pollutant": "PM10", "value": 22.5, "latitude": "11", "valid": true},
            {"pollutant": null, "value": 1}
        ]);
        let table = JsonSource::new(value).read_table().unwrap();

        assert_eq!(table.len(), 3);
        assert!(table.headers().contains(&"lat".to_string()));
        assert!(table.headers().contains(&"latitude".to_string()));

        let value_idx = table.headers().iter().position(|h| h == "value").unwrap();
        let valid_idx = table.headers().iter().position(|h| h == "valid").unwrap();
        let pollutant_idx = table.headers().iter().position(|h| h == "pollutant").unwrap();
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0][value_idx].as_deref(), Some("20"));
        assert_eq!(rows[1][valid_idx].as_deref(), Some("true"));
        assert_eq!(rows[0][valid_idx], None);
        assert_eq!(rows[2][pollutant_idx], None);
    }

    #[test]
    fn test_json_source_rejects_non_array() {
        let err = JsonSource::new(json!({"pollutant": "PM10"}))
            .read_table()
            .unwrap_err();
        assert!(matches!(err, InputFormatError::NotTabular(_)));
    }

    #[test]
    fn test_json_source_nested_cells_read_as_empty() {
        let table = JsonSource::new(json!([
            {"pollutant": "PM10", "value": [1, 2]},
            {"pollutant": "PM10", "value": 3, "meta": {"qc": "ok"}}
        ]))
        .read_table()
        .unwrap();

        let value_idx = table.headers().iter().position(|h| h == "value").unwrap();
        let meta_idx = table.headers().iter().position(|h| h == "meta").unwrap();
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(table.len(), 2);
        assert_eq!(rows[0][value_idx], None);
        assert_eq!(rows[1][value_idx].as_deref(), Some("3"));
        assert_eq!(rows[1][meta_idx], None);
    }

    #[test]
    fn test_json_source_rejects_non_object_records() {
        let err = JsonSource::new(json!([{"pollutant": "PM10"}, 42]))
            .read_table()
            .unwrap_err();
        match err {
            InputFormatError::NotTabular(message) => {
                assert_eq!(message, "record 1 is a number, not an object")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_json_source_empty_array_is_empty_table() {
        let table = JsonSource::new(json!([])).read_table().unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_json_source_malformed_text() {
        let result = JsonSource::from_reader("[{\"value\": ".as_bytes());
        assert!(matches!(result, Err(InputFormatError::Json(_))));
    }
}
