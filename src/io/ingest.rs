//! CSV ingest for batch scoring.
//!
//! Each CSV row becomes a JSON payload of string cells and is later run through
//! the same validator as a single request, so batch and single scoring accept
//! exactly the same inputs.
//!
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level errors** for unparseable CSV records (skip, but report)
//! - empty cells are treated as missing fields

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use serde_json::{Map, Value};

use crate::domain::FEATURE_NAMES;
use crate::error::AppError;

/// A CSV record that could not be read at all.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// One CSV row ready for the validator.
#[derive(Debug, Clone)]
pub struct IngestRow {
    pub line: usize,
    /// `id` column when present, else `line-<n>`.
    pub id: String,
    pub payload: Value,
}

#[derive(Debug, Clone)]
pub struct IngestedApplications {
    pub rows: Vec<IngestRow>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

impl IngestedApplications {
    pub fn payloads(&self) -> Vec<Value> {
        self.rows.iter().map(|r| r.payload.clone()).collect()
    }
}

pub fn load_applications(path: &Path) -> Result<IngestedApplications, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_applications(file)
}

pub fn read_applications<R: Read>(reader: R) -> Result<IngestedApplications, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        rows_read += 1;

        match result {
            Ok(record) => rows.push(IngestRow {
                line,
                id: get_cell(&record, &header_map, "id")
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("line-{line}")),
                payload: row_payload(&record, &header_map),
            }),
            Err(e) => row_errors.push(RowError {
                line,
                message: format!("CSV parse error: {e}"),
            }),
        }
    }

    Ok(IngestedApplications {
        rows,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    let missing: Vec<&str> = FEATURE_NAMES
        .iter()
        .copied()
        .filter(|name| !header_map.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::new(
            2,
            format!("Missing required column(s): `{}`", missing.join("`, `")),
        ));
    }
    Ok(())
}

fn get_cell<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = *header_map.get(name)?;
    record.get(idx).filter(|s| !s.is_empty())
}

fn row_payload(record: &StringRecord, header_map: &HashMap<String, usize>) -> Value {
    let mut obj = Map::new();
    for name in FEATURE_NAMES {
        if let Some(cell) = get_cell(record, header_map, name) {
            obj.insert(name.to_string(), Value::String(cell.to_string()));
        }
    }
    Value::Object(obj)
}
