//! JSON / JSON Lines exports.

use std::path::PathBuf;

use serde_json::Value;

use super::RecordSource;
use crate::error::SourceError;
use crate::models::{FieldValue, Record};

/// Reads rows from a JSON array of objects or from JSON Lines.
#[derive(Debug, Clone)]
pub struct JsonRecordSource {
    path: PathBuf,
}

impl JsonRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for JsonRecordSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<Record>, SourceError> {
        if !self.path.exists() {
            return Err(SourceError::NotFound(self.path.display().to_string()));
        }
        let input = std::fs::read_to_string(&self.path)?;
        parse_records(&input)
    }
}

/// Parse rows from JSON or JSONL text. Row numbers in errors are 1-based.
pub fn parse_records(input: &str) -> Result<Vec<Record>, SourceError> {
    let input = input.trim();

    if input.is_empty() {
        return Ok(Vec::new());
    }

    // Try parsing as JSON array first
    if input.starts_with('[') {
        let rows: Vec<Value> = serde_json::from_str(input).map_err(SourceError::InvalidJson)?;
        return rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| to_record(row, i + 1))
            .collect();
    }

    // One JSON object per line
    let mut records = Vec::new();
    for (i, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row: Value = serde_json::from_str(line).map_err(|e| SourceError::ParseError {
            row: i + 1,
            message: e.to_string(),
        })?;
        records.push(to_record(row, i + 1)?);
    }

    Ok(records)
}

fn to_record(row: Value, row_number: usize) -> Result<Record, SourceError> {
    match row {
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(key, value)| (key, FieldValue::from(value)))
            .collect()),
        _ => Err(SourceError::InvalidRow { row: row_number }),
    }
}
