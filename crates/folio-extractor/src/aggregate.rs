//! Serialize result sets to JSON or CSV

use crate::error::ExtractorError;
use crate::types::{ExtractionResult, Fields};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

/// Separator for flattened nested keys
pub const KEY_SEPARATOR: &str = "_";

/// Separator for list elements inside one CSV cell
pub const LIST_SEPARATOR: &str = "; ";

/// Output artifact format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON array
    #[default]
    Json,
    /// CSV with flattened columns
    Csv,
}

impl OutputFormat {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Write the result set to `path` in the chosen format
pub fn write_results(
    results: &[ExtractionResult],
    path: &Path,
    format: OutputFormat,
) -> Result<(), ExtractorError> {
    match format {
        OutputFormat::Json => write_json(results, path),
        OutputFormat::Csv => write_csv(results, path),
    }
}

/// Render results as a JSON array with 4-space indentation
///
/// Non-ASCII text is written as-is.
pub fn render_json(results: &[ExtractionResult]) -> Result<String, String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    results
        .serialize(&mut serializer)
        .map_err(|e| e.to_string())?;
    String::from_utf8(buf).map_err(|e| e.to_string())
}

/// Write results as a JSON array
pub fn write_json(results: &[ExtractionResult], path: &Path) -> Result<(), ExtractorError> {
    let rendered = render_json(results).map_err(|reason| persistence_error(path, reason))?;
    fs::write(path, rendered).map_err(|e| persistence_error(path, e))?;
    info!("Wrote {} results to {}", results.len(), path.display());
    Ok(())
}

/// Render results as CSV
///
/// Columns are the sorted union of every record's flattened keys; cells
/// missing from a record are empty.
pub fn render_csv(results: &[ExtractionResult]) -> Result<String, String> {
    let rows: Vec<BTreeMap<String, String>> =
        results.iter().map(|r| flatten_record(r.record())).collect();
    let columns: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();

    if columns.is_empty() {
        return Ok(String::new());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(columns.iter())
        .map_err(|e| e.to_string())?;
    for row in &rows {
        let cells = columns
            .iter()
            .map(|column| row.get(*column).map(String::as_str).unwrap_or(""));
        writer.write_record(cells).map_err(|e| e.to_string())?;
    }

    let bytes = writer.into_inner().map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}

/// Write results as CSV
pub fn write_csv(results: &[ExtractionResult], path: &Path) -> Result<(), ExtractorError> {
    let rendered = render_csv(results).map_err(|reason| persistence_error(path, reason))?;
    fs::write(path, rendered).map_err(|e| persistence_error(path, e))?;
    info!("Wrote {} rows to {}", results.len(), path.display());
    Ok(())
}

/// Flatten one record into column/cell pairs
///
/// Nested objects become `parent_child` keys, lists become one
/// `"; "`-joined cell, null becomes an empty cell.
pub fn flatten_record(record: &Fields) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for (key, value) in record.iter() {
        flatten_value(key.to_string(), &value.to_value(), &mut out);
    }
    out
}

fn flatten_value(key: String, value: &Value, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (child, nested) in map {
                flatten_value(format!("{}{}{}", key, KEY_SEPARATOR, child), nested, out);
            }
        }
        Value::Array(items) => {
            let joined = items
                .iter()
                .map(list_item_cell)
                .collect::<Vec<_>>()
                .join(LIST_SEPARATOR);
            out.insert(key, joined);
        }
        scalar => {
            out.insert(key, scalar_cell(scalar));
        }
    }
}

fn scalar_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn list_item_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn persistence_error(path: &Path, reason: impl ToString) -> ExtractorError {
    ExtractorError::Persistence {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}
