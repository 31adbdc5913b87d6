//! CSV exchange: listing export and record import.
//!
//! The column set of an export is the union of keys across the exported
//! rows in first-seen order; server-internal keys (`_id`, `__v`) stay out of
//! the sheet. Imports parse each cell as JSON where it is valid JSON and
//! fall back to plain text, so `true` and `12.5` come back typed while
//! `0755123456` keeps its leading zero.

use mauzo_api_models::Document;
use serde_json::{Map, Value};

const INTERNAL_KEYS: &[&str] = &["_id", "__v"];

/// Errors raised while reading or writing a sheet.
#[derive(Debug, thiserror::Error)]
pub enum SpreadsheetError {
    /// Malformed CSV input or a failed write.
    #[error("spreadsheet error: {0}")]
    Csv(#[from] csv::Error),
    /// Buffer flush failed.
    #[error("spreadsheet write error: {0}")]
    Io(#[from] std::io::Error),
    /// The produced sheet was not UTF-8.
    #[error("spreadsheet is not text: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Render documents into CSV text with a header row.
///
/// # Errors
/// Returns a [`SpreadsheetError`] when writing fails.
pub fn rows_to_csv(rows: &[Document]) -> Result<String, SpreadsheetError> {
    let headers = collect_headers(rows);
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&headers)?;
    for row in rows {
        let record: Vec<String> = headers
            .iter()
            .map(|header| cell_text(row.get(header.as_str())))
            .collect();
        writer.write_record(&record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(csv::IntoInnerError::into_error)?;
    Ok(String::from_utf8(bytes)?)
}

/// Parse CSV text back into documents, one per data row. Empty cells are
/// omitted from the document rather than imported as empty strings.
///
/// # Errors
/// Returns [`SpreadsheetError::Csv`] on malformed input.
pub fn csv_to_rows(text: &str) -> Result<Vec<Document>, SpreadsheetError> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(ToString::to_string)
        .collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut document = Map::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            if cell.is_empty() {
                continue;
            }
            document.insert(header.clone(), cell_value(cell));
        }
        rows.push(Value::Object(document));
    }
    Ok(rows)
}

fn collect_headers(rows: &[Document]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for row in rows {
        let Some(object) = row.as_object() else {
            continue;
        };
        for key in object.keys() {
            if INTERNAL_KEYS.contains(&key.as_str()) {
                continue;
            }
            if !headers.iter().any(|existing| existing == key) {
                headers.push(key.clone());
            }
        }
    }
    headers
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn cell_value(cell: &str) -> Value {
    serde_json::from_str(cell).unwrap_or_else(|_| Value::String(cell.to_string()))
}
