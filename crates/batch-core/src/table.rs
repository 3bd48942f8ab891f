//! Uniform string view over CSV, TXT, JSON and spreadsheet uploads

use crate::error::BatchError;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use serde_json::Value;
use std::io::Cursor;

/// A header row plus data rows, every cell rendered as text.
///
/// Rows are padded so each has exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Reader picked from the upload's file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Json,
    Spreadsheet,
}

impl TableFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_lowercase();
        let ext = lower.rsplit_once('.').map(|(_, ext)| ext)?;
        match ext {
            "csv" | "txt" => Some(TableFormat::Csv),
            "json" => Some(TableFormat::Json),
            "xlsx" | "xlsm" | "xls" | "ods" => Some(TableFormat::Spreadsheet),
            _ => None,
        }
    }
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Table { headers, rows }
    }

    /// Parse an uploaded table, choosing the reader by file extension
    pub fn from_upload(name: &str, bytes: &[u8]) -> Result<Self, BatchError> {
        let format = TableFormat::from_name(name).ok_or_else(|| {
            BatchError::ValidationError(format!(
                "Unsupported table file '{}' (expected .csv, .txt, .json, .xlsx or .xls)",
                name
            ))
        })?;

        let table = match format {
            TableFormat::Csv => Self::from_csv(name, bytes)?,
            TableFormat::Json => Self::from_json(name, bytes)?,
            TableFormat::Spreadsheet => Self::from_spreadsheet(name, bytes)?,
        };
        tracing::debug!(
            name,
            columns = table.headers.len(),
            rows = table.rows.len(),
            "table loaded"
        );
        Ok(table)
    }

    pub fn from_csv(name: &str, bytes: &[u8]) -> Result<Self, BatchError> {
        let text = decode_utf8(name, bytes)?;

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| BatchError::parse(name, e))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| BatchError::parse(name, e))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Table::new(headers, rows))
    }

    /// Accepts an array of objects (records) or an object of columns
    pub fn from_json(name: &str, bytes: &[u8]) -> Result<Self, BatchError> {
        let text = decode_utf8(name, bytes)?;
        let value: Value = serde_json::from_str(text).map_err(|e| BatchError::parse(name, e))?;

        match value {
            Value::Array(records) => Ok(Self::from_records(name, records)?),
            Value::Object(columns) => Ok(Self::from_columns(columns)),
            _ => Err(BatchError::parse(
                name,
                "expected an array of objects or an object of columns",
            )),
        }
    }

    fn from_records(name: &str, records: Vec<Value>) -> Result<Self, BatchError> {
        let mut headers: Vec<String> = Vec::new();
        for record in &records {
            let object = record
                .as_object()
                .ok_or_else(|| BatchError::parse(name, "every record must be an object"))?;
            for key in object.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .map(|h| record.get(h).map(json_cell).unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(Table::new(headers, rows))
    }

    fn from_columns(columns: serde_json::Map<String, Value>) -> Self {
        let headers: Vec<String> = columns.keys().cloned().collect();
        let cells: Vec<Vec<String>> = columns
            .values()
            .map(|column| match column {
                Value::Array(items) => items.iter().map(json_cell).collect(),
                // {"0": .., "1": ..} index-keyed columns
                Value::Object(items) => {
                    let mut indexed: Vec<(&String, &Value)> = items.iter().collect();
                    indexed.sort_by_key(|(key, _)| key.parse::<usize>().unwrap_or(usize::MAX));
                    indexed.into_iter().map(|(_, v)| json_cell(v)).collect()
                }
                scalar => vec![json_cell(scalar)],
            })
            .collect();

        let height = cells.iter().map(Vec::len).max().unwrap_or(0);
        let rows = (0..height)
            .map(|r| {
                cells
                    .iter()
                    .map(|column| column.get(r).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Table::new(headers, rows)
    }

    /// First worksheet of an xlsx/xls/ods workbook; the first row is the header
    pub fn from_spreadsheet(name: &str, bytes: &[u8]) -> Result<Self, BatchError> {
        let mut workbook =
            open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| BatchError::parse(name, e))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| BatchError::parse(name, "workbook has no worksheets"))?
            .map_err(|e| BatchError::parse(name, e))?;

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(spreadsheet_cell).collect::<Vec<String>>());

        let headers = rows
            .next()
            .map(|header| header.into_iter().map(|h| h.trim().to_string()).collect())
            .unwrap_or_default();

        Ok(Table::new(headers, rows.collect()))
    }

    /// Index of a column, matching headers case-insensitively after trimming
    pub fn column(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
    }

    /// First column present among `names`
    pub fn column_any(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|n| self.column(n))
    }

    /// All values of one column, in row order
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or(""))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn decode_utf8<'a>(name: &str, bytes: &'a [u8]) -> Result<&'a str, BatchError> {
    let text =
        std::str::from_utf8(bytes).map_err(|_| BatchError::DecodeError(name.to_string()))?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

/// Integral floats are rendered without a fractional part
fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn json_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format_number(f),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn spreadsheet_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format_number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}
