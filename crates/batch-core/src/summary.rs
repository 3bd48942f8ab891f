//! MCU status dashboard: count values of a status column

use crate::error::BatchError;
use crate::table::Table;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^A-Za-z0-9_]+").unwrap();
}

/// Header fragments that mark a status column
const STATUS_HINTS: [&str; 3] = ["status", "fit", "hasil"];

pub const UNKNOWN_STATUS: &str = "UNKNOWN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    /// Normalised name of the summarised column
    pub column: String,
    /// Every candidate status column, normalised
    pub candidates: Vec<String>,
    pub total_rows: usize,
    /// Sorted by count, descending; ties keep first appearance
    pub counts: Vec<StatusCount>,
}

impl StatusSummary {
    /// Two-column table (`<column>`, `Jumlah`) for spreadsheet export
    pub fn to_table(&self) -> Table {
        Table::new(
            vec![self.column.clone(), "Jumlah".to_string()],
            self.counts
                .iter()
                .map(|c| vec![c.status.clone(), c.count.to_string()])
                .collect(),
        )
    }
}

/// Drop characters outside `[A-Za-z0-9_]` and lowercase
pub fn normalize_header(header: &str) -> String {
    NON_WORD.replace_all(header, "").to_lowercase()
}

/// Summarise `column` (normalised name), or the first candidate column
pub fn status_summary(table: &Table, column: Option<&str>) -> Result<StatusSummary, BatchError> {
    let headers: Vec<String> = table.headers.iter().map(|h| normalize_header(h)).collect();
    let candidates: Vec<String> = headers
        .iter()
        .filter(|h| STATUS_HINTS.iter().any(|hint| h.contains(hint)))
        .cloned()
        .collect();

    let chosen = match column.map(str::trim).filter(|c| !c.is_empty()) {
        Some(wanted) => {
            let wanted = normalize_header(wanted);
            if !candidates.contains(&wanted) {
                return Err(BatchError::ValidationError(format!(
                    "'{}' is not a status column (candidates: {})",
                    wanted,
                    candidates.join(", ")
                )));
            }
            wanted
        }
        None => candidates.first().cloned().ok_or_else(|| {
            BatchError::SchemaError(format!(
                "no column containing {}",
                STATUS_HINTS.map(|h| format!("'{}'", h)).join(", ")
            ))
        })?,
    };

    let index = headers
        .iter()
        .position(|h| *h == chosen)
        .ok_or_else(|| BatchError::SchemaError(chosen.clone()))?;

    let mut counts: Vec<StatusCount> = Vec::new();
    for value in table.column_values(index) {
        let value = value.trim();
        let status = if value.is_empty() {
            UNKNOWN_STATUS.to_string()
        } else {
            value.to_uppercase()
        };
        match counts.iter_mut().find(|c| c.status == status) {
            Some(entry) => entry.count += 1,
            None => counts.push(StatusCount { status, count: 1 }),
        }
    }
    // Stable sort keeps first-appearance order among ties
    counts.sort_by(|a, b| b.count.cmp(&a.count));

    Ok(StatusSummary {
        column: chosen,
        candidates,
        total_rows: table.rows.len(),
        counts,
    })
}
