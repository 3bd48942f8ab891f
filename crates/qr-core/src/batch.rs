//! One QR code per table row

use crate::error::QrError;
use crate::render::{render_png, QrStyle};
use batch_core::{path_component, Table};

pub const DEFAULT_PREFIX: &str = "QR_";

/// Render a PNG for every row of `data_column`.
///
/// Files are named `<prefix><name>.png`, where the name comes from
/// `name_column` or falls back to the 1-based row number.
pub fn batch_qr(
    table: &Table,
    data_column: &str,
    name_column: Option<&str>,
    prefix: &str,
) -> Result<Vec<(String, Vec<u8>)>, QrError> {
    let data_index = find_column(table, data_column)?;
    let name_index = name_column
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| find_column(table, c))
        .transpose()?;

    if table.is_empty() {
        return Err(QrError::ValidationError("Table has no rows".into()));
    }

    let style = QrStyle::default();
    let mut outputs = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        let data = &row[data_index];
        let png = render_png(data, &style, None)
            .map_err(|e| QrError::EncodeError(format!("Row {}: {}", i + 1, e)))?;

        let name = name_index
            .map(|n| row[n].trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| (i + 1).to_string());
        let stem = path_component(&format!("{}{}", prefix, name));
        outputs.push((format!("{}.png", stem), png));
    }

    tracing::info!(count = outputs.len(), "batch QR rendered");
    Ok(outputs)
}

fn find_column(table: &Table, name: &str) -> Result<usize, QrError> {
    table.column(name).ok_or_else(|| {
        QrError::ValidationError(format!(
            "Column '{}' not found (available: {})",
            name,
            table.headers.join(", ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table() -> Table {
        Table::new(
            vec!["link".into(), "who".into()],
            vec![
                vec!["https://a.example".into(), "Ana".into()],
                vec!["https://b.example".into(), "".into()],
                vec!["https://c.example".into(), "ops/team".into()],
            ],
        )
    }

    #[test]
    fn test_names_from_column_with_row_fallback() {
        let outputs = batch_qr(&table(), "link", Some("who"), DEFAULT_PREFIX).unwrap();
        let names: Vec<&str> = outputs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["QR_Ana.png", "QR_2.png", "QR_ops_team.png"]);
        assert!(outputs.iter().all(|(_, png)| png.starts_with(b"\x89PNG")));
    }

    #[test]
    fn test_row_numbers_without_name_column() {
        let outputs = batch_qr(&table(), "LINK", None, "code-").unwrap();
        assert_eq!(outputs[2].0, "code-3.png");
    }

    #[test]
    fn test_prefix_separators_replaced() {
        let outputs = batch_qr(&table(), "link", None, "../up/").unwrap();
        assert_eq!(outputs[0].0, ".._up_1.png");
    }

    #[test]
    fn test_unknown_column() {
        assert!(matches!(
            batch_qr(&table(), "url", None, DEFAULT_PREFIX),
            Err(QrError::ValidationError(_))
        ));
    }
}
