//! Table -> `.xlsx` export

use crate::error::BatchError;
use crate::table::Table;
use rust_xlsxwriter::{Format, Workbook};

/// Write `table` as a single-sheet workbook with a bold header row.
///
/// Cells that parse as finite numbers are written as numbers, except
/// zero-padded identifiers such as `007`.
pub fn table_to_xlsx(table: &Table) -> Result<Vec<u8>, BatchError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let header = Format::new().set_bold();

    for (col, name) in table.headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, column(col)?, name.as_str(), &header)
            .map_err(export)?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let r = u32::try_from(r + 1)
            .map_err(|_| BatchError::ValidationError("Too many rows for a worksheet".into()))?;
        for (col, cell) in row.iter().enumerate() {
            let col = column(col)?;
            match as_number(cell) {
                Some(n) => {
                    sheet.write_number(r, col, n).map_err(export)?;
                }
                None if cell.is_empty() => {}
                None => {
                    sheet.write_string(r, col, cell.as_str()).map_err(export)?;
                }
            }
        }
    }

    workbook.save_to_buffer().map_err(export)
}

fn as_number(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    let digits = cell.strip_prefix('-').unwrap_or(cell);
    if digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.") {
        return None;
    }
    cell.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn column(index: usize) -> Result<u16, BatchError> {
    u16::try_from(index)
        .map_err(|_| BatchError::ValidationError("Too many columns for a worksheet".into()))
}

fn export(e: rust_xlsxwriter::XlsxError) -> BatchError {
    BatchError::ExportError(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xlsx_is_zip_container() {
        let table = Table::new(
            vec!["status".into(), "count".into()],
            vec![vec!["FIT".into(), "3".into()]],
        );
        let bytes = table_to_xlsx(&table).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_number_detection() {
        assert_eq!(as_number("42"), Some(42.0));
        assert_eq!(as_number(" -0.5 "), Some(-0.5));
        assert_eq!(as_number("007"), None);
        assert_eq!(as_number("inf"), None);
        assert_eq!(as_number(""), None);
        assert_eq!(as_number("A1"), None);
    }

    #[test]
    fn test_empty_table_still_exports() {
        let bytes = table_to_xlsx(&Table::default()).unwrap();
        assert!(!bytes.is_empty());
    }
}
