//! Typed mapping rows parsed once from an uploaded table
//!
//! Three header schemas are recognised (case-insensitive):
//! - department/role: `no_mcu|old_identifier`, `departemen|department`, `jabatan|role`
//! - target folder:   `filename`, `target_folder`
//! - rename:          `nama_lama|old_name`, `nama_baru|new_name`

use crate::error::BatchError;
use crate::table::Table;

const ID_COLUMNS: &[&str] = &["no_mcu", "old_identifier"];
const DEPARTMENT_COLUMNS: &[&str] = &["departemen", "department"];
const ROLE_COLUMNS: &[&str] = &["jabatan", "role"];
const FILENAME_COLUMNS: &[&str] = &["filename"];
const FOLDER_COLUMNS: &[&str] = &["target_folder"];
const OLD_NAME_COLUMNS: &[&str] = &["nama_lama", "old_name"];
const NEW_NAME_COLUMNS: &[&str] = &["nama_baru", "new_name"];

/// Cell values treated as "no value"
const NA_VALUES: &[&str] = &["nan", "NaN", "NA", "N/A", "None", "null"];

pub const PLACEHOLDER: &str = "Unknown";

/// Where a matched file goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// `<department>/<role>/<matched name>`
    Nested { department: String, role: String },
    /// `<target_folder>/<filename>`
    Folder { target_folder: String },
    /// `<new_name>` with the mapping's extension policy applied
    Rename { new_name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRow {
    /// Trimmed identifier; empty for malformed rows
    pub old_identifier: String,
    /// Cell text as uploaded, reported for malformed rows
    pub raw_identifier: String,
    pub destination: Destination,
}

impl MappingRow {
    pub fn is_malformed(&self) -> bool {
        self.old_identifier.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// First file whose name starts with the identifier
    Prefix,
    /// File whose name equals the identifier
    Exact,
}

/// How a rename destination gets its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionPolicy {
    /// Append `.pdf` unless the new name already ends in it
    ForcePdf,
    /// Append the old file's extension when the new name has none
    KeepOriginal,
}

#[derive(Debug, Clone)]
pub struct Mapping {
    pub mode: MatchMode,
    pub rows: Vec<MappingRow>,
    pub extension: ExtensionPolicy,
}

impl Mapping {
    /// Folder organisation: department/role schema first, then target folder
    pub fn for_organize(table: &Table) -> Result<Self, BatchError> {
        if let (Some(id), Some(dept), Some(role)) = (
            table.column_any(ID_COLUMNS),
            table.column_any(DEPARTMENT_COLUMNS),
            table.column_any(ROLE_COLUMNS),
        ) {
            let rows = table
                .rows
                .iter()
                .map(|row| MappingRow {
                    old_identifier: identifier(&row[id]),
                    raw_identifier: row[id].clone(),
                    destination: Destination::Nested {
                        department: sanitize(&row[dept]),
                        role: sanitize(&row[role]),
                    },
                })
                .collect();
            return Ok(Mapping {
                mode: MatchMode::Prefix,
                rows,
                extension: ExtensionPolicy::KeepOriginal,
            });
        }

        if let (Some(file), Some(folder)) = (
            table.column_any(FILENAME_COLUMNS),
            table.column_any(FOLDER_COLUMNS),
        ) {
            let rows = table
                .rows
                .iter()
                .map(|row| MappingRow {
                    old_identifier: identifier(&row[file]),
                    raw_identifier: row[file].clone(),
                    destination: Destination::Folder {
                        target_folder: sanitize(&row[folder]),
                    },
                })
                .collect();
            return Ok(Mapping {
                mode: MatchMode::Exact,
                rows,
                extension: ExtensionPolicy::KeepOriginal,
            });
        }

        Err(BatchError::SchemaError(format!(
            "expected ({}, {}, {}) or ({}, {})",
            ID_COLUMNS.join("|"),
            DEPARTMENT_COLUMNS.join("|"),
            ROLE_COLUMNS.join("|"),
            FILENAME_COLUMNS.join("|"),
            FOLDER_COLUMNS.join("|"),
        )))
    }

    /// Spreadsheet rename: old name -> new name, exact match
    pub fn for_rename(table: &Table, extension: ExtensionPolicy) -> Result<Self, BatchError> {
        let (Some(old), Some(new)) = (
            table.column_any(OLD_NAME_COLUMNS),
            table.column_any(NEW_NAME_COLUMNS),
        ) else {
            return Err(BatchError::SchemaError(format!(
                "expected ({}, {})",
                OLD_NAME_COLUMNS.join("|"),
                NEW_NAME_COLUMNS.join("|"),
            )));
        };

        let rows = table
            .rows
            .iter()
            .map(|row| MappingRow {
                old_identifier: identifier(&row[old]),
                raw_identifier: row[old].clone(),
                destination: Destination::Rename {
                    new_name: sanitize(&row[new]),
                },
            })
            .collect();

        Ok(Mapping {
            mode: MatchMode::Exact,
            rows,
            extension,
        })
    }
}

fn is_na(value: &str) -> bool {
    value.is_empty() || NA_VALUES.contains(&value)
}

/// Trimmed identifier, empty when the cell holds no usable value
fn identifier(cell: &str) -> String {
    let trimmed = cell.trim();
    if is_na(trimmed) {
        String::new()
    } else {
        trimmed.to_string()
    }
}

/// Make a value safe as one path component.
///
/// Separators become `_`; empty or NA values become `Unknown`.
pub fn sanitize(value: &str) -> String {
    let trimmed = value.trim();
    if is_na(trimmed) {
        return PLACEHOLDER.to_string();
    }
    path_component(trimmed)
}

/// Like [`sanitize`] but keeps user text as is, NA-like words included.
///
/// `.` and `..` are not allowed to stand alone.
pub fn path_component(value: &str) -> String {
    let cleaned = value.trim().replace(['/', '\\'], "_");
    match cleaned.as_str() {
        "." | ".." => cleaned.replace('.', "_"),
        _ => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("2024/Q1"), "2024_Q1");
        assert_eq!(sanitize(r"a\b/c"), "a_b_c");
        assert_eq!(sanitize("  Sales  "), "Sales");
        assert_eq!(sanitize(""), PLACEHOLDER);
        assert_eq!(sanitize("nan"), PLACEHOLDER);
        assert_eq!(sanitize(" N/A "), PLACEHOLDER);
    }

    #[test]
    fn test_path_component_keeps_na_words() {
        assert_eq!(path_component("NA"), "NA");
        assert_eq!(path_component("null"), "null");
        assert_eq!(path_component("../x"), ".._x");
        assert_eq!(path_component(r"a\b"), "a_b");
        assert_eq!(path_component(".."), "__");
    }

    #[test]
    fn test_organize_prefers_department_schema() {
        let t = table(
            &["No_MCU", "Nama", "Departemen", "JABATAN", "filename", "target_folder"],
            &[&["A1", "Ana", "Sales", "Mgr", "x.pdf", "f"]],
        );
        let mapping = Mapping::for_organize(&t).unwrap();
        assert_eq!(mapping.mode, MatchMode::Prefix);
        assert_eq!(
            mapping.rows[0].destination,
            Destination::Nested {
                department: "Sales".into(),
                role: "Mgr".into()
            }
        );
    }

    #[test]
    fn test_organize_english_headers() {
        let t = table(
            &["old_identifier", "department", "role"],
            &[&[" B2 ", "Ops", ""]],
        );
        let mapping = Mapping::for_organize(&t).unwrap();
        assert_eq!(mapping.rows[0].old_identifier, "B2");
        assert_eq!(
            mapping.rows[0].destination,
            Destination::Nested {
                department: "Ops".into(),
                role: "Unknown".into()
            }
        );
    }

    #[test]
    fn test_organize_target_folder_schema() {
        let t = table(&["filename", "target_folder"], &[&["x.pdf", "2024/Q1"]]);
        let mapping = Mapping::for_organize(&t).unwrap();
        assert_eq!(mapping.mode, MatchMode::Exact);
        assert_eq!(
            mapping.rows[0].destination,
            Destination::Folder {
                target_folder: "2024_Q1".into()
            }
        );
    }

    #[test]
    fn test_organize_unknown_schema_names_both_sets() {
        let t = table(&["id", "dept"], &[&["1", "x"]]);
        match Mapping::for_organize(&t) {
            Err(BatchError::SchemaError(msg)) => {
                assert!(msg.contains("no_mcu"));
                assert!(msg.contains("target_folder"));
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_rename_schema() {
        let t = table(&["Nama_Lama", "Nama_Baru"], &[&["a.pdf", "b"], &["nan", "c"]]);
        let mapping = Mapping::for_rename(&t, ExtensionPolicy::ForcePdf).unwrap();
        assert_eq!(mapping.mode, MatchMode::Exact);
        assert!(!mapping.rows[0].is_malformed());
        assert!(mapping.rows[1].is_malformed());
        assert_eq!(mapping.rows[1].raw_identifier, "nan");
    }

    #[test]
    fn test_rename_missing_columns() {
        let t = table(&["old_name"], &[]);
        assert!(matches!(
            Mapping::for_rename(&t, ExtensionPolicy::KeepOriginal),
            Err(BatchError::SchemaError(_))
        ));
    }
}
