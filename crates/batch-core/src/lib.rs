//! Spreadsheet-driven batch work for the toolkit server
//!
//! - `Table`: CSV / TXT / JSON / XLSX uploads as rows of strings
//! - `Mapping` + `route`: place uploaded files by a mapping table
//! - `sequential_names`: `prefix_NNN.ext`
//! - `archive`: ZIP pack / unpack
//! - `table_to_xlsx`, `status_summary`

pub mod archive;
pub mod convert;
pub mod error;
pub mod mapping;
pub mod rename;
pub mod router;
pub mod summary;
pub mod table;

pub use convert::table_to_xlsx;
pub use error::BatchError;
pub use mapping::{path_component, sanitize, Destination, ExtensionPolicy, Mapping, MappingRow, MatchMode};
pub use rename::{sequential_names, split_extension};
pub use router::{route, Placed, RoutingResult, SourceFile};
pub use summary::{status_summary, StatusCount, StatusSummary};
pub use table::{Table, TableFormat};
