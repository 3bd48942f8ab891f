//! QR code generation for the toolkit server
//!
//! - `QrPayload`: typed form input -> payload string (URL, WiFi, vCard, ...)
//! - `render_png`: symbol with colours, box size, border and optional logo
//! - `batch_qr`: one PNG per table row
//! - `TEMPLATES`, `QrHistory`

pub mod batch;
pub mod error;
pub mod history;
pub mod payload;
pub mod render;
pub mod templates;

pub use batch::batch_qr;
pub use error::QrError;
pub use history::{QrHistory, QrHistoryEntry, QrHistoryItem};
pub use payload::{QrPayload, WifiSecurity};
pub use render::{parse_hex_color, render_png, render_qr, ErrorCorrection, QrStyle};
pub use templates::{template, QrTemplate, TEMPLATES};
