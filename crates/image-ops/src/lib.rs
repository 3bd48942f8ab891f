//! Image operations for the toolkit server
//!
//! - `compress_batch`: shrink to a max side and re-encode as JPEG
//! - `reencode` / `rename_sequential`: format conversion and `prefix_NNN.ext`
//!
//! Batch calls never abort on a single bad file; failures are collected
//! in [`BatchOutcome::failures`].

pub mod batch;
pub mod compress;
pub mod error;
pub mod reencode;

#[cfg(test)]
pub(crate) mod test_support;

pub use batch::{BatchOutcome, ItemFailure};
pub use compress::{compress_batch, compress_image, CompressOptions};
pub use error::ImageOpsError;
pub use reencode::{reencode, rename_sequential, OutputFormat};
