//! Sequential `prefix_NNN.ext` naming

use crate::error::BatchError;
use crate::mapping::path_component;

pub const DEFAULT_START: u32 = 1;

/// Split `name` into stem and extension (without the dot).
///
/// A leading dot does not start an extension: `.env` has none.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(i) if i > 0 && i + 1 < name.len() => (&name[..i], Some(&name[i + 1..])),
        _ => (name, None),
    }
}

/// One name per extension, numbered from `start` and zero-padded to 3 digits.
///
/// Wider numbers are kept whole (`IMG_1000.jpg`).
pub fn sequential_names<'a, I>(prefix: &str, start: u32, extensions: I) -> Result<Vec<String>, BatchError>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(BatchError::ValidationError("Prefix must not be empty".into()));
    }
    let prefix = path_component(prefix);

    extensions
        .into_iter()
        .enumerate()
        .map(|(i, ext)| {
            let number = start
                .checked_add(i as u32)
                .ok_or_else(|| BatchError::ValidationError("Start number too large".into()))?;
            Ok(match ext {
                Some(ext) => format!("{}_{:03}.{}", prefix, number, ext),
                None => format!("{}_{:03}", prefix, number),
            })
        })
        .collect()
}
