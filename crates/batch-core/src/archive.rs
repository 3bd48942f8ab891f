//! ZIP packing and unpacking (DEFLATE, insertion order)

use crate::error::BatchError;
use crate::router::Placed;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Pack `(name, bytes)` entries into a ZIP, in the order given.
///
/// A repeated name keeps its first position and its last bytes. Names are
/// made relative: `..` segments become `__` and empty segments are dropped.
pub fn pack<I, N, B>(entries: I) -> Result<Vec<u8>, BatchError>
where
    I: IntoIterator<Item = (N, B)>,
    N: AsRef<str>,
    B: AsRef<[u8]>,
{
    let mut unique = Placed::default();
    for (name, bytes) in entries {
        let name = entry_name(name.as_ref())?;
        unique.insert(name, bytes.as_ref().to_vec());
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, bytes) in unique.into_entries() {
        zip.start_file(name.as_str(), options).map_err(|e| {
            BatchError::ArchiveError(format!("Failed to create entry {}: {}", name, e))
        })?;
        zip.write_all(&bytes).map_err(|e| {
            BatchError::ArchiveError(format!("Failed to write entry {}: {}", name, e))
        })?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| BatchError::ArchiveError(format!("Failed to finalize ZIP: {}", e)))?;
    Ok(cursor.into_inner())
}

fn entry_name(raw: &str) -> Result<String, BatchError> {
    let name = raw
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .map(|segment| if segment == ".." { "__" } else { segment })
        .collect::<Vec<_>>()
        .join("/");
    if name.is_empty() {
        return Err(BatchError::ValidationError(format!(
            "Invalid archive entry name: {:?}",
            raw
        )));
    }
    Ok(name)
}

/// Extract every file entry; directories are skipped.
///
/// Entries whose path would escape the extraction root are rejected.
pub fn unpack(bytes: &[u8]) -> Result<Vec<(String, Vec<u8>)>, BatchError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| BatchError::ArchiveError(format!("Not a valid ZIP archive: {}", e)))?;

    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| BatchError::ArchiveError(format!("Failed to read entry {}: {}", i, e)))?;
        if file.is_dir() {
            continue;
        }
        if file.enclosed_name().is_none() {
            return Err(BatchError::ValidationError(format!(
                "Unsafe path in archive: {}",
                file.name()
            )));
        }

        let name = file.name().to_string();
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)
            .map_err(|e| BatchError::ArchiveError(format!("Failed to extract {}: {}", name, e)))?;
        entries.push((name, data));
    }

    if entries.is_empty() {
        return Err(BatchError::ValidationError("ZIP archive is empty".into()));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pack_then_unpack_preserves_entries() {
        let entries = vec![
            ("b.txt".to_string(), b"second".to_vec()),
            ("a/nested.pdf".to_string(), b"%PDF-1.7".to_vec()),
        ];
        let zip = pack(entries.clone()).unwrap();
        assert_eq!(unpack(&zip).unwrap(), entries);
    }

    #[test]
    fn test_pack_collapses_repeated_names() {
        let zip = pack([("a.txt", b"1"), ("b.txt", b"2"), ("a.txt", b"3")]).unwrap();
        assert_eq!(
            unpack(&zip).unwrap(),
            vec![
                ("a.txt".to_string(), b"3".to_vec()),
                ("b.txt".to_string(), b"2".to_vec())
            ]
        );
    }

    #[test]
    fn test_unpack_skips_directories() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        zip.add_directory("folder/", options).unwrap();
        zip.start_file("folder/file.txt", options).unwrap();
        zip.write_all(b"hi").unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        let entries = unpack(&bytes).unwrap();
        assert_eq!(entries, vec![("folder/file.txt".to_string(), b"hi".to_vec())]);
    }

    #[test]
    fn test_unpack_rejects_traversal() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("../evil.txt", SimpleFileOptions::default()).unwrap();
        zip.write_all(b"x").unwrap();
        let bytes = zip.finish().unwrap().into_inner();
        assert!(matches!(
            unpack(&bytes),
            Err(BatchError::ValidationError(_))
        ));
    }

    #[test]
    fn test_pack_keeps_entries_inside_the_archive() {
        let zip = pack([("../evil.txt", b"x"), (r"a\..\b.txt", b"y"), ("/abs/./c.txt", b"z")]).unwrap();
        let names: Vec<String> = unpack(&zip).unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["__/evil.txt", "a/__/b.txt", "abs/c.txt"]);
    }

    #[test]
    fn test_pack_rejects_nameless_entry() {
        assert!(matches!(
            pack([("./", b"x")]),
            Err(BatchError::ValidationError(_))
        ));
    }

    #[test]
    fn test_empty_archive_rejected() {
        let empty = pack(Vec::<(String, Vec<u8>)>::new()).unwrap();
        assert!(matches!(
            unpack(&empty),
            Err(BatchError::ValidationError(_))
        ));
    }

    #[test]
    fn test_garbage_is_archive_error() {
        assert!(matches!(
            unpack(b"not a zip"),
            Err(BatchError::ArchiveError(_))
        ));
    }
}
