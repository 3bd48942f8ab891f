//! Name-mapped file router
//!
//! Resolves a [`Mapping`] against uploaded files in one pass. Every row ends
//! up either placing a file or in `unmatched`; nothing is written until the
//! whole mapping has been resolved.

use crate::mapping::{path_component, Destination, ExtensionPolicy, Mapping, MatchMode};
use crate::rename::split_extension;
use std::collections::HashMap;

/// One uploaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        SourceFile {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Output paths in first-insertion order; a later write to the same path
/// replaces the bytes in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placed {
    entries: Vec<(String, Vec<u8>)>,
    index: HashMap<String, usize>,
}

impl Placed {
    pub fn insert(&mut self, path: String, bytes: Vec<u8>) {
        match self.index.get(&path) {
            Some(&i) => self.entries[i].1 = bytes,
            None => {
                self.index.insert(path.clone(), self.entries.len());
                self.entries.push((path, bytes));
            }
        }
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.index.get(path).map(|&i| self.entries[i].1.as_slice())
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<(String, Vec<u8>)> {
        self.entries
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingResult {
    pub placed: Placed,
    /// Identifiers with no matching file, in row order
    pub unmatched: Vec<String>,
}

/// Upload set with duplicate names collapsed (last write wins, first position kept)
struct FileSet<'a> {
    order: Vec<&'a str>,
    by_name: HashMap<&'a str, &'a [u8]>,
}

impl<'a> FileSet<'a> {
    fn new(files: &'a [SourceFile]) -> Self {
        let mut order = Vec::with_capacity(files.len());
        let mut by_name = HashMap::with_capacity(files.len());
        for file in files {
            let name = file.name.trim();
            if by_name.insert(name, file.bytes.as_slice()).is_none() {
                order.push(name);
            }
        }
        FileSet { order, by_name }
    }

    fn exact(&self, name: &str) -> Option<(&'a str, &'a [u8])> {
        self.by_name.get_key_value(name).map(|(k, v)| (*k, *v))
    }

    fn first_with_prefix(&self, prefix: &str) -> Option<(&'a str, &'a [u8])> {
        self.order
            .iter()
            .find(|name| name.starts_with(prefix))
            .and_then(|name| self.exact(name))
    }
}

/// Resolve every mapping row against the uploaded files
pub fn route(mapping: &Mapping, files: &[SourceFile]) -> RoutingResult {
    let files = FileSet::new(files);
    let mut result = RoutingResult::default();

    for row in &mapping.rows {
        if row.is_malformed() {
            result.unmatched.push(row.raw_identifier.clone());
            continue;
        }

        let matched = match mapping.mode {
            MatchMode::Prefix => files.first_with_prefix(&row.old_identifier),
            MatchMode::Exact => files.exact(&row.old_identifier),
        };
        let Some((name, bytes)) = matched else {
            result.unmatched.push(row.old_identifier.clone());
            continue;
        };

        let name = path_component(name);
        let path = match &row.destination {
            Destination::Nested { department, role } => format!("{}/{}/{}", department, role, name),
            Destination::Folder { target_folder } => format!("{}/{}", target_folder, name),
            Destination::Rename { new_name } => with_extension(new_name, &name, mapping.extension),
        };
        result.placed.insert(path, bytes.to_vec());
    }

    tracing::debug!(
        rows = mapping.rows.len(),
        placed = result.placed.len(),
        unmatched = result.unmatched.len(),
        "mapping resolved"
    );
    result
}

fn with_extension(new_name: &str, old_name: &str, policy: ExtensionPolicy) -> String {
    match policy {
        ExtensionPolicy::ForcePdf => {
            if new_name.to_lowercase().ends_with(".pdf") {
                new_name.to_string()
            } else {
                format!("{}.pdf", new_name)
            }
        }
        ExtensionPolicy::KeepOriginal => match (split_extension(new_name).1, split_extension(old_name).1) {
            (None, Some(ext)) => format!("{}.{}", new_name, ext),
            _ => new_name.to_string(),
        },
    }
}
