//! Per-session list of generated codes

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Oldest entries are dropped beyond this many
pub const MAX_ENTRIES: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrHistoryEntry {
    pub image_png: Vec<u8>,
    pub data: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

/// Listing view without the image bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QrHistoryItem {
    /// Position in the newest-first listing
    pub index: usize,
    pub data: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub size_bytes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct QrHistory {
    entries: Vec<QrHistoryEntry>,
}

impl QrHistory {
    pub fn push(&mut self, entry: QrHistoryEntry) {
        self.entries.push(entry);
        if self.entries.len() > MAX_ENTRIES {
            let excess = self.entries.len() - MAX_ENTRIES;
            self.entries.drain(..excess);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry `index` counted from the newest (0 = most recent)
    pub fn get(&self, index: usize) -> Option<&QrHistoryEntry> {
        self.entries.iter().rev().nth(index)
    }

    pub fn list(&self) -> Vec<QrHistoryItem> {
        self.entries
            .iter()
            .rev()
            .enumerate()
            .map(|(index, e)| QrHistoryItem {
                index,
                data: e.data.clone(),
                kind: e.kind.clone(),
                created_at: e.created_at,
                size_bytes: e.image_png.len(),
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(data: &str) -> QrHistoryEntry {
        QrHistoryEntry {
            image_png: data.as_bytes().to_vec(),
            data: data.to_string(),
            kind: "Text".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_newest_first() {
        let mut history = QrHistory::default();
        history.push(entry("first"));
        history.push(entry("second"));

        let listed: Vec<String> = history.list().into_iter().map(|i| i.data).collect();
        assert_eq!(listed, vec!["second", "first"]);
        assert_eq!(history.get(1).map(|e| e.data.as_str()), Some("first"));
        assert!(history.get(2).is_none());
    }

    #[test]
    fn test_capped() {
        let mut history = QrHistory::default();
        for i in 0..MAX_ENTRIES + 3 {
            history.push(entry(&i.to_string()));
        }
        assert_eq!(history.len(), MAX_ENTRIES);
        assert_eq!(
            history.get(MAX_ENTRIES - 1).map(|e| e.data.clone()),
            Some("3".to_string())
        );
    }

    #[test]
    fn test_clear() {
        let mut history = QrHistory::default();
        history.push(entry("x"));
        history.clear();
        assert!(history.is_empty());
    }
}
