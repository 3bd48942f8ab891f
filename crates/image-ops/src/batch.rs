//! Batch results with per-item failures

use serde::Serialize;

/// One file of a batch that could not be processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// `(output name, bytes)` in input order
    pub outputs: Vec<(String, Vec<u8>)>,
    /// Skipped inputs, in input order
    pub failures: Vec<ItemFailure>,
}

impl BatchOutcome {
    pub(crate) fn push_ok(&mut self, name: String, bytes: Vec<u8>) {
        self.outputs.push((name, bytes));
    }

    pub(crate) fn push_failure(&mut self, name: &str, reason: impl ToString) {
        let reason = reason.to_string();
        tracing::warn!(name, %reason, "skipping file");
        self.failures.push(ItemFailure {
            name: name.to_string(),
            reason,
        });
    }
}
