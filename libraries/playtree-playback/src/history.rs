//! Per-playhead history
//!
//! A stack of (node, sub-position) pairs supporting back-navigation.
//! Unbounded by design; in practice bounded by playtree size and session
//! length.

use playtree_core::NodeIx;

/// One remembered traversal step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub node: NodeIx,
    pub position: usize,
}

/// History stack for one playhead
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a step
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Pop the most recent step, for back-navigation
    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }

    /// Most recent step, without removing it
    pub fn peek(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All steps, oldest first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub(crate) fn into_entries(self) -> Vec<HistoryEntry> {
        self.entries
    }
}
