//! In-memory browser-style history

use super::{HistoryEntry, NavigationSink};

/// A linear history stack with a cursor, like a browser tab's session
/// history. Pushing while the cursor is not at the end drops the entries
/// after it.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    entries: Vec<HistoryEntry>,
    index: Option<usize>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry under the cursor
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.index.and_then(|i| self.entries.get(i))
    }

    /// Move one entry back; returns the new current entry, or `None` at the start
    pub fn back(&mut self) -> Option<&HistoryEntry> {
        match self.index {
            Some(i) if i > 0 => {
                self.index = Some(i - 1);
                self.entries.get(i - 1)
            }
            _ => None,
        }
    }

    /// Move one entry forward; returns the new current entry, or `None` at the end
    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        match self.index {
            Some(i) if i + 1 < self.entries.len() => {
                self.index = Some(i + 1);
                self.entries.get(i + 1)
            }
            _ => None,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl NavigationSink for MemoryHistory {
    fn push(&mut self, entry: HistoryEntry) {
        let keep = self.index.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        self.entries.push(entry);
        self.index = Some(self.entries.len() - 1);
    }
}
