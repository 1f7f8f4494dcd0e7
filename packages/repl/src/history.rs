//! Replayable query history.
//!
//! Entries are numbered from 0 in the order they were entered. `exec <n>`
//! looks entries up by that number.

/// Append-only log of entered lines.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `line` unless it is empty or repeats the last entry.
    ///
    /// Returns true when the line was appended.
    pub fn record(&mut self, line: &str) -> bool {
        if line.is_empty() || self.last() == Some(line) {
            return false;
        }
        self.entries.push(line.to_string());
        true
    }

    pub fn lookup(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Drop the most recent entry.
    pub fn discard_last(&mut self) -> Option<String> {
        self.entries.pop()
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    /// Entries with their replay index, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries.iter().map(String::as_str).enumerate()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
