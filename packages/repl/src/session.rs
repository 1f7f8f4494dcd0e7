//! Session state for the console.
//!
//! Everything the loop mutates between prompts lives here: the loaded
//! store (with its delimiters), the query history and the current column
//! selection.

use dsvq_store::{DsvStore, SelectionMask};

use crate::commands::{self, Command};
use crate::history::History;
use crate::query::{self, ParsedQuery, QueryRejection};

/// Why an `exec <n>` could not be replayed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("Usage: exec <history index>")]
    MissingIndex,

    #[error("Invalid history index: {0}")]
    InvalidIndex(String),

    #[error("History index {index} out of range (entries: {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("History entry {0} is itself an exec command")]
    Nested(usize),
}

pub struct Session {
    store: DsvStore,
    history: History,
    selection: SelectionMask,
}

impl Session {
    pub fn new(store: DsvStore) -> Self {
        let selection = SelectionMask::all(store.column_count());
        Self {
            store,
            history: History::new(),
            selection,
        }
    }

    pub fn store(&self) -> &DsvStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut DsvStore {
        &mut self.store
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    /// The selection used by the most recent data query.
    pub fn selection(&self) -> &SelectionMask {
        &self.selection
    }

    /// Size the selection to the current schema with every column selected.
    pub fn sync_selection(&mut self) {
        self.selection.reset(self.store.column_count());
    }

    /// Reset the selection, then parse `text` as a data query.
    ///
    /// The selection only narrows when the query is accepted; a `select`
    /// never carries over to the next query.
    pub fn prepare_query(&mut self, text: &str) -> Result<ParsedQuery, QueryRejection> {
        self.sync_selection();
        let parsed = query::parse(text, self.store.columns(), &self.selection)?;
        self.selection = parsed.selection.clone();
        Ok(parsed)
    }

    /// Resolve the argument of `exec` to the history text it refers to.
    pub fn resolve_replay(&self, arg: &str) -> Result<String, ReplayError> {
        let index = match commands::parse_exec_index(arg) {
            None => return Err(ReplayError::MissingIndex),
            Some(Err(token)) => return Err(ReplayError::InvalidIndex(token)),
            Some(Ok(index)) => index,
        };

        let text = self
            .history
            .lookup(index)
            .ok_or(ReplayError::OutOfRange {
                index,
                len: self.history.len(),
            })?;

        if matches!(commands::classify(text), Command::Exec(_)) {
            return Err(ReplayError::Nested(index));
        }
        Ok(text.to_string())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DsvStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_replay() {
        let mut session = Session::default();
        session.history_mut().record("list");
        session.history_mut().record("exec 0");

        assert_eq!(session.resolve_replay("0"), Ok("list".to_string()));
        assert_eq!(session.resolve_replay(""), Err(ReplayError::MissingIndex));
        assert_eq!(
            session.resolve_replay("x"),
            Err(ReplayError::InvalidIndex("x".to_string()))
        );
        assert_eq!(
            session.resolve_replay("5"),
            Err(ReplayError::OutOfRange { index: 5, len: 2 })
        );
        assert_eq!(session.resolve_replay("1"), Err(ReplayError::Nested(1)));
    }

    #[test]
    fn test_replay_on_empty_history() {
        let session = Session::default();
        assert_eq!(
            session.resolve_replay("0"),
            Err(ReplayError::OutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_prepare_query_without_schema() {
        let mut session = Session::default();
        let parsed = session.prepare_query("count | 1 == 1").unwrap();
        assert!(parsed.count_mode);
        assert!(session.selection().is_empty());
    }
}
