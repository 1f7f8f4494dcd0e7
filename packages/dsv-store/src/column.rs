//! Column metadata and per-column selection.
//!
//! Header cells carry their type as a suffix: `price_n` declares a number
//! column named `price`, `label_s` a string column named `label`. Cells
//! without a recognised suffix are kept as `Unknown` columns; they can be
//! selected for output but not referenced from a filter.

use serde::{Deserialize, Serialize};

const NUMBER_SUFFIX: &str = "_n";
const STRING_SUFFIX: &str = "_s";

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Number,
    String,
    Unknown,
}

impl ColumnKind {
    pub fn label(self) -> &'static str {
        match self {
            ColumnKind::Number => "NUMBER",
            ColumnKind::String => "STRING",
            ColumnKind::Unknown => "UNKNOWN",
        }
    }
}

/// A column as exposed to queries: case-folded name without the type suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnDescriptor {
    /// Build a descriptor from a raw header cell.
    pub fn from_header(cell: &str) -> Self {
        let cell = cell.trim();
        let folded = cell.to_lowercase();

        let (name, kind) = if let Some(name) = strip_type_suffix(&folded, NUMBER_SUFFIX) {
            (name, ColumnKind::Number)
        } else if let Some(name) = strip_type_suffix(&folded, STRING_SUFFIX) {
            (name, ColumnKind::String)
        } else {
            (folded.as_str(), ColumnKind::Unknown)
        };

        Self {
            name: name.to_string(),
            kind,
        }
    }

    /// Case-insensitive comparison against the declared name.
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

fn strip_type_suffix<'a>(cell: &'a str, suffix: &str) -> Option<&'a str> {
    // A bare "_n" has no name left to declare.
    cell.strip_suffix(suffix).filter(|name| !name.is_empty())
}

/// Find the index of the column called `name`, ignoring case.
pub fn resolve(columns: &[ColumnDescriptor], name: &str) -> Option<usize> {
    columns.iter().position(|column| column.matches(name))
}

/// Per-column inclusion flags, index-aligned with the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionMask(Vec<bool>);

impl SelectionMask {
    /// Every column selected.
    pub fn all(columns: usize) -> Self {
        Self(vec![true; columns])
    }

    /// No column selected.
    pub fn none(columns: usize) -> Self {
        Self(vec![false; columns])
    }

    /// Resize to `columns` entries and select every one of them.
    pub fn reset(&mut self, columns: usize) {
        self.0.clear();
        self.0.resize(columns, true);
    }

    pub fn select(&mut self, index: usize) {
        if let Some(flag) = self.0.get_mut(index) {
            *flag = true;
        }
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn selected_count(&self) -> usize {
        self.0.iter().filter(|flag| **flag).count()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

impl From<Vec<bool>> for SelectionMask {
    fn from(flags: Vec<bool>) -> Self {
        Self(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_suffix_declares_kind() {
        let id = ColumnDescriptor::from_header("id_n");
        assert_eq!(id.name, "id");
        assert_eq!(id.kind, ColumnKind::Number);

        let name = ColumnDescriptor::from_header(" Name_S ");
        assert_eq!(name.name, "name");
        assert_eq!(name.kind, ColumnKind::String);

        let notes = ColumnDescriptor::from_header("notes");
        assert_eq!(notes.name, "notes");
        assert_eq!(notes.kind, ColumnKind::Unknown);
    }

    #[test]
    fn bare_suffix_is_unknown() {
        let column = ColumnDescriptor::from_header("_n");
        assert_eq!(column.name, "_n");
        assert_eq!(column.kind, ColumnKind::Unknown);
    }

    #[test]
    fn resolve_ignores_case() {
        let columns = vec![
            ColumnDescriptor::from_header("id_n"),
            ColumnDescriptor::from_header("name_s"),
        ];
        assert_eq!(resolve(&columns, "NAME"), Some(1));
        assert_eq!(resolve(&columns, "name_s"), None);
    }

    #[test]
    fn mask_reset_resizes_and_selects_all() {
        let mut mask = SelectionMask::none(2);
        mask.reset(4);
        assert_eq!(mask.as_slice(), &[true, true, true, true]);

        mask.reset(1);
        assert_eq!(mask.as_slice(), &[true]);
    }

    #[test]
    fn mask_select_out_of_range_is_ignored() {
        let mut mask = SelectionMask::none(2);
        mask.select(1);
        mask.select(7);
        assert_eq!(mask.as_slice(), &[false, true]);
        assert_eq!(mask.selected_count(), 1);
        assert!(!mask.is_selected(7));
    }
}
