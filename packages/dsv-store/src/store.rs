//! The in-memory delimiter-separated value store.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::column::{ColumnDescriptor, SelectionMask};
use crate::error::{EvalError, FilterError, StoreError};
use crate::expr::Filter;

/// Delimiter used for both input and output until configured otherwise.
pub const DEFAULT_DELIMITER: &str = "|";

/// Result of evaluating the registered filter against one row.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    Match,
    NoMatch,
    Error(EvalError),
}

/// Loaded file contents.
///
/// Row 0 holds the raw header cells; data rows start at 1.
#[derive(Debug, Default)]
struct Table {
    file_name: String,
    columns: Vec<ColumnDescriptor>,
    rows: Vec<Vec<String>>,
}

/// A delimiter-separated file held in memory, plus the filter currently
/// registered against it.
#[derive(Debug)]
pub struct DsvStore {
    table: Table,
    input_delimiter: String,
    output_delimiter: String,
    filter: Option<Filter>,
}

impl DsvStore {
    pub fn new() -> Self {
        Self {
            table: Table::default(),
            input_delimiter: DEFAULT_DELIMITER.to_string(),
            output_delimiter: DEFAULT_DELIMITER.to_string(),
            filter: None,
        }
    }

    /// Load `path` using the current input delimiter.
    ///
    /// The previous contents are only replaced once the whole file parsed.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let table = parse_table(path, &contents, &self.input_delimiter)?;
        info!(
            file = %table.file_name,
            columns = table.columns.len(),
            rows = table.rows.len(),
            "loaded dsv file"
        );

        self.table = table;
        // A filter compiled against the old schema may name columns that no longer exist.
        self.filter = None;
        Ok(())
    }

    pub fn file_name(&self) -> &str {
        &self.table.file_name
    }

    pub fn is_loaded(&self) -> bool {
        !self.table.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.table.columns.len()
    }

    /// Number of rows including the header row.
    pub fn row_count(&self) -> usize {
        self.table.rows.len()
    }

    pub fn column(&self, index: usize) -> Option<&ColumnDescriptor> {
        self.table.columns.get(index)
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.table.columns
    }

    pub fn input_delimiter(&self) -> &str {
        &self.input_delimiter
    }

    pub fn output_delimiter(&self) -> &str {
        &self.output_delimiter
    }

    pub fn set_input_delimiter(&mut self, delimiter: impl Into<String>) -> Result<(), StoreError> {
        self.input_delimiter = non_empty(delimiter.into())?;
        Ok(())
    }

    pub fn set_output_delimiter(&mut self, delimiter: impl Into<String>) -> Result<(), StoreError> {
        self.output_delimiter = non_empty(delimiter.into())?;
        Ok(())
    }

    /// Compile `expression` against the current schema and make it the
    /// active filter. On failure the previous filter is kept.
    pub fn register_filter(&mut self, expression: &str) -> Result<(), FilterError> {
        let filter = Filter::compile(expression, &self.table.columns)?;
        debug!(filter = filter.source(), "registered filter");
        self.filter = Some(filter);
        Ok(())
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    /// Evaluate the registered filter against data row `row`.
    pub fn evaluate(&self, row: usize) -> FilterOutcome {
        let Some(filter) = &self.filter else {
            return FilterOutcome::Error(EvalError::NoFilter);
        };
        let Some(cells) = self.data_row(row) else {
            return FilterOutcome::Error(EvalError::RowOutOfRange {
                row,
                rows: self.row_count(),
            });
        };

        match filter.matches(row, cells) {
            Ok(true) => FilterOutcome::Match,
            Ok(false) => FilterOutcome::NoMatch,
            Err(e) => FilterOutcome::Error(e),
        }
    }

    /// Join the selected cells of `row` with the output delimiter.
    pub fn render_row(&self, row: usize, mask: &SelectionMask) -> Result<String, StoreError> {
        if mask.len() != self.column_count() {
            return Err(StoreError::MaskLength {
                expected: self.column_count(),
                found: mask.len(),
            });
        }
        let cells = self.table.rows.get(row).ok_or(StoreError::RowOutOfRange {
            row,
            rows: self.row_count(),
        })?;

        let selected: Vec<&str> = cells
            .iter()
            .enumerate()
            .filter(|(i, _)| mask.is_selected(*i))
            .map(|(_, cell)| cell.as_str())
            .collect();
        Ok(selected.join(&self.output_delimiter))
    }

    fn data_row(&self, row: usize) -> Option<&[String]> {
        if row == 0 {
            return None;
        }
        self.table.rows.get(row).map(Vec::as_slice)
    }
}

impl Default for DsvStore {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty(delimiter: String) -> Result<String, StoreError> {
    if delimiter.is_empty() {
        Err(StoreError::EmptyDelimiter)
    } else {
        Ok(delimiter)
    }
}

fn split(line: &str, delimiter: &str) -> Vec<String> {
    line.split(delimiter).map(str::to_string).collect()
}

fn parse_table(path: &Path, contents: &str, delimiter: &str) -> Result<Table, StoreError> {
    let mut lines = contents
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines.next().ok_or_else(|| StoreError::EmptyFile {
        path: path.to_path_buf(),
    })?;

    let header = split(header, delimiter);
    let columns: Vec<ColumnDescriptor> = header
        .iter()
        .map(|cell| ColumnDescriptor::from_header(cell))
        .collect();

    for (i, column) in columns.iter().enumerate() {
        if columns[..i].iter().any(|earlier| earlier.name == column.name) {
            return Err(StoreError::DuplicateColumn {
                name: column.name.clone(),
            });
        }
    }

    let mut rows = vec![header];
    for (line, text) in lines {
        let cells = split(text, delimiter);
        if cells.len() != columns.len() {
            return Err(StoreError::RaggedRow {
                line,
                expected: columns.len(),
                found: cells.len(),
            });
        }
        rows.push(cells);
    }

    Ok(Table {
        file_name: path.display().to_string(),
        columns,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnKind;

    fn table(contents: &str, delimiter: &str) -> Result<Table, StoreError> {
        parse_table(Path::new("fruit.dsv"), contents, delimiter)
    }

    #[test]
    fn test_parse_header_and_rows() {
        let table = table("id_n|name_s|qty_n\n1|apple|5\n2|grape|0\n", "|").unwrap();
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.columns[1].name, "name");
        assert_eq!(table.columns[1].kind, ColumnKind::String);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[2], vec!["2", "grape", "0"]);
    }

    #[test]
    fn test_blank_lines_and_crlf() {
        let table = table("a_n,b_s\r\n\r\n1,x\r\n\n2,y\r\n", ",").unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[1], vec!["1", "x"]);
    }

    #[test]
    fn test_multi_character_delimiter() {
        let table = table("a_n::b_s\n1::x::y\n", "::");
        assert!(matches!(
            table,
            Err(StoreError::RaggedRow {
                line: 2,
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn test_empty_file() {
        assert!(matches!(table("\n  \n", "|"), Err(StoreError::EmptyFile { .. })));
    }

    #[test]
    fn test_duplicate_columns() {
        let err = table("Qty_n|qty_s\n", "|").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateColumn { name } if name == "qty"));
    }

    #[test]
    fn test_evaluate_without_filter() {
        let store = DsvStore::new();
        assert_eq!(store.evaluate(1), FilterOutcome::Error(EvalError::NoFilter));
    }

    #[test]
    fn test_empty_delimiter_rejected() {
        let mut store = DsvStore::new();
        assert!(matches!(
            store.set_output_delimiter(""),
            Err(StoreError::EmptyDelimiter)
        ));
        assert_eq!(store.output_delimiter(), DEFAULT_DELIMITER);
    }
}
