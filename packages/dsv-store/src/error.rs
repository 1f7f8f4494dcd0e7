//! Error types for the store and the filter evaluator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a file or rendering rows.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file contains no header line.
    #[error("'{}' is empty; a header line is required", path.display())]
    EmptyFile { path: PathBuf },

    /// Two header cells resolve to the same column name.
    #[error("duplicate column name '{name}' in header")]
    DuplicateColumn { name: String },

    /// A data row does not have as many cells as the header.
    #[error("line {line}: expected {expected} cells, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Delimiters must contain at least one character.
    #[error("delimiter must not be empty")]
    EmptyDelimiter,

    /// Row index past the end of the loaded data.
    #[error("row {row} out of range (rows: {rows})")]
    RowOutOfRange { row: usize, rows: usize },

    /// Selection mask does not line up with the schema.
    #[error("selection mask has {found} entries but the store has {expected} columns")]
    MaskLength { expected: usize, found: usize },
}

/// Errors raised while compiling a filter expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("Error - empty filter expression")]
    Empty,

    #[error("Error - syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("Error - unknown column '{name}' at position {position}")]
    UnknownColumn { name: String, position: usize },

    #[error("Error - column '{name}' has no declared type (suffix the header with _n or _s)")]
    UntypedColumn { name: String },

    #[error("Error - type mismatch: {message}")]
    Type { message: String },

    #[error("Error - invalid pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
}

/// Errors raised while evaluating a compiled filter against a row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Error - no filter registered")]
    NoFilter,

    #[error("Error - row {row} out of range (rows: {rows})")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("Error - row {row}, column '{column}': '{value}' is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Error - row {row}: invalid pattern '{pattern}': {message}")]
    Pattern {
        row: usize,
        pattern: String,
        message: String,
    },
}
