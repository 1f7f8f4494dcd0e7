//! # dsvq-store
//!
//! An in-memory store for delimiter-separated text files with a typed
//! header, and a small expression language for filtering their rows.
//!
//! The first line of a file names the columns. A column whose header ends
//! in `_n` holds numbers, one ending in `_s` holds strings; the suffix is not
//! part of the column name. Names are case-insensitive.
//!
//! ## Usage
//!
//! ```no_run
//! use dsvq_store::{DsvStore, FilterOutcome, SelectionMask};
//!
//! let mut store = DsvStore::new();
//! store.set_input_delimiter(",")?;
//! store.load("fruit.csv")?;
//! store.register_filter("qty > 3 and name like 'gr*'")?;
//!
//! let mask = SelectionMask::all(store.column_count());
//! for row in 1..store.row_count() {
//!     if store.evaluate(row) == FilterOutcome::Match {
//!         println!("{}", store.render_row(row, &mask)?);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod column;
pub mod error;
pub mod expr;
pub mod store;

pub use column::{ColumnDescriptor, ColumnKind, SelectionMask};
pub use error::{EvalError, FilterError, StoreError};
pub use expr::Filter;
pub use store::{DsvStore, FilterOutcome, DEFAULT_DELIMITER};
