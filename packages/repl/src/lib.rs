//! # dsvq-repl
//!
//! An interactive query console for delimiter-separated value files.
//!
//! A file with a typed header (`id_n|name_s|qty_n`) is loaded into a
//! [`dsvq_store::DsvStore`]; every line typed at the prompt is then either an
//! administrative command or a data query evaluated against each row.
//!
//! ## Features
//!
//! - Filter rows with a typed expression language (`qty > 3 and name like 'gr*'`)
//! - Project columns with `select id, name | <filter>`
//! - Count matches with `count | <filter>`
//! - Numbered history with `exec <n>` replay
//! - Independent input and output delimiters
//! - Tab completion, highlighting and vi/emacs editing (`DSVQ_EDIT_MODE`)
//!
//! ## Usage
//!
//! ```bash
//! dsvq fruit.dsv
//!
//! # Inside the console:
//! > list
//! > select name | qty >= 5
//! > count | name like 'gr*'
//! > history
//! > exec 1
//! ```

pub mod commands;
pub mod completer;
pub mod core;
pub mod format;
pub mod highlighter;
pub mod history;
pub mod host;
pub mod io;
pub mod query;
pub mod repl;
pub mod session;

pub use self::core::ReplCore;
pub use repl::{run, ReplError};
pub use session::Session;
