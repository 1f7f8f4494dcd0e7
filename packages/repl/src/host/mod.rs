//! Host implementations for the console.
//!
//! The terminal host uses Reedline for interactive terminal I/O.

pub mod terminal;

pub use terminal::TerminalHost;
