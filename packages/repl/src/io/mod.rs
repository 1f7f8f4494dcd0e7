//! I/O abstraction for the console.
//!
//! The session loop never touches the terminal directly. It reads lines and
//! writes rows, tables and messages through `IoHost`, so the same loop runs
//! against Reedline in the binary and against an in-memory host in tests.

pub mod types;

#[cfg(test)]
pub mod test_host;

pub use types::*;

#[cfg(test)]
pub use test_host::TestHost;

/// Error type for host I/O.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Io(e.to_string())
    }
}

/// Host interface used by the session loop.
pub trait IoHost {
    /// Block until the user has entered a line or raised a signal.
    fn wait_for_input(&mut self) -> Result<(), IoError>;

    /// Take the pending input line, if any.
    fn read_input(&mut self) -> Result<Option<InputLine>, IoError>;

    /// Take the pending signal (Ctrl+C, Ctrl+D), if any.
    fn read_signal(&mut self) -> Result<Option<Signal>, IoError>;

    /// Write one message, table or result row.
    fn write_output(&mut self, output: Output) -> Result<(), IoError>;

    /// Update what the next prompt shows.
    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError>;

    /// Flush buffered output. Called once per processed line.
    fn flush(&mut self) -> Result<(), IoError> {
        Ok(())
    }
}
