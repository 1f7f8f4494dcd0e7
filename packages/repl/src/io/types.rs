//! I/O types for the console.
//!
//! These types define the interface between the console core and its host environment.

use serde::{Deserialize, Serialize};

/// A line of input from the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputLine {
    pub line: String,
}

/// A signal from the host (Ctrl+C, Ctrl+D, etc.).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "lowercase")]
pub enum Signal {
    /// User pressed Ctrl+C (interrupt).
    Interrupt,
    /// User pressed Ctrl+D (end of file).
    Eof,
}

/// Output to be written by the console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub text: String,
    #[serde(default)]
    pub style: OutputStyle,
}

impl Output {
    pub fn normal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: OutputStyle::Normal,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: OutputStyle::Error,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: OutputStyle::Info,
        }
    }

    pub fn banner(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: OutputStyle::Banner,
        }
    }
}

/// Style hint for output rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    /// Normal output (already contains ANSI codes if applicable).
    #[default]
    Normal,
    /// Error message (host may add red prefix).
    Error,
    /// Informational message (host may style in cyan).
    Info,
    /// Banner/startup message.
    Banner,
}

/// Prompt configuration sent from core to host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Loaded file, if any.
    pub file_name: Option<String>,
    /// Data rows in the loaded file (header excluded).
    pub data_rows: usize,
    /// Column names of the loaded file, offered by completion.
    #[serde(default)]
    pub columns: Vec<String>,
}

/// Reason the console exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// User typed 'exit' or 'quit'.
    UserExit,
    /// User pressed Ctrl+D.
    Eof,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_serializes_style_in_lowercase() {
        let json = serde_json::to_value(Output::error("bad column")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "text": "bad column", "style": "error" })
        );
    }

    #[test]
    fn output_style_defaults_to_normal() {
        let output: Output = serde_json::from_str(r#"{ "text": "1|apple|5" }"#).unwrap();
        assert_eq!(output.style, OutputStyle::Normal);
    }

    #[test]
    fn signal_is_tagged() {
        let json = serde_json::to_string(&Signal::Eof).unwrap();
        assert_eq!(json, r#"{"signal":"eof"}"#);
    }
}
