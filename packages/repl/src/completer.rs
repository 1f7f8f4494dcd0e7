use std::sync::{Arc, RwLock};

use reedline::{Completer, Span, Suggestion};

/// Words that may start a line.
const COMMANDS: &[&str] = &[
    "help",
    "exit",
    "quit",
    "list",
    "load",
    "history",
    "exec",
    "information",
    "input_delimiter",
    "output_delimiter",
    "select",
    "count",
];

/// Completes command keywords at the start of a line and column names
/// anywhere after it.
///
/// The column list is shared with the host, which replaces it whenever the
/// loaded schema changes.
pub struct ReplCompleter {
    columns: Arc<RwLock<Vec<String>>>,
}

impl ReplCompleter {
    pub fn new() -> Self {
        Self::with_columns(Vec::new())
    }

    pub fn with_columns(columns: Vec<String>) -> Self {
        Self::shared(Arc::new(RwLock::new(columns)))
    }

    pub fn shared(columns: Arc<RwLock<Vec<String>>>) -> Self {
        Self { columns }
    }

    fn column_names(&self) -> Vec<String> {
        match self.columns.read() {
            Ok(columns) => columns.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Default for ReplCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for ReplCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let Some(line_to_pos) = line.get(..pos) else {
            return Vec::new();
        };

        let start = line_to_pos
            .rfind(|c: char| c.is_whitespace() || matches!(c, ',' | '|' | '(' | '!'))
            .map(|i| i + 1)
            .unwrap_or(0);
        let prefix = line_to_pos[start..].to_lowercase();
        let first_word = line_to_pos[..start].trim().is_empty();

        let mut suggestions = Vec::new();

        if first_word {
            for cmd in COMMANDS.iter().filter(|cmd| cmd.starts_with(&prefix)) {
                suggestions.push(suggestion(cmd, command_description(cmd), start, pos));
            }
        }

        if !prefix.is_empty() || !first_word {
            for column in self
                .column_names()
                .iter()
                .filter(|column| column.starts_with(&prefix))
            {
                suggestions.push(suggestion(column, "column".to_string(), start, pos));
            }
        }

        suggestions
    }
}

fn suggestion(value: &str, description: String, start: usize, pos: usize) -> Suggestion {
    Suggestion {
        value: value.to_string(),
        description: Some(description),
        style: None,
        extra: None,
        span: Span::new(start, pos),
        append_whitespace: true,
        match_indices: None,
    }
}

fn command_description(cmd: &str) -> String {
    match cmd {
        "help" => "Show help".to_string(),
        "exit" | "quit" => "Exit the console".to_string(),
        "list" => "List columns".to_string(),
        "load" => "Load a file".to_string(),
        "history" => "Show query history".to_string(),
        "exec" => "Replay a history entry".to_string(),
        "information" => "Show file information".to_string(),
        "input_delimiter" => "Set the delimiter used for loading".to_string(),
        "output_delimiter" => "Set the delimiter used for printing".to_string(),
        "select" => "Project columns: select a, b | <filter>".to_string(),
        "count" => "Count matches: count | <filter>".to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(suggestions: Vec<Suggestion>) -> Vec<String> {
        suggestions.into_iter().map(|s| s.value).collect()
    }

    #[test]
    fn completes_commands_at_line_start() {
        let mut completer = ReplCompleter::new();
        assert_eq!(
            values(completer.complete("lo", 2)),
            vec!["load".to_string()]
        );
        assert_eq!(
            values(completer.complete("in", 2)),
            vec!["information".to_string(), "input_delimiter".to_string()]
        );
    }

    #[test]
    fn completes_columns_after_first_word() {
        let mut completer =
            ReplCompleter::with_columns(vec!["name".to_string(), "qty".to_string()]);

        let suggestions = completer.complete("select id, na", 13);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].value, "name");
        assert_eq!(suggestions[0].span, Span::new(11, 13));

        assert_eq!(
            values(completer.complete("count | q", 9)),
            vec!["qty".to_string()]
        );
    }

    #[test]
    fn query_may_start_with_column() {
        let mut completer = ReplCompleter::with_columns(vec!["count_total".to_string()]);
        assert_eq!(
            values(completer.complete("cou", 3)),
            vec!["count".to_string(), "count_total".to_string()]
        );
    }

    #[test]
    fn shared_columns_track_updates() {
        let columns = Arc::new(RwLock::new(vec!["qty".to_string()]));
        let mut completer = ReplCompleter::shared(Arc::clone(&columns));
        assert_eq!(
            values(completer.complete("count | q", 9)),
            vec!["qty".to_string()]
        );

        *columns.write().unwrap() = vec!["quality".to_string()];
        assert_eq!(
            values(completer.complete("count | q", 9)),
            vec!["quality".to_string()]
        );
    }

    #[test]
    fn cursor_inside_multibyte_char() {
        let mut completer = ReplCompleter::new();
        assert!(completer.complete("é", 1).is_empty());
    }
}
