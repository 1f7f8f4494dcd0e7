use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

use crate::query::CLAUSE_SEPARATOR;

/// Syntax highlighter for console input.
///
/// Administrative commands are cyan. In a data query the directive is
/// magenta, the clause separator dim, quoted strings green and the filter
/// otherwise unstyled.
pub struct ReplHighlighter {
    commands: Vec<&'static str>,
    directives: Vec<&'static str>,
}

impl ReplHighlighter {
    pub fn new() -> Self {
        Self {
            commands: vec![
                "help",
                "exit",
                "quit",
                "list",
                "load",
                "history",
                "exec",
                "info",
                "information",
                "input_delimiter",
                "output_delimiter",
            ],
            directives: vec!["select", "count"],
        }
    }
}

impl Default for ReplHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for ReplHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();

        if line.is_empty() {
            return styled;
        }

        let split = line
            .find(|c: char| c.is_whitespace() || c == '=' || c == ',')
            .unwrap_or(line.len());
        let (word, rest) = line.split_at(split);
        let word_lower = word.to_lowercase();

        if self.commands.contains(&word_lower.as_str()) {
            styled.push((Style::new().bold().fg(Color::Cyan), word.to_string()));
            if !rest.is_empty() {
                styled.push((Style::new().fg(Color::Yellow), rest.to_string()));
            }
            return styled;
        }

        let filter = match line.find(CLAUSE_SEPARATOR) {
            Some(sep) if self.directives.contains(&word_lower.as_str()) => {
                styled.push((Style::new().bold().fg(Color::Magenta), word.to_string()));
                styled.push((Style::new(), line[split..sep].to_string()));
                styled.push((
                    Style::new().fg(Color::DarkGray),
                    CLAUSE_SEPARATOR.to_string(),
                ));
                &line[sep + CLAUSE_SEPARATOR.len_utf8()..]
            }
            _ => line,
        };

        push_filter(&mut styled, filter);
        styled
    }
}

/// Style a filter expression, marking quoted strings.
fn push_filter(styled: &mut StyledText, filter: &str) {
    let mut plain = String::new();
    let mut quoted = String::new();
    let mut in_string = false;

    for c in filter.chars() {
        if in_string {
            quoted.push(c);
            if c == '\'' {
                styled.push((Style::new().fg(Color::Green), std::mem::take(&mut quoted)));
                in_string = false;
            }
        } else if c == '\'' {
            if !plain.is_empty() {
                styled.push((Style::new(), std::mem::take(&mut plain)));
            }
            quoted.push(c);
            in_string = true;
        } else {
            plain.push(c);
        }
    }

    if !plain.is_empty() {
        styled.push((Style::new(), plain));
    }
    if !quoted.is_empty() {
        styled.push((Style::new().fg(Color::Green), quoted));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_empty_returns_empty() {
        let highlighter = ReplHighlighter::new();
        let styled = highlighter.highlight("", 0);
        assert!(styled.buffer.is_empty());
    }

    #[test]
    fn highlight_command_only() {
        let highlighter = ReplHighlighter::new();
        let styled = highlighter.highlight("list", 0);
        assert_eq!(styled.buffer.len(), 1);
        assert_eq!(styled.buffer[0].1, "list");
        assert_eq!(styled.buffer[0].0.foreground, Some(Color::Cyan));
        assert!(styled.buffer[0].0.is_bold);
    }

    #[test]
    fn highlight_command_with_argument() {
        let highlighter = ReplHighlighter::new();
        let styled = highlighter.highlight("load data/fruit.dsv", 0);
        assert_eq!(styled.buffer.len(), 2);
        assert_eq!(styled.buffer[1].1, " data/fruit.dsv");
        assert_eq!(styled.buffer[1].0.foreground, Some(Color::Yellow));
    }

    #[test]
    fn highlight_delimiter_command_without_space() {
        let highlighter = ReplHighlighter::new();
        let styled = highlighter.highlight("OUTPUT_DELIMITER=,", 0);
        assert_eq!(styled.buffer[0].1, "OUTPUT_DELIMITER");
        assert_eq!(styled.buffer[0].0.foreground, Some(Color::Cyan));
        assert_eq!(styled.buffer[1].1, "=,");
    }

    #[test]
    fn highlight_select_query() {
        let highlighter = ReplHighlighter::new();
        let styled = highlighter.highlight("select id, name | name == 'fig'", 0);

        let parts: Vec<_> = styled.buffer.iter().map(|(_, s)| s.as_str()).collect();
        assert_eq!(
            parts,
            vec!["select", " id, name ", "|", " name == ", "'fig'"]
        );
        assert_eq!(styled.buffer[0].0.foreground, Some(Color::Magenta));
        assert_eq!(styled.buffer[2].0.foreground, Some(Color::DarkGray));
        assert_eq!(styled.buffer[4].0.foreground, Some(Color::Green));
    }

    #[test]
    fn highlight_plain_filter() {
        let highlighter = ReplHighlighter::new();
        let styled = highlighter.highlight("qty > 3", 0);
        assert_eq!(styled.buffer.len(), 1);
        assert_eq!(styled.buffer[0].1, "qty > 3");
        assert_eq!(styled.buffer[0].0.foreground, None);
    }

    #[test]
    fn highlight_directive_without_separator_is_filter() {
        let highlighter = ReplHighlighter::new();
        let styled = highlighter.highlight("count > 3", 0);
        assert_eq!(styled.buffer.len(), 1);
        assert_eq!(styled.buffer[0].0.foreground, None);
    }

    #[test]
    fn highlight_unterminated_string() {
        let highlighter = ReplHighlighter::new();
        let styled = highlighter.highlight("name == 'gr", 0);
        assert_eq!(styled.buffer.len(), 2);
        assert_eq!(styled.buffer[1].1, "'gr");
        assert_eq!(styled.buffer[1].0.foreground, Some(Color::Green));
    }
}
