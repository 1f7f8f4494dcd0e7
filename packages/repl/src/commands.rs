//! Console command classification.
//!
//! Commands:
//! - `exit` / `quit` - End the session
//! - `help` - Show help
//! - `list` - List columns and their types
//! - `load <file>` - Load a delimiter-separated file
//! - `history` - Show numbered query history
//! - `exec <n>` - Replay history entry `n`
//! - `input_delimiter = <s>` / `output_delimiter = <s>` - Set delimiters
//! - `information` / `info` - Show details of the loaded file
//!
//! Any other line is a data query:
//!
//! ```text
//! [select <col>[, <col>...] | count] | <filter expression>
//! ```

use nu_ansi_term::{Color, Style};

/// A classified input line. Argument-taking commands carry the text that
/// followed the keyword, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Help,
    List,
    Load(String),
    History,
    Exec(String),
    OutputDelimiter(String),
    InputDelimiter(String),
    Information,
    Query(String),
}

/// Classify a trimmed input line.
pub fn classify(line: &str) -> Command {
    let line = line.trim();

    if let Some(arg) = keyword_arg(line, "exec", false) {
        return Command::Exec(arg.to_string());
    }

    match line.to_ascii_lowercase().as_str() {
        "exit" | "quit" => return Command::Exit,
        "help" => return Command::Help,
        "list" => return Command::List,
        "history" => return Command::History,
        _ => {}
    }

    if let Some(arg) = keyword_arg(line, "load", false) {
        Command::Load(arg.to_string())
    } else if let Some(arg) = keyword_arg(line, "output_delimiter", true) {
        Command::OutputDelimiter(arg.to_string())
    } else if let Some(arg) = keyword_arg(line, "input_delimiter", true) {
        Command::InputDelimiter(arg.to_string())
    } else if keyword_arg(line, "information", false).is_some()
        || keyword_arg(line, "info", false).is_some()
    {
        Command::Information
    } else {
        Command::Query(line.to_string())
    }
}

/// If `line` starts with `keyword` (ignoring case) and the keyword ends at a
/// word boundary, return the rest of the line. Delimiter commands may also
/// run straight into `=`.
fn keyword_arg<'a>(line: &'a str, keyword: &str, allow_equals: bool) -> Option<&'a str> {
    let head = line.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }

    let rest = &line[keyword.len()..];
    match rest.chars().next() {
        None => Some(""),
        Some(c) if c.is_whitespace() => Some(rest.trim()),
        Some('=') if allow_equals => Some(rest.trim()),
        Some(_) => None,
    }
}

/// Extract the value from a delimiter command argument of the form
/// `= <value>`. Surrounding whitespace and quotes are stripped.
pub fn parse_delimiter_arg(arg: &str) -> Option<String> {
    let value = arg.trim().strip_prefix('=')?;
    let value = value.trim_matches(|c: char| c == ' ' || c == '\t' || c == '\'' || c == '"');
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse the history index argument of `exec`.
pub fn parse_exec_index(arg: &str) -> Option<Result<usize, String>> {
    let token = arg.split_whitespace().next()?;
    Some(token.parse::<usize>().map_err(|_| token.to_string()))
}

/// Format help text
pub fn format_help() -> String {
    let cmd_style = Style::new().bold().fg(Color::Cyan);
    let arg_style = Style::new().fg(Color::Yellow);
    let desc_style = Style::new().fg(Color::White);

    let mut help = String::new();
    help.push_str(&format!(
        "{}\n\n",
        Style::new().bold().paint("DSV Query Commands")
    ));

    let commands = [
        ("list", "", "List columns and their types"),
        ("history", "", "Display history of queries"),
        ("load", "<file>", "Load a DSV file"),
        ("exec", "<n>", "Execute the n'th query found in history"),
        ("input_delimiter", "= <s>", "Set the input delimiter"),
        ("output_delimiter", "= <s>", "Set the output delimiter"),
        ("information", "", "Display details of the loaded file (alias: info)"),
        ("", "", ""),
        ("help", "", "Show this help message"),
        ("exit", "", "Exit the console (alias: quit)"),
    ];

    for (cmd, args, desc) in commands {
        if cmd.is_empty() {
            help.push('\n');
        } else {
            help.push_str(&format!(
                "  {:<18} {:<8} {}\n",
                cmd_style.paint(cmd),
                arg_style.paint(args),
                desc_style.paint(desc)
            ));
        }
    }

    help.push_str(&format!("\n{}\n", Style::new().bold().paint("Queries")));
    help.push_str(&format!(
        "  Filter rows:              {}\n",
        arg_style.paint("qty > 3 and name like 'gr*'")
    ));
    help.push_str(&format!(
        "  Choose output columns:    {}\n",
        arg_style.paint("select id, name | qty > 3")
    ));
    help.push_str(&format!(
        "  Count matching rows:      {}\n",
        arg_style.paint("count | 'grape' in name")
    ));

    help.push_str(&format!(
        "\n{}\n{}",
        Style::new().italic().paint(
            "Columns are named by their header without the _n/_s type suffix, ignoring case."
        ),
        Style::new().italic().paint(
            "Command keywords must be followed by a space (delimiters also accept '='): \
             'exec 0', not 'exec0'."
        )
    ));

    help
}
