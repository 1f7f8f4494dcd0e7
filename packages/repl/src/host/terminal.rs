//! Terminal host implementation using Reedline.
//!
//! This host provides interactive terminal I/O with:
//! - Readline-style line editing (Vi and Emacs modes)
//! - Tab completion of commands, directives and column names
//! - Syntax highlighting
//! - Persistent line history

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use nu_ansi_term::{Color, Style};
use reedline::{
    default_emacs_keybindings, default_vi_insert_keybindings, default_vi_normal_keybindings,
    ColumnarMenu, DefaultHinter, EditCommand, EditMode, Emacs, KeyCode, KeyModifiers, MenuBuilder,
    Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus, Reedline,
    ReedlineEvent, ReedlineMenu, Signal as ReedlineSignal, Vi,
};
use tracing::{debug, warn};

use crate::completer::ReplCompleter;
use crate::highlighter::ReplHighlighter;
use crate::io::{InputLine, IoError, IoHost, Output, OutputStyle, PromptConfig, Signal};

/// Environment variable that forces the edit mode (`vi` or `emacs`).
pub const EDIT_MODE_VAR: &str = "DSVQ_EDIT_MODE";

/// Lines kept in the on-disk editor history.
const HISTORY_CAPACITY: usize = 1000;

/// Terminal host using Reedline for interactive I/O.
pub struct TerminalHost {
    line_editor: Reedline,
    pending_input: Option<InputLine>,
    pending_signal: Option<Signal>,
    current_prompt: PromptConfig,
    columns: Arc<RwLock<Vec<String>>>,
}

impl TerminalHost {
    /// Create a terminal host.
    pub fn new() -> io::Result<Self> {
        let columns = Arc::new(RwLock::new(Vec::new()));
        let completer = Box::new(ReplCompleter::shared(Arc::clone(&columns)));
        let highlighter = Box::new(ReplHighlighter::new());
        let hinter = Box::new(
            DefaultHinter::default().with_style(Style::new().fg(Color::LightGray).dimmed()),
        );

        let completion_menu = Box::new(
            ColumnarMenu::default()
                .with_name("completion_menu")
                .with_text_style(Style::new().fg(Color::Cyan))
                .with_selected_text_style(Style::new().fg(Color::Black).on(Color::Cyan).bold()),
        );

        let edit_mode: Box<dyn EditMode> = if should_use_vi_mode() {
            debug!("using vi edit mode");
            let mut insert_keybindings = default_vi_insert_keybindings();
            let normal_keybindings = default_vi_normal_keybindings();

            insert_keybindings.add_binding(
                KeyModifiers::NONE,
                KeyCode::Tab,
                ReedlineEvent::UntilFound(vec![
                    ReedlineEvent::Menu("completion_menu".to_string()),
                    ReedlineEvent::MenuNext,
                ]),
            );

            Box::new(Vi::new(insert_keybindings, normal_keybindings))
        } else {
            let mut keybindings = default_emacs_keybindings();
            keybindings.add_binding(
                KeyModifiers::NONE,
                KeyCode::Tab,
                ReedlineEvent::UntilFound(vec![
                    ReedlineEvent::Menu("completion_menu".to_string()),
                    ReedlineEvent::MenuNext,
                ]),
            );
            keybindings.add_binding(
                KeyModifiers::CONTROL,
                KeyCode::Char('d'),
                ReedlineEvent::Edit(vec![EditCommand::Clear]),
            );

            Box::new(Emacs::new(keybindings))
        };

        let mut line_editor = Reedline::create()
            .with_completer(completer)
            .with_highlighter(highlighter)
            .with_hinter(hinter)
            .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
            .with_edit_mode(edit_mode);

        if let Some(history_path) = history_path() {
            if let Some(parent) = history_path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match reedline::FileBackedHistory::with_file(HISTORY_CAPACITY, history_path.clone()) {
                Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
                Err(e) => warn!(path = %history_path.display(), error = %e, "editor history unavailable"),
            }
        }

        Ok(Self {
            line_editor,
            pending_input: None,
            pending_signal: None,
            current_prompt: PromptConfig::default(),
            columns,
        })
    }
}

impl IoHost for TerminalHost {
    fn wait_for_input(&mut self) -> Result<(), IoError> {
        let prompt = TerminalPrompt::from_config(&self.current_prompt);

        match self.line_editor.read_line(&prompt) {
            Ok(ReedlineSignal::Success(line)) => {
                self.pending_input = Some(InputLine { line });
            }
            Ok(ReedlineSignal::CtrlC) => {
                self.pending_signal = Some(Signal::Interrupt);
            }
            Ok(ReedlineSignal::CtrlD) => {
                self.pending_signal = Some(Signal::Eof);
            }
            Err(e) => {
                return Err(IoError::Io(format!("Reedline error: {}", e)));
            }
        }

        Ok(())
    }

    fn read_input(&mut self) -> Result<Option<InputLine>, IoError> {
        Ok(self.pending_input.take())
    }

    fn read_signal(&mut self) -> Result<Option<Signal>, IoError> {
        Ok(self.pending_signal.take())
    }

    fn write_output(&mut self, output: Output) -> Result<(), IoError> {
        // Result rows go out unstyled so they can be piped and copied.
        let styled = match output.style {
            OutputStyle::Normal => output.text,
            OutputStyle::Error => Color::Red.paint(&output.text).to_string(),
            OutputStyle::Info => Color::Cyan.paint(&output.text).to_string(),
            OutputStyle::Banner => Color::Cyan.bold().paint(&output.text).to_string(),
        };
        println!("{}", styled);
        Ok(())
    }

    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError> {
        // Completion follows the schema of whatever file is loaded now.
        match self.columns.write() {
            Ok(mut columns) => columns.clone_from(&config.columns),
            Err(poisoned) => poisoned.into_inner().clone_from(&config.columns),
        }
        self.current_prompt = config;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), IoError> {
        io::stdout().flush().map_err(IoError::from)
    }
}

/// Prompt showing the loaded file and its row count.
struct TerminalPrompt {
    file_name: Option<String>,
    data_rows: usize,
}

impl TerminalPrompt {
    fn from_config(config: &PromptConfig) -> Self {
        Self {
            file_name: config.file_name.clone(),
            data_rows: config.data_rows,
        }
    }
}

impl Prompt for TerminalPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        match &self.file_name {
            None => Cow::Owned(Color::Yellow.paint("no file").to_string()),
            Some(name) => Cow::Owned(format!(
                "{} {}",
                Color::Blue.bold().paint(name),
                Color::Yellow.paint(format!("({} rows)", self.data_rows))
            )),
        }
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, edit_mode: PromptEditMode) -> Cow<'_, str> {
        match edit_mode {
            PromptEditMode::Default | PromptEditMode::Emacs => {
                Cow::Owned(format!(" {} ", Color::Green.bold().paint(">")))
            }
            PromptEditMode::Vi(vi_mode) => {
                let indicator = match vi_mode {
                    reedline::PromptViMode::Normal => Color::Blue.bold().paint("[N]>"),
                    reedline::PromptViMode::Insert => Color::Green.bold().paint("[I]>"),
                };
                Cow::Owned(format!(" {} ", indicator))
            }
            PromptEditMode::Custom(s) => Cow::Owned(format!(" ({})> ", s)),
        }
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed(": ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse-search: {}) ",
            prefix, history_search.term
        ))
    }
}

fn history_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("dsvq").join("history.txt"))
}

/// Decide the edit mode. An explicit `DSVQ_EDIT_MODE` wins; otherwise vi
/// mode follows `EDITOR`, `VISUAL` or the readline configuration.
fn should_use_vi_mode() -> bool {
    if let Ok(mode) = std::env::var(EDIT_MODE_VAR) {
        return is_vi(&mode);
    }

    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = std::env::var(var) {
            if is_vi_editor(&editor) {
                return true;
            }
        }
    }

    check_inputrc_vi_mode()
}

fn is_vi(mode: &str) -> bool {
    let mode = mode.trim().to_lowercase();
    mode == "vi" || mode == "vim"
}

fn is_vi_editor(editor: &str) -> bool {
    let editor = editor.to_lowercase();
    editor.contains("vim") || editor == "vi" || editor.ends_with("/vi")
}

/// Check .inputrc for `set editing-mode vi`.
fn check_inputrc_vi_mode() -> bool {
    let inputrc_paths = [
        std::env::var("INPUTRC").ok().map(PathBuf::from),
        dirs::home_dir().map(|p| p.join(".inputrc")),
        Some(PathBuf::from("/etc/inputrc")),
    ];

    inputrc_paths
        .into_iter()
        .flatten()
        .filter_map(|path| std::fs::read_to_string(path).ok())
        .any(|content| content.lines().any(inputrc_sets_vi))
}

fn inputrc_sets_vi(line: &str) -> bool {
    let mut words = line.split_whitespace();
    words.next() == Some("set")
        && words.next() == Some("editing-mode")
        && words.next() == Some("vi")
}
