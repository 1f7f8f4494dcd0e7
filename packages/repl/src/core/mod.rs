//! Platform-independent console core.
//!
//! This module contains the session loop, which interacts only through the
//! `IoHost` trait. Each input line is recorded in history, classified, and
//! then either handled as an administrative command or run as a data query
//! against the loaded store.

use std::time::Instant;

use dsvq_store::FilterOutcome;
use tracing::{debug, warn};

use crate::commands::{self, Command};
use crate::format;
use crate::io::{ExitReason, IoError, IoHost, Output, PromptConfig, Signal};
use crate::query::ParsedQuery;
use crate::session::Session;

/// What the loop does after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Tally of a completed (or aborted) row scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub matches: usize,
    pub aborted: bool,
}

/// The platform-independent console core.
pub struct ReplCore {
    session: Session,
}

impl ReplCore {
    /// Create a core with nothing loaded.
    pub fn new() -> Self {
        Self::with_session(Session::default())
    }

    pub fn with_session(session: Session) -> Self {
        Self { session }
    }

    /// Run the session loop, reading/writing through the provided I/O host.
    pub fn run(&mut self, io: &mut impl IoHost) -> Result<ExitReason, IoError> {
        io.write_output(Output::banner(BANNER))?;

        loop {
            self.update_prompt(io)?;
            io.wait_for_input()?;

            if let Some(signal) = io.read_signal()? {
                match signal {
                    Signal::Eof => {
                        io.write_output(Output::info("Goodbye!"))?;
                        io.flush()?;
                        return Ok(ExitReason::Eof);
                    }
                    Signal::Interrupt => {
                        io.write_output(Output::info("^C (use 'exit' to quit)"))?;
                        continue;
                    }
                }
            }

            let input = match io.read_input()? {
                Some(input) => input,
                None => continue,
            };

            let line = input.line.trim();
            if line.is_empty() {
                continue;
            }

            if self.handle_line(line, io)? == Flow::Exit {
                io.write_output(Output::info("Goodbye!"))?;
                io.flush()?;
                return Ok(ExitReason::UserExit);
            }

            io.flush()?;
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Record, classify and execute one trimmed, non-empty line.
    fn handle_line(&mut self, line: &str, io: &mut impl IoHost) -> Result<Flow, IoError> {
        let recorded = self.session.history_mut().record(line);
        let mut command = commands::classify(line);

        // Replay rewrites the line once; the history text is classified again.
        if let Command::Exec(arg) = &command {
            match self.session.resolve_replay(arg) {
                Ok(text) => {
                    if recorded {
                        self.session.history_mut().discard_last();
                    }
                    debug!(replayed = %text, "replaying history entry");
                    io.write_output(Output::info(format!("Query: {}", text)))?;
                    command = commands::classify(&text);
                }
                Err(e) => {
                    io.write_output(Output::error(e.to_string()))?;
                    return Ok(Flow::Continue);
                }
            }
        }

        debug!(?command, "classified input");
        self.dispatch(command, io)
    }

    fn dispatch(&mut self, command: Command, io: &mut impl IoHost) -> Result<Flow, IoError> {
        match command {
            Command::Exit => return Ok(Flow::Exit),
            Command::Help => io.write_output(Output::normal(commands::format_help()))?,
            Command::List => {
                let output = match format::columns_table(self.session.store()) {
                    Some(table) => Output::normal(table),
                    None => Output::info("No valid columns available."),
                };
                io.write_output(output)?;
            }
            Command::Load(path) => self.load(&path, io)?,
            Command::History => {
                io.write_output(Output::normal(format::history(self.session.history())))?
            }
            Command::OutputDelimiter(arg) => self.set_delimiter(&arg, Delimiter::Output, io)?,
            Command::InputDelimiter(arg) => self.set_delimiter(&arg, Delimiter::Input, io)?,
            Command::Information => {
                io.write_output(Output::normal(format::information(self.session.store())))?
            }
            Command::Exec(_) => {
                io.write_output(Output::error("exec cannot replay another exec"))?;
            }
            Command::Query(text) => self.run_query(&text, io)?,
        }
        Ok(Flow::Continue)
    }

    fn load(&mut self, path: &str, io: &mut impl IoHost) -> Result<(), IoError> {
        if path.is_empty() {
            return io.write_output(Output::error("Usage: load <file>"));
        }

        let started = Instant::now();
        match self.session.store_mut().load(path) {
            Ok(()) => {
                self.session.sync_selection();
                io.write_output(Output::info(format::load_summary(path, started.elapsed())))
            }
            Err(e) => {
                warn!(path, error = %e, "load failed");
                io.write_output(Output::error(format!("Failed to load: {}: {}", path, e)))
            }
        }
    }

    fn set_delimiter(
        &mut self,
        arg: &str,
        which: Delimiter,
        io: &mut impl IoHost,
    ) -> Result<(), IoError> {
        let Some(value) = commands::parse_delimiter_arg(arg) else {
            return io.write_output(Output::error(format!(
                "Invalid format for command. eg: {} = |",
                which.keyword()
            )));
        };

        let store = self.session.store_mut();
        let result = match which {
            Delimiter::Input => store.set_input_delimiter(value.as_str()),
            Delimiter::Output => store.set_output_delimiter(value.as_str()),
        };
        match result {
            Ok(()) => io.write_output(Output::info(format!(
                "{} set to: {}",
                which.label(),
                value
            ))),
            Err(e) => io.write_output(Output::error(e.to_string())),
        }
    }

    fn run_query(&mut self, text: &str, io: &mut impl IoHost) -> Result<(), IoError> {
        let parsed = match self.session.prepare_query(text) {
            Ok(parsed) => parsed,
            Err(rejection) if rejection.is_silent() => {
                debug!(%rejection, "query rejected");
                return Ok(());
            }
            Err(rejection) => return io.write_output(Output::error(rejection.to_string())),
        };

        if let Err(e) = self.session.store_mut().register_filter(&parsed.filter) {
            return io.write_output(Output::error(e.to_string()));
        }

        let started = Instant::now();
        let summary = self.scan(&parsed, io)?;
        debug!(
            matches = summary.matches,
            aborted = summary.aborted,
            "scan finished"
        );
        io.write_output(Output::info(format::results_footer(
            summary.matches,
            started.elapsed(),
        )))
    }

    /// Evaluate every data row, writing matches as they are found. An
    /// evaluator error stops the scan; rows already written stay written.
    fn scan(&self, query: &ParsedQuery, io: &mut impl IoHost) -> Result<ScanSummary, IoError> {
        let store = self.session.store();
        let mut summary = ScanSummary {
            matches: 0,
            aborted: false,
        };

        for row in 1..store.row_count() {
            match store.evaluate(row) {
                FilterOutcome::Match => {
                    if !query.count_mode {
                        match store.render_row(row, &query.selection) {
                            Ok(rendered) => io.write_output(Output::normal(rendered))?,
                            Err(e) => {
                                io.write_output(Output::error(e.to_string()))?;
                                summary.aborted = true;
                                break;
                            }
                        }
                    }
                    summary.matches += 1;
                }
                FilterOutcome::NoMatch => {}
                FilterOutcome::Error(e) => {
                    io.write_output(Output::error(e.to_string()))?;
                    summary.aborted = true;
                    break;
                }
            }
        }

        Ok(summary)
    }

    fn update_prompt(&self, io: &mut impl IoHost) -> Result<(), IoError> {
        let store = self.session.store();
        io.write_prompt(PromptConfig {
            file_name: store.is_loaded().then(|| store.file_name().to_string()),
            data_rows: store.row_count().saturating_sub(1),
            columns: store.columns().iter().map(|c| c.name.clone()).collect(),
        })
    }
}

impl Default for ReplCore {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
enum Delimiter {
    Input,
    Output,
}

impl Delimiter {
    fn keyword(self) -> &'static str {
        match self {
            Delimiter::Input => "input_delimiter",
            Delimiter::Output => "output_delimiter",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Delimiter::Input => "Input delimiter",
            Delimiter::Output => "Output delimiter",
        }
    }
}

const BANNER: &str = r#"
     _
  __| |_____   ____ _
 / _` / __\ \ / / _` |
| (_| \__ \\ V / (_| |
 \__,_|___/ \_/ \__, |
                   |_|

Type 'help' for available commands, 'exit' to quit.
"#;
