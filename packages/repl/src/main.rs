use std::path::PathBuf;

use clap::Parser;
use dsvq_repl::host::terminal::EDIT_MODE_VAR;
use dsvq_repl::Session;
use dsvq_store::{DsvStore, DEFAULT_DELIMITER};
use tracing_subscriber::EnvFilter;

/// dsvq - Interactive query console for delimiter-separated value files
#[derive(Parser, Debug)]
#[command(name = "dsvq")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to load at startup
    file: Option<PathBuf>,

    /// Delimiter used when reading files
    #[arg(default_value = DEFAULT_DELIMITER)]
    input_delimiter: String,

    /// Delimiter used when printing rows
    #[arg(default_value = DEFAULT_DELIMITER)]
    output_delimiter: String,

    /// Force vi editing mode
    #[arg(long, conflicts_with = "emacs")]
    vi: bool,

    /// Force emacs editing mode
    #[arg(long)]
    emacs: bool,
}

fn main() {
    let args = Args::parse();

    if args.vi {
        std::env::set_var(EDIT_MODE_VAR, "vi");
    } else if args.emacs {
        std::env::set_var(EDIT_MODE_VAR, "emacs");
    }

    // Logs go to stderr so result rows on stdout stay clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("DSVQ_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut store = DsvStore::new();
    if let Err(e) = store
        .set_input_delimiter(args.input_delimiter.as_str())
        .and_then(|()| store.set_output_delimiter(args.output_delimiter.as_str()))
    {
        eprintln!("Error - {}", e);
        std::process::exit(1);
    }

    if let Some(file) = &args.file {
        if let Err(e) = store.load(file) {
            eprintln!("Error - Failed to load: {}: {}", file.display(), e);
            std::process::exit(1);
        }
    }

    if let Err(e) = dsvq_repl::run(Session::new(store)) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
