//! Terminal entry point.

use tracing::info;

use crate::core::ReplCore;
use crate::host::TerminalHost;
use crate::io::{ExitReason, IoError};
use crate::session::Session;

/// Errors that end an interactive run.
#[derive(Debug, thiserror::Error)]
pub enum ReplError {
    #[error("failed to start terminal: {0}")]
    Host(#[from] std::io::Error),

    #[error(transparent)]
    Io(#[from] IoError),
}

/// Run the console on the terminal until the user exits.
pub fn run(session: Session) -> Result<ExitReason, ReplError> {
    let mut host = TerminalHost::new()?;
    let mut core = ReplCore::with_session(session);

    let reason = core.run(&mut host)?;
    info!(?reason, "console exited");
    Ok(reason)
}
