use std::time::Duration;
use thiserror::Error;

use crate::connection::{CommandError, ConnectionError};

/// Errors from the command executor.
///
/// `Command` is the only variant meaning "the command ran and failed";
/// everything else means the command could not be run, finished, or was
/// abandoned. `check`-style callers reinterpret `Command` as a boolean,
/// never the other variants.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("transport failure: {message}")]
    Transport { message: String },

    #[error("cancelled while executing command")]
    Cancelled {
        #[source]
        last_error: Option<Box<ExecError>>,
    },

    #[error("command timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("command failed after {attempts} attempts")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<ExecError>,
    },

    /// Input rejected locally, before any remote call was made.
    #[error("invalid request: {message}")]
    Policy { message: String },
}

impl ExecError {
    /// The structured exit error, when the command itself failed.
    pub fn as_command_exit(&self) -> Option<&CommandError> {
        match self {
            ExecError::Command(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConnectionError> for ExecError {
    fn from(err: ConnectionError) -> Self {
        match err {
            ConnectionError::CommandExit(cmd) => ExecError::Command(cmd),
            ConnectionError::Transport { message } => ExecError::Transport { message },
            ConnectionError::Cancelled => ExecError::Cancelled { last_error: None },
            ConnectionError::Timeout { timeout } => ExecError::Timeout { timeout },
        }
    }
}
