use std::time::Duration;
use thiserror::Error;

/// A command that ran to completion and exited non-zero.
///
/// Carries the exit code and both captured streams so callers can
/// discriminate on exit-code detail instead of inspecting error strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("command exited with status {exit_code}: {stderr}")]
pub struct CommandError {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Errors surfaced by a [`Connector`](crate::connection::Connector).
///
/// `CommandExit` means "the command ran and reported failure"; the other
/// variants mean "the command could not be run at all".
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error(transparent)]
    CommandExit(#[from] CommandError),

    #[error("transport failure: {message}")]
    Transport { message: String },

    #[error("operation cancelled")]
    Cancelled,

    #[error("operation timed out after {timeout:?}")]
    Timeout { timeout: Duration },
}

impl ConnectionError {
    /// The structured exit error, when the command itself failed.
    pub fn as_command_exit(&self) -> Option<&CommandError> {
        match self {
            ConnectionError::CommandExit(err) => Some(err),
            _ => None,
        }
    }
}
