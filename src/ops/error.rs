use thiserror::Error;

use crate::exec::ExecError;
use crate::strategy::StrategyError;

/// Errors from the operation primitives.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Input rejected locally, before any remote call.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The operation cannot be expressed for this host's strategy variant.
    #[error("{what}: {reason}")]
    Unsupported { what: String, reason: String },

    #[error("mount operation failed for {path}: {source}")]
    Mount {
        path: String,
        #[source]
        source: ExecError,
    },

    #[error("service {action} failed for {service}: {source}")]
    Service {
        service: String,
        action: &'static str,
        #[source]
        source: ExecError,
    },

    #[error(transparent)]
    Template(#[from] StrategyError),

    #[error(transparent)]
    Exec(#[from] ExecError),
}
