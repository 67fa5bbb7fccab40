use thiserror::Error;

use crate::connection::ConnectionError;

/// Errors from strategy selection and template handling.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("no supported package manager found on host")]
    NoPackageManager,

    #[error("no supported init system found on host")]
    NoInitSystem,

    #[error("invalid command template: {template:?}")]
    InvalidTemplate { template: String },

    #[error("detection probe failed: {source}")]
    Connection {
        #[from]
        source: ConnectionError,
    },
}
