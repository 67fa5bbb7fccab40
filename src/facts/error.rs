use thiserror::Error;

use crate::connection::ConnectionError;
use crate::exec::ExecError;

/// Errors from fact collection.
///
/// OS detection failure is reported alone even when sibling probes also
/// failed; it is the clearest diagnostic and every other decision depends
/// on it.
#[derive(Error, Debug)]
pub enum FactError {
    #[error("OS detection failed: {source}")]
    OsDetect {
        #[source]
        source: ConnectionError,
    },

    #[error("probe {name:?} failed: {source}")]
    Probe {
        name: &'static str,
        #[source]
        source: ExecError,
    },

    #[error("fact collection cancelled")]
    Cancelled,
}
