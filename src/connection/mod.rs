//! Connector seam between the execution core and the transport layer

pub mod error;

pub use error::{CommandError, ConnectionError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options for a single remote command invocation.
///
/// Constructed per call; there is no identity beyond the one command it
/// configures. `Default` gives an unprivileged call with no timeout and no
/// stdin payload.
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    pub sudo: bool,
    pub timeout: Option<Duration>,
    pub stdin: Option<String>,
}

/// OS identity reported by the remote host (e.g. from os-release).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsInfo {
    /// Distribution id, lower case ("ubuntu", "centos", ...)
    pub id: String,
    pub version: String,
    pub arch: String,
}

/// Minimal stat result used by capability probes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStat {
    pub exists: bool,
    pub is_dir: bool,
}

/// Transport capability the core executes through.
///
/// Implementations wrap SSH or local process execution and must be safe for
/// concurrent use: fact collection issues a small number of overlapping
/// probe calls against one connector.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Execute `command` and return (stdout, stderr).
    ///
    /// A command that ran and exited non-zero is reported as
    /// [`ConnectionError::CommandExit`]; anything else (connection loss,
    /// cancellation) uses the remaining variants so callers can tell the
    /// two apart.
    async fn exec(
        &self,
        command: &str,
        options: &ExecOptions,
    ) -> Result<(String, String), ConnectionError>;

    /// Resolve the path of a named executable on the host.
    ///
    /// Absence of the executable is a [`ConnectionError::CommandExit`], the
    /// same shape `which`/`command -v` produce.
    async fn lookup_path(&self, executable: &str) -> Result<String, ConnectionError>;

    /// Detect the host's OS identity.
    async fn get_os(&self) -> Result<OsInfo, ConnectionError>;

    /// Read a file from the host. Used by the mount-table fallback.
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, ConnectionError>;

    /// Stat a path on the host. Used by the init-system directory fallback.
    async fn stat(&self, path: &str) -> Result<FileStat, ConnectionError>;
}
