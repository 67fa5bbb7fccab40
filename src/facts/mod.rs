//! Host facts: the immutable capability snapshot
//!
//! Built once per host per session by [`FactsCollector`], then read-only.
//! Numeric fields degrade to zero when their probes fail; route fields
//! degrade to empty strings. Only OS identity is load-bearing.

pub mod collector;
pub mod error;

pub use collector::FactsCollector;
pub use error::FactError;

use serde::{Deserialize, Serialize};

use crate::strategy::{InitSystem, PackageManager};

/// OS identity of a probed host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsIdentity {
    /// Distribution id, lower case ("ubuntu", "centos", ...)
    pub id: String,
    pub version: String,
    pub arch: String,
    /// Kernel release string (`uname -r`).
    pub kernel: String,
}

/// Immutable snapshot of a remote host's identity and capabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facts {
    pub os: OsIdentity,
    /// Fully-qualified name when resolvable, short hostname otherwise.
    pub hostname: String,
    /// CPU count; 0 means "undetermined".
    pub total_cpu: u32,
    /// Total memory in MiB; 0 means "undetermined".
    pub total_memory_mib: u64,
    /// Default-route IPv4 source address; empty means no route or not probed.
    pub ipv4_default: String,
    /// Default-route IPv6 source address; empty means no route or not probed.
    pub ipv6_default: String,
    /// `None` when no supported package manager was found. Operations that
    /// need one must check and fail their own call.
    pub package_manager: Option<PackageManager>,
    /// `None` when no supported init system was found.
    pub init_system: Option<InitSystem>,
}
