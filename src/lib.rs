//! Hostkit - host capability discovery and idempotent remote execution
//!
//! This crate is the execution core of a cluster-provisioning stack. It
//! probes a remote host once, concurrently, into an immutable [`Facts`]
//! snapshot (OS identity, resources, package manager, init system), and
//! exposes the execution primitives every higher-level operation is built
//! from: run, check, retry, background launch, and check-then-act helpers
//! for mounts and services.
//!
//! The transport itself is not implemented here; callers supply a
//! [`Connector`] for their SSH or local execution layer.

pub mod connection;
pub mod exec;
pub mod facts;
pub mod ops;
pub mod strategy;

pub use connection::{CommandError, ConnectionError, Connector, ExecOptions, FileStat, OsInfo};
pub use exec::{ExecError, Executor};
pub use facts::{Facts, FactsCollector};
