//! Idempotent operation primitives built from the executor and Facts
//!
//! Every "ensure X" helper here follows the same shape: probe the current
//! state, short-circuit when the desired end-state is already observed,
//! otherwise act. The only failure exits are "the probe itself failed" and
//! "the action failed for a reason unrelated to already-satisfied".

pub mod error;
mod fs;
mod mount;
mod service;

pub use error::OpsError;
pub use fs::FsOps;
pub use mount::MountOps;
pub use service::ServiceOps;

pub(crate) fn validate_nonempty(value: &str, what: &str) -> Result<(), OpsError> {
    if value.trim().is_empty() {
        return Err(OpsError::InvalidInput {
            message: format!("{what} must not be empty"),
        });
    }
    Ok(())
}
