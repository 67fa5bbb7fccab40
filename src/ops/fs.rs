//! Filesystem presence checks

use crate::connection::Connector;
use crate::exec::{ExecError, Executor};
use crate::ops::error::OpsError;
use crate::ops::validate_nonempty;

/// Presence probes over the connector's stat capability.
pub struct FsOps<'a, C: Connector> {
    executor: &'a Executor<C>,
}

impl<'a, C: Connector> FsOps<'a, C> {
    pub fn new(executor: &'a Executor<C>) -> Self {
        Self { executor }
    }

    pub async fn exists(&self, path: &str) -> Result<bool, OpsError> {
        validate_nonempty(path, "path")?;
        let stat = self
            .executor
            .connector()
            .stat(path)
            .await
            .map_err(ExecError::from)?;
        Ok(stat.exists)
    }

    pub async fn is_dir(&self, path: &str) -> Result<bool, OpsError> {
        validate_nonempty(path, "path")?;
        let stat = self
            .executor
            .connector()
            .stat(path)
            .await
            .map_err(ExecError::from)?;
        Ok(stat.exists && stat.is_dir)
    }
}
