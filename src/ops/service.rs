//! Service control over the selected init-system strategy

use tracing::debug;

use crate::connection::Connector;
use crate::exec::Executor;
use crate::ops::error::OpsError;
use crate::ops::validate_nonempty;
use crate::strategy::{is_single_placeholder, render_template, InitSystem};

/// Service primitives for one host, bound to its init-system strategy.
///
/// Start/stop/restart issue their command without a pre-check; the
/// underlying tools are naturally idempotent. Enable/disable are guarded:
/// a variant whose template cannot express them fails fast, locally.
pub struct ServiceOps<'a, C: Connector> {
    executor: &'a Executor<C>,
    init: &'a InitSystem,
}

impl<'a, C: Connector> ServiceOps<'a, C> {
    pub fn new(executor: &'a Executor<C>, init: &'a InitSystem) -> Self {
        Self { executor, init }
    }

    pub async fn start_service(&self, name: &str) -> Result<(), OpsError> {
        self.run_action("start", &self.init.start_cmd, name).await
    }

    pub async fn stop_service(&self, name: &str) -> Result<(), OpsError> {
        self.run_action("stop", &self.init.stop_cmd, name).await
    }

    pub async fn restart_service(&self, name: &str) -> Result<(), OpsError> {
        self.run_action("restart", &self.init.restart_cmd, name)
            .await
    }

    pub async fn enable_service(&self, name: &str) -> Result<(), OpsError> {
        self.run_guarded("enable", &self.init.enable_cmd, name).await
    }

    pub async fn disable_service(&self, name: &str) -> Result<(), OpsError> {
        self.run_guarded("disable", &self.init.disable_cmd, name)
            .await
    }

    /// Whether the service is currently active.
    ///
    /// Uses check semantics: a non-zero exit means inactive, not an error.
    /// Only transport and cancellation failures surface as `Err`.
    pub async fn is_service_active(&self, name: &str) -> Result<bool, OpsError> {
        validate_nonempty(name, "service name")?;
        let cmd = render_template(&self.init.is_active_cmd, name)?;
        self.executor
            .check(&cmd, true)
            .await
            .map_err(|source| OpsError::Service {
                service: name.to_string(),
                action: "is-active",
                source,
            })
    }

    /// Reload the init system's unit definitions.
    ///
    /// A no-op success on variants with nothing to reload (SysV).
    pub async fn daemon_reload(&self) -> Result<(), OpsError> {
        if self.init.daemon_reload_cmd.is_empty() {
            debug!("init system {:?} has no reload step", self.init.kind);
            return Ok(());
        }
        self.executor.run(&self.init.daemon_reload_cmd, true).await?;
        Ok(())
    }

    async fn run_action(
        &self,
        action: &'static str,
        template: &str,
        name: &str,
    ) -> Result<(), OpsError> {
        validate_nonempty(name, "service name")?;
        let cmd = render_template(template, name)?;
        self.executor
            .run(&cmd, true)
            .await
            .map_err(|source| OpsError::Service {
                service: name.to_string(),
                action,
                source,
            })?;
        Ok(())
    }

    /// Like `run_action`, but fails fast when the template cannot express
    /// the operation, rather than emitting a malformed command.
    async fn run_guarded(
        &self,
        action: &'static str,
        template: &str,
        name: &str,
    ) -> Result<(), OpsError> {
        validate_nonempty(name, "service name")?;
        if !is_single_placeholder(template) {
            return Err(OpsError::Unsupported {
                what: format!("service {action} for {name}"),
                reason: format!(
                    "not reliably supported for {:?} init hosts",
                    self.init.kind
                ),
            });
        }
        self.run_action(action, template, name).await
    }
}
