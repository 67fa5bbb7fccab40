//! Concurrent fact collection against a remote host
//!
//! The OS-identity probe runs to completion before anything else: every
//! dependent probe and both strategy selectors key off it, so sequencing
//! it first removes any chance of reading a half-populated sibling result.
//! The remaining probes fan out concurrently under one child cancellation
//! token, each returning its own value; no shared mutable cell exists.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::connection::Connector;
use crate::exec::{ExecError, Executor};
use crate::facts::error::FactError;
use crate::facts::{Facts, OsIdentity};
use crate::strategy::{detect_init_system, detect_package_manager};

const HOSTNAME_FQDN_CMD: &str = "hostname -f";
const HOSTNAME_SHORT_CMD: &str = "hostname";
const KERNEL_CMD: &str = "uname -r";

const CPU_PRIMARY_CMD: &str = "nproc --all";
const CPU_FALLBACK_CMD: &str = "grep -c ^processor /proc/cpuinfo";
const MEMORY_PRIMARY_CMD: &str = "free -m | awk '/^Mem/ {print $2}'";
const MEMORY_FALLBACK_CMD: &str = "awk '/MemTotal/ {print int($2/1024)}' /proc/meminfo";

const IPV4_ROUTE_CMD: &str = "ip -4 route get 1.1.1.1 2>/dev/null \
    | awk '{for (i=1; i<NF; i++) if ($i == \"src\") {print $(i+1); exit}}'";
const IPV6_ROUTE_CMD: &str = "ip -6 route get 2606:4700:4700::1111 2>/dev/null \
    | awk '{for (i=1; i<NF; i++) if ($i == \"src\") {print $(i+1); exit}}'";

/// Builds a [`Facts`] snapshot through the executor's connector.
pub struct FactsCollector<'a, C: Connector> {
    executor: &'a Executor<C>,
}

impl<'a, C: Connector> FactsCollector<'a, C> {
    pub fn new(executor: &'a Executor<C>) -> Self {
        Self { executor }
    }

    /// Collect a complete snapshot.
    ///
    /// OS-identity failure is fatal and reported alone. Hostname falls
    /// back from the fully-qualified form to the short one; the kernel
    /// probe has no fallback and fails collection. Resource probes degrade
    /// to zero, route probes to empty. Strategy selector failures leave
    /// the corresponding field `None`.
    pub async fn collect(&self, cancel: &CancellationToken) -> Result<Facts, FactError> {
        if cancel.is_cancelled() {
            return Err(FactError::Cancelled);
        }

        let os = self
            .executor
            .connector()
            .get_os()
            .await
            .map_err(|source| FactError::OsDetect { source })?;

        let token = cancel.child_token();
        let (hostname, kernel, total_cpu, total_memory_mib, ipv4_default, ipv6_default) = tokio::join!(
            self.probe_hostname(&token),
            self.probe_kernel(&token),
            self.probe_numeric(&token, "cpu", CPU_PRIMARY_CMD, CPU_FALLBACK_CMD),
            self.probe_numeric(&token, "memory", MEMORY_PRIMARY_CMD, MEMORY_FALLBACK_CMD),
            self.probe_route(&token, IPV4_ROUTE_CMD),
            self.probe_route(&token, IPV6_ROUTE_CMD),
        );

        let mut facts = Facts {
            os: OsIdentity {
                id: os.id,
                version: os.version,
                arch: os.arch,
                kernel: kernel?,
            },
            hostname: hostname?,
            total_cpu: u32::try_from(total_cpu).unwrap_or(u32::MAX),
            total_memory_mib,
            ipv4_default,
            ipv6_default,
            package_manager: None,
            init_system: None,
        };

        match detect_package_manager(self.executor.connector(), &facts.os.id).await {
            Ok(pm) => facts.package_manager = Some(pm),
            Err(err) => debug!("package manager selection failed: {err}"),
        }
        match detect_init_system(self.executor.connector()).await {
            Ok(init) => facts.init_system = Some(init),
            Err(err) => debug!("init system selection failed: {err}"),
        }

        Ok(facts)
    }

    async fn probe_hostname(&self, cancel: &CancellationToken) -> Result<String, FactError> {
        let probe = async {
            match self.executor.run(HOSTNAME_FQDN_CMD, false).await {
                Ok(output) => Ok(output.trim().to_string()),
                // No FQDN configured; the short name is an acceptable identity.
                Err(ExecError::Command(_)) => self
                    .executor
                    .run(HOSTNAME_SHORT_CMD, false)
                    .await
                    .map(|output| output.trim().to_string())
                    .map_err(|source| FactError::Probe {
                        name: "hostname",
                        source,
                    }),
                Err(source) => Err(FactError::Probe {
                    name: "hostname",
                    source,
                }),
            }
        };

        tokio::select! {
            _ = cancel.cancelled() => Err(FactError::Cancelled),
            result = probe => result,
        }
    }

    async fn probe_kernel(&self, cancel: &CancellationToken) -> Result<String, FactError> {
        let probe = async {
            self.executor
                .run(KERNEL_CMD, false)
                .await
                .map(|output| output.trim().to_string())
                .map_err(|source| FactError::Probe {
                    name: "kernel",
                    source,
                })
        };

        tokio::select! {
            _ = cancel.cancelled() => Err(FactError::Cancelled),
            result = probe => result,
        }
    }

    /// Primary command first, one fallback for the other OS family, and
    /// zero when both fail: a missing resource figure never fails the
    /// whole collection.
    async fn probe_numeric(
        &self,
        cancel: &CancellationToken,
        name: &'static str,
        primary: &str,
        fallback: &str,
    ) -> u64 {
        let probe = async {
            for cmd in [primary, fallback] {
                match self.executor.run(cmd, false).await {
                    Ok(output) => match output.trim().parse::<u64>() {
                        Ok(value) => return value,
                        Err(_) => {
                            debug!("{name} probe {cmd:?} returned unparseable output");
                        }
                    },
                    Err(err) => debug!("{name} probe {cmd:?} failed: {err}"),
                }
            }
            0
        };

        tokio::select! {
            _ = cancel.cancelled() => 0,
            value = probe => value,
        }
    }

    /// Best-effort route probe: absence of a route is a legitimate host
    /// state, so every failure leaves the field empty.
    async fn probe_route(&self, cancel: &CancellationToken, cmd: &str) -> String {
        let probe = async {
            match self.executor.run(cmd, false).await {
                Ok(output) => output.trim().to_string(),
                Err(_) => String::new(),
            }
        };

        tokio::select! {
            _ = cancel.cancelled() => String::new(),
            value = probe => value,
        }
    }
}
