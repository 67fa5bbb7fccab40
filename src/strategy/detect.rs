//! Strategy selection from OS identity and tool-presence probes
//!
//! Both selectors are deterministic given the same probe results, which is
//! what keeps the command templates reproducible and testable without a
//! live host.

use tracing::debug;

use crate::connection::{ConnectionError, Connector};
use crate::strategy::error::StrategyError;
use crate::strategy::{InitSystem, PackageManager};

const DEBIAN_FAMILY: &[&str] = &["debian", "ubuntu", "raspbian", "linuxmint", "pop"];
const RHEL_FAMILY: &[&str] = &["rhel", "centos", "fedora", "rocky", "almalinux", "ol", "amzn"];

/// Map OS identity onto a package manager strategy.
///
/// Debian-family ids select apt outright; RHEL-family ids probe for `dnf`
/// and fall back to `yum`. Unrecognized ids probe for `apt-get`, `dnf`,
/// then `yum`; the first present tool wins.
pub async fn detect_package_manager<C: Connector>(
    connector: &C,
    os_id: &str,
) -> Result<PackageManager, StrategyError> {
    let id = os_id.trim().to_ascii_lowercase();

    if DEBIAN_FAMILY.contains(&id.as_str()) {
        return Ok(PackageManager::apt());
    }

    if RHEL_FAMILY.contains(&id.as_str()) {
        return if has_tool(connector, "dnf").await? {
            Ok(PackageManager::dnf())
        } else {
            Ok(PackageManager::yum())
        };
    }

    debug!("unrecognized OS id {id:?}, probing for package manager binaries");
    if has_tool(connector, "apt-get").await? {
        return Ok(PackageManager::apt());
    }
    if has_tool(connector, "dnf").await? {
        return Ok(PackageManager::dnf());
    }
    if has_tool(connector, "yum").await? {
        return Ok(PackageManager::yum());
    }

    Err(StrategyError::NoPackageManager)
}

/// Select the init-system strategy for a host.
///
/// Presence of `systemctl` wins; a `service` executable or an
/// `/etc/init.d` directory implies the SysV template set.
pub async fn detect_init_system<C: Connector>(connector: &C) -> Result<InitSystem, StrategyError> {
    if has_tool(connector, "systemctl").await? {
        return Ok(InitSystem::systemd());
    }
    if has_tool(connector, "service").await? {
        return Ok(InitSystem::sysv());
    }

    match connector.stat("/etc/init.d").await {
        Ok(stat) if stat.exists && stat.is_dir => Ok(InitSystem::sysv()),
        Ok(_) => Err(StrategyError::NoInitSystem),
        Err(ConnectionError::CommandExit(_)) => Err(StrategyError::NoInitSystem),
        Err(err) => Err(err.into()),
    }
}

/// Presence probe for a named executable. Absence (a command-exit result
/// from the lookup) is `Ok(false)`; transport failures propagate.
async fn has_tool<C: Connector>(connector: &C, name: &str) -> Result<bool, StrategyError> {
    match connector.lookup_path(name).await {
        Ok(_) => Ok(true),
        Err(ConnectionError::CommandExit(_)) => Ok(false),
        Err(err) => Err(err.into()),
    }
}
