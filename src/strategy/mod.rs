//! Package-manager and init-system strategy records
//!
//! A strategy record is a kind tag plus a set of command templates,
//! selected once during fact collection and carried immutably in
//! [`Facts`](crate::facts::Facts). The tables are constant data; there is
//! no polymorphism to dispatch through.

mod detect;
pub mod error;

pub use detect::{detect_init_system, detect_package_manager};
pub use error::StrategyError;

use serde::{Deserialize, Serialize};

/// True when `template` is non-empty and carries exactly one `%s`.
pub fn is_single_placeholder(template: &str) -> bool {
    !template.is_empty() && template.matches("%s").count() == 1
}

/// Substitute `arg` into a single-`%s` command template.
///
/// Invalid templates are rejected here, before any command is built or
/// sent to a host.
pub fn render_template(template: &str, arg: &str) -> Result<String, StrategyError> {
    if !is_single_placeholder(template) {
        return Err(StrategyError::InvalidTemplate {
            template: template.to_string(),
        });
    }
    Ok(template.replacen("%s", arg, 1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManagerKind {
    Apt,
    Yum,
    Dnf,
}

/// Command templates for the host's package manager.
///
/// `install_cmd`, `remove_cmd` and `query_cmd` carry exactly one `%s` for
/// the package name; `update_cmd` and `clean_cmd` take no argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManager {
    pub kind: PackageManagerKind,
    pub update_cmd: String,
    pub install_cmd: String,
    pub remove_cmd: String,
    pub query_cmd: String,
    pub clean_cmd: String,
}

impl PackageManager {
    pub fn apt() -> Self {
        Self {
            kind: PackageManagerKind::Apt,
            update_cmd: "apt-get update".to_string(),
            install_cmd: "apt-get install -y %s".to_string(),
            remove_cmd: "apt-get remove -y %s".to_string(),
            query_cmd: "dpkg -s %s".to_string(),
            clean_cmd: "apt-get clean".to_string(),
        }
    }

    pub fn yum() -> Self {
        Self {
            kind: PackageManagerKind::Yum,
            update_cmd: "yum makecache".to_string(),
            install_cmd: "yum install -y %s".to_string(),
            remove_cmd: "yum remove -y %s".to_string(),
            query_cmd: "rpm -q %s".to_string(),
            clean_cmd: "yum clean all".to_string(),
        }
    }

    pub fn dnf() -> Self {
        Self {
            kind: PackageManagerKind::Dnf,
            update_cmd: "dnf makecache".to_string(),
            install_cmd: "dnf install -y %s".to_string(),
            remove_cmd: "dnf remove -y %s".to_string(),
            query_cmd: "rpm -q %s".to_string(),
            clean_cmd: "dnf clean all".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitSystemKind {
    Systemd,
    Sysv,
}

/// Command templates for the host's init system.
///
/// Empty templates mark operations the variant does not support:
/// SysV enable/disable (tooling varies too much between distributions to
/// template reliably) and SysV daemon-reload (nothing to reload).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitSystem {
    pub kind: InitSystemKind,
    pub start_cmd: String,
    pub stop_cmd: String,
    pub restart_cmd: String,
    pub enable_cmd: String,
    pub disable_cmd: String,
    pub is_active_cmd: String,
    pub daemon_reload_cmd: String,
}

impl InitSystem {
    pub fn systemd() -> Self {
        Self {
            kind: InitSystemKind::Systemd,
            start_cmd: "systemctl start %s".to_string(),
            stop_cmd: "systemctl stop %s".to_string(),
            restart_cmd: "systemctl restart %s".to_string(),
            enable_cmd: "systemctl enable %s".to_string(),
            disable_cmd: "systemctl disable %s".to_string(),
            is_active_cmd: "systemctl is-active --quiet %s".to_string(),
            daemon_reload_cmd: "systemctl daemon-reload".to_string(),
        }
    }

    pub fn sysv() -> Self {
        Self {
            kind: InitSystemKind::Sysv,
            start_cmd: "service %s start".to_string(),
            stop_cmd: "service %s stop".to_string(),
            restart_cmd: "service %s restart".to_string(),
            enable_cmd: String::new(),
            disable_cmd: String::new(),
            is_active_cmd: "service %s status".to_string(),
            daemon_reload_cmd: String::new(),
        }
    }
}
