//! Mount primitives with check-then-act idempotency

use regex::Regex;
use tracing::debug;

use crate::connection::Connector;
use crate::exec::{ExecError, Executor};
use crate::ops::error::OpsError;
use crate::ops::validate_nonempty;

/// Mount and fstab primitives for one host.
pub struct MountOps<'a, C: Connector> {
    executor: &'a Executor<C>,
}

impl<'a, C: Connector> MountOps<'a, C> {
    pub fn new(executor: &'a Executor<C>) -> Self {
        Self { executor }
    }

    /// Whether `path` is currently a mount point.
    ///
    /// Shells out to `mountpoint` when the host has it; otherwise scans
    /// the mount table for the path as a literal mount target.
    pub async fn is_mounted(&self, path: &str) -> Result<bool, OpsError> {
        validate_nonempty(path, "mount path")?;

        match self.executor.connector().lookup_path("mountpoint").await {
            Ok(_) => self
                .executor
                .check(&format!("mountpoint -q {path}"), true)
                .await
                .map_err(|source| OpsError::Mount {
                    path: path.to_string(),
                    source,
                }),
            Err(err) => {
                debug!("mountpoint unavailable ({err}), scanning mount table");
                self.is_mounted_from_table(path).await
            }
        }
    }

    async fn is_mounted_from_table(&self, path: &str) -> Result<bool, OpsError> {
        let bytes = self
            .executor
            .connector()
            .read_file("/proc/mounts")
            .await
            .map_err(|err| OpsError::Mount {
                path: path.to_string(),
                source: ExecError::from(err),
            })?;
        let table = String::from_utf8_lossy(&bytes);
        Ok(table
            .lines()
            .any(|line| line.split_whitespace().nth(1) == Some(path)))
    }

    /// Unmount `path`, forcibly when asked.
    ///
    /// Already-unmounted is success, both when observed up front and when
    /// the tool reports it mid-flight; the intended end-state was reached
    /// either way.
    pub async fn unmount(&self, path: &str, force: bool) -> Result<(), OpsError> {
        validate_nonempty(path, "mount path")?;

        if !self.is_mounted(path).await? {
            debug!("{path} is not mounted, nothing to do");
            return Ok(());
        }

        let cmd = if force {
            format!("umount -f {path}")
        } else {
            format!("umount {path}")
        };
        match self.executor.run(&cmd, true).await {
            Ok(_) => Ok(()),
            Err(err) if reports_not_mounted(&err) => {
                debug!("{path} reported as not mounted during unmount, treating as success");
                Ok(())
            }
            Err(source) => Err(OpsError::Mount {
                path: path.to_string(),
                source,
            }),
        }
    }

    /// Mount `device` at `mount_point` and, when `persistent`, record it
    /// in fstab.
    ///
    /// Safe to call repeatedly: the mount step is skipped when the path is
    /// already a mount point, and the fstab append is skipped when the
    /// mount point already appears in the table.
    pub async fn ensure_mount(
        &self,
        device: &str,
        mount_point: &str,
        fstype: &str,
        options: &str,
        persistent: bool,
    ) -> Result<(), OpsError> {
        validate_nonempty(device, "device")?;
        validate_nonempty(mount_point, "mount point")?;
        validate_nonempty(fstype, "filesystem type")?;

        let opts = if options.trim().is_empty() {
            "defaults"
        } else {
            options
        };

        if self.is_mounted(mount_point).await? {
            debug!("{mount_point} is already mounted");
        } else {
            self.run_mount_step(&format!("mkdir -p {mount_point}"), mount_point)
                .await?;
            self.run_mount_step(
                &format!("mount -t {fstype} -o {opts} {device} {mount_point}"),
                mount_point,
            )
            .await?;
        }

        if persistent {
            if self.in_fstab(mount_point).await? {
                debug!("{mount_point} is already in fstab");
            } else {
                let entry = format!("{device} {mount_point} {fstype} {opts} 0 0");
                self.run_mount_step(&format!("echo '{entry}' >> /etc/fstab"), mount_point)
                    .await?;
            }
        }

        Ok(())
    }

    /// Whether `mount_point` appears in the fstab mount-point column.
    async fn in_fstab(&self, mount_point: &str) -> Result<bool, OpsError> {
        let bytes = self
            .executor
            .connector()
            .read_file("/etc/fstab")
            .await
            .map_err(|err| OpsError::Mount {
                path: mount_point.to_string(),
                source: ExecError::from(err),
            })?;
        let table = String::from_utf8_lossy(&bytes);

        // The second whitespace-separated column of an fstab line is the
        // mount point.
        let pattern = format!(r"(?m)^\s*\S+\s+{}\s", regex::escape(mount_point));
        let matcher = Regex::new(&pattern).map_err(|err| OpsError::InvalidInput {
            message: format!("unusable fstab pattern for {mount_point}: {err}"),
        })?;
        Ok(matcher.is_match(&table))
    }

    async fn run_mount_step(&self, cmd: &str, path: &str) -> Result<(), OpsError> {
        self.executor
            .run(cmd, true)
            .await
            .map_err(|source| OpsError::Mount {
                path: path.to_string(),
                source,
            })?;
        Ok(())
    }
}

/// Narrow reclassification predicate for unmount: only the tool's own
/// "not mounted" phrasing counts, so genuine failures are never masked.
fn reports_not_mounted(err: &ExecError) -> bool {
    match err {
        ExecError::Command(cmd) => {
            let stderr = cmd.stderr.to_ascii_lowercase();
            stderr.contains("not mounted") || stderr.contains("not currently mounted")
        }
        _ => false,
    }
}
