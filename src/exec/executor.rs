//! The command executor: run, check, retry, and background launch

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::connection::{Connector, ExecOptions};
use crate::exec::error::ExecError;

/// Thin execution wrapper every higher-level operation goes through.
///
/// All methods are convenience layers over [`Executor::run_with_options`],
/// which is the single point where sudo wrapping and timeout bounding
/// happen.
pub struct Executor<C: Connector> {
    connector: C,
}

impl<C: Connector> Executor<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Run a command and return stdout and stderr concatenated, stdout
    /// first.
    ///
    /// A non-zero exit comes back unchanged as [`ExecError::Command`] with
    /// the captured streams inside; callers that need exit-code detail use
    /// that, not string inspection.
    pub async fn run(&self, cmd: &str, sudo: bool) -> Result<String, ExecError> {
        let options = ExecOptions {
            sudo,
            ..Default::default()
        };
        let (stdout, stderr) = self.run_with_options(cmd, &options).await?;
        Ok(combine_output(&stdout, &stderr))
    }

    /// Probe whether a command succeeds.
    ///
    /// `Ok(true)` iff exit code 0. A non-zero exit is `Ok(false)`, not an
    /// error; transport and cancellation failures are surfaced as `Err`.
    /// This is the primitive every "is X already true" probe uses.
    pub async fn check(&self, cmd: &str, sudo: bool) -> Result<bool, ExecError> {
        match self.run(cmd, sudo).await {
            Ok(_) => Ok(true),
            Err(ExecError::Command(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Ground-truth entry point with full control over privilege, timeout
    /// and stdin.
    ///
    /// Sudo wrapping happens here and only here: the command is rewritten
    /// to `sudo -E sh -c '<cmd>'` and the options forwarded to the
    /// connector carry `sudo: false`, so the prefix is applied exactly
    /// once. A configured timeout is passed down and additionally bounds
    /// the await locally, so a non-cooperative connector still observes
    /// the deadline.
    pub async fn run_with_options(
        &self,
        cmd: &str,
        options: &ExecOptions,
    ) -> Result<(String, String), ExecError> {
        if cmd.trim().is_empty() {
            return Err(ExecError::Policy {
                message: "empty command".to_string(),
            });
        }

        let final_cmd = if options.sudo {
            format!("sudo -E sh -c {}", shell_words::quote(cmd))
        } else {
            cmd.to_string()
        };
        let downstream = ExecOptions {
            sudo: false,
            timeout: options.timeout,
            stdin: options.stdin.clone(),
        };

        let call = self.connector.exec(&final_cmd, &downstream);
        let result = match options.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => return Err(ExecError::Timeout { timeout: limit }),
            },
            None => call.await,
        };

        result.map_err(ExecError::from)
    }

    /// Launch a command detached from the session, output redirected.
    ///
    /// Returns once the launch itself is confirmed, not once the
    /// background command finishes. Uses `nohup` when the host has it,
    /// otherwise a subshell backgrounding idiom with the same effect.
    pub async fn run_in_background(&self, cmd: &str, sudo: bool) -> Result<(), ExecError> {
        if cmd.trim().is_empty() {
            return Err(ExecError::Policy {
                message: "empty command".to_string(),
            });
        }

        let quoted = shell_words::quote(cmd);
        let launch = match self.connector.lookup_path("nohup").await {
            Ok(_) => format!("nohup sh -c {quoted} >/dev/null 2>&1 &"),
            Err(err) => {
                debug!("nohup unavailable ({err}), falling back to subshell detach");
                format!("( sh -c {quoted} >/dev/null 2>&1 & )")
            }
        };

        self.run(&launch, sudo).await.map(|_| ())
    }

    /// Attempt a command up to `1 + retries` times, sleeping `delay`
    /// between failed attempts (skipped after the final one).
    ///
    /// Returns on the first success. Cancellation aborts the waiting
    /// period immediately and reports [`ExecError::Cancelled`] wrapping
    /// the last command error, if one exists. Exhausting every attempt
    /// reports [`ExecError::RetriesExhausted`] wrapping the last failure.
    pub async fn run_retry(
        &self,
        cmd: &str,
        sudo: bool,
        retries: u32,
        delay: Duration,
        cancel: &CancellationToken,
    ) -> Result<String, ExecError> {
        if cancel.is_cancelled() {
            return Err(ExecError::Cancelled { last_error: None });
        }

        let attempts = retries.saturating_add(1);
        let mut made = 1u32;
        let mut last_error = match self.run(cmd, sudo).await {
            Ok(output) => return Ok(output),
            Err(err) => err,
        };

        while made < attempts {
            debug!(
                "command failed (attempt {made}/{attempts}), retrying in {:?}: {last_error}",
                delay
            );
            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(ExecError::Cancelled {
                        last_error: Some(Box::new(last_error)),
                    });
                }
                _ = tokio::time::sleep(delay) => {}
            }

            made += 1;
            match self.run(cmd, sudo).await {
                Ok(output) => return Ok(output),
                Err(err) => last_error = err,
            }
        }

        Err(ExecError::RetriesExhausted {
            attempts: made,
            source: Box::new(last_error),
        })
    }
}

fn combine_output(stdout: &str, stderr: &str) -> String {
    match (stdout.is_empty(), stderr.is_empty()) {
        (false, false) => format!("{stdout}\n{stderr}"),
        (true, false) => stderr.to_string(),
        _ => stdout.to_string(),
    }
}
