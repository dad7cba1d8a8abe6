//! Tokio-backed `CommandRunner`.
//!
//! Inspection commands run to completion under a timeout. Lifecycle
//! commands are launched and only watched for a short settle window, since
//! `multipass start` does not return until the VM has booted.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::process::{Child, Command};

use crate::application::ports::{CommandRunner, LaunchOutcome};

/// Default timeout for inspection commands such as `multipass info`.
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(30);

pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CMD_TIMEOUT)
    }
}

fn spawn(program: &str, args: &[&str], kill_on_drop: bool) -> Result<Child> {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(kill_on_drop)
        .spawn()
        .with_context(|| format!("failed to spawn {program}"))
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        // Dropping the child on timeout kills it.
        let child = spawn(program, args, true)?;
        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => output.with_context(|| format!("waiting for {program}")),
            Err(_) => anyhow::bail!("{program} timed out after {}s", self.timeout.as_secs()),
        }
    }

    async fn launch(
        &self,
        program: &str,
        args: &[&str],
        settle: Duration,
    ) -> Result<LaunchOutcome> {
        let child = spawn(program, args, false)?;
        let mut pending = tokio::spawn(child.wait_with_output());

        let settled = tokio::time::timeout(settle, &mut pending).await;
        match settled {
            Ok(Ok(output)) => Ok(LaunchOutcome::Exited(
                output.with_context(|| format!("waiting for {program}"))?,
            )),
            Ok(Err(join)) => Err(anyhow::anyhow!("{program} watcher failed: {join}")),
            Err(_) => {
                let command = format!("{program} {}", args.join(" "));
                tracing::debug!(%command, ?settle, "command detached");
                tokio::spawn(async move {
                    match pending.await {
                        Ok(Ok(output)) if output.status.success() => {
                            tracing::info!(%command, "detached command finished");
                        }
                        Ok(Ok(output)) => {
                            let stderr = String::from_utf8_lossy(&output.stderr);
                            tracing::warn!(
                                %command,
                                status = %output.status,
                                stderr = %stderr.trim(),
                                "detached command failed"
                            );
                        }
                        Ok(Err(e)) => tracing::warn!(%command, error = %e, "detached command lost"),
                        Err(e) => tracing::warn!(%command, error = %e, "detached watcher failed"),
                    }
                });
                Ok(LaunchOutcome::Detached)
            }
        }
    }
}
