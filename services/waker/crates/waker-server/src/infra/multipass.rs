//! Multipass-backed implementation of the `ComputeProvider` port.
//!
//! `MultipassProvider<R>` routes every provider call through a
//! `CommandRunner`, so tests can inject canned process output without
//! spawning real processes.

use std::process::Output;
use std::time::Duration;

use serde_json::Value;
use waker_common::{InstanceId, LifecycleState};

use crate::application::ports::{
    CommandRunner, ComputeProvider, InstanceDescription, LaunchOutcome,
};
use crate::domain::ProviderError;
use crate::infra::command_runner::TokioCommandRunner;

/// How long `start`/`stop` are watched for an early failure. Multipass
/// blocks until the transition completes, so a command still running after
/// this window is treated as accepted and left to finish on its own.
pub const LAUNCH_SETTLE: Duration = Duration::from_secs(1);

pub struct MultipassProvider<R: CommandRunner> {
    runner: R,
    program: String,
    launch_settle: Duration,
}

impl<R: CommandRunner> MultipassProvider<R> {
    /// Create a provider that invokes `program` through `runner`.
    pub fn new(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
            launch_settle: LAUNCH_SETTLE,
        }
    }

    #[must_use]
    pub fn with_launch_settle(mut self, settle: Duration) -> Self {
        self.launch_settle = settle;
        self
    }

    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Request a transition. Returns once the command has failed, finished,
    /// or outlived the settle window.
    async fn lifecycle(&self, verb: &str, id: &InstanceId) -> Result<(), ProviderError> {
        let outcome = self
            .runner
            .launch(&self.program, &[verb, id.as_str()], self.launch_settle)
            .await
            .map_err(|e| ProviderError::Unavailable(format!("{e:#}")))?;
        match outcome {
            LaunchOutcome::Detached => Ok(()),
            LaunchOutcome::Exited(output) if output.status.success() => Ok(()),
            LaunchOutcome::Exited(output) => Err(classify_failure(&self.program, verb, &output)),
        }
    }
}

impl MultipassProvider<TokioCommandRunner> {
    /// Production provider; `timeout` bounds `multipass info`.
    #[must_use]
    pub fn with_default_runner(program: impl Into<String>, timeout: Duration) -> Self {
        Self::new(TokioCommandRunner::new(timeout), program)
    }
}

impl<R: CommandRunner + Sync> ComputeProvider for MultipassProvider<R> {
    async fn describe_instance(
        &self,
        id: &InstanceId,
    ) -> Result<Option<InstanceDescription>, ProviderError> {
        let output = self
            .runner
            .run(&self.program, &["info", id.as_str(), "--format", "json"])
            .await
            .map_err(|e| ProviderError::Unavailable(format!("{e:#}")))?;

        if !output.status.success() {
            return match classify_failure(&self.program, "info", &output) {
                ProviderError::NotFound(_) => Ok(None),
                other => Err(other),
            };
        }

        parse_info(id, &output.stdout)
    }

    async fn start_instance(&self, id: &InstanceId) -> Result<(), ProviderError> {
        self.lifecycle("start", id).await
    }

    async fn stop_instance(&self, id: &InstanceId) -> Result<(), ProviderError> {
        self.lifecycle("stop", id).await
    }
}

/// Parse `multipass info --format json` for one instance.
///
/// Returns `Ok(None)` when the document has no entry for `id`.
fn parse_info(id: &InstanceId, stdout: &[u8]) -> Result<Option<InstanceDescription>, ProviderError> {
    let info: Value = serde_json::from_slice(stdout).map_err(|e| {
        ProviderError::Unavailable(format!("invalid JSON from multipass info: {e}"))
    })?;

    let Some(entry) = info.get("info").and_then(|i| i.get(id.as_str())) else {
        return Ok(None);
    };

    let state = entry
        .get("state")
        .and_then(Value::as_str)
        .map_or(LifecycleState::Unknown(String::new()), map_state);

    let public_address = entry
        .get("ipv4")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
        .and_then(Value::as_str)
        .map(String::from);

    Ok(Some(InstanceDescription {
        state,
        public_address,
    }))
}

/// Map a Multipass state name onto the provider lifecycle vocabulary.
fn map_state(raw: &str) -> LifecycleState {
    match raw {
        "Running" => LifecycleState::Running,
        "Starting" | "Restarting" => LifecycleState::Pending,
        "Delayed Shutdown" => LifecycleState::Stopping,
        "Stopped" => LifecycleState::Stopped,
        "Deleted" => LifecycleState::Terminated,
        other => LifecycleState::Unknown(other.to_lowercase()),
    }
}

/// Turn a failed invocation into a typed provider error, keeping the
/// provider's stderr text as the message.
fn classify_failure(program: &str, verb: &str, output: &Output) -> ProviderError {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let text = if stderr.is_empty() {
        format!("{program} {verb} failed ({})", output.status)
    } else {
        stderr
    };

    let lower = text.to_lowercase();
    if lower.contains("does not exist") {
        ProviderError::NotFound(text)
    } else if lower.contains("permission denied") || lower.contains("not authorized") {
        ProviderError::PermissionDenied(text)
    } else if lower.contains("rate limit") || lower.contains("too many") {
        ProviderError::Throttled(text)
    } else {
        ProviderError::Unavailable(text)
    }
}
