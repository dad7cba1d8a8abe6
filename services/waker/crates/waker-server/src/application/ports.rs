//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `waker_common`, never from `crate::infra`
//! or `crate::http`.
//!
//! Methods return `impl Future + Send` so that generic callers can run
//! inside axum handlers. Implementations may still use `async fn`.

use std::future::Future;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use waker_common::{InstanceId, LifecycleState};

use crate::domain::ProviderError;

// ── Value Types ───────────────────────────────────────────────────────────────

/// What the provider reports about one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceDescription {
    pub state: LifecycleState,
    pub public_address: Option<String>,
}

// ── Compute Provider Port ─────────────────────────────────────────────────────

/// The three calls the controller needs from the compute provider.
pub trait ComputeProvider {
    /// Describe the instance. `Ok(None)` means the provider has no matching instance.
    fn describe_instance(
        &self,
        id: &InstanceId,
    ) -> impl Future<Output = Result<Option<InstanceDescription>, ProviderError>> + Send;

    /// Request a start of a stopped instance.
    fn start_instance(
        &self,
        id: &InstanceId,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    /// Request a stop of a running instance.
    fn stop_instance(
        &self,
        id: &InstanceId,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// How a launched process looked once the settle window closed.
#[derive(Debug)]
pub enum LaunchOutcome {
    /// The process finished inside the window.
    Exited(Output),
    /// Still running; it was left to finish in the background.
    Detached,
}

/// Abstracts process execution so infrastructure can be swapped or mocked.
pub trait CommandRunner {
    /// Run a program to completion and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds the
    /// runner's timeout. On timeout the child is killed, never orphaned.
    fn run(&self, program: &str, args: &[&str]) -> impl Future<Output = Result<Output>> + Send;

    /// Spawn a program and wait at most `settle` for it to exit.
    ///
    /// A process still running after `settle` keeps running unattended.
    /// This is for commands that block until a long transition completes,
    /// where only an early failure is interesting to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn launch(
        &self,
        program: &str,
        args: &[&str],
        settle: Duration,
    ) -> impl Future<Output = Result<LaunchOutcome>> + Send;
}
