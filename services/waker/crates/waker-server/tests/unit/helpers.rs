//! Shared test helpers: a recording fake provider, a scripted command
//! runner, and process output constructors.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::process::{ExitStatus, Output};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use waker_common::{InstanceId, LifecycleState};
use waker_server::application::ports::{
    CommandRunner, ComputeProvider, InstanceDescription, LaunchOutcome,
};
use waker_server::domain::ProviderError;

pub const INSTANCE: &str = "i-0123456789abcdef0";

pub fn instance_id() -> InstanceId {
    InstanceId::new(INSTANCE).unwrap()
}

// ── Fake compute provider ────────────────────────────────────────────────────

/// Which provider call was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Describe,
    Start,
    Stop,
}

/// In-memory provider that records every call and can be told to fail one.
///
/// A successful start moves the instance to `pending`, a successful stop to
/// `stopping`, mirroring what the real provider reports right after.
pub struct FakeProvider {
    instance: Mutex<Option<InstanceDescription>>,
    calls: Mutex<Vec<(Call, String)>>,
    fail_on: Option<(Call, ProviderError)>,
}

impl FakeProvider {
    pub fn with_state(state: LifecycleState) -> Self {
        Self {
            instance: Mutex::new(Some(InstanceDescription {
                state,
                public_address: None,
            })),
            calls: Mutex::new(Vec::new()),
            fail_on: None,
        }
    }

    /// Provider reports no matching instance.
    pub fn missing() -> Self {
        Self {
            instance: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            fail_on: None,
        }
    }

    pub fn with_address(self, address: &str) -> Self {
        if let Some(desc) = self.instance.lock().unwrap().as_mut() {
            desc.public_address = Some(address.to_string());
        }
        self
    }

    pub fn failing_on(mut self, call: Call, err: ProviderError) -> Self {
        self.fail_on = Some((call, err));
        self
    }

    pub fn calls(&self) -> Vec<(Call, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| *c == call)
            .count()
    }

    pub fn mutations(&self) -> usize {
        self.count(Call::Start) + self.count(Call::Stop)
    }

    pub fn current_state(&self) -> Option<LifecycleState> {
        self.instance
            .lock()
            .unwrap()
            .as_ref()
            .map(|d| d.state.clone())
    }

    fn enter(&self, call: Call, id: &InstanceId) -> Result<(), ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((call, id.as_str().to_string()));
        match &self.fail_on {
            Some((failing, err)) if *failing == call => Err(err.clone()),
            _ => Ok(()),
        }
    }

    fn set_state(&self, state: LifecycleState) {
        if let Some(desc) = self.instance.lock().unwrap().as_mut() {
            desc.state = state;
        }
    }
}

impl ComputeProvider for FakeProvider {
    async fn describe_instance(
        &self,
        id: &InstanceId,
    ) -> Result<Option<InstanceDescription>, ProviderError> {
        self.enter(Call::Describe, id)?;
        Ok(self.instance.lock().unwrap().clone())
    }

    async fn start_instance(&self, id: &InstanceId) -> Result<(), ProviderError> {
        self.enter(Call::Start, id)?;
        self.set_state(LifecycleState::Pending);
        Ok(())
    }

    async fn stop_instance(&self, id: &InstanceId) -> Result<(), ProviderError> {
        self.enter(Call::Stop, id)?;
        self.set_state(LifecycleState::Stopping);
        Ok(())
    }
}

pub fn throttled() -> ProviderError {
    ProviderError::Throttled(
        "An error occurred (RequestLimitExceeded) when calling the operation: Request limit exceeded."
            .to_string(),
    )
}

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Scripted command runner ──────────────────────────────────────────────────

/// One recorded invocation: program, args, and the settle window for launches.
pub type Invocation = (String, Vec<String>, Option<Duration>);

/// Replays queued results in order and records every invocation.
///
/// Launches consume a queued result like runs do, unless the runner was
/// built with `detaching`, in which case every launch reports a command
/// still in flight.
pub struct ScriptedRunner {
    responses: Mutex<VecDeque<Result<Output>>>,
    invocations: Mutex<Vec<Invocation>>,
    detach_launches: bool,
}

impl ScriptedRunner {
    pub fn new(responses: Vec<Result<Output>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            invocations: Mutex::new(Vec::new()),
            detach_launches: false,
        }
    }

    pub fn detaching(mut self) -> Self {
        self.detach_launches = true;
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    fn record(&self, program: &str, args: &[&str], settle: Option<Duration>) {
        self.invocations.lock().unwrap().push((
            program.to_string(),
            args.iter().map(ToString::to_string).collect(),
            settle,
        ));
    }

    fn next(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow::anyhow!("unexpected invocation: {program} {args:?}")))
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.record(program, args, None);
        self.next(program, args)
    }

    async fn launch(
        &self,
        program: &str,
        args: &[&str],
        settle: Duration,
    ) -> Result<LaunchOutcome> {
        self.record(program, args, Some(settle));
        if self.detach_launches {
            return Ok(LaunchOutcome::Detached);
        }
        self.next(program, args).map(LaunchOutcome::Exited)
    }
}
