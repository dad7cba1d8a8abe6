//! Wake-and-wait: request a start, then poll status until the instance runs.
//!
//! The advisory `estimatedTime` from the controller is shown to the user but
//! never trusted; readiness is decided by polling `status`.

use std::time::Duration;

use thiserror::Error;
use waker_common::{Action, ControlResponse, LifecycleState};

use crate::client::{ClientError, ControlApi};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(120);

/// Shortest pause between polls; a smaller interval is raised to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    pub poll_interval: Duration,
    pub max_wait: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}

/// Progress notifications emitted while waking.
#[derive(Debug)]
pub enum WakeEvent<'a> {
    /// The start request was accepted (or was a no-op).
    Started(&'a ControlResponse),
    /// A status poll returned.
    Polled(&'a ControlResponse),
    /// A status poll could not be completed; polling continues.
    PollFailed(&'a ClientError),
}

#[derive(Debug, Error)]
pub enum WakeError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("start refused (HTTP {status}): {message}")]
    Refused { status: u16, message: String },

    #[error("instance entered state '{0}' and will not become ready")]
    Unreachable(LifecycleState),

    #[error("instance not running after {0}s")]
    TimedOut(u64),
}

/// Request a start and poll until the instance reports `running`.
///
/// `sleep` is called between polls and also drives the elapsed-time
/// budget, so tests can run without real delays.
///
/// # Errors
///
/// Returns an error if the start is refused, the instance moves to a state
/// it cannot start from, or `max_wait` elapses first.
pub fn wake<C: ControlApi>(
    client: &C,
    options: WaitOptions,
    mut sleep: impl FnMut(Duration),
    mut on_event: impl FnMut(WakeEvent<'_>),
) -> Result<ControlResponse, WakeError> {
    let started = client.send(Action::Start)?;
    if !started.is_success() {
        return Err(WakeError::Refused {
            status: started.status_code,
            message: started.error.unwrap_or_default(),
        });
    }
    on_event(WakeEvent::Started(&started));
    if started.status == Some(LifecycleState::Running) {
        return Ok(started);
    }

    let interval = options.poll_interval.max(MIN_POLL_INTERVAL);
    let mut waited = Duration::ZERO;
    while waited < options.max_wait {
        sleep(interval);
        waited += interval;

        match client.send(Action::Status) {
            Ok(polled) => {
                on_event(WakeEvent::Polled(&polled));
                match polled.status {
                    Some(LifecycleState::Running) => return Ok(polled),
                    Some(state @ (LifecycleState::ShuttingDown | LifecycleState::Terminated)) => {
                        return Err(WakeError::Unreachable(state));
                    }
                    _ => {}
                }
            }
            Err(e) => on_event(WakeEvent::PollFailed(&e)),
        }
    }

    Err(WakeError::TimedOut(options.max_wait.as_secs()))
}
