//! The instance controller: one guarded state transition per request.
//!
//! Every mutating action reads the current state first and issues at most
//! one provider mutation. Start is only issued from `stopped`/`stopping`,
//! stop only from `running`. No state is kept between calls; concurrent
//! requests each perform their own read, so two starts racing from
//! `stopped` may both reach the provider.

use waker_common::{Action, ControlResponse, ESTIMATED_BOOT_SECS, InstanceId, LifecycleState};

use crate::application::ports::{ComputeProvider, InstanceDescription};
use crate::domain::ControlError;

pub struct InstanceController<P> {
    provider: P,
}

impl<P: ComputeProvider + Sync> InstanceController<P> {
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Handle one control request.
    ///
    /// Never fails: every error is folded into the returned response with
    /// its status code. `None` for `instance_id` is a configuration error
    /// and short-circuits before any provider call.
    pub async fn handle(
        &self,
        action: Action,
        instance_id: Option<&InstanceId>,
    ) -> ControlResponse {
        match self.try_handle(action, instance_id).await {
            Ok(response) => response,
            Err(err) => {
                log_failure(action, instance_id, &err);
                err.into_response()
            }
        }
    }

    async fn try_handle(
        &self,
        action: Action,
        instance_id: Option<&InstanceId>,
    ) -> Result<ControlResponse, ControlError> {
        let id = instance_id.ok_or(ControlError::MissingInstanceId)?;
        match action {
            Action::Status => self.status(id).await,
            Action::Start => self.start(id).await,
            Action::Stop => self.stop(id).await,
        }
    }

    async fn describe(&self, id: &InstanceId) -> Result<InstanceDescription, ControlError> {
        self.provider
            .describe_instance(id)
            .await?
            .ok_or(ControlError::NotFound)
    }

    async fn status(&self, id: &InstanceId) -> Result<ControlResponse, ControlError> {
        let current = self.describe(id).await?;
        tracing::debug!(instance_id = %id, state = %current.state, "status queried");
        Ok(ControlResponse::ok(current.state)
            .with_public_address(current.public_address)
            .with_instance_id(id))
    }

    async fn start(&self, id: &InstanceId) -> Result<ControlResponse, ControlError> {
        let current = self.describe(id).await?;

        if current.state == LifecycleState::Running {
            tracing::info!(instance_id = %id, "start requested but instance already running");
            return Ok(ControlResponse::ok(LifecycleState::Running)
                .with_message("Instance is already running")
                .with_public_address(current.public_address));
        }

        if !current.state.can_start() {
            return Err(ControlError::Guard {
                action: Action::Start,
                state: current.state,
            });
        }

        self.provider.start_instance(id).await?;
        tracing::info!(instance_id = %id, from = %current.state, "instance start requested");

        Ok(ControlResponse::ok(LifecycleState::Pending)
            .with_message("Instance starting")
            .with_estimated_seconds(ESTIMATED_BOOT_SECS))
    }

    async fn stop(&self, id: &InstanceId) -> Result<ControlResponse, ControlError> {
        let current = self.describe(id).await?;

        if current.state == LifecycleState::Stopped {
            tracing::info!(instance_id = %id, "stop requested but instance already stopped");
            return Ok(ControlResponse::ok(LifecycleState::Stopped)
                .with_message("Instance is already stopped"));
        }

        if !current.state.can_stop() {
            return Err(ControlError::Guard {
                action: Action::Stop,
                state: current.state,
            });
        }

        self.provider.stop_instance(id).await?;
        tracing::info!(instance_id = %id, "instance stop requested");

        Ok(ControlResponse::ok(LifecycleState::Stopping).with_message("Instance stopping"))
    }
}

fn log_failure(action: Action, instance_id: Option<&InstanceId>, err: &ControlError) {
    let instance_id = instance_id.map_or("<unset>", InstanceId::as_str);
    match err {
        ControlError::MissingInstanceId => {
            tracing::error!(%action, "INSTANCE_ID not configured; refusing request");
        }
        ControlError::Guard { state, .. } => {
            tracing::warn!(%action, instance_id, %state, "transition refused");
        }
        ControlError::NotFound => {
            tracing::warn!(%action, instance_id, "instance not found");
        }
        ControlError::Provider(e) => {
            tracing::error!(
                %action,
                instance_id,
                kind = e.kind().as_str(),
                error = %e,
                "provider call failed",
            );
        }
    }
}
