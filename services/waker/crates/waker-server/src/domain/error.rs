//! Typed domain error enums.
//!
//! Every variant maps onto exactly one HTTP-equivalent status code, and
//! every variant is converted into a `ControlResponse` at the controller
//! boundary.

use thiserror::Error;
use waker_common::{Action, ControlResponse, LifecycleState};

// ── Provider errors ──────────────────────────────────────────────────────────

/// Broad category of a provider failure, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    PermissionDenied,
    Throttled,
    NotFound,
    Unavailable,
}

impl ProviderErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission_denied",
            Self::Throttled => "throttled",
            Self::NotFound => "not_found",
            Self::Unavailable => "unavailable",
        }
    }
}

/// A failed call to the compute provider.
///
/// Displays as the provider's own text, unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    Throttled(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unavailable(String),
}

impl ProviderError {
    #[must_use]
    pub fn kind(&self) -> ProviderErrorKind {
        match self {
            Self::PermissionDenied(_) => ProviderErrorKind::PermissionDenied,
            Self::Throttled(_) => ProviderErrorKind::Throttled,
            Self::NotFound(_) => ProviderErrorKind::NotFound,
            Self::Unavailable(_) => ProviderErrorKind::Unavailable,
        }
    }
}

// ── Control errors ───────────────────────────────────────────────────────────

/// Every way a control request can fail.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("INSTANCE_ID not configured")]
    MissingInstanceId,

    #[error("Cannot {action} instance in state: {state}")]
    Guard {
        action: Action,
        state: LifecycleState,
    },

    #[error("Instance not found")]
    NotFound,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl ControlError {
    /// HTTP-equivalent status code for this failure.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Guard { .. } => 400,
            Self::NotFound => 404,
            Self::MissingInstanceId | Self::Provider(_) => 500,
        }
    }

    /// Normalised response body. Guard violations also report the observed state.
    #[must_use]
    pub fn into_response(self) -> ControlResponse {
        let response = ControlResponse::failure(self.status_code(), self.to_string());
        match self {
            Self::Guard { state, .. } => response.with_status(state),
            _ => response,
        }
    }
}
