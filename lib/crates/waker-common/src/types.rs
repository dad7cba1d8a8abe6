use std::fmt;

use serde::{Deserialize, Serialize};

/// Advisory boot latency reported after a start request, in seconds.
///
/// Not measured. Callers poll `status` rather than trusting it.
pub const ESTIMATED_BOOT_SECS: u32 = 60;

/// Identifier of the single managed instance.
///
/// Supplied by configuration, never by the caller. Blank values are rejected
/// at construction so a present `InstanceId` is always usable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    /// Build an identifier, returning `None` for empty or whitespace-only input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of the instance as reported by the compute provider.
///
/// The provider owns this state; values outside the known set are carried
/// verbatim in `Unknown` and treated as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LifecycleState {
    Pending,
    Running,
    ShuttingDown,
    Terminated,
    Stopping,
    Stopped,
    Unknown(String),
}

impl LifecycleState {
    /// Map a provider state name onto the known set.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pending" => Self::Pending,
            "running" => Self::Running,
            "shutting-down" => Self::ShuttingDown,
            "terminated" => Self::Terminated,
            "stopping" => Self::Stopping,
            "stopped" => Self::Stopped,
            other => Self::Unknown(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::ShuttingDown => "shutting-down",
            Self::Terminated => "terminated",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::Unknown(raw) if raw.is_empty() => "unknown",
            Self::Unknown(raw) => raw,
        }
    }

    /// A start request is only issued from these states.
    #[must_use]
    pub fn can_start(&self) -> bool {
        matches!(self, Self::Stopped | Self::Stopping)
    }

    /// A stop request is only issued from `running`.
    #[must_use]
    pub fn can_stop(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl From<String> for LifecycleState {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<LifecycleState> for String {
    fn from(state: LifecycleState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested intent of a control request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Start,
    Stop,
    #[default]
    Status,
}

impl Action {
    /// Parse an action name. Anything unrecognised is a status query.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "start" => Self::Start,
            "stop" => Self::Stop,
            _ => Self::Status,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Status => "status",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `publicIp` field of a response.
///
/// Status and start no-op responses report the address even when there is
/// none, which goes on the wire as `null`. Other responses leave it out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum PublicAddress {
    #[default]
    Omitted,
    Unassigned,
    Assigned(String),
}

impl PublicAddress {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Assigned(address) => Some(address),
            Self::Omitted | Self::Unassigned => None,
        }
    }

    #[must_use]
    pub fn is_omitted(&self) -> bool {
        matches!(self, Self::Omitted)
    }
}

impl From<Option<String>> for PublicAddress {
    fn from(raw: Option<String>) -> Self {
        raw.map_or(Self::Unassigned, Self::Assigned)
    }
}

impl From<PublicAddress> for Option<String> {
    fn from(address: PublicAddress) -> Self {
        match address {
            PublicAddress::Assigned(address) => Some(address),
            PublicAddress::Omitted | PublicAddress::Unassigned => None,
        }
    }
}

/// Normalised result of one control request.
///
/// `status_code` travels as the HTTP status, not in the body. Every other
/// field except a reported `publicIp` is omitted from the body when unset,
/// so any response (success or failure) decodes into this shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlResponse {
    #[serde(skip)]
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LifecycleState>,
    #[serde(
        default,
        rename = "publicIp",
        skip_serializing_if = "PublicAddress::is_omitted"
    )]
    pub public_address: PublicAddress,
    #[serde(
        default,
        rename = "estimatedTime",
        skip_serializing_if = "Option::is_none"
    )]
    pub estimated_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
}

impl ControlResponse {
    /// A 200 response reporting `status`.
    #[must_use]
    pub fn ok(status: LifecycleState) -> Self {
        Self {
            status_code: 200,
            status: Some(status),
            ..Self::default()
        }
    }

    /// A failure response carrying `error` text.
    #[must_use]
    pub fn failure(status_code: u16, error: impl Into<String>) -> Self {
        Self {
            status_code,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: LifecycleState) -> Self {
        self.status = Some(status);
        self
    }

    /// Report the address; `None` is sent as `"publicIp": null`.
    #[must_use]
    pub fn with_public_address(mut self, address: Option<String>) -> Self {
        self.public_address = address.into();
        self
    }

    #[must_use]
    pub fn public_ip(&self) -> Option<&str> {
        self.public_address.as_str()
    }

    #[must_use]
    pub fn with_estimated_seconds(mut self, seconds: u32) -> Self {
        self.estimated_seconds = Some(seconds);
        self
    }

    #[must_use]
    pub fn with_instance_id(mut self, id: &InstanceId) -> Self {
        self.instance_id = Some(id.as_str().to_string());
        self
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
