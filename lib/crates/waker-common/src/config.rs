use std::net::{Ipv4Addr, SocketAddr};

use serde::Deserialize;

use crate::types::InstanceId;

/// Controller configuration, read once from the process environment.
///
/// Keys are unprefixed (`INSTANCE_ID`, `ALLOWED_ORIGINS`, ...). A missing
/// `INSTANCE_ID` is not a load error: the server still starts and answers
/// every control request with a configuration failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ControllerConfig {
    /// The managed instance. Blank counts as absent.
    #[serde(default)]
    pub instance_id: Option<String>,

    /// Echoed verbatim in `Access-Control-Allow-Origin`.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,

    /// Socket address to bind the HTTP server to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Path to TLS certificate (enables HTTPS together with `tls_key`).
    #[serde(default)]
    pub tls_cert: Option<String>,

    /// Path to TLS private key.
    #[serde(default)]
    pub tls_key: Option<String>,

    /// Provider CLI executable.
    #[serde(default = "default_multipass_bin")]
    pub multipass_bin: String,

    /// Upper bound for a single provider command.
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,
}

fn default_allowed_origins() -> String {
    "*".to_string()
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080))
}

fn default_multipass_bin() -> String {
    "multipass".to_string()
}

fn default_provider_timeout_secs() -> u64 {
    30
}

impl ControllerConfig {
    /// The configured instance, if one is set and non-blank.
    #[must_use]
    pub fn instance_id(&self) -> Option<InstanceId> {
        self.instance_id.as_deref().and_then(InstanceId::new)
    }

    /// Certificate and key paths when both are configured.
    #[must_use]
    pub fn tls_paths(&self) -> Option<(&str, &str)> {
        match (&self.tls_cert, &self.tls_key) {
            (Some(cert), Some(key)) => Some((cert, key)),
            _ => None,
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            instance_id: None,
            allowed_origins: default_allowed_origins(),
            listen_addr: default_listen_addr(),
            tls_cert: None,
            tls_key: None,
            multipass_bin: default_multipass_bin(),
            provider_timeout_secs: default_provider_timeout_secs(),
        }
    }
}
