//! HTTP client for the waker control endpoint.
//!
//! Status queries go out as `GET ?action=status`; start and stop as a JSON
//! `POST`, the same shapes the static front-end sends. Non-2xx replies
//! still carry a `ControlResponse` body and are decoded, not treated as
//! transport failures.

use std::time::Duration;

use thiserror::Error;
use waker_common::{Action, ControlResponse};

/// Default per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure to obtain a decodable response from the endpoint.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("unexpected response body (HTTP {status}): {message}")]
    Decode { status: u16, message: String },
}

/// Anything that can send one control action and return the decoded reply.
pub trait ControlApi {
    /// Send `action` to the controller.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is unreachable or the body is not a
    /// control response.
    fn send(&self, action: Action) -> Result<ControlResponse, ClientError>;
}

/// Blocking `ureq` client bound to one endpoint URL.
pub struct HttpControlClient {
    url: String,
    agent: ureq::Agent,
}

impl HttpControlClient {
    #[must_use]
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ControlApi for HttpControlClient {
    fn send(&self, action: Action) -> Result<ControlResponse, ClientError> {
        let result = match action {
            Action::Status => self
                .agent
                .get(&self.url)
                .query("action", action.as_str())
                .call(),
            Action::Start | Action::Stop => self
                .agent
                .post(&self.url)
                .set("Content-Type", "application/json")
                .send_string(&serde_json::json!({ "action": action.as_str() }).to_string()),
        };

        let response = match result {
            Ok(response) | Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(t)) => {
                return Err(ClientError::Transport {
                    url: self.url.clone(),
                    message: t.to_string(),
                });
            }
        };

        let status = response.status();
        let body = response.into_string().map_err(|e| ClientError::Decode {
            status,
            message: e.to_string(),
        })?;
        decode(status, &body)
    }
}

/// Decode a response body, attaching the HTTP status.
///
/// # Errors
///
/// Returns `ClientError::Decode` if `body` is not a control response.
pub fn decode(status: u16, body: &str) -> Result<ControlResponse, ClientError> {
    let mut response: ControlResponse =
        serde_json::from_str(body).map_err(|e| ClientError::Decode {
            status,
            message: e.to_string(),
        })?;
    response.status_code = status;
    Ok(response)
}
