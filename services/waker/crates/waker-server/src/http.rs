//! HTTP surface: one control endpoint plus a health probe.
//!
//! `OPTIONS` is answered from the pre-built CORS headers alone. `GET` and
//! `POST` resolve an action and hand it to the controller. Every response,
//! including failures, carries the same CORS header set.

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    InvalidHeaderValue,
};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use serde::Deserialize;
use waker_common::{ControlResponse, InstanceId};

use crate::application::ports::ComputeProvider;
use crate::application::{InstanceController, resolve_action};

pub const ALLOWED_HEADERS: &str = "Content-Type";
pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Shared, read-only state built once at start-up.
pub struct AppState<P> {
    controller: InstanceController<P>,
    instance_id: Option<InstanceId>,
    cors: HeaderMap,
}

impl<P: ComputeProvider + Sync> AppState<P> {
    /// Build the state. Fails only when `allowed_origins` is not a valid header value.
    pub fn new(
        provider: P,
        instance_id: Option<InstanceId>,
        allowed_origins: &str,
    ) -> Result<Self, InvalidHeaderValue> {
        Ok(Self {
            controller: InstanceController::new(provider),
            instance_id,
            cors: cors_headers(allowed_origins)?,
        })
    }

    #[must_use]
    pub fn controller(&self) -> &InstanceController<P> {
        &self.controller
    }
}

/// The fixed CORS header set attached to every response.
pub fn cors_headers(allowed_origins: &str) -> Result<HeaderMap, InvalidHeaderValue> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_str(allowed_origins)?,
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    Ok(headers)
}

/// Compose the router:
///   - `/`       → control endpoint (any method)
///   - `/health` → load-balancer probe
pub fn router<P>(state: Arc<AppState<P>>) -> Router
where
    P: ComputeProvider + Send + Sync + 'static,
{
    Router::new()
        .route("/", any(control::<P>))
        .route("/health", get(health))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ActionQuery {
    action: Option<String>,
}

async fn control<P>(
    State(state): State<Arc<AppState<P>>>,
    method: Method,
    query: Result<Query<ActionQuery>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Response
where
    P: ComputeProvider + Send + Sync + 'static,
{
    if method == Method::OPTIONS {
        return (StatusCode::OK, state.cors.clone()).into_response();
    }
    if method != Method::GET && method != Method::POST {
        return respond(
            &state.cors,
            ControlResponse::failure(405, "Method not allowed"),
        );
    }

    let body = body.unwrap_or_default();
    let query_action = query.ok().and_then(|Query(q)| q.action);
    let action = resolve_action(&body, query_action.as_deref());
    tracing::debug!(%method, %action, "control request");

    let response = state
        .controller
        .handle(action, state.instance_id.as_ref())
        .await;
    respond(&state.cors, response)
}

fn respond(cors: &HeaderMap, response: ControlResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, cors.clone(), Json(response)).into_response()
}

/// Minimal health-check handler for load-balancer probes.
async fn health() -> StatusCode {
    StatusCode::OK
}
