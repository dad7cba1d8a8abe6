//! Integration tests for the waker server
//!
//! These tests drive the full axum router in-process with requests shaped
//! like the static front-end's, backed by the recording fake provider.

#[path = "../unit/helpers.rs"]
mod helpers;
