//! Action resolution for inbound control requests.
//!
//! A non-empty body decides on its own: a JSON object yields its `action`
//! field, anything else yields `status`. Only an empty body defers to the
//! `action` query parameter. Nothing here fails.

use serde_json::Value;
use waker_common::Action;

/// Resolve the requested action from a raw body and the `action` query parameter.
#[must_use]
pub fn resolve_action(body: &[u8], query_action: Option<&str>) -> Action {
    if body.is_empty() {
        return query_action.map_or(Action::Status, Action::parse);
    }
    action_from_body(body)
}

fn action_from_body(body: &[u8]) -> Action {
    let Ok(Value::Object(fields)) = serde_json::from_slice::<Value>(body) else {
        return Action::Status;
    };
    fields
        .get("action")
        .and_then(Value::as_str)
        .map_or(Action::Status, Action::parse)
}
