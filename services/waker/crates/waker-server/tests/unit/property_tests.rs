//! Property-based tests for action resolution.
//!
//! Uses `proptest` to check that malformed or absent input can never
//! select a mutating action.

use proptest::prelude::*;
use waker_common::Action;
use waker_server::application::resolve_action;

proptest! {
    /// A present body that is not a JSON object resolves to status, whatever
    /// the query asks for.
    #[test]
    fn prop_non_object_body_is_status(
        body in proptest::collection::vec(any::<u8>(), 1..64),
        query in proptest::option::of(prop_oneof![Just("start"), Just("stop")]),
    ) {
        let is_object = matches!(
            serde_json::from_slice::<serde_json::Value>(&body),
            Ok(serde_json::Value::Object(_))
        );
        prop_assume!(!is_object);
        prop_assert_eq!(resolve_action(&body, query), Action::Status);
    }

    /// A query value other than `start`/`stop` resolves to status.
    #[test]
    fn prop_unrecognised_query_is_status(query in "[a-zA-Z_-]{0,16}") {
        prop_assume!(query != "start" && query != "stop");
        prop_assert_eq!(resolve_action(b"", Some(&query)), Action::Status);
    }

    /// An object body decides the action regardless of the query.
    #[test]
    fn prop_object_body_ignores_query(
        name in "[a-z]{0,8}",
        query in prop_oneof![Just("start"), Just("stop"), Just("status")],
    ) {
        let body = serde_json::json!({ "action": name }).to_string();
        prop_assert_eq!(
            resolve_action(body.as_bytes(), Some(query)),
            Action::parse(&name)
        );
    }
}
