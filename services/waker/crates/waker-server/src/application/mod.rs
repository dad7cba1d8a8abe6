//! Application layer: ports and the instance controller.
//!
//! Imports only from `crate::domain` and `waker_common`.

pub mod controller;
pub mod ports;
pub mod request;

pub use controller::InstanceController;
pub use request::resolve_action;
