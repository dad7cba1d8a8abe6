//! Domain layer: the error taxonomy of a control request.
//!
//! This module has zero imports from `crate::infra`, `crate::http`,
//! `crate::application`, `tokio`, `std::process`, or `std::net`.

pub mod error;

pub use error::{ControlError, ProviderError, ProviderErrorKind};
