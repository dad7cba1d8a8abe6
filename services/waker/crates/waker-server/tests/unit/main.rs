//! Unit tests for the waker server
//!
//! These tests use fake providers and runners and run without external I/O.

mod helpers;
mod property_tests;
