//! Infrastructure adapters for the application ports.

pub mod command_runner;
pub mod multipass;

pub use command_runner::TokioCommandRunner;
pub use multipass::MultipassProvider;
