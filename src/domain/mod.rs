//! Domain layer: pure deploy types and parsing.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod diff;
pub mod env;
pub mod error;
pub mod exec;
pub mod manifest;

pub use config::AgentConfig;
pub use diff::DiffRecord;
pub use env::EnvVar;
pub use error::DeployError;
pub use exec::ShellInvocation;
pub use manifest::{Hooks, Manifest};
