//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, `std::fs`, `std::process`, or `std::net`. All error types
//! implement `thiserror::Error` and convert to `anyhow::Error` via the `?`
//! operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Deploy pipeline errors ────────────────────────────────────────────────────

/// Failures of the deploy pipeline.
///
/// Every variant except [`DeployError::DiffReport`] is fatal and aborts the
/// remaining steps. `DiffReport` is logged by the orchestrator and swallowed.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("cannot parse manifest {}: {source}", path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unit registration for app '{app}' failed: {reason}")]
    Registration { app: String, reason: String },

    #[error("command `{command}` failed: {}", describe_exit(*code))]
    CommandExecution {
        command: String,
        /// Exit code, `None` when the process could not be spawned, was
        /// killed by a signal, or timed out.
        code: Option<i32>,
        /// Captured stdout followed by stderr.
        output: String,
    },

    #[error("diff report for app '{app}' failed: {reason}")]
    DiffReport { app: String, reason: String },
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "no exit status".to_string(),
    }
}

impl DeployError {
    /// Whether the pipeline must stop on this error.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::DiffReport { .. })
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
