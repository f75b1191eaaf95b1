//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::cli`, or `crate::output`.

use std::path::Path;
use std::process::Output;

use anyhow::Result;

use crate::domain::{AgentConfig, EnvVar, ShellInvocation};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Form fields sent with a unit registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitRegistration {
    /// Hostname of the unit, when it can be determined.
    pub hostname: Option<String>,
    /// JSON-encoded manifest; omitted when the manifest is empty.
    pub customdata: Option<String>,
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so tests can record invocations instead of
/// spawning shells.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run the invocation to completion and capture its output.
    ///
    /// A non-zero exit is returned as `Ok` with a failed status; callers
    /// decide what a failure means.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds the
    /// invocation's timeout. On timeout the child must be killed.
    async fn run(&self, invocation: &ShellInvocation) -> Result<Output>;
}

// ── Control Plane Port ────────────────────────────────────────────────────────

/// The platform API the agent reports to. Server URL and credentials belong
/// to the implementation.
#[allow(async_fn_in_trait)]
pub trait ControlPlane {
    /// Register this unit for `app` and return the app's environment.
    async fn register_unit(
        &self,
        app: &str,
        registration: &UnitRegistration,
    ) -> Result<Vec<EnvVar>>;

    /// Send the deploy diff for `app`. `diff` may be empty.
    async fn report_diff(&self, app: &str, diff: &str) -> Result<()>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Config and Filesystem Ports ───────────────────────────────────────────────

/// Abstracts loading the agent configuration.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<AgentConfig>;
}

/// Abstracts the local filesystem so the deploy pipeline can run against an
/// in-memory tree in tests.
pub trait LocalFs {
    /// Whether `path` exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Read a UTF-8 file, returning `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than "not found".
    fn read_optional(&self, path: &Path) -> Result<Option<String>>;

    /// Write `content` to `path`, replacing any existing file and creating
    /// missing parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write(&self, path: &Path, content: &str) -> Result<()>;
}
