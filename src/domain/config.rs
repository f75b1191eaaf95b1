//! Domain types for agent configuration.
//!
//! Pure functions only, no I/O.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ── Constants ────────────────────────────────────────────────────────────────

/// Where the application source is unpacked inside the unit.
pub const DEFAULT_WORKING_DIR: &str = "/home/application/current";

/// Shell-sourceable environment file for processes started outside the agent.
pub const DEFAULT_ENVS_FILE: &str = "/tmp/app_envs";

/// Login shell used for hooks and the main command.
pub const DEFAULT_SHELL: &str = "/bin/bash";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// ── Config schema ────────────────────────────────────────────────────────────

/// Agent configuration, typically stored in `/etc/deploy-agent/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Directory commands run in. Falls back to `/` when missing.
    pub working_dir: PathBuf,
    /// Output path of the `export NAME='VALUE'` file.
    pub envs_file: PathBuf,
    /// Shell invoked as `<shell> -lc <command>`.
    pub shell: PathBuf,
    /// Upper bound for each hook or command. Unset or `0` means no limit.
    pub command_timeout_secs: Option<u64>,
    /// Timeout for each control-plane request.
    pub http_timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from(DEFAULT_WORKING_DIR),
            envs_file: PathBuf::from(DEFAULT_ENVS_FILE),
            shell: PathBuf::from(DEFAULT_SHELL),
            command_timeout_secs: None,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl AgentConfig {
    #[must_use]
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
