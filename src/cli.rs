//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::application::ports::ConfigStore;
use crate::application::services::deploy::{DeployOptions, deploy_agent};
use crate::domain::AgentConfig;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::control_plane::{HttpControlPlane, unit_hostname};
use crate::infra::fs::StdFs;
use crate::output::{OutputContext, TerminalReporter};

/// Trailing argument older callers pass after the command.
pub const LEGACY_DEPLOY_ACTION: &str = "deploy";

/// Run build hooks and the start command for an application unit
#[derive(Parser, Debug)]
#[command(name = "deploy-agent", version, arg_required_else_help = true)]
pub struct Cli {
    /// Control-plane base URL
    pub server_url: String,

    /// Bearer token for the control plane
    pub token: String,

    /// Application name
    pub app_name: String,

    /// Main command, run through a login shell after the build hooks
    #[arg(allow_hyphen_values = true)]
    pub command: String,

    /// Legacy action argument (`deploy`); accepted and ignored
    pub legacy_action: Option<String>,

    /// Path to the agent config file
    #[arg(long, env = "DEPLOY_AGENT_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory hooks and the command run in
    #[arg(long, env = "DEPLOY_AGENT_WORKING_DIR", value_name = "DIR")]
    pub working_dir: Option<PathBuf>,

    /// Where to write the shell-sourceable app environment
    #[arg(long, env = "DEPLOY_AGENT_ENVS_FILE", value_name = "PATH")]
    pub envs_file: Option<PathBuf>,

    /// Login shell used to run hooks and the command
    #[arg(long, env = "DEPLOY_AGENT_SHELL", value_name = "PATH")]
    pub shell: Option<PathBuf>,

    /// Per-command timeout in seconds (0 disables it)
    #[arg(long = "timeout", env = "DEPLOY_AGENT_COMMAND_TIMEOUT", value_name = "SECS")]
    pub command_timeout: Option<u64>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output (also disabled when `NO_COLOR` is set)
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    #[must_use]
    pub fn output_context(&self) -> OutputContext {
        OutputContext::new(self.no_color, self.quiet)
    }

    /// Execute the deploy, printing progress through `ctx`.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of the deploy pipeline, or a config
    /// loading error.
    pub async fn run(self, ctx: &OutputContext) -> Result<()> {
        let config = self.resolve_config(&YamlConfigStore::new(self.config.clone()))?;

        if let Some(action) = self.legacy_action.as_deref()
            && action != LEGACY_DEPLOY_ACTION
        {
            tracing::warn!(action, "ignoring unknown legacy action");
            ctx.warn(&format!("ignoring unknown legacy action '{action}'"));
        }

        let runner = TokioCommandRunner::new();
        let control_plane =
            HttpControlPlane::new(&self.server_url, &self.token, config.http_timeout());
        let reporter = TerminalReporter::new(ctx);
        let hostname = unit_hostname();

        let outcome = deploy_agent(
            &runner,
            &StdFs,
            &control_plane,
            DeployOptions {
                reporter: &reporter,
                config: &config,
                app_name: &self.app_name,
                command: &self.command,
                hostname: hostname.as_deref(),
            },
        )
        .await?;

        ctx.deploy_summary(&self.app_name, &outcome, reporter.warning_count());
        Ok(())
    }

    /// Load the config file and apply flag overrides on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn resolve_config(&self, store: &impl ConfigStore) -> Result<AgentConfig> {
        let mut config = store.load()?;
        if let Some(dir) = &self.working_dir {
            config.working_dir.clone_from(dir);
        }
        if let Some(path) = &self.envs_file {
            config.envs_file.clone_from(path);
        }
        if let Some(shell) = &self.shell {
            config.shell.clone_from(shell);
        }
        if self.command_timeout.is_some() {
            config.command_timeout_secs = self.command_timeout;
        }
        Ok(config)
    }
}
