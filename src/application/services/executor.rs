//! Application service: hook and command execution.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Processes are spawned through the injected `CommandRunner` port.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info};

use crate::application::ports::{CommandRunner, LocalFs};
use crate::domain::env::merge_environment;
use crate::domain::{AgentConfig, DeployError, EnvVar, Manifest, ShellInvocation};

/// The configured working directory if it exists, otherwise `/`.
pub fn resolve_working_dir(fs: &impl LocalFs, configured: &Path) -> PathBuf {
    if fs.is_dir(configured) {
        configured.to_path_buf()
    } else {
        debug!(configured = %configured.display(), "working directory missing, using /");
        PathBuf::from("/")
    }
}

/// The agent's own environment, skipping entries that are not valid UTF-8.
fn process_environment() -> impl Iterator<Item = (String, String)> {
    std::env::vars_os().filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
}

/// Run `commands` one after another through a login shell.
///
/// Every command sees the same working directory and the agent environment
/// overlaid with `envs`. Stops at the first failure.
///
/// # Errors
///
/// Returns [`DeployError::CommandExecution`] for the first command that fails
/// to spawn, times out, or exits non-zero.
pub async fn exec_script(
    runner: &impl CommandRunner,
    fs: &impl LocalFs,
    config: &AgentConfig,
    commands: &[String],
    envs: &[EnvVar],
) -> Result<()> {
    let dir = resolve_working_dir(fs, &config.working_dir);
    let env = merge_environment(process_environment(), envs);

    for command in commands {
        info!(command = %command, dir = %dir.display(), "running command");
        let invocation = ShellInvocation::login(&config.shell, command, &dir, env.clone())
            .with_timeout(config.command_timeout());

        let output = runner
            .run(&invocation)
            .await
            .map_err(|e| DeployError::CommandExecution {
                command: command.clone(),
                code: None,
                output: format!("{e:#}"),
            })?;

        if !output.status.success() {
            let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
            captured.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(DeployError::CommandExecution {
                command: command.clone(),
                code: output.status.code(),
                output: captured,
            }
            .into());
        }
    }
    Ok(())
}

/// Run the manifest's build hooks in declaration order.
///
/// # Errors
///
/// Returns [`DeployError::CommandExecution`] for the first hook that fails.
/// Hooks that already ran are not undone.
pub async fn build_hooks(
    runner: &impl CommandRunner,
    fs: &impl LocalFs,
    config: &AgentConfig,
    manifest: &Manifest,
    envs: &[EnvVar],
) -> Result<()> {
    for hook in &manifest.hooks.build_hooks {
        exec_script(runner, fs, config, std::slice::from_ref(hook), envs).await?;
    }
    Ok(())
}
