//! Application service: the deploy pipeline.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.
//!
//! The pipeline is strictly sequential:
//! load manifest → register unit → persist envs → build hooks → main command
//! → report diff. The first fatal error ends the run; earlier side effects
//! (hooks already run, env file already written) are left in place.

use anyhow::Result;
use tracing::warn;

use crate::application::ports::{CommandRunner, ControlPlane, LocalFs, ProgressReporter};
use crate::application::services::diff_report::{read_diff_deploy, report_diff};
use crate::application::services::env_persist::save_app_envs_file;
use crate::application::services::executor::{build_hooks, exec_script, resolve_working_dir};
use crate::application::services::manifest_loader::{load_manifest, load_processes};
use crate::application::services::registrar::register_unit;
use crate::domain::{AgentConfig, DeployError};

pub struct DeployOptions<'a, R: ProgressReporter> {
    pub reporter: &'a R,
    pub config: &'a AgentConfig,
    pub app_name: &'a str,
    /// Main command, run through the login shell after the build hooks.
    pub command: &'a str,
    pub hostname: Option<&'a str>,
}

/// Outcome of a successful deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    pub hooks_run: usize,
    /// No staged diff was found.
    pub first_deploy: bool,
    /// Whether the control plane accepted the diff report.
    pub diff_reported: bool,
}

/// Run the full deploy pipeline for one unit.
///
/// # Errors
///
/// Returns the first fatal error: `DeployError::ManifestParse`,
/// `DeployError::Registration`, `DeployError::CommandExecution`, or an I/O
/// error on the env file or staged diff. Diff reporting failures are only
/// logged.
pub async fn deploy_agent(
    runner: &impl CommandRunner,
    fs: &impl LocalFs,
    control_plane: &impl ControlPlane,
    opts: DeployOptions<'_, impl ProgressReporter>,
) -> Result<DeployOutcome> {
    let DeployOptions {
        reporter,
        config,
        app_name,
        command,
        hostname,
    } = opts;
    let dir = resolve_working_dir(fs, &config.working_dir);

    reporter.step("loading manifest...");
    let manifest = {
        let mut manifest = load_manifest(fs, &dir)?;
        load_processes(fs, &dir, &mut manifest)?;
        manifest
    };

    reporter.step(&format!("registering unit for app '{app_name}'..."));
    let envs = register_unit(control_plane, app_name, &manifest, hostname).await?;
    save_app_envs_file(fs, &config.envs_file, &envs)?;
    reporter.success(&format!("received {} environment variables", envs.len()));

    let hooks_run = manifest.hooks.build_hooks.len();
    if hooks_run > 0 {
        reporter.step(&format!("running {hooks_run} build hook(s)..."));
        build_hooks(runner, fs, config, &manifest, &envs).await?;
        reporter.success("build hooks finished");
    }

    reporter.step(&format!("running `{command}`..."));
    exec_script(runner, fs, config, &[command.to_string()], &envs).await?;
    reporter.success("command finished");

    let diff = read_diff_deploy(fs, &dir)?;
    let diff_reported = match report_diff(control_plane, app_name, &diff).await {
        Ok(()) => true,
        Err(e) => match e.downcast_ref::<DeployError>() {
            Some(err) if !err.is_fatal() => {
                warn!(error = %format!("{e:#}"), "diff report failed");
                reporter.warn(&format!("{e:#}"));
                false
            }
            _ => return Err(e),
        },
    };

    Ok(DeployOutcome {
        hooks_run,
        first_deploy: diff.is_first_deploy,
        diff_reported,
    })
}
