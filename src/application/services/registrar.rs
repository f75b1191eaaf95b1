//! Application service: unit registration.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::application::ports::{ControlPlane, UnitRegistration};
use crate::domain::{DeployError, EnvVar, Manifest};

/// Register the unit for `app` and return the authoritative environment.
///
/// A non-empty manifest is sent along as JSON so the control plane learns
/// the unit's processes, hooks and healthcheck.
///
/// # Errors
///
/// Returns [`DeployError::Registration`] if the control plane cannot be
/// reached or rejects the request.
pub async fn register_unit(
    control_plane: &impl ControlPlane,
    app: &str,
    manifest: &Manifest,
    hostname: Option<&str>,
) -> Result<Vec<EnvVar>> {
    let customdata = if manifest.is_empty() {
        None
    } else {
        Some(serde_json::to_string(manifest).context("cannot encode manifest for registration")?)
    };
    let registration = UnitRegistration {
        hostname: hostname.map(str::to_owned),
        customdata,
    };

    let envs = control_plane
        .register_unit(app, &registration)
        .await
        .map_err(|e| DeployError::Registration {
            app: app.to_string(),
            reason: format!("{e:#}"),
        })?;

    info!(app, count = envs.len(), "unit registered");
    debug!(names = ?envs.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(), "received envs");
    Ok(envs)
}
