//! Application service: persist the app environment for descendant shells.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::LocalFs;
use crate::domain::EnvVar;
use crate::domain::env::render_envs_file;

/// Write `envs` to `path` as `export NAME='VALUE'` lines, in the given order.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_app_envs_file(fs: &impl LocalFs, path: &Path, envs: &[EnvVar]) -> Result<()> {
    fs.write(path, &render_envs_file(envs))
        .with_context(|| format!("cannot save app envs to {}", path.display()))
}
