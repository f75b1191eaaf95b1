//! Application service: staged diff reading and reporting.

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use crate::application::ports::{ControlPlane, LocalFs};
use crate::domain::diff::DIFF_FILE_NAME;
use crate::domain::{DeployError, DiffRecord};

/// Read the staged diff from `dir`.
///
/// # Errors
///
/// Returns an error if the diff file exists but cannot be read.
pub fn read_diff_deploy(fs: &impl LocalFs, dir: &Path) -> Result<DiffRecord> {
    let record = DiffRecord::from_staged(fs.read_optional(&dir.join(DIFF_FILE_NAME))?);
    debug!(
        bytes = record.content.len(),
        first_deploy = record.is_first_deploy,
        "read staged diff"
    );
    Ok(record)
}

/// Send `diff` to the control plane.
///
/// # Errors
///
/// Returns [`DeployError::DiffReport`] on any failure. Callers treat this as
/// non-fatal.
pub async fn report_diff(
    control_plane: &impl ControlPlane,
    app: &str,
    diff: &DiffRecord,
) -> Result<()> {
    control_plane
        .report_diff(app, &diff.content)
        .await
        .map_err(|e| {
            DeployError::DiffReport {
                app: app.to_string(),
                reason: format!("{e:#}"),
            }
            .into()
        })
}
