//! Application service: manifest and process-file loading.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All file access is routed through the injected `LocalFs` port.

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use crate::application::ports::LocalFs;
use crate::domain::manifest::{self, MANIFEST_FILE_NAMES, Manifest, PROCFILE_NAME};

/// Load the application manifest from `dir`.
///
/// The first file found among [`MANIFEST_FILE_NAMES`] is parsed. When none
/// exists the empty manifest is returned.
///
/// # Errors
///
/// Returns `DeployError::ManifestParse` for malformed YAML, or an I/O error
/// if a manifest exists but cannot be read.
pub fn load_manifest(fs: &impl LocalFs, dir: &Path) -> Result<Manifest> {
    for name in MANIFEST_FILE_NAMES {
        let path = dir.join(name);
        if let Some(content) = fs.read_optional(&path)? {
            debug!(path = %path.display(), "loading manifest");
            return manifest::parse_manifest(&path, &content);
        }
    }
    debug!(dir = %dir.display(), "no manifest found");
    Ok(Manifest::default())
}

/// Merge the process declarations from `dir/Procfile` into `manifest`.
///
/// A missing Procfile leaves `manifest.processes` untouched.
///
/// # Errors
///
/// Returns an I/O error if the Procfile exists but cannot be read.
pub fn load_processes(fs: &impl LocalFs, dir: &Path, manifest: &mut Manifest) -> Result<()> {
    let path = dir.join(PROCFILE_NAME);
    let Some(content) = fs.read_optional(&path)? else {
        return Ok(());
    };
    let processes = manifest::parse_procfile(&content);
    debug!(count = processes.len(), "loaded process declarations");
    manifest.processes.extend(processes);
    Ok(())
}
