//! Application manifest and process-file parsing.
//!
//! Pure functions only, no I/O. The application layer reads the files and
//! hands their contents in here.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use crate::domain::error::DeployError;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Manifest file names, in lookup order. The first one present wins.
pub const MANIFEST_FILE_NAMES: &[&str] = &["tsuru.yml", "tsuru.yaml", "app.yml", "app.yaml"];

/// Process declaration file name.
pub const PROCFILE_NAME: &str = "Procfile";

/// `<name>: <command>`. The name stops at the first colon, the command must
/// be non-empty.
static PROCESS_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    // constant pattern
    #[allow(clippy::expect_used)]
    Regex::new(r"^([A-Za-z0-9_.-]+)\s*:\s*(\S.*)$").expect("valid regex")
});

// ── Manifest schema ───────────────────────────────────────────────────────────

/// Per-application descriptor: build hooks, restart hooks, healthcheck and
/// process declarations.
///
/// `restart` and `healthcheck` are schema-free and forwarded untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    #[serde(deserialize_with = "null_as_default")]
    pub hooks: Hooks,
    #[serde(deserialize_with = "null_as_default")]
    pub healthcheck: BTreeMap<String, Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub processes: BTreeMap<String, String>,
}

/// The `hooks` section of the manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hooks {
    /// Commands run once each, in order, before the main command.
    #[serde(rename = "build", deserialize_with = "null_as_default")]
    pub build_hooks: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub restart: BTreeMap<String, Value>,
}

impl Manifest {
    /// True when the manifest declares nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.build_hooks.is_empty()
            && self.hooks.restart.is_empty()
            && self.healthcheck.is_empty()
            && self.processes.is_empty()
    }
}

/// `key:` with no value parses as YAML null; treat it like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Parsers ───────────────────────────────────────────────────────────────────

/// Parse manifest YAML read from `path`.
///
/// A blank document yields the empty manifest; unknown top-level keys are
/// ignored.
///
/// # Errors
///
/// Returns [`DeployError::ManifestParse`] if the YAML is malformed or a known
/// section has the wrong shape.
pub fn parse_manifest(path: &Path, content: &str) -> Result<Manifest> {
    if content.trim().is_empty() {
        return Ok(Manifest::default());
    }
    serde_yaml::from_str(content).map_err(|source| {
        DeployError::ManifestParse {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}

/// Parse a process declaration file into `name → command` pairs.
///
/// Blank lines and `#` comments are skipped. Lines that are not a single
/// `name: command` declaration are dropped without error.
#[must_use]
pub fn parse_procfile(content: &str) -> BTreeMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let caps = PROCESS_LINE_RE.captures(line)?;
            Some((caps[1].to_string(), caps[2].trim().to_string()))
        })
        .collect()
}

// ── Unit tests ────────────────────────────────────────────────────────────────
