//! Environment variables handed out by the control plane.
//!
//! Pure functions only. No I/O, no async.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// An application environment variable.
///
/// Accepts both `name` and `Name` style keys: older control planes serialize
/// the struct fields capitalised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Value")]
    pub value: String,
    #[serde(default, alias = "Public")]
    pub public: bool,
}

impl EnvVar {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, public: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            public,
        }
    }
}

/// Merge supplied variables over a base environment.
///
/// Supplied entries come first, in server order, deduplicated so the last
/// occurrence of a name wins. Base entries follow, minus any name the
/// supplied set already defines.
#[must_use]
pub fn merge_environment<I>(base: I, envs: &[EnvVar]) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut merged: Vec<(String, String)> = Vec::with_capacity(envs.len());
    for env in envs {
        if let Some(slot) = merged.iter_mut().find(|(name, _)| *name == env.name) {
            slot.1.clone_from(&env.value);
        } else {
            merged.push((env.name.clone(), env.value.clone()));
        }
    }
    let supplied: HashSet<String> = merged.iter().map(|(name, _)| name.clone()).collect();
    merged.extend(base.into_iter().filter(|(name, _)| !supplied.contains(name)));
    merged
}

/// Quote `value` for a POSIX shell using single quotes.
///
/// Embedded single quotes are closed, escaped and reopened (`'\''`).
#[must_use]
pub fn shell_single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Render the shell-sourceable environment file: one
/// `export NAME='VALUE'` line per variable, in the order given.
#[must_use]
pub fn render_envs_file(envs: &[EnvVar]) -> String {
    envs.iter()
        .map(|env| format!("export {}={}\n", env.name, shell_single_quote(&env.value)))
        .collect()
}

// ── Unit tests ────────────────────────────────────────────────────────────────
