//! Shell invocation value type.

use std::path::PathBuf;
use std::time::Duration;

/// A fully resolved `<shell> -lc <command>` invocation.
///
/// Commands are handed to the shell verbatim. Manifest and Procfile authors
/// are trusted; nothing here sanitises shell syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellInvocation {
    pub shell: PathBuf,
    pub args: Vec<String>,
    pub dir: PathBuf,
    pub env: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl ShellInvocation {
    /// Build a login-shell invocation for `command`.
    #[must_use]
    pub fn login(
        shell: impl Into<PathBuf>,
        command: &str,
        dir: impl Into<PathBuf>,
        env: Vec<(String, String)>,
    ) -> Self {
        Self {
            shell: shell.into(),
            args: vec!["-lc".to_string(), command.to_string()],
            dir: dir.into(),
            env,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The command text passed after `-lc`.
    #[must_use]
    pub fn command(&self) -> &str {
        self.args.last().map_or("", String::as_str)
    }
}
