//! Deploy log output.
//!
//! Agent lines share stdout with the streamed output of hooks and the main
//! command, so each one starts with a marker that sets it apart.

pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::{OwoColorize as _, Style};
pub use reporter::TerminalReporter;
pub use styles::Styles;

use crate::application::services::deploy::DeployOutcome;

pub const STEP_MARKER: &str = "---->";
pub const OK_MARKER: &str = "  ok:";
pub const WARN_MARKER: &str = "warn:";
pub const FAIL_MARKER: &str = "fail:";

pub struct OutputContext {
    pub styles: Styles,
    /// Drop everything except failures.
    pub quiet: bool,
}

impl OutputContext {
    /// Colors are used only on a color-capable stdout, and never when
    /// `no_color` is set or `NO_COLOR` is present.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let term = Term::stdout();
        let mut styles = Styles::default();
        if !no_color
            && std::env::var_os("NO_COLOR").is_none()
            && term.is_term()
            && term.features().colors_supported()
        {
            styles.colorize();
        }
        Self { styles, quiet }
    }

    fn line(&self, marker: &str, style: Style, msg: &str) {
        if !self.quiet {
            println!("{} {msg}", marker.style(style));
        }
    }

    pub fn step(&self, msg: &str) {
        self.line(STEP_MARKER, self.styles.step, msg);
    }

    pub fn success(&self, msg: &str) {
        self.line(OK_MARKER, self.styles.ok, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.line(WARN_MARKER, self.styles.warning, msg);
    }

    /// Goes to stderr and ignores `quiet`.
    pub fn error(&self, msg: &str) {
        eprintln!("{} {msg}", FAIL_MARKER.style(self.styles.failure));
    }

    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("      {} {value}", format!("{key}:").style(self.styles.detail));
        }
    }

    /// Closing lines of a successful deploy.
    pub fn deploy_summary(&self, app: &str, outcome: &DeployOutcome, warnings: usize) {
        self.success(&format!("deploy of '{}' finished", app.style(self.styles.app)));
        self.kv("build hooks", &outcome.hooks_run.to_string());
        self.kv("first deploy", if outcome.first_deploy { "yes" } else { "no" });
        self.kv(
            "diff",
            if outcome.diff_reported {
                "reported"
            } else {
                "not reported"
            },
        );
        if warnings > 0 {
            self.kv("warnings", &warnings.to_string());
        }
    }
}
