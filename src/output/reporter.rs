//! `ProgressReporter` for the terminal.

use std::cell::Cell;

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

/// Prints pipeline progress through an [`OutputContext`] and counts the
/// warnings it passed on, for the closing summary.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    warnings: Cell<usize>,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            warnings: Cell::new(0),
        }
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings.get()
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        self.ctx.step(message);
    }

    fn success(&self, message: &str) {
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        self.warnings.set(self.warnings.get() + 1);
        self.ctx.warn(message);
    }
}
