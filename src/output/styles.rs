//! Colors for deploy log markers

use owo_colors::Style;

/// One style per kind of agent line. All plain until [`Styles::colorize`].
#[derive(Default, Clone)]
pub struct Styles {
    pub step: Style,
    pub ok: Style,
    pub warning: Style,
    pub failure: Style,
    /// Keys of summary lines
    pub detail: Style,
    /// The application name in the summary
    pub app: Style,
}

impl Styles {
    pub fn colorize(&mut self) {
        self.step = Style::new().bold().cyan();
        self.ok = Style::new().green();
        self.warning = Style::new().yellow();
        self.failure = Style::new().bold().red();
        self.detail = Style::new().dimmed();
        self.app = Style::new().bold();
    }
}
