//! Diagnostic tracing for the agent.
//!
//! User-facing progress goes through `output::TerminalReporter`. This module
//! only sets up `tracing` diagnostics, controlled by `RUST_LOG` and written
//! to stderr so they never mix with streamed command output on stdout.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`, defaulting to `warn`. Safe to call more than once; later
/// calls are ignored.
///
/// ```bash
/// RUST_LOG=deploy_agent=debug deploy-agent http://tsuru:8080 token app1 ./start
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
