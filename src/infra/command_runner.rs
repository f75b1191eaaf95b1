//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution with an optional timeout that kills the
//! child on expiry.

use std::io::Write;
use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, warn};

use crate::application::ports::CommandRunner;
use crate::domain::ShellInvocation;

/// Where drained child output is echoed.
#[derive(Debug, Clone, Copy)]
enum Echo {
    Stdout,
    Stderr,
    Off,
}

/// Production `CommandRunner`.
///
/// The child runs with a cleared environment replaced by the invocation's
/// merged environment. Output is captured and, unless `quiet`, forwarded
/// line by line to the agent's own stdout/stderr as it arrives so deploy
/// logs stream.
pub struct TokioCommandRunner {
    quiet: bool,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// Capture output without echoing it.
    #[must_use]
    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, invocation: &ShellInvocation) -> Result<Output> {
        let program = invocation.shell.display().to_string();
        debug!(
            shell = %program,
            dir = %invocation.dir.display(),
            timeout_secs = invocation.timeout.map(|t| t.as_secs()),
            "spawning shell"
        );

        let mut child = tokio::process::Command::new(&invocation.shell)
            .args(&invocation.args)
            .current_dir(&invocation.dir)
            .env_clear()
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();
        let (echo_out, echo_err) = if self.quiet {
            (Echo::Off, Echo::Off)
        } else {
            (Echo::Stdout, Echo::Stderr)
        };

        let Some(timeout) = invocation.timeout else {
            let (status, stdout, stderr) = tokio::join!(
                child.wait(),
                drain(stdout_handle, echo_out),
                drain(stderr_handle, echo_err),
            );
            return Ok(Output {
                status: status.with_context(|| format!("waiting for {program}"))?,
                stdout,
                stderr,
            });
        };

        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    drain(stdout_handle, echo_out),
                    drain(stderr_handle, echo_err),
                );
                Ok(Output {
                    status: status.with_context(|| format!("waiting for {program}"))?,
                    stdout,
                    stderr,
                })
            } => result,
            () = tokio::time::sleep(timeout) => {
                warn!(command = invocation.command(), timeout_secs = timeout.as_secs(), "command timed out, killing");
                let _ = child.kill().await;
                anyhow::bail!("{} timed out after {}s", invocation.command(), timeout.as_secs())
            }
        }
    }
}

/// Read a child stream to the end, echoing each line as it arrives.
async fn drain<R: AsyncRead + Unpin>(handle: Option<R>, echo: Echo) -> Vec<u8> {
    let mut captured = Vec::new();
    let Some(handle) = handle else {
        return captured;
    };
    let mut reader = BufReader::new(handle);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Err(e) => {
                warn!(
                    error = %e,
                    captured = captured.len(),
                    "reading child output failed, output truncated"
                );
                break;
            }
            Ok(_) => {
                forward(&line, echo);
                captured.extend_from_slice(&line);
            }
        }
    }
    captured
}

fn forward(bytes: &[u8], echo: Echo) {
    let _ = match echo {
        Echo::Stdout => std::io::stdout().write_all(bytes),
        Echo::Stderr => std::io::stderr().write_all(bytes),
        Echo::Off => Ok(()),
    };
}
