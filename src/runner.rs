//! Running a generated demo script as a child process.

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tokio::signal::unix::{SignalKind, signal};

/// Runs an executable script to completion.
#[async_trait(?Send)]
pub trait ScriptRunner {
    /// Run `script` with the terminal's stdio and wait for it to exit.
    ///
    /// A script that exits non-zero or dies from a signal is not an error;
    /// only failing to start or wait for it is.
    async fn run(&self, script: &Path) -> Result<ExitStatus>;
}

/// Spawns the script as a child process sharing this process's terminal.
///
/// While the child runs, `SIGINT` no longer terminates this process: Ctrl-C
/// reaches the child through the terminal's process group and interrupts
/// the demo, after which the temp script is still cleaned up.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

#[async_trait(?Send)]
impl ScriptRunner for ProcessRunner {
    async fn run(&self, script: &Path) -> Result<ExitStatus> {
        // Registered before the spawn so no interrupt slips through.
        let mut interrupts =
            signal(SignalKind::interrupt()).context("Failed to install interrupt handler")?;

        let mut child = Command::new(script)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("Failed to start demo script: {}", script.display()))?;
        log::debug!("started {} (pid {:?})", script.display(), child.id());

        loop {
            tokio::select! {
                status = child.wait() => {
                    return status.context("Failed to wait for demo script");
                }
                Some(()) = interrupts.recv() => {
                    log::debug!("interrupt received, left to the demo script");
                }
            }
        }
    }
}

/// The exit code this process should report for a child's exit status.
///
/// A child killed by a signal maps to `128 + signal`, as shells report it.
pub fn exit_code(status: ExitStatus) -> i32 {
    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(1)
}
