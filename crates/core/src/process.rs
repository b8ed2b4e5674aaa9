//! Shared subprocess execution for the external collaborators.

use std::process::{ExitStatus, Stdio};
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

/// Outcome of a finished child process.
#[derive(Debug)]
pub(crate) struct CompletedCommand {
    pub status: ExitStatus,
    pub stderr: String,
}

/// Runs the command to completion, capturing stderr.
///
/// Returns `Ok(None)` when the timeout expires; the child is killed in that
/// case. stdout is discarded, the collaborators communicate through the
/// filesystem and their exit status only.
pub(crate) async fn run_with_timeout(
    mut command: Command,
    timeout_secs: u64,
) -> std::io::Result<Option<CompletedCommand>> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command.spawn()?;
    let mut stderr = child.stderr.take().expect("stderr should be captured");

    let wait = async {
        let mut captured = String::new();
        stderr.read_to_string(&mut captured).await?;
        let status = child.wait().await?;
        Ok::<CompletedCommand, std::io::Error>(CompletedCommand {
            status,
            stderr: captured,
        })
    };

    match timeout(Duration::from_secs(timeout_secs), wait).await {
        Ok(Ok(completed)) => Ok(Some(completed)),
        Ok(Err(e)) => Err(e),
        Err(_) => {
            let _ = child.kill().await;
            Ok(None)
        }
    }
}
