//! Claude CLI spawning.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::error::ClaudeError;

/// Run Claude CLI with a prompt and return its stdout.
///
/// Uses `-p` with `--output-format json`, so stdout is the CLI's JSON
/// envelope rather than the bare response text.
///
/// Returns `ClaudeError::Timeout` if the process outlives `limit`.
pub async fn run_claude(prompt: &str, limit: Duration) -> Result<String, ClaudeError> {
    if which::which("claude").is_err() {
        return Err(ClaudeError::NotInstalled);
    }

    debug!("Running claude -p ({}s timeout)", limit.as_secs());
    let mut cmd = Command::new("claude");
    cmd.arg("-p")
        .arg(prompt)
        .arg("--output-format")
        .arg("json")
        .stdin(Stdio::null())
        .kill_on_drop(true);

    run_with_timeout(cmd, limit).await
}

/// Spawn `cmd`, wait up to `limit`, and map the outcome to `ClaudeError`.
async fn run_with_timeout(mut cmd: Command, limit: Duration) -> Result<String, ClaudeError> {
    let output = timeout(
        limit,
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).output(),
    )
    .await
    .map_err(|_| ClaudeError::Timeout(limit.as_secs()))?
    .map_err(ClaudeError::SpawnFailed)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);
        return Err(ClaudeError::NonZeroExit { code, stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
