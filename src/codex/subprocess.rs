//! Codex CLI spawning.

use std::io::Write;
use std::process::Stdio;
use std::time::Duration;

use tempfile::NamedTempFile;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::error::CodexError;

/// JSON schema for a structured commit message.
pub const COMMIT_MESSAGE_SCHEMA: &str = r#"{
  "type": "object",
  "properties": {
    "subject": { "type": "string" },
    "body": { "type": ["string", "null"] },
    "breaking": { "type": "boolean" }
  },
  "required": ["subject", "body", "breaking"],
  "additionalProperties": false
}"#;

/// Run `codex exec` with a prompt and return stdout.
///
/// With `schema` set, the schema is written to a temp file and passed via
/// `--output-schema` so the response is a single JSON object.
pub async fn run_codex(
    prompt: &str,
    limit: Duration,
    schema: Option<&str>,
) -> Result<String, CodexError> {
    if which::which("codex").is_err() {
        return Err(CodexError::NotInstalled);
    }

    let schema_file = match schema {
        Some(schema) => Some(write_schema(schema)?),
        None => None,
    };

    let mut cmd = Command::new("codex");
    cmd.arg("exec");
    if let Some(file) = &schema_file {
        cmd.arg("--output-schema").arg(file.path());
    }
    cmd.arg(prompt).stdin(Stdio::null()).kill_on_drop(true);

    debug!(
        "Running codex exec ({}s timeout, schema: {})",
        limit.as_secs(),
        schema_file.is_some()
    );
    // schema_file must outlive the child process.
    let result = run_with_timeout(cmd, limit).await;
    drop(schema_file);
    result
}

fn write_schema(schema: &str) -> Result<NamedTempFile, CodexError> {
    let mut file = NamedTempFile::new()
        .map_err(|e| CodexError::ExecutionFailed(format!("Failed to create schema file: {}", e)))?;
    file.write_all(schema.as_bytes())
        .map_err(|e| CodexError::ExecutionFailed(format!("Failed to write schema file: {}", e)))?;
    Ok(file)
}

async fn run_with_timeout(mut cmd: Command, limit: Duration) -> Result<String, CodexError> {
    let output = timeout(
        limit,
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).output(),
    )
    .await
    .map_err(|_| CodexError::Timeout(limit.as_secs()))?
    .map_err(CodexError::SpawnFailed)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);
        return Err(CodexError::NonZeroExit { code, stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
