//! External tool integration for the recon passes.
//!
//! Every collaborator here is optional: a missing executable, a non-zero
//! exit or undecodable output degrades to "no result" and must never abort
//! a run. Invocation is synchronous; output is captured on completion.

pub mod search;
pub mod strings;

use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ToolResult<T> = Result<T, ToolError>;

/// Run a command to completion, capturing stdout, stderr and exit code.
pub fn run_command(cmd: &str, args: &[&str]) -> ToolResult<(String, String, i32)> {
    let output = Command::new(cmd)
        .args(args)
        .output()
        .map_err(|e| ToolError::ExecutionFailed(format!("{cmd}: {e}")))?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);
    Ok((stdout, stderr, code))
}

/// Check if a command exists in PATH.
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Get command path.
pub fn get_command_path(cmd: &str) -> Option<PathBuf> {
    which::which(cmd).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_command_is_reported() {
        assert!(!command_exists("fwrecon-no-such-tool"));
        assert!(get_command_path("fwrecon-no-such-tool").is_none());
        assert!(run_command("fwrecon-no-such-tool", &[]).is_err());
    }
}
