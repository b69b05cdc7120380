//! Printable-string extraction, shelling out to `strings` when available.

use crate::{get_command_path, run_command, ToolError, ToolResult};
use fwrecon_core::signature::StringDump;
use std::path::{Path, PathBuf};

/// Minimum run length counted as a string by the in-process fallback.
const MIN_STRING_LENGTH: usize = 4;

/// `strings(1)` collaborator with an in-process fallback.
pub struct Strings {
    executable: Option<PathBuf>,
}

impl Strings {
    pub fn new() -> Self {
        Self {
            executable: get_command_path("strings"),
        }
    }

    /// Run the external `strings` executable on `path`.
    pub fn dump_external(&self, path: &Path) -> ToolResult<String> {
        let exe = self
            .executable
            .as_ref()
            .and_then(|p| p.to_str())
            .ok_or_else(|| ToolError::NotFound("strings".to_string()))?;
        let (stdout, _stderr, _code) = run_command(exe, &[&path.to_string_lossy()])?;
        Ok(stdout)
    }

    /// Printable strings of `path`, via the external tool or the fallback.
    ///
    /// `None` only when the file itself cannot be read.
    pub fn dump(&self, path: &Path) -> Option<String> {
        match self.dump_external(path) {
            Ok(text) => Some(text),
            Err(err) => {
                tracing::debug!(%err, "falling back to in-process string extraction");
                let data = std::fs::read(path).ok()?;
                Some(extract_strings(&data, MIN_STRING_LENGTH).join("\n"))
            }
        }
    }
}

impl Default for Strings {
    fn default() -> Self {
        Self::new()
    }
}

impl StringDump for Strings {
    fn printable_strings(&self, path: &Path) -> Option<String> {
        self.dump(path)
    }
}

/// Extract printable ASCII runs of at least `min_length` bytes.
pub fn extract_strings(data: &[u8], min_length: usize) -> Vec<String> {
    let mut strings = Vec::new();
    let mut current = Vec::new();

    for &byte in data {
        if (0x20..0x7F).contains(&byte) {
            current.push(byte);
        } else {
            if current.len() >= min_length {
                if let Ok(s) = String::from_utf8(std::mem::take(&mut current)) {
                    strings.push(s);
                }
            }
            current.clear();
        }
    }

    if current.len() >= min_length {
        if let Ok(s) = String::from_utf8(current) {
            strings.push(s);
        }
    }

    strings
}
