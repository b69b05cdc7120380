//! Recursive fixed-string search, backed by `grep -rl`.

use crate::{get_command_path, run_command};
use fwrecon_core::signature::{ContentSearch, SearchOptions};
use std::path::{Path, PathBuf};

/// `grep`-backed implementation of the search collaborator.
///
/// Any failure — missing executable, spawn error, undecodable output —
/// yields an empty result; deepening probes are optional by design.
pub struct GrepSearch {
    executable: Option<PathBuf>,
}

impl GrepSearch {
    pub fn new() -> Self {
        Self {
            executable: get_command_path("grep"),
        }
    }
}

impl Default for GrepSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentSearch for GrepSearch {
    fn files_containing(&self, root: &Path, needle: &str, opts: SearchOptions) -> Vec<PathBuf> {
        let Some(exe) = self.executable.as_ref().and_then(|p| p.to_str()) else {
            tracing::debug!("grep not available, search yields no result");
            return Vec::new();
        };

        let mut args = vec!["-r", "-l", "-F"];
        if opts.ignore_case {
            args.push("-i");
        }
        if opts.skip_binary {
            args.push("-I");
        }
        let root = root.to_string_lossy();
        args.extend(["--", needle, root.as_ref()]);

        // grep exits 1 when nothing matched; stdout is authoritative either way.
        match run_command(exe, &args) {
            Ok((stdout, _, _)) => stdout
                .lines()
                .filter(|line| !line.is_empty())
                .map(PathBuf::from)
                .collect(),
            Err(err) => {
                tracing::debug!(%err, "search failed, yielding no result");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_exists;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_executable_yields_empty() {
        let search = GrepSearch { executable: None };
        let found = search.files_containing(
            Path::new("/tmp"),
            "location /",
            SearchOptions::default(),
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_finds_files_with_needle() {
        if !command_exists("grep") {
            return;
        }

        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("etc/nginx")).unwrap();
        fs::write(
            root.join("etc/nginx/nginx.conf"),
            "server {\n  location / {\n    root /www;\n  }\n}\n",
        )
        .unwrap();
        fs::write(root.join("etc/hosts"), "127.0.0.1 localhost\n").unwrap();

        let opts = SearchOptions {
            ignore_case: true,
            skip_binary: false,
        };
        let found = GrepSearch::new().files_containing(root, "location /", opts);
        assert_eq!(found, vec![root.join("etc/nginx/nginx.conf")]);
    }

    #[test]
    fn test_no_match_yields_empty() {
        if !command_exists("grep") {
            return;
        }

        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("plain.txt"), "nothing here\n").unwrap();

        let found = GrepSearch::new().files_containing(
            dir.path(),
            "auth.require",
            SearchOptions {
                ignore_case: false,
                skip_binary: true,
            },
        );
        assert!(found.is_empty());
    }
}
