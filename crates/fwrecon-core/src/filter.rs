//! Eligibility predicate applied before any per-file check.

use crate::rules;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Decides whether a filesystem entry may be inspected at all.
///
/// An entry is ineligible when it is not a regular file, when its lowercased
/// name equals the running tool's own file name (so the tool never flags
/// itself as a finding), or when its extension is in the filter's exclusion
/// set. Pure predicate, no side effects.
#[derive(Debug, Clone)]
pub struct PathFilter {
    excluded_exts: HashSet<String>,
    self_name: Option<String>,
}

impl PathFilter {
    pub fn new<I, S>(excluded_exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let excluded_exts = excluded_exts
            .into_iter()
            .map(|e| e.as_ref().to_ascii_lowercase())
            .collect();
        let self_name = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_ascii_lowercase()));
        Self {
            excluded_exts,
            self_name,
        }
    }

    /// The narrow filter applied to every pass.
    pub fn universal() -> Self {
        Self::new(rules::EXCLUDED_EXTENSIONS.iter().copied())
    }

    /// The widened filter for the keyword scan, which also drops static
    /// web assets.
    pub fn for_keyword_scan() -> Self {
        Self::new(
            rules::EXCLUDED_EXTENSIONS
                .iter()
                .chain(rules::STATIC_ASSET_EXTENSIONS)
                .copied(),
        )
    }

    /// Override the self-exclusion name; tests substitute a fixed one.
    pub fn with_self_name(mut self, name: impl AsRef<str>) -> Self {
        self.self_name = Some(name.as_ref().to_ascii_lowercase());
        self
    }

    pub fn is_eligible(&self, path: &Path) -> bool {
        if !path.is_file() {
            return false;
        }
        if self.self_name.as_deref() == Some(lower_name(path).as_str()) {
            return false;
        }
        match extension(path) {
            Some(ext) => !self.excluded_exts.contains(&ext),
            None => true,
        }
    }
}

/// Lowercased file name of the final path component.
pub fn lower_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

/// Lowercased extension with its leading dot (`.conf`).
///
/// Dotfiles such as `.env` have no extension; they are matched by exact-name
/// rules instead.
pub fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_ascii_lowercase()))
}

/// A file is judged binary when its first 1 KiB contains a NUL byte.
///
/// Unreadable files count as non-binary; scanning is best-effort and the
/// caller's read will skip them anyway.
pub fn is_binary(path: &Path) -> bool {
    let mut head = Vec::with_capacity(1024);
    match File::open(path).and_then(|f| f.take(1024).read_to_end(&mut head)) {
        Ok(_) => head.contains(&0),
        Err(_) => false,
    }
}

/// Any execute permission bit set (owner, group or other).
#[cfg(unix)]
pub fn has_exec_bit(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Execute bits do not exist on this platform; every file qualifies.
#[cfg(not(unix))]
pub fn has_exec_bit(_path: &Path) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_excluded_extension_rejected() {
        let dir = TempDir::new().unwrap();
        let ida = dir.path().join("dump.id0");
        let conf = dir.path().join("httpd.conf");
        fs::write(&ida, b"x").unwrap();
        fs::write(&conf, b"x").unwrap();

        let filter = PathFilter::universal().with_self_name("fwrecon");
        assert!(!filter.is_eligible(&ida));
        assert!(filter.is_eligible(&conf));
    }

    #[test]
    fn test_self_name_rejected_case_insensitively() {
        let dir = TempDir::new().unwrap();
        let own = dir.path().join("FwRecon");
        fs::write(&own, b"x").unwrap();

        let filter = PathFilter::universal().with_self_name("fwrecon");
        assert!(!filter.is_eligible(&own));
    }

    #[test]
    fn test_directories_are_not_eligible() {
        let dir = TempDir::new().unwrap();
        let filter = PathFilter::universal().with_self_name("fwrecon");
        assert!(!filter.is_eligible(dir.path()));
        assert!(!filter.is_eligible(&dir.path().join("missing")));
    }

    #[test]
    fn test_keyword_scan_filter_drops_static_assets() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("index.html");
        let conf = dir.path().join("boa.conf");
        fs::write(&page, b"x").unwrap();
        fs::write(&conf, b"x").unwrap();

        let filter = PathFilter::for_keyword_scan().with_self_name("fwrecon");
        assert!(!filter.is_eligible(&page));
        assert!(filter.is_eligible(&conf));
    }

    #[test]
    fn test_extension_and_name_derivation() {
        assert_eq!(extension(Path::new("/www/Index.PHP")).as_deref(), Some(".php"));
        assert_eq!(extension(Path::new("/etc/.env")), None);
        assert_eq!(extension(Path::new("/bin/httpd")), None);
        assert_eq!(lower_name(Path::new("/etc/Httpd.Conf")), "httpd.conf");
    }

    #[test]
    fn test_binary_detection() {
        let dir = TempDir::new().unwrap();
        let bin = dir.path().join("app");
        let text = dir.path().join("notes.txt");
        fs::write(&bin, b"\x7fELF\x00\x01\x02").unwrap();
        fs::write(&text, b"plain text only\n").unwrap();

        assert!(is_binary(&bin));
        assert!(!is_binary(&text));
        assert!(!is_binary(&dir.path().join("missing")));
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_bit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let exe = dir.path().join("daemon");
        fs::write(&exe, b"x").unwrap();
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!has_exec_bit(&exe));
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(has_exec_bit(&exe));
    }
}
