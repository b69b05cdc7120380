//! Filesystem walks that evaluate classification rules.

use crate::filter::{self, PathFilter};
use crate::rules::{self, ClassificationRule};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One label's bucket, kept in rule-table order.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub label: String,
    pub paths: Vec<PathBuf>,
}

/// All regular files under `root`, in filesystem order.
///
/// Walk errors (vanished entries, permission denied) are dropped; symlinked
/// directories are not followed.
pub fn walk_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
}

/// Bucket every eligible file under `root` into the rules' labels.
///
/// A file may satisfy several rules and lands in every matching label's
/// list, in discovery order, at most once per label.
pub fn classify(root: &Path, rules: &[ClassificationRule], filter: &PathFilter) -> Vec<Section> {
    let mut sections: Vec<Section> = rules
        .iter()
        .map(|rule| Section {
            label: rule.label.clone(),
            paths: Vec::new(),
        })
        .collect();

    for path in walk_files(root) {
        if !filter.is_eligible(&path) {
            continue;
        }
        let name = filter::lower_name(&path);
        let ext = filter::extension(&path);
        for (rule, section) in rules.iter().zip(sections.iter_mut()) {
            if rule.matches(&name, ext.as_deref()) {
                section.paths.push(path.clone());
            }
        }
    }

    sections
}

/// Eligible files directly inside any directory named exactly `init.d`.
///
/// The directory name match is case-sensitive and the listing does not
/// recurse past one level.
pub fn find_init_scripts(root: &Path, filter: &PathFilter) -> Vec<PathBuf> {
    let mut scripts = Vec::new();

    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_dir() || entry.file_name() != "init.d" {
            continue;
        }
        let Ok(children) = std::fs::read_dir(entry.path()) else {
            continue;
        };
        for child in children.filter_map(|c| c.ok()) {
            let path = child.path();
            if filter.is_eligible(&path) {
                scripts.push(path);
            }
        }
    }

    scripts
}

/// Files that look like embedded HTTP server components.
///
/// Two independent criteria, unioned: a binary named like `httpd` with an
/// execute bit, or a file whose text references one of the known web-server
/// API symbols. Deduplicated by path and returned sorted.
pub fn find_httpd_services(root: &Path, filter: &PathFilter) -> Vec<PathBuf> {
    let mut services = BTreeSet::new();

    for path in walk_files(root) {
        if !filter.is_eligible(&path) {
            continue;
        }
        let name = filter::lower_name(&path);
        if name.contains("httpd") && filter::has_exec_bit(&path) && filter::is_binary(&path) {
            services.insert(path);
            continue;
        }
        let Ok(data) = std::fs::read(&path) else {
            tracing::debug!(path = %path.display(), "skipping unreadable file");
            continue;
        };
        let text = String::from_utf8_lossy(&data);
        if rules::HTTPD_API_REFS.iter().any(|api| text.contains(api)) {
            services.insert(path);
        }
    }

    services.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::default_classification_rules;
    use std::fs;
    use tempfile::TempDir;

    fn filter() -> PathFilter {
        PathFilter::universal().with_self_name("fwrecon")
    }

    fn touch(path: &Path, content: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_classify_buckets_by_extension_and_name() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(&root.join("www/index.php"), b"<?php ?>");
        touch(&root.join("www/admin.lua"), b"-- lua");
        touch(&root.join("etc/passwd"), b"root:x:0:0::/root:/bin/sh\n");
        touch(&root.join("etc/style.css"), b"body {}");

        let sections = classify(root, &default_classification_rules(), &filter());
        assert_eq!(sections[0].label, "Web Files");
        assert_eq!(sections[0].paths.len(), 2);
        assert_eq!(sections[1].label, "Common Sensitive Files");
        assert_eq!(sections[1].paths, vec![root.join("etc/passwd")]);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(&root.join("a.php"), b"");
        touch(&root.join("b.html"), b"");

        let rules = default_classification_rules();
        let first = classify(root, &rules, &filter());
        let second = classify(root, &rules, &filter());
        for (a, b) in first.iter().zip(second.iter()) {
            let mut lhs = a.paths.clone();
            let mut rhs = b.paths.clone();
            lhs.sort();
            rhs.sort();
            assert_eq!(lhs, rhs);
        }
    }

    #[test]
    fn test_classify_excludes_self_and_artifacts() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(&root.join("fwrecon"), b"");
        touch(&root.join("fw.id0"), b"");
        touch(&root.join("page.php"), b"");

        let rules = vec![ClassificationRule::new(
            "Everything",
            crate::rules::MatchKind::Extension,
            &[".php", ".id0"],
        )];
        let sections = classify(root, &rules, &filter());
        assert_eq!(sections[0].paths, vec![root.join("page.php")]);
    }

    #[test]
    fn test_classify_no_duplicates_within_label() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(&root.join("passwd"), b"");

        // Both patterns of one rule match the same file.
        let rules = vec![ClassificationRule::new(
            "Common Sensitive Files",
            crate::rules::MatchKind::ExactName,
            &["passwd", "passwd"],
        )];
        let sections = classify(root, &rules, &filter());
        assert_eq!(sections[0].paths.len(), 1);
    }

    #[test]
    fn test_init_scripts_only_direct_children() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(&root.join("etc/init.d/S50httpd"), b"#!/bin/sh\n");
        touch(&root.join("etc/init.d/rcS"), b"#!/bin/sh\n");
        touch(&root.join("etc/init.d/sub/nested"), b"");
        touch(&root.join("etc/Init.D/S99wrong"), b"");
        touch(&root.join("etc/rc.local"), b"");

        let mut scripts = find_init_scripts(root, &filter());
        scripts.sort();
        assert_eq!(
            scripts,
            vec![root.join("etc/init.d/S50httpd"), root.join("etc/init.d/rcS")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_httpd_services_by_name_and_content() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let root = dir.path();

        // Executable binary named like httpd.
        let daemon = root.join("usr/bin/uhttpd");
        touch(&daemon, b"\x7fELF\x00binary");
        fs::set_permissions(&daemon, fs::Permissions::from_mode(0o755)).unwrap();

        // Text file referencing a web-server API symbol.
        let cgi = root.join("web/form.c");
        touch(&cgi, b"void init() { websFormDefine(\"reboot\", handler); }\n");

        // Named like httpd but neither executable nor binary, no API refs.
        touch(&root.join("etc/httpd.conf.sample"), b"Listen 80\n");

        let services = find_httpd_services(root, &filter());
        assert_eq!(services, vec![daemon, cgi]);
    }

    #[cfg(unix)]
    #[test]
    fn test_httpd_services_require_exec_bit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let daemon = root.join("bin/minihttpd");
        touch(&daemon, b"\x00\x01\x02");
        fs::set_permissions(&daemon, fs::Permissions::from_mode(0o644)).unwrap();

        assert!(find_httpd_services(root, &filter()).is_empty());
    }
}
