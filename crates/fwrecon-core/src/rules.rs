//! Declarative rule tables driving classification and signature detection.
//!
//! All tables are immutable data constructed at startup and passed explicitly
//! into each pass, so components stay testable with substituted rule sets.

use serde::{Deserialize, Serialize};

/// How a classification rule compares its patterns against a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    /// Compare the lowercased dotted extension (`.php`).
    Extension,
    /// Compare the full lowercased file name (`httpd.conf`).
    ExactName,
}

/// Buckets every matching file into a named result list.
///
/// A file may satisfy several rules independently; each match appends the
/// file to that label's list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub label: String,
    pub patterns: Vec<String>,
    pub kind: MatchKind,
}

impl ClassificationRule {
    pub fn new(label: impl Into<String>, kind: MatchKind, patterns: &[&str]) -> Self {
        Self {
            label: label.into(),
            patterns: patterns.iter().map(|p| p.to_ascii_lowercase()).collect(),
            kind,
        }
    }

    /// Whether the rule claims a file with the given lowercased name and
    /// optional lowercased dotted extension.
    pub fn matches(&self, lower_name: &str, ext: Option<&str>) -> bool {
        match self.kind {
            MatchKind::Extension => {
                ext.is_some_and(|e| self.patterns.iter().any(|p| p == e))
            }
            MatchKind::ExactName => self.patterns.iter().any(|p| p == lower_name),
        }
    }
}

/// Mode of a signature rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectMode {
    /// Pattern is a case-insensitive byte substring of the file content.
    ContentContains,
    /// Pattern is a case-insensitive substring of the file name.
    NameContains,
}

/// Existence check for a named firmware trait.
///
/// The first filesystem entry satisfying the rule proves the label present;
/// evaluation short-circuits per label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureRule {
    pub label: String,
    pub pattern: String,
    pub mode: DetectMode,
}

impl SignatureRule {
    pub fn new(label: impl Into<String>, pattern: impl Into<String>, mode: DetectMode) -> Self {
        Self {
            label: label.into(),
            pattern: pattern.into(),
            mode,
        }
    }

    pub fn matches_name(&self, lower_name: &str) -> bool {
        lower_name.contains(&self.pattern.to_ascii_lowercase())
    }

    pub fn matches_content(&self, data: &[u8]) -> bool {
        let needle = self.pattern.to_ascii_lowercase().into_bytes();
        if needle.is_empty() || data.len() < needle.len() {
            return false;
        }
        let hay = data.to_ascii_lowercase();
        hay.windows(needle.len()).any(|w| w == needle.as_slice())
    }
}

/// Keywords flagged by the content scanner.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "admin",
    "root:",
    "passwd",
    "sshd",
    "telnetd",
    "ftpd",
    "udhcpd",
    "miniupnpd",
    "smbd",
];

/// Disassembler database artifacts, excluded from every pass.
pub const EXCLUDED_EXTENSIONS: &[&str] = &[".id0", ".id1", ".nam"];

/// Static web assets, additionally excluded from the keyword scan only:
/// static pages are presumed not to carry live credentials.
pub const STATIC_ASSET_EXTENSIONS: &[&str] =
    &[".js", ".shtml", ".html", ".xml", ".asp", ".htm", ".aspx"];

/// Function names referenced by embedded web-server code.
pub const HTTPD_API_REFS: &[&str] = &["cgiMain", "httpd_init", "websFormDefine", "handle_request"];

pub fn default_classification_rules() -> Vec<ClassificationRule> {
    vec![
        ClassificationRule::new(
            "Web Files",
            MatchKind::Extension,
            &[".php", ".asp", ".htm", ".html", ".py", ".jsp", ".cgi", ".lua"],
        ),
        ClassificationRule::new(
            "Common Sensitive Files",
            MatchKind::ExactName,
            &["passwd", "shadow", ".passwd", ".shadow", "httpd.conf", ".env"],
        ),
    ]
}

pub fn default_signature_rules() -> Vec<SignatureRule> {
    vec![
        SignatureRule::new("Lua", ".lua", DetectMode::NameContains),
        SignatureRule::new("Asp", ".asp", DetectMode::NameContains),
        SignatureRule::new("Static HTML", ".htm", DetectMode::NameContains),
        SignatureRule::new("PHP", ".php", DetectMode::NameContains),
        SignatureRule::new("CGI", ".cgi", DetectMode::NameContains),
        SignatureRule::new("nginx", "nginx", DetectMode::NameContains),
        SignatureRule::new("Goahead", "goahead", DetectMode::ContentContains),
        SignatureRule::new("lighttpd", "lighttpd", DetectMode::ContentContains),
    ]
}
