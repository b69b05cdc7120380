//! Line-oriented keyword scanner with highlighting and snippet truncation.

use crate::classify::walk_files;
use crate::filter::{self, PathFilter};
use crate::{ansi, rules, truncate, CoreResult, MAX_WIDTH};
use regex::{Match, Regex};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A single matching line, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordHit {
    pub path: PathBuf,
    /// 1-based line number.
    pub line: usize,
    /// Trimmed, truncated line with matches wrapped in red.
    pub snippet: String,
}

/// Case-insensitive whole-word matcher over an ordered keyword list.
///
/// Matches immediately preceded or followed by `<`, `>` or `-` are rejected,
/// which suppresses HTML-tag content and flag-like tokens such as `-admin`.
/// The `regex` crate has no lookaround, so the adjacency rule is enforced by
/// inspecting the neighbor characters of each word-boundary match.
pub struct KeywordScanner {
    keywords: Vec<String>,
    pattern: Regex,
}

impl KeywordScanner {
    pub fn new<I, S>(keywords: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().to_string())
            .collect();
        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?i)\b({alternation})\b"))?;
        Ok(Self { keywords, pattern })
    }

    /// Scanner over [`rules::DEFAULT_KEYWORDS`].
    pub fn with_defaults() -> CoreResult<Self> {
        Self::new(rules::DEFAULT_KEYWORDS.iter().copied())
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Word matches not adjacent to `<`, `>` or `-`.
    fn valid_matches<'t>(&self, text: &'t str) -> Vec<Match<'t>> {
        self.pattern
            .find_iter(text)
            .filter(|m| {
                let before = text[..m.start()].chars().next_back();
                let after = text[m.end()..].chars().next();
                !matches!(before, Some('<' | '>' | '-'))
                    && !matches!(after, Some('<' | '>' | '-'))
            })
            .collect()
    }

    /// Wrap every valid match in red.
    fn highlight(&self, text: &str) -> String {
        let matches = self.valid_matches(text);
        if matches.is_empty() {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len() + matches.len() * 10);
        let mut last = 0;
        for m in matches {
            out.push_str(&text[last..m.start()]);
            out.push_str(ansi::RED);
            out.push_str(m.as_str());
            out.push_str(ansi::RESET);
            last = m.end();
        }
        out.push_str(&text[last..]);
        out
    }

    /// Scan every eligible, non-binary file under `root`.
    ///
    /// Files that cannot be read are skipped silently; decoding is lossy.
    pub fn scan(&self, root: &Path, filter: &PathFilter) -> Vec<KeywordHit> {
        let mut hits = Vec::new();

        for path in walk_files(root) {
            if !filter.is_eligible(&path) || filter::is_binary(&path) {
                continue;
            }
            let Ok(data) = std::fs::read(&path) else {
                tracing::debug!(path = %path.display(), "skipping unreadable file");
                continue;
            };
            let text = String::from_utf8_lossy(&data);
            for (idx, line) in text.lines().enumerate() {
                if self.valid_matches(line).is_empty() {
                    continue;
                }
                let snippet = self.highlight(&truncate(line.trim(), MAX_WIDTH));
                hits.push(KeywordHit {
                    path: path.clone(),
                    line: idx + 1,
                    snippet,
                });
            }
        }

        hits
    }
}
