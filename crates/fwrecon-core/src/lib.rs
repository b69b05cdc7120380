//! Classification and signature-matching engine for extracted IoT firmware
//! filesystems.
//!
//! The engine draws shallow, heuristic inferences from file names and text
//! content: it buckets files into labeled result sets (web content, sensitive
//! configuration, startup scripts, HTTP server binaries), scans text files
//! for security-relevant keywords, and infers the firmware's web-server
//! structure from a signature rule table, deepening confirmed signatures
//! through label-specific probes.
//!
//! Every pass degrades to an empty or absent result instead of raising:
//! per-file errors are skipped at the smallest scope and no error type
//! crosses a component boundary.

pub mod ansi;
pub mod classify;
pub mod filter;
pub mod keywords;
pub mod rules;
pub mod signature;

use thiserror::Error;

pub use classify::{classify, find_httpd_services, find_init_scripts, Section};
pub use filter::PathFilter;
pub use keywords::{KeywordHit, KeywordScanner};
pub use rules::{
    default_classification_rules, default_signature_rules, ClassificationRule, DetectMode,
    MatchKind, SignatureRule,
};
pub use signature::{
    detect_signatures, ContentSearch, LabelReport, ProbeOutcome, ProbeState, SearchOptions,
    SignatureResolver, StringDump,
};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid keyword pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Maximum rendered line width before truncation.
pub const MAX_WIDTH: usize = 100;

/// Cut `text` to at most `width` columns, marking the cut with an ellipsis.
///
/// Truncation preserves terminal readability, not correctness; counted in
/// characters, not bytes, so multi-byte content never splits mid-codepoint.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let cut: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("exactly", 7), "exactly");
    }

    #[test]
    fn test_truncate_long_text_gets_ellipsis() {
        let long = "a".repeat(150);
        let cut = truncate(&long, MAX_WIDTH);
        assert_eq!(cut.chars().count(), MAX_WIDTH);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_truncate_multibyte_safe() {
        let text = "é".repeat(120);
        let cut = truncate(&text, 100);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 100);
    }
}
