//! Structural signature detection and the confirm-then-deepen control flow.
//!
//! Detection is an existence check: the first eligible entry satisfying a
//! rule proves its label present. Confirmed labels that have a deepening
//! probe are then advanced through an explicit state machine, so each probe
//! can be exercised against a mocked "signature detected" input without
//! re-running detection.

use crate::classify::walk_files;
use crate::filter::{self, PathFilter};
use crate::rules::{DetectMode, SignatureRule};
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Relative path of the Goahead web library inside the firmware root.
pub const GOAHEAD_LIB_PATH: &str = "usr/lib/libWebs.so";

/// Version numeral anchored between two fixed tokens in the library strings.
const GOAHEAD_VERSION_PATTERN: &str = r"SERVER_ADDR\s+(\d+\.\d+\.\d+)\s+SERVER_SOFTWARE";

/// Token identifying nginx route definition files.
pub const NGINX_ROUTE_MARKER: &str = "location /";

/// Token identifying lighttpd permission configuration.
pub const LIGHTTPD_AUTH_DIRECTIVE: &str = "auth.require";

/// Options for the substring-search collaborator.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SearchOptions {
    pub ignore_case: bool,
    pub skip_binary: bool,
}

/// Opaque recursive substring search, normally backed by an external
/// text-search utility. Any failure yields an empty list.
pub trait ContentSearch {
    fn files_containing(&self, root: &Path, needle: &str, opts: SearchOptions) -> Vec<PathBuf>;
}

/// Printable-string extraction from one file, normally backed by an external
/// `strings`-style utility. `None` when the file cannot be read.
pub trait StringDump {
    fn printable_strings(&self, path: &Path) -> Option<String>;
}

/// What a deepening probe found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ProbeOutcome {
    /// Version numeral extracted from the Goahead web library.
    Version(String),
    /// Files named by the substring-search collaborator.
    Files(Vec<PathBuf>),
    /// The probe ran and found nothing; not an error.
    Absent,
}

/// Lifecycle of one structural label through detection and deepening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ProbeState {
    /// No filesystem entry satisfied the label's rule.
    NoSignature,
    /// Rule satisfied; the label has no deepening probe.
    Detected,
    /// Rule satisfied and a probe is running.
    ProbeDispatched,
    /// Terminal state of a dispatched probe.
    ProbeResult(ProbeOutcome),
}

/// Per-label verdict produced by [`SignatureResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelReport {
    pub label: String,
    pub state: ProbeState,
}

impl LabelReport {
    /// Whether the label's signature was confirmed present.
    pub fn detected(&self) -> bool {
        !matches!(self.state, ProbeState::NoSignature)
    }
}

/// Labels whose rule is satisfied by at least one eligible entry under
/// `root`, in rule-table order. Each label appears at most once.
pub fn detect_signatures(
    root: &Path,
    rules: &[SignatureRule],
    filter: &PathFilter,
) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| rule_holds(root, rule, filter))
        .map(|rule| rule.label.clone())
        .collect()
}

/// Existence check for one rule; stops at the first satisfying entry.
fn rule_holds(root: &Path, rule: &SignatureRule, filter: &PathFilter) -> bool {
    for path in walk_files(root) {
        if !filter.is_eligible(&path) {
            continue;
        }
        let hit = match rule.mode {
            DetectMode::NameContains => rule.matches_name(&filter::lower_name(&path)),
            DetectMode::ContentContains => std::fs::read(&path)
                .map(|data| rule.matches_content(&data))
                .unwrap_or(false),
        };
        if hit {
            return true;
        }
    }
    false
}

/// Deepening probes keyed by structural label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    GoaheadVersion,
    NginxRoutes,
    LighttpdAuth,
}

impl Probe {
    fn for_label(label: &str) -> Option<Self> {
        match label {
            "Goahead" => Some(Self::GoaheadVersion),
            "nginx" => Some(Self::NginxRoutes),
            "lighttpd" => Some(Self::LighttpdAuth),
            _ => None,
        }
    }
}

/// Evaluates signature rules against a tree, then deepens confirmed labels
/// through their probes via the external collaborators.
pub struct SignatureResolver<'a> {
    search: &'a dyn ContentSearch,
    strings: &'a dyn StringDump,
}

impl<'a> SignatureResolver<'a> {
    pub fn new(search: &'a dyn ContentSearch, strings: &'a dyn StringDump) -> Self {
        Self { search, strings }
    }

    /// Evaluate every rule and advance confirmed labels through deepening.
    pub fn resolve(
        &self,
        root: &Path,
        rules: &[SignatureRule],
        filter: &PathFilter,
    ) -> Vec<LabelReport> {
        rules
            .iter()
            .map(|rule| {
                let state = if rule_holds(root, rule, filter) {
                    self.deepen(root, &rule.label)
                } else {
                    ProbeState::NoSignature
                };
                LabelReport {
                    label: rule.label.clone(),
                    state,
                }
            })
            .collect()
    }

    /// Advance a confirmed label through the deepening states.
    ///
    /// Labels without a probe end their life at `Detected`; they still count
    /// toward the structure summary.
    pub fn deepen(&self, root: &Path, label: &str) -> ProbeState {
        let mut state = ProbeState::Detected;
        if let Some(probe) = Probe::for_label(label) {
            state = ProbeState::ProbeDispatched;
            tracing::debug!(label, "deepening probe dispatched");
            let outcome = match probe {
                Probe::GoaheadVersion => self.goahead_version(root),
                Probe::NginxRoutes => self.route_files(root),
                Probe::LighttpdAuth => self.auth_files(root),
            };
            state = ProbeState::ProbeResult(outcome);
        }
        state
    }

    /// Extract the Goahead version from the well-known web library.
    ///
    /// A missing library or a missing marker is an absent result, never an
    /// error.
    fn goahead_version(&self, root: &Path) -> ProbeOutcome {
        let lib = root.join(GOAHEAD_LIB_PATH);
        if !lib.is_file() {
            return ProbeOutcome::Absent;
        }
        let Some(text) = self.strings.printable_strings(&lib) else {
            return ProbeOutcome::Absent;
        };
        let marker = Regex::new(GOAHEAD_VERSION_PATTERN).unwrap();
        match marker.captures(&text).and_then(|c| c.get(1)) {
            Some(version) => ProbeOutcome::Version(version.as_str().to_string()),
            None => ProbeOutcome::Absent,
        }
    }

    fn route_files(&self, root: &Path) -> ProbeOutcome {
        let opts = SearchOptions {
            ignore_case: true,
            skip_binary: false,
        };
        match self.search.files_containing(root, NGINX_ROUTE_MARKER, opts) {
            files if files.is_empty() => ProbeOutcome::Absent,
            files => ProbeOutcome::Files(files),
        }
    }

    fn auth_files(&self, root: &Path) -> ProbeOutcome {
        let opts = SearchOptions {
            ignore_case: false,
            skip_binary: true,
        };
        match self
            .search
            .files_containing(root, LIGHTTPD_AUTH_DIRECTIVE, opts)
        {
            files if files.is_empty() => ProbeOutcome::Absent,
            files => ProbeOutcome::Files(files),
        }
    }
}
