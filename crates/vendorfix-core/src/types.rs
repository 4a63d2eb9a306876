use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchKind {
    #[default]
    Literal,
    Pattern,
}

impl fmt::Display for PatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchKind::Literal => f.write_str("literal"),
            PatchKind::Pattern => f.write_str("pattern"),
        }
    }
}

/// One textual fix applied to a file of a vendored library.
///
/// For `Literal` descriptors `matcher` is a plain substring and `replacement`
/// is inserted verbatim. For `Pattern` descriptors `matcher` is a regex and
/// `replacement` a template that may reference capture groups (`${1}`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PatchDescriptor {
    #[serde(rename = "file")]
    pub target: PathBuf,

    #[serde(rename = "search")]
    pub matcher: String,

    #[serde(rename = "replace")]
    pub replacement: String,

    #[serde(rename = "check")]
    pub marker: String,

    pub description: String,

    #[serde(default)]
    pub kind: PatchKind,
}

impl PatchDescriptor {
    pub fn literal(
        target: impl Into<PathBuf>,
        matcher: impl Into<String>,
        replacement: impl Into<String>,
        marker: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            matcher: matcher.into(),
            replacement: replacement.into(),
            marker: marker.into(),
            description: description.into(),
            kind: PatchKind::Literal,
        }
    }

    pub fn pattern(
        target: impl Into<PathBuf>,
        matcher: impl Into<String>,
        replacement: impl Into<String>,
        marker: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind: PatchKind::Pattern,
            ..Self::literal(target, matcher, replacement, marker, description)
        }
    }

    /// Resolves `target` against `root` unless it is already absolute.
    pub fn resolve_target(&self, root: Option<&Path>) -> PathBuf {
        match root {
            Some(root) if self.target.is_relative() => root.join(&self.target),
            _ => self.target.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    SkippedMissing,
    AlreadyPatched,
    NotFound,
    Applied { replacements: usize },
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeEntry {
    pub description: String,
    pub target: PathBuf,
    pub outcome: Outcome,
}

impl OutcomeEntry {
    /// The progress line printed for this descriptor.
    pub fn progress_line(&self, dry_run: bool) -> String {
        match self.outcome {
            Outcome::SkippedMissing => {
                format!("File not found: {}, skipping.", self.target.display())
            }
            Outcome::AlreadyPatched => format!("Already patched: {}", self.description),
            Outcome::NotFound => format!("Pattern not found for: {}", self.description),
            Outcome::Applied { .. } if dry_run => format!("Would fix: {}", self.description),
            Outcome::Applied { .. } => format!("Fixed: {}", self.description),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub outcomes: Vec<OutcomeEntry>,
    pub dry_run: bool,
}

impl Report {
    pub fn new(dry_run: bool) -> Self {
        Self {
            outcomes: Vec::new(),
            dry_run,
        }
    }

    pub fn applied(&self) -> usize {
        self.count(|o| o.is_applied())
    }

    /// Descriptors whose marker is not yet in their target.
    pub fn pending(&self) -> usize {
        self.outcomes.len() - self.already_patched()
    }

    pub fn skipped_missing(&self) -> usize {
        self.count(|o| *o == Outcome::SkippedMissing)
    }

    pub fn already_patched(&self) -> usize {
        self.count(|o| *o == Outcome::AlreadyPatched)
    }

    pub fn not_found(&self) -> usize {
        self.count(|o| *o == Outcome::NotFound)
    }

    /// True when every descriptor found its marker in the target.
    pub fn fully_patched(&self) -> bool {
        self.already_patched() == self.outcomes.len()
    }

    pub fn summary(&self) -> String {
        match (self.applied(), self.dry_run) {
            (0, _) => {
                "No fixes applied - target files may already be patched or updated.".to_string()
            }
            (n, true) => format!("Would apply {} fix(es).", n),
            (n, false) => format!("Applied {} fix(es).", n),
        }
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|e| pred(&e.outcome)).count()
    }
}
