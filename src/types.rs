//! Core domain types: extracted links, classification records, and scan results.
use std::path::PathBuf;

/// Result of evaluating one link against the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRecord {
    /// The link this record judges.
    pub link: Link,
    /// Terminal judgment for the link.
    pub outcome: Outcome,
    /// Absolute, normalized target path. `None` when no filesystem check happened.
    pub resolved: Option<PathBuf>,
}

/// A markdown document that could not be read or decoded.
/// Such documents contribute no links and no classification records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoFailure {
    /// The document that failed.
    pub path: PathBuf,
    /// Human-readable reason, taken from the underlying error.
    pub reason: String,
}

/// Inline `[text](target)` link extracted from a markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// One-based line of the opening `[` in the source document.
    pub line: u32,
    /// Markdown document containing the link.
    pub source: PathBuf,
    /// Raw target exactly as written, fragment included.
    pub target: String,
    /// Display text between the brackets.
    pub text: String,
}

/// Terminal judgment for a single link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The resolved target does not exist.
    Broken,
    /// No filesystem check was performed.
    Skipped(SkipReason),
    /// The resolved target exists (file or directory).
    Valid,
}

impl Outcome {
    /// Stable lowercase tag used in text and JSON output.
    pub const fn label(self) -> &'static str {
        return match self {
            Outcome::Broken => "broken",
            Outcome::Skipped(SkipReason::AnchorOnly) => "skipped-anchor",
            Outcome::Skipped(SkipReason::External) => "skipped-external",
            Outcome::Valid => "valid",
        };
    }
}

/// Accumulated result of one pass over a documentation tree.
/// Totals are derived from the collected records, never tracked separately.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Documents that could not be read, in traversal order.
    pub failures: Vec<IoFailure>,
    /// Number of markdown documents considered, readable or not.
    pub files_scanned: usize,
    /// One record per extracted link, in traversal then source order.
    pub records: Vec<ClassificationRecord>,
}

impl ScanReport {
    /// Records whose outcome is `Broken`.
    pub fn broken(&self) -> impl Iterator<Item = &ClassificationRecord> {
        return self.records.iter().filter(|r| return r.outcome == Outcome::Broken);
    }

    /// Number of records with the given outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        return self.records.iter().filter(|r| return r.outcome == outcome).count();
    }

    /// Number of records that were skipped for any reason.
    pub fn skipped(&self) -> usize {
        return self
            .records
            .iter()
            .filter(|r| return matches!(r.outcome, Outcome::Skipped(_)))
            .count();
    }

    /// Total number of extracted links.
    pub fn total_links(&self) -> usize {
        return self.records.len();
    }
}

/// Why a link was not checked against the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The target is a same-document anchor such as a bare `#`.
    AnchorOnly,
    /// The target uses an external scheme (`http://`, `https://`, `mailto:`).
    External,
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
mod tests {
    use super::*;

    fn record(outcome: Outcome) -> ClassificationRecord {
        return ClassificationRecord {
            link: Link {
                line: 1,
                source: PathBuf::from("a.md"),
                target: "b.md".to_string(),
                text: "b".to_string(),
            },
            outcome,
            resolved: None,
        };
    }

    #[test]
    fn counts_derive_from_records() {
        let report = ScanReport {
            failures: Vec::new(),
            files_scanned: 1,
            records: vec![
                record(Outcome::Valid),
                record(Outcome::Broken),
                record(Outcome::Broken),
                record(Outcome::Skipped(SkipReason::AnchorOnly)),
            ],
        };
        assert_eq!(report.total_links(), 4);
        assert_eq!(report.count(Outcome::Valid), 1);
        assert_eq!(report.broken().count(), 2);
        assert_eq!(report.skipped(), 1);
    }

    #[test]
    fn labels_are_distinct() {
        let labels = [
            Outcome::Broken.label(),
            Outcome::Skipped(SkipReason::AnchorOnly).label(),
            Outcome::Skipped(SkipReason::External).label(),
            Outcome::Valid.label(),
        ];
        for (i, a) in labels.iter().enumerate() {
            for b in labels.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
