//! Core CLI commands for doclinks: check, links, fix.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::Config;
use crate::error;
use crate::extractor::{Extractor as _, RegexExtractor};
use crate::report::{self, Format};
use crate::resolver;
use crate::rewriter::RewriteTable;
use crate::scanner;
use crate::types::{IoFailure, Outcome, ScanReport};

/// Exit code when at least one link is broken.
const EXIT_BROKEN: u8 = 1;

/// Exit code when at least one document could not be read.
const EXIT_IO_FAILURE: u8 = 2;

/// Totals from one `fix` pass.
#[derive(Debug, Default)]
struct FixSummary {
    /// Documents that could not be read, written back, or walked.
    failures: Vec<IoFailure>,
    /// Documents with at least one change applied.
    files_changed: usize,
    /// Changes applied across all documents.
    total_changes: usize,
}

/// Scan the tree, render the report, and map the result to an exit code.
///
/// The report goes to `output` if given, else to the config's `report` path
/// (relative to `root`), else to stdout.
///
/// # Errors
///
/// Returns errors from config loading, scanning, rendering, or writing the report.
pub fn check(root: &Path, format: Format, output: Option<&Path>) -> Result<ExitCode, error::Error> {
    let (config, report) = scan_root(root)?;
    let rendered = report::render(&report, format)?;

    let destination = output
        .map(Path::to_path_buf)
        .or_else(|| return config.report.as_ref().map(|p| return root.join(p)));

    match destination {
        None => print!("{rendered}"),
        Some(path) => {
            write_report(&path, &rendered)?;
            eprint!("{}", report::render_text(&report));
            eprintln!("Report saved to {}", path.display());
        },
    }

    return Ok(exit_code_for(&report));
}

/// Exit code priority: I/O failure (2) > broken (1) > clean (0).
pub fn exit_code_for(report: &ScanReport) -> ExitCode {
    if !report.failures.is_empty() {
        return ExitCode::from(EXIT_IO_FAILURE);
    } else if report.count(Outcome::Broken) > 0 {
        return ExitCode::from(EXIT_BROKEN);
    } else {
        return ExitCode::SUCCESS;
    }
}

/// Apply the configured rewrite table to every scanned document.
/// With `dry_run`, reports what would change without writing.
///
/// Documents that cannot be read or written back are reported and skipped;
/// the rest of the tree is still processed. Any such failure maps to the
/// I/O failure exit code.
///
/// # Errors
///
/// Returns errors from config loading, pattern compilation, or a missing root.
pub fn fix(root: &Path, dry_run: bool) -> Result<ExitCode, error::Error> {
    let config = Config::load(root)?;
    let table = RewriteTable::new(&config.replacements)?;
    if table.is_empty() {
        eprintln!("No `[[replace]]` entries configured, nothing to fix.");
        return Ok(ExitCode::SUCCESS);
    }

    let (documents, walk_failures) = scanner::markdown_documents(root, &config)?;
    let write = |path: &Path, content: &str| return std::fs::write(path, content);
    let mut summary = rewrite_documents(&documents, &table, dry_run, &write);
    summary.failures.extend(walk_failures);

    for failure in &summary.failures {
        eprintln!("skip: {}  {}", failure.path.display(), failure.reason);
    }

    let verb = if dry_run { "Would modify" } else { "Modified" };
    eprintln!(
        "{verb} {} files ({} changes), {} skipped",
        summary.files_changed,
        summary.total_changes,
        summary.failures.len(),
    );
    if summary.files_changed > 0 && !dry_run {
        eprintln!("Run `doclinks check` to review remaining broken links.");
    }

    if summary.failures.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    return Ok(ExitCode::from(EXIT_IO_FAILURE));
}

/// List every link in one document with its classification.
///
/// # Errors
///
/// Returns `Error::DocumentUnreadable` if the document cannot be read,
/// or `Error::Pattern` if the link pattern fails to compile.
pub fn links(file: &Path) -> Result<ExitCode, error::Error> {
    let text = std::fs::read_to_string(file).map_err(|source| {
        return error::Error::DocumentUnreadable {
            path: file.to_path_buf(),
            source,
        };
    })?;
    let extractor = RegexExtractor::new()?;

    let mut report = ScanReport {
        files_scanned: 1,
        ..ScanReport::default()
    };
    for link in extractor.extract(&text, file) {
        let record = resolver::resolve_and_classify(&link);
        let resolved = record
            .resolved
            .as_deref()
            .map(|p| return format!("  -> {}", p.display()))
            .unwrap_or_default();
        println!("{:<16}{}:{}  {}{resolved}", record.outcome.label(), file.display(), link.line, link.target);
        report.records.push(record);
    }

    return Ok(exit_code_for(&report));
}

/// Rewrite each document in order, printing its changes to stdout.
/// `write` is only called when not `dry_run`. A document whose read or
/// write fails becomes a failure and does not count as changed.
fn rewrite_documents(
    documents: &[PathBuf],
    table: &RewriteTable,
    dry_run: bool,
    write: &dyn Fn(&Path, &str) -> std::io::Result<()>,
) -> FixSummary {
    let mut summary = FixSummary::default();

    for path in documents {
        let text = match scanner::read_document(path) {
            Err(failure) => {
                summary.failures.push(failure);
                continue;
            },
            Ok(text) => text,
        };

        let rewrite = table.apply(&text);
        if !rewrite.is_changed() {
            continue;
        }

        println!("{}", path.display());
        for change in &rewrite.changes {
            println!("  {change}");
        }
        if !dry_run {
            match write(path, &rewrite.content) {
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "cannot write rewritten document");
                    summary.failures.push(IoFailure {
                        path: path.clone(),
                        reason: format!("cannot write file: {e}"),
                    });
                    continue;
                },
                Ok(()) => tracing::debug!(path = %path.display(), "rewrote document"),
            }
        }
        summary.files_changed = summary.files_changed.saturating_add(1);
        summary.total_changes = summary.total_changes.saturating_add(rewrite.changes.len());
    }

    return summary;
}

/// Resolve the root argument, defaulting to the current directory.
pub fn root_or_current(root: Option<PathBuf>) -> PathBuf {
    return root.unwrap_or_else(|| return PathBuf::from("."));
}

/// Load the root's config and scan it with the regex extractor.
///
/// # Errors
///
/// Returns errors from config loading, pattern compilation, or scanning.
pub fn scan_root(root: &Path) -> Result<(Config, ScanReport), error::Error> {
    let config = Config::load(root)?;
    let extractor = RegexExtractor::new()?;
    let report = scanner::scan(root, &config, &extractor)?;
    return Ok((config, report));
}

/// Write a rendered report, creating nothing but the file itself.
///
/// # Errors
///
/// Returns `Error::ReportWrite` if the file cannot be written.
fn write_report(path: &Path, rendered: &str) -> Result<(), error::Error> {
    return std::fs::write(path, rendered).map_err(|source| {
        return error::Error::ReportWrite {
            path: path.to_path_buf(),
            source,
        };
    });
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
#[allow(clippy::unwrap_used, reason = "test code")]
#[allow(clippy::indexing_slicing, reason = "test code")]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn exit_code_prefers_io_failures_over_broken_links() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "[x](missing.md)").unwrap();
        let extractor = RegexExtractor::new().unwrap();
        let mut report = scanner::scan(dir.path(), &Config::default(), &extractor).unwrap();
        assert_eq!(exit_code_for(&report), ExitCode::from(EXIT_BROKEN));

        report.failures.push(IoFailure {
            path: dir.path().join("b.md"),
            reason: "cannot read file".to_string(),
        });
        assert_eq!(exit_code_for(&report), ExitCode::from(EXIT_IO_FAILURE));
        assert_eq!(exit_code_for(&ScanReport::default()), ExitCode::SUCCESS);
    }

    #[test]
    fn check_writes_configured_report() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".doclinks.toml"), "report = \"links.md\"\n").unwrap();
        fs::write(dir.path().join("index.md"), "[self](index.md)\n").unwrap();

        let code = check(dir.path(), Format::Markdown, None).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
        let written = fs::read_to_string(dir.path().join("links.md")).unwrap();
        assert!(written.contains("All links valid."));
    }

    #[test]
    fn fix_rewrites_documents_unless_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(".doclinks.toml"),
            "[[replace]]\nfrom = \"OLD.md\"\nto = \"new.md\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("index.md"), "[x](OLD.md)\n").unwrap();

        assert_eq!(fix(dir.path(), true).unwrap(), ExitCode::SUCCESS);
        assert_eq!(fs::read_to_string(dir.path().join("index.md")).unwrap(), "[x](OLD.md)\n");

        assert_eq!(fix(dir.path(), false).unwrap(), ExitCode::SUCCESS);
        assert_eq!(fs::read_to_string(dir.path().join("index.md")).unwrap(), "[x](new.md)\n");
    }

    #[test]
    fn failed_write_is_reported_and_later_documents_still_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let documents: Vec<PathBuf> = ["a.md", "b.md", "c.md"]
            .iter()
            .map(|name| return dir.path().join(name))
            .collect();
        for path in &documents {
            fs::write(path, "[x](OLD.md)\n").unwrap();
        }
        let table = RewriteTable::new(&[crate::config::Replacement {
            from: "OLD.md".to_string(),
            to: Some("new.md".to_string()),
        }])
        .unwrap();

        let write = |path: &Path, content: &str| {
            if path.ends_with("b.md") {
                return Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
            }
            return fs::write(path, content);
        };
        let summary = rewrite_documents(&documents, &table, false, &write);

        assert_eq!(summary.files_changed, 2);
        assert_eq!(summary.total_changes, 2);
        assert_eq!(summary.failures.len(), 1);
        assert!(summary.failures[0].path.ends_with("b.md"));
        assert!(summary.failures[0].reason.contains("cannot write file"));
        assert_eq!(fs::read_to_string(&documents[0]).unwrap(), "[x](new.md)\n");
        assert_eq!(fs::read_to_string(&documents[1]).unwrap(), "[x](OLD.md)\n");
        assert_eq!(fs::read_to_string(&documents[2]).unwrap(), "[x](new.md)\n");
    }

    #[test]
    fn configured_markdown_report_is_not_rescanned() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".doclinks.toml"), "report = \"doc-validation-report.md\"\n").unwrap();
        fs::write(dir.path().join("index.md"), "[self](index.md)\n[gone](gone.md)\n").unwrap();

        let (_, before) = scan_root(dir.path()).unwrap();
        check(dir.path(), Format::Markdown, None).unwrap();
        assert!(dir.path().join("doc-validation-report.md").exists());
        let (_, first) = scan_root(dir.path()).unwrap();
        check(dir.path(), Format::Markdown, None).unwrap();
        let (_, second) = scan_root(dir.path()).unwrap();

        assert_eq!(before.files_scanned, 1);
        assert_eq!(first, before);
        assert_eq!(second, first);
    }

    #[test]
    fn links_on_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = links(&dir.path().join("absent.md"));
        assert!(matches!(result, Err(error::Error::DocumentUnreadable { .. })));
    }
}
