//! Rendering a scan report as console text, a markdown document, or JSON.

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;

use crate::error::Error;
use crate::types::{ClassificationRecord, IoFailure, Outcome, ScanReport};

/// Output format for `check` and `watch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Machine-readable JSON document.
    Json,
    /// Markdown report with a summary table.
    Markdown,
    /// One line per problem, then a summary line.
    Text,
}

/// JSON shape of an I/O failure.
#[derive(Serialize)]
struct FailureJson<'a> {
    /// Document that failed.
    path: &'a Path,
    /// Why it failed.
    reason: &'a str,
}

/// JSON shape of a single classification record.
#[derive(Serialize)]
struct RecordJson<'a> {
    /// One-based line of the link in its source document.
    line: u32,
    /// Outcome label.
    outcome: &'static str,
    /// Resolved absolute path, when one was computed.
    resolved: Option<&'a Path>,
    /// Source document.
    source: &'a Path,
    /// Raw link target.
    target: &'a str,
    /// Link display text.
    text: &'a str,
}

/// Top-level JSON document.
#[derive(Serialize)]
struct ReportJson<'a> {
    /// Documents that could not be read.
    failures: Vec<FailureJson<'a>>,
    /// Every classification record.
    records: Vec<RecordJson<'a>>,
    /// Aggregate counts.
    summary: SummaryJson,
}

/// Aggregate counts in the JSON document.
#[derive(Serialize)]
struct SummaryJson {
    /// Broken links.
    broken: usize,
    /// Markdown documents considered.
    files_scanned: usize,
    /// Documents that could not be read.
    io_failures: usize,
    /// Links extracted.
    links: usize,
    /// Links not checked on disk.
    skipped: usize,
    /// Links whose target exists.
    valid: usize,
}

/// Render in the requested format.
///
/// # Errors
///
/// Returns `Error::JsonSer` if JSON serialization fails.
pub fn render(report: &ScanReport, format: Format) -> Result<String, Error> {
    return match format {
        Format::Json => render_json(report),
        Format::Markdown => Ok(render_markdown(report)),
        Format::Text => Ok(render_text(report)),
    };
}

/// Render the report as pretty-printed JSON.
///
/// # Errors
///
/// Returns `Error::JsonSer` if serialization fails.
pub fn render_json(report: &ScanReport) -> Result<String, Error> {
    let doc = ReportJson {
        failures: report
            .failures
            .iter()
            .map(|f| return FailureJson { path: &f.path, reason: &f.reason })
            .collect(),
        records: report.records.iter().map(record_json).collect(),
        summary: SummaryJson {
            broken: report.count(Outcome::Broken),
            files_scanned: report.files_scanned,
            io_failures: report.failures.len(),
            links: report.total_links(),
            skipped: report.skipped(),
            valid: report.count(Outcome::Valid),
        },
    };
    let mut out = serde_json::to_string_pretty(&doc)?;
    out.push('\n');
    return Ok(out);
}

/// Render the report as a standalone markdown document.
pub fn render_markdown(report: &ScanReport) -> String {
    let broken: Vec<&ClassificationRecord> = report.broken().collect();
    let mut out = format!(
        "\
# Documentation Link Report

## Summary

| Metric | Count |
|--------|-------|
| Files scanned | {} |
| Links found | {} |
| Broken links | {} |
| Unreadable files | {} |

",
        report.files_scanned,
        report.total_links(),
        broken.len(),
        report.failures.len(),
    );

    if broken.is_empty() && report.failures.is_empty() {
        out.push_str("All links valid.\n");
        return out;
    }

    if !broken.is_empty() {
        let _ = write!(out, "## Broken Links ({})\n\n", broken.len());
        for (idx, record) in (1_usize..).zip(&broken) {
            write_broken_markdown(&mut out, idx, record);
        }
    }

    if !report.failures.is_empty() {
        let _ = write!(out, "## Unreadable Files ({})\n\n", report.failures.len());
        for (idx, failure) in (1_usize..).zip(&report.failures) {
            write_failure_markdown(&mut out, idx, failure);
        }
    }

    return out;
}

/// Render problems one per line followed by a summary line.
pub fn render_text(report: &ScanReport) -> String {
    let mut out = String::new();

    for record in report.broken() {
        let resolved = record
            .resolved
            .as_deref()
            .map(|p| return p.display().to_string())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "BROKEN  {}:{}  {} ({resolved})",
            record.link.source.display(),
            record.link.line,
            record.link.target,
        );
    }

    for failure in &report.failures {
        let _ = writeln!(out, "IOFAIL  {}  {}", failure.path.display(), failure.reason);
    }

    let broken = report.count(Outcome::Broken);
    if broken == 0 && report.failures.is_empty() {
        let _ = writeln!(
            out,
            "All {} links valid across {} files",
            report.total_links(),
            report.files_scanned,
        );
    } else {
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "{broken} broken, {} unreadable ({} links in {} files)",
            report.failures.len(),
            report.total_links(),
            report.files_scanned,
        );
    }

    return out;
}

/// JSON view of one record.
fn record_json(record: &ClassificationRecord) -> RecordJson<'_> {
    return RecordJson {
        line: record.link.line,
        outcome: record.outcome.label(),
        resolved: record.resolved.as_deref(),
        source: &record.link.source,
        target: &record.link.target,
        text: &record.link.text,
    };
}

/// Append one numbered broken-link section.
fn write_broken_markdown(out: &mut String, idx: usize, record: &ClassificationRecord) {
    let resolved = record
        .resolved
        .as_deref()
        .map(|p| return p.display().to_string())
        .unwrap_or_default();
    let _ = write!(
        out,
        "\
### {idx}. {}

- **Source file**: `{}:{}`
- **Link path**: `{}`
- **Resolved to**: `{resolved}`
- **Reason**: file not found

",
        record.link.text,
        record.link.source.display(),
        record.link.line,
        record.link.target,
    );
    return;
}

/// Append one numbered unreadable-file section.
fn write_failure_markdown(out: &mut String, idx: usize, failure: &IoFailure) {
    let _ = write!(
        out,
        "\
### {idx}. {}

- **Reason**: {}

",
        failure.path.display(),
        failure.reason,
    );
    return;
}
