//! Documentation tree traversal: find markdown documents, read each once,
//! extract its links, and classify every link.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Error;
use crate::extractor::Extractor;
use crate::resolver;
use crate::types::{IoFailure, ScanReport};

/// Extensions treated as markdown documents.
const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Read, extract, and classify one document, appending to `report`.
/// An unreadable document becomes a single failure and contributes no links.
pub fn check_document(path: &Path, extractor: &dyn Extractor, report: &mut ScanReport) {
    report.files_scanned = report.files_scanned.saturating_add(1);

    let text = match read_document(path) {
        Err(failure) => {
            tracing::warn!(path = %failure.path.display(), reason = %failure.reason, "skipping unreadable document");
            report.failures.push(failure);
            return;
        },
        Ok(text) => text,
    };

    let links = extractor.extract(&text, path);
    tracing::debug!(path = %path.display(), links = links.len(), "checking document");
    report
        .records
        .extend(links.iter().map(resolver::resolve_and_classify));
    return;
}

/// True for files with a markdown extension.
fn is_markdown(path: &Path) -> bool {
    return path
        .extension()
        .and_then(|e| return e.to_str())
        .is_some_and(|ext| return MARKDOWN_EXTENSIONS.contains(&ext));
}

/// List the markdown documents under `root` that the config allows, in
/// file-name order. The configured report file is left out. Entries the
/// walker cannot read are returned as failures.
///
/// # Errors
///
/// Returns `Error::RootNotFound` if `root` is not a directory.
pub fn markdown_documents(root: &Path, config: &Config) -> Result<(Vec<PathBuf>, Vec<IoFailure>), Error> {
    if !root.is_dir() {
        return Err(Error::RootNotFound { path: root.to_path_buf() });
    }

    let mut documents = Vec::new();
    let mut failures = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| return !config.is_excluded_dir(relative_to(root, e.path())));

    for entry in walker {
        let entry = match entry {
            Err(e) => {
                let path = e.path().map_or_else(|| return root.to_path_buf(), Path::to_path_buf);
                failures.push(IoFailure { path, reason: e.to_string() });
                continue;
            },
            Ok(entry) => entry,
        };

        let path = entry.path();
        if entry.file_type().is_dir() || !is_markdown(path) {
            continue;
        }
        let relative = relative_to(root, path);
        if config.is_report(relative) {
            tracing::debug!(path = %path.display(), "skipping generated report");
            continue;
        }
        if !config.should_scan(relative) {
            tracing::debug!(path = %path.display(), "excluded by config");
            continue;
        }
        documents.push(path.to_path_buf());
    }

    return Ok((documents, failures));
}

/// Read a document as UTF-8, turning any failure into a reportable record.
///
/// # Errors
///
/// Returns an `IoFailure` carrying the path and the error's description.
pub fn read_document(path: &Path) -> Result<String, IoFailure> {
    return std::fs::read_to_string(path).map_err(|e| {
        return IoFailure {
            path: path.to_path_buf(),
            reason: format!("cannot read file: {e}"),
        };
    });
}

/// Strip `root` from `path`, leaving `path` untouched if it is not below it.
fn relative_to<'a>(root: &Path, path: &'a Path) -> &'a Path {
    return path.strip_prefix(root).unwrap_or(path);
}

/// Scan every markdown document under `root` and classify all their links.
///
/// Documents are processed one at a time in file-name order, so two scans of
/// an unchanged tree produce identical reports. Unreadable documents and
/// directory entries are recorded as failures; they never abort the scan.
///
/// # Errors
///
/// Returns `Error::RootNotFound` if `root` is not a directory.
pub fn scan(root: &Path, config: &Config, extractor: &dyn Extractor) -> Result<ScanReport, Error> {
    let (documents, failures) = markdown_documents(root, config)?;
    tracing::info!(root = %root.display(), documents = documents.len(), "scanning");

    let mut report = ScanReport {
        failures,
        ..ScanReport::default()
    };
    for path in &documents {
        check_document(path, extractor, &mut report);
    }

    return Ok(report);
}
