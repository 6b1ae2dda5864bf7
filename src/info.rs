use std::path::Path;

use serde::Serialize;

use crate::config::{CONFIG_FILE, Config};
use crate::scanner;

/// Output the comprehensive doclinks reference document.
pub fn run(root: &Path, json: bool) {
    let state = gather_state(root);

    if json {
        print_json(&state);
    } else {
        print_markdown(&state);
    }
    return;
}

// ── State gathering ───────────────────────────────────────────────────

/// What `info` can observe about the root without scanning links.
struct CurrentState {
    /// Whether `.doclinks.toml` exists.
    config_found: bool,
    /// Markdown documents the config would scan, if the root is readable.
    documents: Option<usize>,
    /// Number of configured `[[replace]]` entries.
    replacements: usize,
}

/// Inspect config and document count under `root`.
fn gather_state(root: &Path) -> CurrentState {
    let config_found = root.join(CONFIG_FILE).exists();
    let config = Config::load(root).unwrap_or_default();
    let documents = scanner::markdown_documents(root, &config)
        .ok()
        .map(|(docs, _)| return docs.len());

    return CurrentState {
        config_found,
        documents,
        replacements: config.replacements.len(),
    };
}

// ── Markdown output ───────────────────────────────────────────────────

/// Print the reference as markdown.
fn print_markdown(state: &CurrentState) {
    let version = env!("CARGO_PKG_VERSION");
    print!(
        "\
# doclinks {version}

Checks that every relative inline link in a markdown tree points at a file
or directory that exists.

## Link Rules

    [text](path/to/file.md)          checked, relative to the linking file
    [text](../other.md#heading)      checked, fragment ignored
    [text](#heading)                 ignored (same-document anchor)
    [text](https://example.com)      ignored (http, https, mailto)
    ![alt](image.png)                ignored (image)

## Commands

    doclinks check [ROOT]            Scan and report (text, markdown, json)
    doclinks links <FILE>            Classify the links of one document
    doclinks fix [ROOT] [--dry-run]  Apply the [[replace]] table
    doclinks watch [ROOT]            Re-check on every change

## Configuration ({CONFIG_FILE})

    include = [\"doc/\"]                   # only scan these paths
    exclude = [\"doc/archive/\"]           # skip these paths
    exclude_dirs = [\"templates\"]         # skip directories with this name
                                         # (default: develop, templates)
    report = \"link-report.md\"            # default output for check, never scanned

    [[replace]]
    from = \"OLD_NAME.md\"
    to = \"new-name.md\"                   # omit `to` to remove

## Current State

"
    );

    if state.config_found {
        println!("Config:       {CONFIG_FILE} (found)");
    } else {
        println!("Config:       {CONFIG_FILE} (not found)");
    }
    match state.documents {
        None => println!("Documents:    (root unreadable)"),
        Some(n) => println!("Documents:    {n} markdown files"),
    }
    println!("Replacements: {}", state.replacements);
    println!();

    print!(
        "\
## Exit Codes

| Code | Meaning |
|------|---------|
| 0    | All links valid |
| 1    | Broken links found |
| 2    | Unreadable documents found |
| 3    | Runtime error |
"
    );
    return;
}

// ── JSON output ───────────────────────────────────────────────────────

/// One row of the exit code table.
#[derive(Serialize)]
struct ExitCodeInfo {
    /// Process exit code.
    code: u8,
    /// What it means.
    meaning: &'static str,
}

/// Top-level `info --json` document.
#[derive(Serialize)]
struct InfoJson {
    /// Observed state of the root.
    current_state: StateJson,
    /// Exit code table.
    exit_codes: Vec<ExitCodeInfo>,
    /// Crate version.
    version: &'static str,
}

/// JSON view of [`CurrentState`].
#[derive(Serialize)]
struct StateJson {
    /// Whether `.doclinks.toml` exists.
    config_found: bool,
    /// Markdown documents the config would scan.
    documents: Option<usize>,
    /// Number of configured replacements.
    replacements: usize,
}

/// Print the reference as JSON.
fn print_json(state: &CurrentState) {
    let info = InfoJson {
        current_state: StateJson {
            config_found: state.config_found,
            documents: state.documents,
            replacements: state.replacements,
        },
        exit_codes: vec![
            ExitCodeInfo { code: 0, meaning: "all links valid" },
            ExitCodeInfo { code: 1, meaning: "broken links found" },
            ExitCodeInfo { code: 2, meaning: "unreadable documents found" },
            ExitCodeInfo { code: 3, meaning: "runtime error" },
        ],
        version: env!("CARGO_PKG_VERSION"),
    };

    match serde_json::to_string_pretty(&info) {
        Err(e) => eprintln!("error: {e}"),
        Ok(out) => println!("{out}"),
    }
    return;
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
#[allow(clippy::unwrap_used, reason = "test code")]
mod tests {
    use super::*;

    #[test]
    fn state_counts_documents_and_replacements() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[[replace]]\nfrom = \"A.md\"\n").unwrap();
        std::fs::write(dir.path().join("a.md"), "").unwrap();
        std::fs::write(dir.path().join("b.md"), "").unwrap();

        let state = gather_state(dir.path());
        assert!(state.config_found);
        assert_eq!(state.documents, Some(2));
        assert_eq!(state.replacements, 1);
    }

    #[test]
    fn missing_root_has_no_document_count() {
        let dir = tempfile::tempdir().unwrap();
        let state = gather_state(&dir.path().join("absent"));
        assert!(!state.config_found);
        assert_eq!(state.documents, None);
    }
}
