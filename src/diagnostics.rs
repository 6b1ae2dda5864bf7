use std::path::Path;

use crate::config::CONFIG_FILE;
use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
    return;
}

/// Render a config problem with a pointer to the offending file.
fn render_config_invalid(path: &Path, reason: &str) -> String {
    return format!(
        "\
# Error: Invalid Config

`{}`: {reason}

## Fix

Every `[[replace]]` entry needs a non-empty `from`:

    [[replace]]
    from = \"OLD_NAME.md\"
    to = \"new-name.md\"
",
        path.display()
    );
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is
/// one, how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::ConfigInvalid { path, reason } => render_config_invalid(path, reason),
        Error::DocumentUnreadable { path, source } => format!(
            "\
# Error: Document Unreadable

Could not read `{}`: {source}
",
            path.display()
        ),
        Error::Io(err) => format!(
            "\
# Error: I/O

{err}
"
        ),
        Error::JsonSer(err) => format!(
            "\
# Error: JSON Serialization

{err}
"
        ),
        Error::Pattern(err) => format!(
            "\
# Error: Invalid Pattern

{err}
"
        ),
        Error::ReportWrite { path, source } => render_report_write(path, source),
        Error::RootNotFound { path } => render_root_not_found(path),
        Error::TomlDe(err) => format!(
            "\
# Error: Invalid TOML

{err}

## Fix

Check the syntax of `{CONFIG_FILE}`.
"
        ),
        Error::Watch { reason } => format!(
            "\
# Error: Watch Failed

{reason}
"
        ),
    };
}

/// Render a failed report write.
fn render_report_write(path: &Path, source: &std::io::Error) -> String {
    return format!(
        "\
# Error: Report Not Written

Could not write `{}`: {source}

## Fix

Make sure the parent directory exists and is writable, or print to stdout
by omitting `--output`.
",
        path.display()
    );
}

/// Render a missing documentation root.
fn render_root_not_found(path: &Path) -> String {
    return format!(
        "\
# Error: Root Not Found

`{}` is not a directory.

## Fix

Pass the documentation directory explicitly:

    doclinks check path/to/docs
",
        path.display()
    );
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn root_not_found_names_the_path_and_a_fix() {
        let md = render_error(&Error::RootNotFound { path: PathBuf::from("docs") });
        assert!(md.starts_with("# Error: Root Not Found"));
        assert!(md.contains("`docs` is not a directory."));
        assert!(md.contains("## Fix"));
    }

    #[test]
    fn watch_failure_carries_reason() {
        let md = render_error(&Error::Watch { reason: "inotify limit".to_string() });
        assert!(md.contains("inotify limit"));
    }
}
