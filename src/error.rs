/// Crate-level error types for doclinks diagnostics.
use std::path::PathBuf;

/// Errors that stop a command outright. Per-document read failures and broken
/// links are never errors; they are collected into the scan report instead.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Config file parsed as TOML but holds a value we cannot use.
    #[error("invalid config {}: {reason}", path.display())]
    ConfigInvalid {
        /// Path to the offending config file.
        path: PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// A single document named on the command line could not be read.
    #[error("cannot read {}: {source}", path.display())]
    DocumentUnreadable {
        /// Document that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON report serialization failed.
    #[error("json serialize: {0}")]
    JsonSer(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// A link or rewrite pattern failed to compile.
    #[error("pattern: {0}")]
    Pattern(
        /// The wrapped regex error.
        #[from]
        regex::Error,
    ),

    /// The report file could not be written.
    #[error("cannot write report {}: {source}", path.display())]
    ReportWrite {
        /// Destination that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The documentation root does not exist or is not a directory.
    #[error("root not found: {}", path.display())]
    RootNotFound {
        /// Path that was expected to be a directory.
        path: PathBuf,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// The filesystem watcher could not be set up.
    #[error("watch: {reason}")]
    Watch {
        /// Description of the watcher failure.
        reason: String,
    },
}
