use std::path::{Component, Path, PathBuf};

use crate::error::Error;

/// Name of the optional config file in the documentation root.
pub const CONFIG_FILE: &str = ".doclinks.toml";

/// Directory names skipped when the config does not set `exclude_dirs`.
const DEFAULT_EXCLUDE_DIRS: [&str; 2] = ["develop", "templates"];

/// Project configuration loaded from `.doclinks.toml`.
/// Include/exclude patterns are path prefixes applied to markdown files
/// relative to the root; `exclude_dirs` are directory names skipped anywhere.
#[derive(Debug)]
pub struct Config {
    /// Relative path prefixes that are never scanned.
    exclude: Vec<String>,
    /// Directory names pruned wherever they appear in the tree.
    exclude_dirs: Vec<String>,
    /// Relative path prefixes to scan. Empty means everything.
    include: Vec<String>,
    /// Ordered rewrite table for the `fix` command.
    pub replacements: Vec<Replacement>,
    /// Default report destination, relative to the root.
    pub report: Option<PathBuf>,
}

/// Raw TOML structure for `.doclinks.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct DoclinksTomlConfig {
    /// Relative path prefixes that are never scanned.
    #[serde(default)]
    exclude: Vec<String>,
    /// Directory names pruned wherever they appear. Absent means the defaults.
    exclude_dirs: Option<Vec<String>>,
    /// Relative path prefixes to scan.
    #[serde(default)]
    include: Vec<String>,
    /// `[[replace]]` entries, in file order.
    #[serde(default)]
    replace: Vec<Replacement>,
    /// Default report destination.
    report: Option<PathBuf>,
}

/// One entry of the rewrite table. A missing `to` means the text is removed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Replacement {
    /// Literal text to look for.
    pub from: String,
    /// Replacement text, or `None` to remove.
    pub to: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        return Self {
            exclude: Vec::new(),
            exclude_dirs: default_exclude_dirs(),
            include: Vec::new(),
            replacements: Vec::new(),
            report: None,
        };
    }
}

impl Config {
    /// True when any directory component of `relative_path` is an excluded name.
    /// The final component is included so a directory entry can be pruned
    /// before the walker descends into it.
    pub fn is_excluded_dir(&self, relative_path: &Path) -> bool {
        return relative_path.components().any(|c| {
            return match c {
                Component::Normal(name) => self
                    .exclude_dirs
                    .iter()
                    .any(|excluded| return name == excluded.as_str()),
                _ => false,
            };
        });
    }

    /// True when `relative_path` is the configured report destination,
    /// which `check` writes under the root and is never scanned.
    pub fn is_report(&self, relative_path: &Path) -> bool {
        return self
            .report
            .as_deref()
            .is_some_and(|report| return normal_components(report).eq(normal_components(relative_path)));
    }

    /// Load config from `.doclinks.toml` in the given root directory.
    /// Returns the defaults if the file doesn't exist.
    /// Returns an error if the file exists but is malformed; a config the
    /// user wrote is never silently ignored.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// `Error::TomlDe` if the TOML is malformed,
    /// or `Error::ConfigInvalid` if a replacement has an empty `from`.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };

        return Self::parse(&content, &path);
    }

    /// Parse config content. `path` is only used for error messages.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed,
    /// or `Error::ConfigInvalid` if a replacement has an empty `from`.
    pub fn parse(content: &str, path: &Path) -> Result<Self, Error> {
        let raw: DoclinksTomlConfig = toml::from_str(content)?;

        if raw.replace.iter().any(|r| return r.from.is_empty()) {
            return Err(Error::ConfigInvalid {
                path: path.to_path_buf(),
                reason: "`[[replace]]` entry with empty `from`".to_string(),
            });
        }

        return Ok(Self {
            exclude: raw.exclude,
            exclude_dirs: raw.exclude_dirs.unwrap_or_else(default_exclude_dirs),
            include: raw.include,
            replacements: raw.replace,
            report: raw.report,
        });
    }

    /// Check whether a markdown file path should be scanned.
    ///
    /// A path is included if no include patterns are set (scan everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern
    /// or passes through an excluded directory name.
    pub fn should_scan(&self, relative_path: &Path) -> bool {
        let relative_str = relative_path.to_string_lossy();
        let included = self.include.is_empty()
            || self.include.iter().any(|p| return relative_str.starts_with(p.as_str()));

        if !included {
            return false;
        }

        if self.is_excluded_dir(relative_path) {
            return false;
        }

        return !self.exclude.iter().any(|p| return relative_str.starts_with(p.as_str()));
    }
}

/// Owned copy of [`DEFAULT_EXCLUDE_DIRS`].
fn default_exclude_dirs() -> Vec<String> {
    return DEFAULT_EXCLUDE_DIRS.iter().map(|d| return (*d).to_string()).collect();
}

/// Named components of `path`, ignoring `.` and roots.
fn normal_components(path: &Path) -> impl Iterator<Item = &std::ffi::OsStr> {
    return path.components().filter_map(|c| {
        return match c {
            Component::Normal(name) => Some(name),
            _ => None,
        };
    });
}
