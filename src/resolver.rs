//! Link target resolution and classification.
//!
//! Targets resolve against the directory containing the source document.
//! The resolved path is built lexically: `.` and `..` collapse without
//! consulting the filesystem, so symlinked directories are never expanded
//! while the path is built. The existence probe afterwards does follow
//! symlinks, so a dangling symlink classifies as broken.

use std::path::{Component, Path, PathBuf};

use crate::extractor;
use crate::types::{ClassificationRecord, Link, Outcome, SkipReason};

/// Make a path absolute against the process working directory.
/// Falls back to the path as given if the working directory is unavailable.
fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    return std::path::absolute(path).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "cannot make path absolute");
        return path.to_path_buf();
    });
}

/// Classify a probed path. Probe errors count as broken and are logged.
fn classify_existence(path: &Path) -> Outcome {
    return match path.try_exists() {
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "existence check failed");
            Outcome::Broken
        },
        Ok(false) => Outcome::Broken,
        Ok(true) => Outcome::Valid,
    };
}

/// Collapse `.` and `..` components in a path without touching the filesystem.
/// Preserves leading `..` when there is nothing left to pop, and never pops
/// past the root of an absolute path.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        push_normalized_component(&mut components, component);
    }
    return components.iter().collect();
}

/// Handle a single path component during normalization.
fn push_normalized_component<'a>(components: &mut Vec<Component<'a>>, component: Component<'a>) {
    match component {
        Component::CurDir => {},
        Component::ParentDir => match components.last() {
            Some(Component::Normal(_)) => {
                components.pop();
            },
            Some(Component::Prefix(_) | Component::RootDir) => {},
            Some(Component::CurDir | Component::ParentDir) | None => components.push(component),
        },
        other => components.push(other),
    }
    return;
}

/// Evaluate one link and produce its classification record.
///
/// Every link yields exactly one record. External and anchor-only targets are
/// skipped without touching the filesystem; everything else is resolved and
/// probed for existence. Files and directories both count as existing.
pub fn resolve_and_classify(link: &Link) -> ClassificationRecord {
    if extractor::is_external(&link.target) {
        return skipped(link, SkipReason::External);
    }

    let Some(resolved) = resolve_target(link) else {
        return skipped(link, SkipReason::AnchorOnly);
    };

    let outcome = classify_existence(&resolved);
    tracing::trace!(link = %link.target, resolved = %resolved.display(), outcome = outcome.label(), "classified");

    return ClassificationRecord {
        link: link.clone(),
        outcome,
        resolved: Some(resolved),
    };
}

/// Resolve a link's target to an absolute, normalized path.
/// Returns `None` when nothing remains after stripping the fragment.
pub fn resolve_target(link: &Link) -> Option<PathBuf> {
    let path_part = strip_fragment(&link.target);
    if path_part.is_empty() {
        return None;
    }

    let source_dir = link.source.parent().unwrap_or_else(|| return Path::new(""));
    let joined = absolute(&source_dir.join(path_part));
    return Some(normalize_path(&joined));
}

/// Record for a link that was not checked on disk.
fn skipped(link: &Link, reason: SkipReason) -> ClassificationRecord {
    return ClassificationRecord {
        link: link.clone(),
        outcome: Outcome::Skipped(reason),
        resolved: None,
    };
}

/// Drop everything from the first `#` onward.
pub fn strip_fragment(target: &str) -> &str {
    return target.split_once('#').map_or(target, |(path, _)| return path);
}
