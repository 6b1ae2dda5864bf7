//! Inline link extraction from markdown text.

use std::path::Path;

use regex::{Captures, Regex};

use crate::error::Error;
use crate::types::Link;

/// Target prefixes that never name a filesystem path.
const EXTERNAL_SCHEMES: [&str; 3] = ["http://", "https://", "mailto:"];

/// Inline link with an optional leading `!`. Images are recognized by that
/// capture and dropped, since the regex engine has no lookbehind.
/// Link text may not contain `[`, so an image nested inside a link's text
/// is matched as the image it is rather than as the outer link.
const INLINE_LINK_PATTERN: &str = r"(!?)\[([^\[\]]+)\]\(([^)]+)\)";

/// Turns document text into the ordered list of checkable links.
///
/// Implementations must return links in source order, exclude images,
/// external-scheme targets, and pure `#anchor` targets, and yield the same
/// sequence every time they see the same text.
pub trait Extractor {
    /// Extract links from `text`, attributing each to `source`.
    fn extract(&self, text: &str, source: &Path) -> Vec<Link>;
}

/// Regex-based extractor for the `[text](target)` form.
///
/// Matching is local and best-effort: unbalanced brackets or parentheses
/// may produce fewer links than a reader would see.
pub struct RegexExtractor {
    /// Compiled [`INLINE_LINK_PATTERN`].
    pattern: Regex,
}

impl RegexExtractor {
    /// Compile the inline link pattern.
    ///
    /// # Errors
    ///
    /// Returns `Error::Pattern` if the pattern fails to compile.
    pub fn new() -> Result<Self, Error> {
        return Ok(Self {
            pattern: Regex::new(INLINE_LINK_PATTERN)?,
        });
    }
}

impl Extractor for RegexExtractor {
    fn extract(&self, text: &str, source: &Path) -> Vec<Link> {
        let mut links = Vec::new();
        let mut line = 1_u32;
        let mut scanned_to = 0_usize;

        for cap in self.pattern.captures_iter(text) {
            let Some(whole) = cap.get(0) else { continue };
            line = line.saturating_add(count_newlines(text, scanned_to, whole.start()));
            scanned_to = whole.start();

            if let Some(link) = link_from_capture(&cap, source, line) {
                links.push(link);
            }
        }

        return links;
    }
}

/// Count newlines in `text[from..to]`, saturating at `u32::MAX`.
fn count_newlines(text: &str, from: usize, to: usize) -> u32 {
    let count = text
        .get(from..to)
        .map_or(0, |s| return s.bytes().filter(|b| return *b == b'\n').count());
    return u32::try_from(count).unwrap_or(u32::MAX);
}

/// True when the target starts with a scheme that is never resolved on disk.
pub fn is_external(target: &str) -> bool {
    return EXTERNAL_SCHEMES.iter().any(|scheme| return target.starts_with(scheme));
}

/// True for `#heading` targets that only address the current document.
/// A lone `#` is not considered a pure anchor here.
pub fn is_pure_anchor(target: &str) -> bool {
    return target.starts_with('#') && target.len() > 1;
}

/// Build a link from one match, or `None` for images and excluded targets.
fn link_from_capture(cap: &Captures<'_>, source: &Path, line: u32) -> Option<Link> {
    let is_image = cap.get(1).is_some_and(|m| return !m.as_str().is_empty());
    if is_image {
        return None;
    }

    let text = cap.get(2)?.as_str();
    let target = cap.get(3)?.as_str();

    if is_external(target) || is_pure_anchor(target) {
        return None;
    }

    return Some(Link {
        line,
        source: source.to_path_buf(),
        target: target.to_string(),
        text: text.to_string(),
    });
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
#[allow(clippy::unwrap_used, reason = "test code")]
#[allow(clippy::indexing_slicing, reason = "test code")]
mod tests {
    use super::*;

    fn targets(text: &str) -> Vec<String> {
        let extractor = RegexExtractor::new().unwrap();
        return extractor
            .extract(text, Path::new("doc/page.md"))
            .into_iter()
            .map(|l| return l.target)
            .collect();
    }

    #[test]
    fn text_without_links_yields_nothing() {
        assert!(targets("").is_empty());
        assert!(targets("# Title\n\nJust prose, [brackets] and (parens).\n").is_empty());
    }

    #[test]
    fn extracts_text_target_and_source() {
        let extractor = RegexExtractor::new().unwrap();
        let links = extractor.extract("See [the guide](guide.md).", Path::new("doc/index.md"));
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].text, "the guide");
        assert_eq!(links[0].target, "guide.md");
        assert_eq!(links[0].source, Path::new("doc/index.md"));
    }

    #[test]
    fn preserves_source_order() {
        let found = targets("[c](c.md) then [a](a.md)\n[b](b.md)");
        assert_eq!(found, vec!["c.md", "a.md", "b.md"]);
    }

    #[test]
    fn records_line_numbers() {
        let extractor = RegexExtractor::new().unwrap();
        let text = "[one](1.md)\n\ntext\n[three](3.md) [again](3b.md)\n";
        let lines: Vec<u32> = extractor
            .extract(text, Path::new("x.md"))
            .iter()
            .map(|l| return l.line)
            .collect();
        assert_eq!(lines, vec![1, 4, 4]);
    }

    #[test]
    fn images_are_excluded() {
        assert!(targets("![alt](x.png)").is_empty());
        assert!(targets("!![alt](x.png)").is_empty());
        let found = targets("![alt](x.png) and [doc](x.md) and ![a](x.png)");
        assert_eq!(found, vec!["x.md"]);
    }

    #[test]
    fn image_inside_link_text_is_not_reported_as_its_target() {
        assert!(targets("[![badge](x.png)](status.md)").is_empty());
    }

    #[test]
    fn external_schemes_are_excluded() {
        let found = targets(
            "[a](http://example.com) [b](https://example.com/x.md) [c](mailto:me@example.com) [d](local.md)",
        );
        assert_eq!(found, vec!["local.md"]);
    }

    #[test]
    fn pure_anchor_excluded_but_path_with_fragment_kept() {
        let found = targets("[top](#section) [other](page.md#section)");
        assert_eq!(found, vec!["page.md#section"]);
    }

    #[test]
    fn lone_hash_is_kept_for_the_resolver() {
        assert_eq!(targets("[x](#)"), vec!["#"]);
    }

    #[test]
    fn query_string_is_left_in_place() {
        assert_eq!(targets("[q](page.md?v=2)"), vec!["page.md?v=2"]);
    }

    #[test]
    fn extraction_is_idempotent() {
        let text = "[a](a.md) ![i](i.png) [b](../b.md#x) [c](https://c)";
        assert_eq!(targets(text), targets(text));
    }

    #[test]
    fn unbalanced_syntax_under_extracts_without_panicking() {
        let found = targets("[broken](missing.md [ok](ok.md)");
        assert!(found.len() <= 1);
        assert!(targets("[never closed](a.md").is_empty());
    }
}
