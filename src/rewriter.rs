//! Fixed-table text rewriting for renamed or deleted link targets.
//!
//! The table is applied to raw document text, independent of link extraction
//! and resolution. Rules run in table order, each on the output of the last.

use std::fmt;

use regex::Regex;

use crate::config::Replacement;
use crate::error::Error;

/// One edit made by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Every bullet line linking to `from` was dropped.
    RemovedLines {
        /// The removed target text.
        from: String,
    },
    /// Bare occurrences of `from` were deleted.
    RemovedText {
        /// The removed text.
        from: String,
    },
    /// Every occurrence of `from` was replaced with `to`.
    Replaced {
        /// Original text.
        from: String,
        /// Replacement text.
        to: String,
    },
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            Change::RemovedLines { from } => write!(f, "removed list entries linking to {from}"),
            Change::RemovedText { from } => write!(f, "removed reference to {from}"),
            Change::Replaced { from, to } => write!(f, "replaced {from} -> {to}"),
        };
    }
}

/// Output of applying a table to one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// Edits in the order they were applied.
    pub changes: Vec<Change>,
    /// Rewritten text.
    pub content: String,
}

impl Rewrite {
    /// True when at least one rule changed the text.
    pub fn is_changed(&self) -> bool {
        return !self.changes.is_empty();
    }
}

/// A replacement with its list-line pattern compiled up front.
struct Rule {
    /// Literal text to look for.
    from: String,
    /// Matches a bold bullet line whose link target ends in `from`.
    /// Only built for removal rules.
    list_line: Option<Regex>,
    /// Replacement text, or `None` to remove.
    to: Option<String>,
}

/// Compiled, ordered rewrite table.
pub struct RewriteTable {
    /// Rules in config order.
    rules: Vec<Rule>,
}

impl RewriteTable {
    /// Apply every rule to `text`. Pure: no I/O, same input gives same output.
    pub fn apply(&self, text: &str) -> Rewrite {
        let mut content = text.to_string();
        let mut changes = Vec::new();

        for rule in &self.rules {
            if !content.contains(&rule.from) {
                continue;
            }
            let (updated, change) = apply_rule(rule, &content);
            content = updated;
            changes.push(change);
        }

        return Rewrite { changes, content };
    }

    /// True when the table has no rules.
    pub fn is_empty(&self) -> bool {
        return self.rules.is_empty();
    }

    /// Compile a table from config replacements.
    ///
    /// # Errors
    ///
    /// Returns `Error::Pattern` if a removal pattern fails to compile.
    pub fn new(replacements: &[Replacement]) -> Result<Self, Error> {
        let mut rules = Vec::with_capacity(replacements.len());
        for replacement in replacements {
            let list_line = match replacement.to {
                None => Some(list_line_pattern(&replacement.from)?),
                Some(_) => None,
            };
            rules.push(Rule {
                from: replacement.from.clone(),
                list_line,
                to: replacement.to.clone(),
            });
        }
        return Ok(Self { rules });
    }
}

/// Apply one rule known to match somewhere in `content`.
fn apply_rule(rule: &Rule, content: &str) -> (String, Change) {
    let from = rule.from.clone();
    if let Some(to) = &rule.to {
        let change = Change::Replaced {
            from,
            to: to.clone(),
        };
        return (content.replace(&rule.from, to), change);
    }

    if let Some(pattern) = &rule.list_line
        && pattern.is_match(content)
    {
        return (pattern.replace_all(content, "").into_owned(), Change::RemovedLines { from });
    }

    return (content.replace(&rule.from, ""), Change::RemovedText { from });
}

/// Pattern for a `- **[text](...from)...` bullet line, newline included.
///
/// # Errors
///
/// Returns `Error::Pattern` if the escaped pattern fails to compile.
fn list_line_pattern(from: &str) -> Result<Regex, Error> {
    let escaped = regex::escape(from);
    return Ok(Regex::new(&format!(r"- \*\*\[.*?\]\([^)]*{escaped}\).*?\n"))?);
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
#[allow(clippy::unwrap_used, reason = "test code")]
mod tests {
    use super::*;

    fn table(entries: &[(&str, Option<&str>)]) -> RewriteTable {
        let replacements: Vec<Replacement> = entries
            .iter()
            .map(|(from, to)| {
                return Replacement {
                    from: (*from).to_string(),
                    to: to.map(str::to_string),
                };
            })
            .collect();
        return RewriteTable::new(&replacements).unwrap();
    }

    #[test]
    fn renames_every_occurrence() {
        let rewrite = table(&[("NVIM_LAYER.md", Some("nvim-layer.md"))])
            .apply("[a](NVIM_LAYER.md) and [b](../NVIM_LAYER.md#keys)\n");
        assert_eq!(rewrite.content, "[a](nvim-layer.md) and [b](../nvim-layer.md#keys)\n");
        assert_eq!(
            rewrite.changes,
            vec![Change::Replaced {
                from: "NVIM_LAYER.md".to_string(),
                to: "nvim-layer.md".to_string(),
            }]
        );
    }

    #[test]
    fn removal_drops_bold_bullet_lines() {
        let text = "# Layers\n- **[Windows](WINDOWS_LAYER.md)** - window tiling\n- **[Nvim](nvim.md)**\n";
        let rewrite = table(&[("WINDOWS_LAYER.md", None)]).apply(text);
        assert_eq!(rewrite.content, "# Layers\n- **[Nvim](nvim.md)**\n");
        assert!(matches!(rewrite.changes.as_slice(), [Change::RemovedLines { .. }]));
    }

    #[test]
    fn removal_without_bullet_deletes_bare_text() {
        let rewrite = table(&[("OLD.md", None)]).apply("see [old](OLD.md)\n");
        assert_eq!(rewrite.content, "see [old]()\n");
        assert!(matches!(rewrite.changes.as_slice(), [Change::RemovedText { .. }]));
    }

    #[test]
    fn rules_apply_in_order() {
        let rewrite = table(&[("a.md", Some("b.md")), ("b.md", Some("c.md"))]).apply("[x](a.md)");
        assert_eq!(rewrite.content, "[x](c.md)");
        assert_eq!(rewrite.changes.len(), 2);
    }

    #[test]
    fn untouched_text_reports_no_changes() {
        let rewrite = table(&[("missing.md", Some("x.md"))]).apply("[a](a.md)");
        assert!(!rewrite.is_changed());
        assert_eq!(rewrite.content, "[a](a.md)");
    }

    #[test]
    fn special_characters_in_source_are_literal() {
        let text = "- **[k](../kanata.kbd)** config\nrest\n";
        let rewrite = table(&[("kanata.kbd", None)]).apply(text);
        assert_eq!(rewrite.content, "rest\n");
    }

    #[test]
    fn change_descriptions_read_naturally() {
        let change = Change::Replaced {
            from: "A.md".to_string(),
            to: "a.md".to_string(),
        };
        assert_eq!(change.to_string(), "replaced A.md -> a.md");
    }
}
