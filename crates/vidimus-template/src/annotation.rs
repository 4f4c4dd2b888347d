//! Cell-comment annotation language.
//!
//! Comments carry newline-separated `key=value` / `key:value` pairs; whichever
//! of `=` / `:` appears first in a line splits key from value. Lines without a
//! separator, or with an empty key, are ignored. Recognized tag combinations
//! become [`Directive`]s; a single comment may emit several.
//!
//! ```
//! use vidimus_template::annotation::{parse_comment, Directive, FieldType};
//!
//! let directives = parse_comment("Field=amount\nType=number");
//! assert_eq!(
//!     directives,
//!     vec![Directive::Field { key: "amount".into(), ty: Some(FieldType::Num) }]
//! );
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Regex for the `ApprovalKey=A<slot>_<part>` shorthand.
#[allow(clippy::unwrap_used)] // literal pattern
fn approval_key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^A(\d+)_(\w+)$").unwrap())
}

// ============================================================================
// Field types
// ============================================================================

/// Semantic type of an input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FieldType {
    /// Free text (the default).
    #[default]
    Text,
    /// Calendar date.
    Date,
    /// Numeric value.
    Num,
}

impl FieldType {
    /// Infer a type from a `Type=` tag value by case-insensitive substring
    /// match (`date`, `num`). Unmatched values yield `None`; the compiler
    /// then falls back to validation-rule inference, then `Text`.
    pub fn infer(tag: &str) -> Option<Self> {
        let lowered = tag.to_lowercase();
        if lowered.contains("date") {
            Some(FieldType::Date)
        } else if lowered.contains("num") {
            Some(FieldType::Num)
        } else {
            None
        }
    }
}

// ============================================================================
// Directives
// ============================================================================

/// One recognized annotation on a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Directive {
    /// `Field=<key>` with an optional explicit `Type=`.
    Field {
        /// Field key as written.
        key: String,
        /// Explicit type tag, when present and recognized.
        ty: Option<FieldType>,
    },
    /// `Approval=<slot>` + `Part=<part>`, or the `ApprovalKey=A<n>_<part>`
    /// shorthand.
    Approval {
        /// 1-based approval slot.
        slot: u32,
        /// Free-form part tag (signature, date, name, ...).
        part: String,
    },
    /// `Title=true`: the cell's displayed text is the template title.
    Title,
}

/// Split a comment into `(key, value)` pairs.
///
/// Keys are trimmed; values keep interior whitespace but are trimmed at the
/// ends. Lines that do not carry a separator or whose key is empty vanish.
pub fn parse_pairs(comment: &str) -> Vec<(String, String)> {
    comment
        .lines()
        .filter_map(|line| {
            let eq = line.find('=');
            let colon = line.find(':');
            let idx = match (eq, colon) {
                (Some(e), Some(c)) => e.min(c),
                (Some(e), None) => e,
                (None, Some(c)) => c,
                (None, None) => return None,
            };
            let key = line[..idx].trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), line[idx + 1..].trim().to_string()))
        })
        .collect()
}

/// Parse a full comment into directives.
///
/// Tag combinations are evaluated independently; a comment tagging both a
/// field and an approval slot emits both directives. Malformed tags are
/// silently dropped, never an error.
pub fn parse_comment(comment: &str) -> Vec<Directive> {
    let pairs = parse_pairs(comment);
    let lookup = |wanted: &str| -> Option<&str> {
        pairs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(wanted))
            .map(|(_, v)| v.as_str())
    };

    let mut directives = Vec::new();

    if let Some(key) = lookup("Field").filter(|k| !k.is_empty()) {
        let ty = lookup("Type").and_then(FieldType::infer);
        directives.push(Directive::Field {
            key: key.to_string(),
            ty,
        });
    }

    if let (Some(slot), Some(part)) = (lookup("Approval"), lookup("Part")) {
        if let Ok(slot) = slot.trim().parse::<u32>() {
            if !part.is_empty() {
                directives.push(Directive::Approval {
                    slot,
                    part: part.to_string(),
                });
            }
        }
    }

    if let Some(shorthand) = lookup("ApprovalKey") {
        if let Some(caps) = approval_key_re().captures(shorthand.trim()) {
            if let Some(slot) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) {
                if let Some(part) = caps.get(2) {
                    directives.push(Directive::Approval {
                        slot,
                        part: part.as_str().to_string(),
                    });
                }
            }
        }
    }

    if lookup("Title").map_or(false, |v| v.eq_ignore_ascii_case("true")) {
        directives.push(Directive::Title);
    }

    directives
}

// ============================================================================
// Tests
// ============================================================================
