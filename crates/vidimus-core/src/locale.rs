//! Localized message catalog for derived display text.
//!
//! The board composes one-line result summaries ("Kim Minsu, Team Lead, has
//! approved") from a verb category plus an actor. Phrase templates live here,
//! keyed by `(message key, UI language)`, with `{name}` and `{position}`
//! placeholders. A missing key or language yields `None`; callers fall back
//! to bare `"{name} {position}"` composition.

use std::collections::HashMap;

/// Catalog of localized format templates.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    templates: HashMap<(String, String), String>,
}

impl MessageCatalog {
    /// An empty catalog (every lookup misses).
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in catalog carrying `en` and `ko` summary phrases.
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        for (key, lang, template) in [
            ("summary.recalled", "en", "{name} {position} has recalled the document"),
            ("summary.pending", "en", "Awaiting approval by {name} {position}"),
            ("summary.rejected", "en", "{name} {position} has rejected the document"),
            ("summary.onhold", "en", "{name} {position} has put the document on hold"),
            ("summary.approved", "en", "{name} {position} has approved the document"),
            ("summary.recalled", "ko", "{name} {position} 회수"),
            ("summary.pending", "ko", "{name} {position} 결재 대기"),
            ("summary.rejected", "ko", "{name} {position} 반려"),
            ("summary.onhold", "ko", "{name} {position} 보류"),
            ("summary.approved", "ko", "{name} {position} 승인"),
        ] {
            catalog.insert(key, lang, template);
        }
        catalog
    }

    /// Register a template for a key and language.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        lang: impl Into<String>,
        template: impl Into<String>,
    ) {
        self.templates
            .insert((key.into(), lang.into()), template.into());
    }

    /// Look up the raw template for a key and language.
    pub fn template(&self, key: &str, lang: &str) -> Option<&str> {
        self.templates
            .get(&(key.to_string(), lang.to_string()))
            .map(String::as_str)
    }

    /// Render a template with actor name and position substituted.
    ///
    /// Returns `None` when no template exists for the key/language pair.
    /// Leftover whitespace from empty substitutions is collapsed.
    ///
    /// # Examples
    ///
    /// ```
    /// use vidimus_core::locale::MessageCatalog;
    ///
    /// let catalog = MessageCatalog::builtin();
    /// let line = catalog.render("summary.approved", "en", "Kim Minsu", "Team Lead");
    /// assert_eq!(line.as_deref(), Some("Kim Minsu Team Lead has approved the document"));
    /// ```
    pub fn render(&self, key: &str, lang: &str, name: &str, position: &str) -> Option<String> {
        let template = self.template(key, lang)?;
        let rendered = template
            .replace("{name}", name)
            .replace("{position}", position);
        Some(collapse_spaces(&rendered))
    }
}

/// Collapse runs of spaces left behind by empty placeholder substitutions.
fn collapse_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_both_languages() {
        let catalog = MessageCatalog::builtin();
        assert!(catalog.template("summary.approved", "en").is_some());
        assert!(catalog.template("summary.approved", "ko").is_some());
        assert!(catalog.template("summary.approved", "ja").is_none());
    }

    #[test]
    fn test_render_substitutes_placeholders() {
        let catalog = MessageCatalog::builtin();
        let line = catalog
            .render("summary.rejected", "en", "Lee Jiwon", "Director")
            .unwrap();
        assert_eq!(line, "Lee Jiwon Director has rejected the document");
    }

    #[test]
    fn test_render_collapses_empty_parts() {
        let catalog = MessageCatalog::builtin();
        let line = catalog.render("summary.pending", "en", "Park", "").unwrap();
        assert_eq!(line, "Awaiting approval by Park");
    }

    #[test]
    fn test_render_missing_key_is_none() {
        let catalog = MessageCatalog::empty();
        assert!(catalog.render("summary.approved", "en", "a", "b").is_none());
    }

    #[test]
    fn test_insert_overrides() {
        let mut catalog = MessageCatalog::builtin();
        catalog.insert("summary.approved", "en", "{position} {name}: approved");
        let line = catalog
            .render("summary.approved", "en", "Kim", "CEO")
            .unwrap();
        assert_eq!(line, "CEO Kim: approved");
    }
}
