//! # Permission Templates
//!
//! Identity permissions are ordinary permissions whose names follow a
//! template. A template is a string with exactly one `{id}` placeholder:
//!
//! ```text
//! Template:  <user=({id})>
//! Render:    id "alice"            -> "<user=(alice)>"
//! Match:     "<user=(alice)>"      -> Some("alice")
//!            "document:read"       -> None
//! ```
//!
//! Rendering substitutes the placeholder. Matching escapes the literal text
//! on either side of the placeholder and captures whatever sits between
//! them, anchored at both ends, so that matching always inverts rendering.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::error::{require_trimmed, PermissionError, PermissionResult};

/// Placeholder token marking where the identifier goes.
pub const PLACEHOLDER: &str = "{id}";

/// Built-in template for user identity permissions.
pub const DEFAULT_USER_TEMPLATE: &str = "<user=({id})>";

/// Built-in template for group identity permissions.
pub const DEFAULT_GROUP_TEMPLATE: &str = "<group=({id})>";

static BUILTIN_USER: OnceLock<PermissionTemplate> = OnceLock::new();
static BUILTIN_GROUP: OnceLock<PermissionTemplate> = OnceLock::new();

/// A parsed identity template.
///
/// # Example
///
/// ```
/// use latch_permission::PermissionTemplate;
///
/// let template = PermissionTemplate::parse("tenant:{id}:member").unwrap();
/// let name = template.render("acme").unwrap();
/// assert_eq!(name, "tenant:acme:member");
/// assert_eq!(template.capture(&name), Some("acme"));
/// assert_eq!(template.capture("tenant:acme:owner"), None);
/// ```
#[derive(Debug, Clone)]
pub struct PermissionTemplate {
    /// The trimmed template text.
    source: String,
    /// Literal text before the placeholder.
    prefix: String,
    /// Literal text after the placeholder.
    suffix: String,
    /// Anchored matcher capturing the identifier.
    pattern: Regex,
}

impl PermissionTemplate {
    /// Parse a template.
    ///
    /// The template is trimmed and must contain the `{id}` placeholder
    /// exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::InvalidTemplate`] if the placeholder is
    /// missing or repeated.
    pub fn parse(template: &str) -> PermissionResult<Self> {
        let source = template.trim();
        let invalid = || PermissionError::InvalidTemplate {
            template: source.to_string(),
            placeholder: PLACEHOLDER,
        };

        let mut segments = source.split(PLACEHOLDER);
        let (prefix, suffix) = match (segments.next(), segments.next(), segments.next()) {
            (Some(prefix), Some(suffix), None) => (prefix, suffix),
            _ => return Err(invalid()),
        };

        // (?s) so identifiers spanning lines still match
        let pattern = Regex::new(&format!(
            "(?s)^{}(.+?){}$",
            regex::escape(prefix),
            regex::escape(suffix)
        ))
        .map_err(|_| invalid())?;

        Ok(Self {
            source: source.to_string(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            pattern,
        })
    }

    /// The built-in user template.
    pub fn default_user() -> Self {
        Self::builtin(&BUILTIN_USER, DEFAULT_USER_TEMPLATE)
    }

    /// The built-in group template.
    pub fn default_group() -> Self {
        Self::builtin(&BUILTIN_GROUP, DEFAULT_GROUP_TEMPLATE)
    }

    fn builtin(cell: &'static OnceLock<Self>, source: &'static str) -> Self {
        // Both constants hold exactly one placeholder; see test_builtin_templates_parse.
        cell.get_or_init(|| Self::parse(source).expect("built-in permission template is well formed"))
            .clone()
    }

    /// The template text this was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render a permission name for `id`.
    ///
    /// The identifier is trimmed before substitution.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::InvalidArgument`] if `id` is blank.
    pub fn render(&self, id: &str) -> PermissionResult<String> {
        let id = require_trimmed("identifier", id)?;
        Ok(format!("{}{}{}", self.prefix, id, self.suffix))
    }

    /// Recover the identifier from a permission name.
    ///
    /// Returns `None` unless the whole name matches the template with a
    /// non-empty identifier. The identifier is returned exactly as it
    /// appears in the name.
    pub fn capture<'a>(&self, name: &'a str) -> Option<&'a str> {
        Some(self.pattern.captures(name)?.get(1)?.as_str())
    }
}

impl PartialEq for PermissionTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for PermissionTemplate {}

impl fmt::Display for PermissionTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_templates() {
        let user = PermissionTemplate::default_user();
        assert_eq!(user.source(), DEFAULT_USER_TEMPLATE);
        assert_eq!(user.render("alice").unwrap(), "<user=(alice)>");

        let group = PermissionTemplate::default_group();
        assert_eq!(group.render("admins").unwrap(), "<group=(admins)>");
    }

    #[test]
    fn test_builtin_templates_parse() {
        for source in [DEFAULT_USER_TEMPLATE, DEFAULT_GROUP_TEMPLATE] {
            let template = PermissionTemplate::parse(source).unwrap();
            assert_eq!(template.source(), source);
        }
        assert_eq!(PermissionTemplate::default_user(), PermissionTemplate::default_user());
        assert_ne!(PermissionTemplate::default_user(), PermissionTemplate::default_group());
    }

    #[test]
    fn test_parse_trims_template() {
        let template = PermissionTemplate::parse("  [member {id}]  ").unwrap();
        assert_eq!(template.source(), "[member {id}]");
        assert_eq!(template.render(" bob ").unwrap(), "[member bob]");
    }

    #[test]
    fn test_parse_rejects_missing_placeholder() {
        let err = PermissionTemplate::parse("<user=()>").unwrap_err();
        assert!(matches!(err, PermissionError::InvalidTemplate { .. }));
    }

    #[test]
    fn test_parse_rejects_repeated_placeholder() {
        let err = PermissionTemplate::parse("{id}:{id}").unwrap_err();
        assert_eq!(
            err,
            PermissionError::InvalidTemplate {
                template: "{id}:{id}".to_string(),
                placeholder: PLACEHOLDER,
            }
        );
    }

    #[test]
    fn test_render_rejects_blank_id() {
        let template = PermissionTemplate::default_user();
        assert_eq!(
            template.render("   "),
            Err(PermissionError::InvalidArgument("identifier"))
        );
    }

    #[test]
    fn test_capture_is_anchored() {
        let template = PermissionTemplate::default_user();
        assert_eq!(template.capture("<user=(alice)>"), Some("alice"));
        assert_eq!(template.capture("x<user=(alice)>"), None);
        assert_eq!(template.capture("<user=(alice)>x"), None);
        assert_eq!(template.capture("<user=()>"), None);
        assert_eq!(template.capture("<user=(  )>"), Some("  "));
        assert_eq!(template.capture("<user=( alice )>"), Some(" alice "));
        assert_eq!(template.capture("document:read"), None);
    }

    #[test]
    fn test_capture_escapes_metacharacters() {
        let template = PermissionTemplate::parse("^(.*)+{id}[$]").unwrap();
        let name = template.render("a.b").unwrap();
        assert_eq!(name, "^(.*)+a.b[$]");
        assert_eq!(template.capture(&name), Some("a.b"));
        assert_eq!(template.capture("^(.*)+a.b[x]"), None);
    }

    #[test]
    fn test_capture_inverts_render_for_awkward_ids() {
        let template = PermissionTemplate::default_user();
        for id in ["a)>b", "<user=(nested)>", "multi\nline", "with space", "(.+?)"] {
            let name = template.render(id).unwrap();
            assert_eq!(template.capture(&name), Some(id), "id {id:?}");
        }
    }

    #[test]
    fn test_placeholder_only_template_matches_everything() {
        let template = PermissionTemplate::parse("{id}").unwrap();
        assert_eq!(template.capture("anything"), Some("anything"));
    }
}
