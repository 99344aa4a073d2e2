//! Template configuration for identity permissions.
//!
//! The user and group templates are process-wide settings. They are read
//! from environment variables the first time an identity permission is
//! built or recognized, and are fixed from then on. A configured template
//! that does not contain exactly one `{id}` placeholder is replaced by the
//! built-in default.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

use crate::error::PermissionResult;
use crate::permission::{Permission, PermissionKind};
use crate::template::{PermissionTemplate, DEFAULT_GROUP_TEMPLATE, DEFAULT_USER_TEMPLATE};

/// Environment variable holding the user permission template.
pub const USER_TEMPLATE_ENV: &str = "LATCH_USER_PERMISSION_TEMPLATE";

/// Environment variable holding the group permission template.
pub const GROUP_TEMPLATE_ENV: &str = "LATCH_GROUP_PERMISSION_TEMPLATE";

/// Process-wide templates, resolved at most once.
static GLOBAL_TEMPLATES: OnceLock<Arc<PermissionTemplates>> = OnceLock::new();

/// Raw template settings, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Template for user identity permissions.
    pub user_template: String,

    /// Template for group identity permissions.
    pub group_template: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            user_template: DEFAULT_USER_TEMPLATE.to_string(),
            group_template: DEFAULT_GROUP_TEMPLATE.to_string(),
        }
    }
}

impl TemplateConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `LATCH_USER_PERMISSION_TEMPLATE`: user template (default: `<user=({id})>`)
    /// - `LATCH_GROUP_PERMISSION_TEMPLATE`: group template (default: `<group=({id})>`)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        Self {
            user_template: lookup(USER_TEMPLATE_ENV).unwrap_or(default.user_template),
            group_template: lookup(GROUP_TEMPLATE_ENV).unwrap_or(default.group_template),
        }
    }

    /// Validate both templates, substituting the default for any that is
    /// malformed.
    pub fn resolve(&self) -> PermissionTemplates {
        let templates = PermissionTemplates {
            user: resolve_one(USER_TEMPLATE_ENV, &self.user_template, PermissionTemplate::default_user),
            group: resolve_one(GROUP_TEMPLATE_ENV, &self.group_template, PermissionTemplate::default_group),
        };
        debug!(
            user_template = %templates.user,
            group_template = %templates.group,
            "Resolved identity permission templates"
        );
        templates
    }
}

fn resolve_one(setting: &str, raw: &str, default: fn() -> PermissionTemplate) -> PermissionTemplate {
    match PermissionTemplate::parse(raw) {
        Ok(template) => template,
        Err(e) => {
            warn!(setting = %setting, error = %e, "Rejected permission template, using default");
            default()
        }
    }
}

/// The validated user and group templates.
///
/// Most callers go through [`Permission::user`] and friends, which use
/// [`PermissionTemplates::global`]. Hosts that prefer to inject
/// configuration can build a value directly and call the methods here.
///
/// # Example
///
/// ```
/// use latch_permission::{PermissionTemplates, TemplateConfig};
///
/// let templates = TemplateConfig {
///     user_template: "u:{id}".to_string(),
///     group_template: "g:{id}".to_string(),
/// }
/// .resolve();
///
/// let perm = templates.user("alice").unwrap();
/// assert_eq!(perm.name(), "u:alice");
/// assert_eq!(templates.match_user(&perm), Some("alice"));
/// assert_eq!(templates.match_group(&perm), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionTemplates {
    user: PermissionTemplate,
    group: PermissionTemplate,
}

impl Default for PermissionTemplates {
    fn default() -> Self {
        Self {
            user: PermissionTemplate::default_user(),
            group: PermissionTemplate::default_group(),
        }
    }
}

impl PermissionTemplates {
    /// Build from already parsed templates.
    pub fn new(user: PermissionTemplate, group: PermissionTemplate) -> Self {
        Self { user, group }
    }

    /// The process-wide templates.
    ///
    /// Resolved from the environment on first use unless
    /// [`install`](Self::install) ran earlier.
    pub fn global() -> &'static Arc<PermissionTemplates> {
        GLOBAL_TEMPLATES.get_or_init(|| Arc::new(TemplateConfig::from_env().resolve()))
    }

    /// Fix the process-wide templates.
    ///
    /// Must run before anything builds or recognizes an identity
    /// permission. If the templates were already resolved, they stay as they
    /// are and `templates` is handed back.
    pub fn install(templates: PermissionTemplates) -> Result<(), PermissionTemplates> {
        GLOBAL_TEMPLATES
            .set(Arc::new(templates))
            .map_err(|rejected| Arc::try_unwrap(rejected).unwrap_or_else(|shared| (*shared).clone()))
    }

    /// The user template.
    pub fn user_template(&self) -> &PermissionTemplate {
        &self.user
    }

    /// The group template.
    pub fn group_template(&self) -> &PermissionTemplate {
        &self.group
    }

    /// Create the user identity permission for `user_id`.
    ///
    /// # Errors
    ///
    /// Fails if the id is blank.
    pub fn user(&self, user_id: impl AsRef<str>) -> PermissionResult<Permission> {
        self.user.render(user_id.as_ref()).map(Permission::from_trimmed)
    }

    /// Create the group identity permission for `group_id`.
    ///
    /// # Errors
    ///
    /// Fails if the id is blank.
    pub fn group(&self, group_id: impl AsRef<str>) -> PermissionResult<Permission> {
        self.group.render(group_id.as_ref()).map(Permission::from_trimmed)
    }

    /// The user id encoded in `permission`, if any.
    pub fn match_user<'p>(&self, permission: &'p Permission) -> Option<&'p str> {
        self.user.capture(permission.name())
    }

    /// The group id encoded in `permission`, if any.
    pub fn match_group<'p>(&self, permission: &'p Permission) -> Option<&'p str> {
        self.group.capture(permission.name())
    }

    /// Classify `permission`, trying the user template before the group
    /// template.
    pub fn kind<'p>(&self, permission: &'p Permission) -> PermissionKind<'p> {
        if let Some(id) = self.match_user(permission) {
            PermissionKind::User(id)
        } else if let Some(id) = self.match_group(permission) {
            PermissionKind::Group(id)
        } else {
            PermissionKind::Named(permission.name())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = TemplateConfig::default();
        assert_eq!(config.user_template, DEFAULT_USER_TEMPLATE);
        assert_eq!(config.group_template, DEFAULT_GROUP_TEMPLATE);
        assert_eq!(config.resolve(), PermissionTemplates::default());
    }

    #[test]
    fn test_from_lookup_missing_keys_use_defaults() {
        let config = TemplateConfig::from_lookup(lookup(&[]));
        assert_eq!(config, TemplateConfig::default());
    }

    #[test]
    fn test_from_lookup_reads_settings() {
        let config = TemplateConfig::from_lookup(lookup(&[
            (USER_TEMPLATE_ENV, "acct/{id}"),
            (GROUP_TEMPLATE_ENV, "team/{id}"),
        ]));
        let templates = config.resolve();
        assert_eq!(templates.user_template().source(), "acct/{id}");
        assert_eq!(templates.group_template().source(), "team/{id}");
    }

    #[test]
    fn test_resolve_rejects_malformed_templates() {
        let config = TemplateConfig {
            user_template: "no placeholder".to_string(),
            group_template: "{id}{id}".to_string(),
        };
        let templates = config.resolve();
        assert_eq!(templates.user_template().source(), DEFAULT_USER_TEMPLATE);
        assert_eq!(templates.group_template().source(), DEFAULT_GROUP_TEMPLATE);
    }

    #[test]
    fn test_resolve_templates_independently() {
        let config = TemplateConfig {
            user_template: "acct/{id}".to_string(),
            group_template: "broken".to_string(),
        };
        let templates = config.resolve();
        assert_eq!(templates.user_template().source(), "acct/{id}");
        assert_eq!(templates.group_template().source(), DEFAULT_GROUP_TEMPLATE);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: TemplateConfig = serde_json::from_str(r#"{"group_template": "team/{id}"}"#).unwrap();
        assert_eq!(config.user_template, DEFAULT_USER_TEMPLATE);
        assert_eq!(config.group_template, "team/{id}");
    }

    #[test]
    fn test_injected_templates() {
        let templates = TemplateConfig {
            user_template: "acct/{id}".to_string(),
            group_template: "team/{id}".to_string(),
        }
        .resolve();

        let user = templates.user(" carol ").unwrap();
        assert_eq!(user.name(), "acct/carol");
        assert_eq!(templates.match_user(&user), Some("carol"));
        assert_eq!(templates.match_group(&user), None);
        assert_eq!(templates.kind(&user), PermissionKind::User("carol"));

        let group = templates.group("ops").unwrap();
        assert_eq!(templates.kind(&group), PermissionKind::Group("ops"));

        let plain = Permission::new("acct").unwrap();
        assert_eq!(templates.kind(&plain), PermissionKind::Named("acct"));
    }

    #[test]
    fn test_cross_template_non_match() {
        let templates = PermissionTemplates::default();
        let user = templates.user("x").unwrap();
        let group = templates.group("x").unwrap();
        assert_eq!(templates.match_group(&user), None);
        assert_eq!(templates.match_user(&group), None);
    }

    #[test]
    fn test_install_after_resolution_is_rejected() {
        let current = PermissionTemplates::global().clone();
        let replacement = TemplateConfig {
            user_template: "other/{id}".to_string(),
            group_template: "other-group/{id}".to_string(),
        }
        .resolve();

        let rejected = PermissionTemplates::install(replacement.clone()).unwrap_err();
        assert_eq!(rejected, replacement);
        assert_eq!(PermissionTemplates::global(), &current);
    }
}
