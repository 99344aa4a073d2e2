//! User context with a finite set of grants
//!
//! A user context belongs to one user in one group. Besides the permissions
//! it is given, it always grants that user's identity permission and that
//! group's identity permission. Contexts are immutable: `grant`, `revoke`
//! and `with_permissions` return a new context for the same user and group.

use latch_permission::{Permission, PermissionError, PermissionSet, PermissionTemplates};
use std::sync::Arc;
use tracing::debug;

use crate::context::SecurityContext;
use crate::error::{ContextError, ContextResult, IdentityKind};

/// Security context for a single user.
///
/// # Examples
///
/// ```
/// use latch_context::{SecurityContext, UserContext};
/// use latch_permission::Permission;
///
/// let ctx = UserContext::new("alice", "staff").unwrap();
/// assert!(ctx.test(&Permission::user("alice").unwrap()));
/// assert!(ctx.test(&Permission::group("staff").unwrap()));
///
/// let select = Permission::new("select").unwrap();
/// assert!(!ctx.test(&select));
///
/// let granted = ctx.grant([select.clone()]).unwrap();
/// assert!(granted.test(&select));
/// assert!(!ctx.test(&select));
/// ```
#[derive(Debug, Clone)]
pub struct UserContext {
    /// Trimmed user id
    user_id: String,

    /// Trimmed group id
    group_id: String,

    /// Derived from `user_id`
    user_permission: Permission,

    /// Derived from `group_id`
    group_permission: Permission,

    /// Effective grants, always including both identity permissions
    permissions: PermissionSet,

    /// Templates the identity permissions were built with
    templates: Arc<PermissionTemplates>,
}

impl UserContext {
    /// Creates a context with only the identity permissions.
    ///
    /// # Errors
    ///
    /// Fails if either id is blank.
    pub fn new(user_id: impl AsRef<str>, group_id: impl AsRef<str>) -> ContextResult<Self> {
        Self::create(user_id, group_id, PermissionSet::new())
    }

    /// Creates a context granting `permissions` plus the identity
    /// permissions, using the process-wide templates.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user this context acts for (trimmed)
    /// * `group_id` - The user's group (trimmed)
    /// * `permissions` - Explicit grants: a `PermissionSet`, a `&PermissionSet`,
    ///   or any collection of permissions
    ///
    /// # Returns
    ///
    /// A context granting `permissions`, the user permission for `user_id`
    /// and the group permission for `group_id`
    ///
    /// # Errors
    ///
    /// - [`ContextError::InvalidIdentity`] if either id is blank.
    /// - [`ContextError::IdentityConflict`] if `permissions` contains a user
    ///   or group identity permission for a different user or group.
    ///
    /// # Examples
    ///
    /// ```
    /// use latch_context::{ContextError, UserContext};
    /// use latch_permission::Permission;
    ///
    /// let other = Permission::user("mallory").unwrap();
    /// let err = UserContext::create("alice", "staff", [other]).unwrap_err();
    /// assert!(matches!(err, ContextError::IdentityConflict { .. }));
    /// ```
    pub fn create<I>(user_id: impl AsRef<str>, group_id: impl AsRef<str>, permissions: I) -> ContextResult<Self>
    where
        I: IntoIterator,
        PermissionSet: FromIterator<I::Item>,
    {
        Self::create_with_templates(PermissionTemplates::global().clone(), user_id, group_id, permissions)
    }

    /// Same as [`create`](Self::create), with explicitly supplied templates.
    ///
    /// # Errors
    ///
    /// See [`create`](Self::create).
    pub fn create_with_templates<I>(
        templates: Arc<PermissionTemplates>,
        user_id: impl AsRef<str>,
        group_id: impl AsRef<str>,
        permissions: I,
    ) -> ContextResult<Self>
    where
        I: IntoIterator,
        PermissionSet: FromIterator<I::Item>,
    {
        let user_id = identity("user id", user_id.as_ref())?;
        let group_id = identity("group id", group_id.as_ref())?;
        Self::build(templates, user_id, group_id, permissions.into_iter().collect())
    }

    /// Validate `permissions` against the identity and add the identity
    /// permissions.
    fn build(
        templates: Arc<PermissionTemplates>,
        user_id: String,
        group_id: String,
        permissions: PermissionSet,
    ) -> ContextResult<Self> {
        for permission in &permissions {
            if let Some(found) = templates.match_user(permission) {
                check_identity(IdentityKind::User, &user_id, found)?;
            }
            if let Some(found) = templates.match_group(permission) {
                check_identity(IdentityKind::Group, &group_id, found)?;
            }
        }

        let user_permission = templates.user(&user_id)?;
        let group_permission = templates.group(&group_id)?;

        Ok(Self::assemble(
            templates,
            user_id,
            group_id,
            user_permission,
            group_permission,
            permissions,
        ))
    }

    /// Same identity and templates, different grants.
    fn rebuild(&self, permissions: PermissionSet) -> ContextResult<Self> {
        Self::build(
            self.templates.clone(),
            self.user_id.clone(),
            self.group_id.clone(),
            permissions,
        )
    }

    fn assemble(
        templates: Arc<PermissionTemplates>,
        user_id: String,
        group_id: String,
        user_permission: Permission,
        group_permission: Permission,
        mut permissions: PermissionSet,
    ) -> Self {
        permissions.insert(user_permission.clone());
        permissions.insert(group_permission.clone());

        Self {
            user_id,
            group_id,
            user_permission,
            group_permission,
            permissions,
            templates,
        }
    }

    /// The user id.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The group id.
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// The user's identity permission.
    pub fn user_permission(&self) -> &Permission {
        &self.user_permission
    }

    /// The group's identity permission.
    pub fn group_permission(&self) -> &Permission {
        &self.group_permission
    }

    /// Every granted permission, identity permissions included.
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// A context for the same user and group granting `permissions`
    /// instead.
    ///
    /// The identity permissions are added back, so they cannot be dropped
    /// this way.
    ///
    /// # Errors
    ///
    /// Fails with [`ContextError::IdentityConflict`] if `permissions`
    /// contains another user's or group's identity permission.
    pub fn with_permissions<I>(&self, permissions: I) -> ContextResult<Self>
    where
        I: IntoIterator,
        PermissionSet: FromIterator<I::Item>,
    {
        self.rebuild(permissions.into_iter().collect())
    }

    /// A context granting everything this one does plus `permissions`.
    ///
    /// # Errors
    ///
    /// Fails with [`ContextError::IdentityConflict`] if `permissions`
    /// contains another user's or group's identity permission.
    pub fn grant<I>(&self, permissions: I) -> ContextResult<Self>
    where
        I: IntoIterator,
        PermissionSet: FromIterator<I::Item>,
    {
        let added: PermissionSet = permissions.into_iter().collect();
        self.rebuild(self.permissions.union(&added))
    }

    /// A context granting everything this one does except `permissions`.
    ///
    /// The identity permissions are always restored, so revoking them has no
    /// effect.
    pub fn revoke<I>(&self, permissions: I) -> Self
    where
        I: IntoIterator,
        PermissionSet: FromIterator<I::Item>,
    {
        let removed: PermissionSet = permissions.into_iter().collect();

        // A subset of validated grants cannot conflict.
        Self::assemble(
            self.templates.clone(),
            self.user_id.clone(),
            self.group_id.clone(),
            self.user_permission.clone(),
            self.group_permission.clone(),
            self.permissions.difference(&removed),
        )
    }
}

impl SecurityContext for UserContext {
    fn test(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }
}

impl PartialEq for UserContext {
    fn eq(&self, other: &Self) -> bool {
        self.user_id == other.user_id && self.group_id == other.group_id && self.permissions == other.permissions
    }
}

impl Eq for UserContext {}

fn identity(field: &'static str, value: &str) -> ContextResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PermissionError::InvalidArgument(field).into());
    }
    Ok(trimmed.to_string())
}

fn check_identity(kind: IdentityKind, expected: &str, found: &str) -> ContextResult<()> {
    if found == expected {
        return Ok(());
    }
    debug!(kind = %kind, expected = %expected, found = %found, "Rejected conflicting identity permission");
    Err(ContextError::IdentityConflict {
        kind,
        expected: expected.to_string(),
        found: found.to_string(),
    })
}
