//! # Permissions
//!
//! A permission is a named capability. Its trimmed name is its only
//! identity: two permissions are equal exactly when their names are.
//!
//! User and group identity permissions are not separate types. They are
//! permissions whose names follow the configured templates, and are
//! recognized by matching the name against those templates.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::config::PermissionTemplates;
use crate::error::{require_trimmed, PermissionError, PermissionResult};
use crate::set::PermissionSet;

/// A named capability.
///
/// # Example
///
/// ```
/// use latch_permission::Permission;
///
/// let perm = Permission::new("  document:read ").unwrap();
/// assert_eq!(perm.name(), "document:read");
/// assert_eq!(perm, Permission::new("document:read").unwrap());
///
/// assert!(Permission::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Option<String>", into = "String")]
pub struct Permission {
    name: String,
}

/// The decomposed form of a permission.
///
/// Returned by [`Permission::kind`] so callers can `match` on identity
/// permissions directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionKind<'a> {
    /// A user identity permission carrying the user id.
    User(&'a str),
    /// A group identity permission carrying the group id.
    Group(&'a str),
    /// Any other permission, carrying its name.
    Named(&'a str),
}

impl Permission {
    /// Create a permission from a name.
    ///
    /// # Arguments
    ///
    /// * `name` - The permission name; surrounding whitespace is trimmed
    ///
    /// # Returns
    ///
    /// The permission whose name is the trimmed `name`.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::InvalidArgument`] if the name is blank.
    pub fn new(name: impl AsRef<str>) -> PermissionResult<Self> {
        let name = require_trimmed("permission name", name.as_ref())?;
        Ok(Self {
            name: name.to_string(),
        })
    }

    /// Create a permission from a name that may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::MissingInput`] for `None` and
    /// [`PermissionError::InvalidArgument`] for a blank name.
    pub fn from_optional(name: Option<&str>) -> PermissionResult<Self> {
        match name {
            Some(name) => Self::new(name),
            None => Err(PermissionError::MissingInput("permission name")),
        }
    }

    /// Create a set of permissions, one per distinct trimmed name.
    ///
    /// # Errors
    ///
    /// Fails on the first blank name.
    ///
    /// # Example
    ///
    /// ```
    /// use latch_permission::Permission;
    ///
    /// let set = Permission::set(["select", "select ", "update"]).unwrap();
    /// assert_eq!(set.len(), 2);
    /// assert!(set.contains("update"));
    /// ```
    pub fn set<I, S>(names: I) -> PermissionResult<PermissionSet>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().map(Self::new).collect()
    }

    /// Create the user identity permission for `user_id`.
    ///
    /// Uses the process-wide templates (see [`PermissionTemplates::global`]).
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user identifier; surrounding whitespace is trimmed
    ///
    /// # Returns
    ///
    /// The permission named by rendering the user template with `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::InvalidArgument`] if the id is blank.
    ///
    /// # Example
    ///
    /// ```
    /// use latch_permission::Permission;
    ///
    /// let perm = Permission::user(" alice ").unwrap();
    /// assert_eq!(perm.as_user(), Some("alice"));
    /// assert_eq!(perm.as_group(), None);
    /// ```
    pub fn user(user_id: impl AsRef<str>) -> PermissionResult<Self> {
        PermissionTemplates::global().user(user_id)
    }

    /// Create the group identity permission for `group_id`.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::InvalidArgument`] if the id is blank.
    pub fn group(group_id: impl AsRef<str>) -> PermissionResult<Self> {
        PermissionTemplates::global().group(group_id)
    }

    /// Build from an already validated, already trimmed name.
    pub(crate) fn from_trimmed(name: String) -> Self {
        Self { name }
    }

    /// The permission name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decompose into the permission name.
    ///
    /// Always returns `Some`.
    pub fn decompose(&self) -> Option<&str> {
        Some(&self.name)
    }

    /// The user id, if this is a user identity permission.
    pub fn as_user(&self) -> Option<&str> {
        PermissionTemplates::global().match_user(self)
    }

    /// The group id, if this is a group identity permission.
    pub fn as_group(&self) -> Option<&str> {
        PermissionTemplates::global().match_group(self)
    }

    /// Classify against the process-wide templates.
    ///
    /// # Example
    ///
    /// ```
    /// use latch_permission::{Permission, PermissionKind};
    ///
    /// let perm = Permission::group("admins").unwrap();
    /// match perm.kind() {
    ///     PermissionKind::Group(id) => assert_eq!(id, "admins"),
    ///     other => panic!("unexpected {other:?}"),
    /// }
    /// ```
    pub fn kind(&self) -> PermissionKind<'_> {
        PermissionTemplates::global().kind(self)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl FromStr for Permission {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Permission {
    type Error = PermissionError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl TryFrom<Option<String>> for Permission {
    type Error = PermissionError;

    fn try_from(name: Option<String>) -> Result<Self, Self::Error> {
        Self::from_optional(name.as_deref())
    }
}

impl From<Permission> for String {
    fn from(permission: Permission) -> Self {
        permission.name
    }
}

impl AsRef<str> for Permission {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

// Eq, Ord and Hash all derive from the name alone, so borrowing as the
// name is consistent with them.
impl Borrow<str> for Permission {
    fn borrow(&self) -> &str {
        &self.name
    }
}
