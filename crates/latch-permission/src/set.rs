//! # Permission Sets
//!
//! Ordered, deduplicated collections of permissions. Ordering is by name so
//! iteration and display are deterministic.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt;

use crate::error::PermissionResult;
use crate::permission::Permission;

/// A set of permissions.
///
/// Serializes as a list of permission names.
///
/// # Example
///
/// ```
/// use latch_permission::{Permission, PermissionSet};
///
/// let mut set = PermissionSet::new();
/// set.insert(Permission::new("select").unwrap());
/// set.insert(Permission::new("update").unwrap());
///
/// assert!(set.contains("select"));
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.to_string(), "[select, update]");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet {
    permissions: BTreeSet<Permission>,
}

impl PermissionSet {
    /// Create a new empty permission set.
    pub fn new() -> Self {
        Self {
            permissions: BTreeSet::new(),
        }
    }

    /// Create from permission names.
    ///
    /// # Errors
    ///
    /// Fails on the first blank name.
    pub fn from_names<I, S>(names: I) -> PermissionResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Permission::set(names)
    }

    /// Add a permission to the set.
    ///
    /// Returns `true` if it was not already present.
    pub fn insert(&mut self, permission: Permission) -> bool {
        self.permissions.insert(permission)
    }

    /// Remove a permission from the set.
    ///
    /// Returns `true` if the permission was present.
    pub fn remove<Q>(&mut self, permission: &Q) -> bool
    where
        Permission: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.permissions.remove(permission)
    }

    /// Check membership, either by permission or by name.
    pub fn contains<Q>(&self, permission: &Q) -> bool
    where
        Permission: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.permissions.contains(permission)
    }

    /// All permissions in either set.
    pub fn union(&self, other: &PermissionSet) -> PermissionSet {
        self.permissions.union(&other.permissions).cloned().collect()
    }

    /// Permissions in this set but not in `other`.
    pub fn difference(&self, other: &PermissionSet) -> PermissionSet {
        self.permissions.difference(&other.permissions).cloned().collect()
    }

    /// Iterate in name order.
    pub fn iter(&self) -> btree_set::Iter<'_, Permission> {
        self.permissions.iter()
    }

    /// Get the count of permissions.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self {
            permissions: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = &'a Permission>>(iter: T) -> Self {
        iter.into_iter().cloned().collect()
    }
}

impl Extend<Permission> for PermissionSet {
    fn extend<T: IntoIterator<Item = Permission>>(&mut self, iter: T) {
        self.permissions.extend(iter);
    }
}

impl From<Permission> for PermissionSet {
    fn from(permission: Permission) -> Self {
        std::iter::once(permission).collect()
    }
}

impl<const N: usize> From<[Permission; N]> for PermissionSet {
    fn from(permissions: [Permission; N]) -> Self {
        permissions.into_iter().collect()
    }
}

impl IntoIterator for PermissionSet {
    type Item = Permission;
    type IntoIter = btree_set::IntoIter<Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.permissions.into_iter()
    }
}

impl<'a> IntoIterator for &'a PermissionSet {
    type Item = &'a Permission;
    type IntoIter = btree_set::Iter<'a, Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.permissions.iter()
    }
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, permission) in self.permissions.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", permission)?;
        }
        f.write_str("]")
    }
}
