//! Error types for security contexts
//!
//! Two families live here. [`ContextError`] covers building a user context.
//! [`SecurityViolation`] is the denial returned by enforcement; it never
//! comes out of `test`, which only answers yes or no.

use latch_permission::{Permission, PermissionError, PermissionSet};
use std::fmt;
use thiserror::Error;

/// Which identity an identity permission encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityKind {
    /// User identity.
    User,
    /// Group identity.
    Group,
}

impl IdentityKind {
    /// Get the string representation of the identity kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityKind::User => "user",
            IdentityKind::Group => "group",
        }
    }
}

impl fmt::Display for IdentityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User context construction error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// User or group id was blank or missing
    #[error("Invalid identity: {0}")]
    InvalidIdentity(#[from] PermissionError),

    /// Supplied permissions name a different user or group
    #[error("Identity conflict: context {kind} is {expected:?} but permissions grant {kind} {found:?}")]
    IdentityConflict {
        /// Whether the conflict is on the user or the group.
        kind: IdentityKind,
        /// The context's own id.
        expected: String,
        /// The id decoded from the conflicting permission.
        found: String,
    },
}

/// Result type for context construction.
pub type ContextResult<T> = Result<T, ContextError>;

impl ContextError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ContextError::InvalidIdentity(e) => e.error_code(),
            ContextError::IdentityConflict { .. } => "IDENTITY_CONFLICT",
        }
    }
}

/// What an enforcement call was denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denied {
    /// A single required permission that is not granted.
    Permission(Permission),
    /// A set of alternatives, none of which is granted.
    AnyOf(PermissionSet),
}

/// Denial returned by `enforce`, `enforce_any` and `enforce_all`.
///
/// # Example
///
/// ```
/// use latch_context::{Denied, SecurityViolation};
/// use latch_permission::Permission;
///
/// let violation = SecurityViolation::permission(Permission::new("insert").unwrap());
/// assert_eq!(violation.to_string(), "Security violation: permission insert is not granted");
/// assert!(matches!(violation.denied(), Denied::Permission(p) if p.name() == "insert"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Security violation: {}", describe(.denied))]
pub struct SecurityViolation {
    denied: Denied,
}

fn describe(denied: &Denied) -> String {
    match denied {
        Denied::Permission(permission) => format!("permission {} is not granted", permission),
        Denied::AnyOf(permissions) => format!("none of the permissions {} is granted", permissions),
    }
}

impl SecurityViolation {
    /// Denial of a single permission.
    pub fn permission(permission: Permission) -> Self {
        Self {
            denied: Denied::Permission(permission),
        }
    }

    /// Denial of every alternative in a set.
    pub fn any_of(permissions: PermissionSet) -> Self {
        Self {
            denied: Denied::AnyOf(permissions),
        }
    }

    /// What was denied.
    pub fn denied(&self) -> &Denied {
        &self.denied
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        "SECURITY_VIOLATION"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_violation_display() {
        let violation = SecurityViolation::any_of(Permission::set(["update", "delete"]).unwrap());
        assert_eq!(
            violation.to_string(),
            "Security violation: none of the permissions [delete, update] is granted"
        );
        assert_eq!(violation.error_code(), "SECURITY_VIOLATION");
    }

    #[test]
    fn test_identity_conflict_display() {
        let err = ContextError::IdentityConflict {
            kind: IdentityKind::User,
            expected: "u".to_string(),
            found: "other-u".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"other-u\""), "got: {msg}");
        assert!(msg.contains("user"), "got: {msg}");
        assert_eq!(err.error_code(), "IDENTITY_CONFLICT");
    }

    #[test]
    fn test_invalid_identity_from_permission_error() {
        let err: ContextError = PermissionError::InvalidArgument("user id").into();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
    }
}
