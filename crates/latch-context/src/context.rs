//! # Security Contexts
//!
//! A security context answers one question: is this permission granted?
//! Everything else (guarding an operation behind a single permission, any
//! of several, or all of several) is built on that answer once, in
//! [`SecurityContextExt`], and is shared by every context.
//!
//! ```text
//! caller ── enforce(p, op) ──> test(p) ── true ──> op() ──> Ok(result)
//!                                 │
//!                                 └─ false ──> Err(SecurityViolation), op never runs
//! ```
//!
//! Empty requirement sets are vacuously satisfied by both `enforce_any` and
//! `enforce_all`.

use latch_permission::{Permission, PermissionSet};
use std::sync::Arc;

use crate::error::SecurityViolation;

/// Tests permissions against a granted set.
///
/// Implementations must be pure: `test` reads the current grants and
/// changes nothing.
pub trait SecurityContext: Send + Sync {
    /// Whether `permission` is granted.
    fn test(&self, permission: &Permission) -> bool;
}

impl<C: SecurityContext + ?Sized> SecurityContext for &C {
    fn test(&self, permission: &Permission) -> bool {
        (**self).test(permission)
    }
}

impl<C: SecurityContext + ?Sized> SecurityContext for Box<C> {
    fn test(&self, permission: &Permission) -> bool {
        (**self).test(permission)
    }
}

impl<C: SecurityContext + ?Sized> SecurityContext for Arc<C> {
    fn test(&self, permission: &Permission) -> bool {
        (**self).test(permission)
    }
}

/// Enforcement built on [`SecurityContext::test`].
///
/// Implemented for every security context, including
/// `dyn SecurityContext`. Each guard comes in three forms:
///
/// - `check*` returns `Result<(), SecurityViolation>` for `?` at the top of
///   a function.
/// - `enforce*` runs an infallible operation and wraps its value.
/// - `try_enforce*` runs a fallible operation; its error passes through
///   untouched and a denial is converted into the same error type.
///
/// The multi-permission forms accept anything that iterates over
/// `&Permission`: a [`PermissionSet`], a slice, or an array such as
/// `[&read, &write]`.
///
/// # Example
///
/// ```
/// use latch_context::{SecurityContextExt, UserContext};
/// use latch_permission::Permission;
///
/// let select = Permission::new("select").unwrap();
/// let insert = Permission::new("insert").unwrap();
/// let ctx = UserContext::create("alice", "staff", [select.clone()]).unwrap();
///
/// assert_eq!(ctx.enforce(&select, || 42), Ok(42));
/// assert!(ctx.enforce(&insert, || 42).is_err());
/// assert_eq!(ctx.enforce_any([&insert, &select], || "ok"), Ok("ok"));
/// assert!(ctx.enforce_all([&insert, &select], || "ok").is_err());
/// ```
pub trait SecurityContextExt: SecurityContext {
    /// Require `permission`.
    fn check(&self, permission: &Permission) -> Result<(), SecurityViolation> {
        if self.test(permission) {
            Ok(())
        } else {
            Err(SecurityViolation::permission(permission.clone()))
        }
    }

    /// Require at least one of `permissions`.
    ///
    /// Succeeds for an empty set. Stops testing at the first granted
    /// permission. A denial names the whole requested set.
    fn check_any<'a, I>(&self, permissions: I) -> Result<(), SecurityViolation>
    where
        I: IntoIterator<Item = &'a Permission>,
    {
        let requested: Vec<&Permission> = permissions.into_iter().collect();
        if requested.is_empty() || requested.iter().any(|permission| self.test(permission)) {
            Ok(())
        } else {
            Err(SecurityViolation::any_of(requested.into_iter().collect::<PermissionSet>()))
        }
    }

    /// Require every one of `permissions`.
    ///
    /// Succeeds for an empty set. Stops testing at the first permission that
    /// is not granted, and names only that one in the denial.
    fn check_all<'a, I>(&self, permissions: I) -> Result<(), SecurityViolation>
    where
        I: IntoIterator<Item = &'a Permission>,
    {
        match permissions.into_iter().find(|permission| !self.test(permission)) {
            Some(missing) => Err(SecurityViolation::permission(missing.clone())),
            None => Ok(()),
        }
    }

    /// Run `op` if `permission` is granted.
    fn enforce<T, F>(&self, permission: &Permission, op: F) -> Result<T, SecurityViolation>
    where
        F: FnOnce() -> T,
    {
        self.check(permission)?;
        Ok(op())
    }

    /// Run `op` if at least one of `permissions` is granted.
    fn enforce_any<'a, I, T, F>(&self, permissions: I, op: F) -> Result<T, SecurityViolation>
    where
        I: IntoIterator<Item = &'a Permission>,
        F: FnOnce() -> T,
    {
        self.check_any(permissions)?;
        Ok(op())
    }

    /// Run `op` if every one of `permissions` is granted.
    fn enforce_all<'a, I, T, F>(&self, permissions: I, op: F) -> Result<T, SecurityViolation>
    where
        I: IntoIterator<Item = &'a Permission>,
        F: FnOnce() -> T,
    {
        self.check_all(permissions)?;
        Ok(op())
    }

    /// Run the fallible `op` if `permission` is granted.
    fn try_enforce<T, E, F>(&self, permission: &Permission, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<SecurityViolation>,
    {
        self.check(permission)?;
        op()
    }

    /// Run the fallible `op` if at least one of `permissions` is granted.
    fn try_enforce_any<'a, I, T, E, F>(&self, permissions: I, op: F) -> Result<T, E>
    where
        I: IntoIterator<Item = &'a Permission>,
        F: FnOnce() -> Result<T, E>,
        E: From<SecurityViolation>,
    {
        self.check_any(permissions)?;
        op()
    }

    /// Run the fallible `op` if every one of `permissions` is granted.
    fn try_enforce_all<'a, I, T, E, F>(&self, permissions: I, op: F) -> Result<T, E>
    where
        I: IntoIterator<Item = &'a Permission>,
        F: FnOnce() -> Result<T, E>,
        E: From<SecurityViolation>,
    {
        self.check_all(permissions)?;
        op()
    }
}

impl<C: SecurityContext + ?Sized> SecurityContextExt for C {}
