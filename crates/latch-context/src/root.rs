//! The root context.

use latch_permission::Permission;

use crate::context::SecurityContext;

static ROOT: RootContext = RootContext { _private: () };

/// The context that grants every permission.
///
/// It stands for the set of all possible permissions, including ones never
/// seen before, so every enforcement call runs its operation. There is
/// exactly one instance, reached through [`RootContext::get`].
///
/// # Example
///
/// ```
/// use latch_context::{RootContext, SecurityContext, SecurityContextExt};
/// use latch_permission::Permission;
///
/// let root = RootContext::get();
/// let anything = Permission::new("made-up:permission").unwrap();
/// assert!(root.test(&anything));
/// assert_eq!(root.enforce(&anything, || "ran"), Ok("ran"));
/// ```
#[derive(Debug)]
pub struct RootContext {
    _private: (),
}

impl RootContext {
    /// The shared root context.
    pub fn get() -> &'static RootContext {
        &ROOT
    }
}

impl SecurityContext for RootContext {
    fn test(&self, _permission: &Permission) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SecurityContextExt;
    use latch_permission::PermissionSet;

    #[test]
    fn test_root_grants_everything() {
        let root = RootContext::get();
        for name in ["select", "<user=(anyone)>", "<group=(anything)>", "x-1f3a9c"] {
            assert!(root.test(&Permission::new(name).unwrap()), "{name}");
        }
        assert!(root.test(&Permission::user("someone").unwrap()));
    }

    #[test]
    fn test_root_is_singleton() {
        assert!(std::ptr::eq(RootContext::get(), RootContext::get()));
    }

    #[test]
    fn test_root_enforcement_always_runs() {
        let root = RootContext::get();
        let perms = Permission::set(["a", "b"]).unwrap();

        assert_eq!(root.enforce_any(&perms, || 1), Ok(1));
        assert_eq!(root.enforce_all(&perms, || 2), Ok(2));
        assert_eq!(root.enforce_all(&PermissionSet::new(), || 3), Ok(3));
    }
}
