//! # Latch Security Contexts
//!
//! Security contexts decide whether a caller holds a permission, and guard
//! operations behind that decision.
//!
//! ## Overview
//!
//! The latch-context crate handles:
//! - **SecurityContext**: The `test` capability every context implements
//! - **Enforcement**: `enforce`, `enforce_any` and `enforce_all`, shared by all contexts
//! - **RootContext**: The single context that grants everything
//! - **UserContext**: A user's grants plus their user and group identity permissions
//!
//! ## Usage
//!
//! ```rust
//! use latch_context::{SecurityContext, SecurityContextExt, SecurityViolation, UserContext};
//! use latch_permission::Permission;
//!
//! fn delete_rows(ctx: &dyn SecurityContext) -> Result<usize, SecurityViolation> {
//!     let delete = Permission::new("delete").unwrap();
//!     ctx.enforce(&delete, || 3)
//! }
//!
//! let ctx = UserContext::create("alice", "staff", Permission::set(["select"]).unwrap()).unwrap();
//! assert!(delete_rows(&ctx).is_err());
//!
//! let ctx = ctx.grant(Permission::set(["delete"]).unwrap()).unwrap();
//! assert_eq!(delete_rows(&ctx), Ok(3));
//! ```
//!
//! ## Passing Contexts
//!
//! Contexts are passed explicitly, as `&impl SecurityContext` or
//! `&dyn SecurityContext`, to every function that needs authorization. All
//! contexts are immutable and `Send + Sync`, so they can be shared across
//! threads as-is.

pub mod context;
pub mod error;
pub mod root;
pub mod user;

// Re-export main types for convenience
pub use context::{SecurityContext, SecurityContextExt};
pub use error::{ContextError, ContextResult, Denied, IdentityKind, SecurityViolation};
pub use root::RootContext;
pub use user::UserContext;
