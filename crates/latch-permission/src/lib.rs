//! # Latch Permissions
//!
//! Permission values for the latch authorization primitives.
//!
//! ## Overview
//!
//! The latch-permission crate handles:
//! - **Permissions**: Named capabilities, equal exactly when their names are
//! - **Permission Sets**: Ordered, deduplicated collections of permissions
//! - **Identity Permissions**: User and group ids encoded into permission names
//! - **Templates**: The configurable encoding behind identity permissions
//!
//! ## Architecture
//!
//! ```text
//! Permission = trimmed, non-empty name
//!
//! Identity permissions (default templates):
//!   "<user=(alice)>"     - user permission for "alice"
//!   "<group=(admins)>"   - group permission for "admins"
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use latch_permission::{Permission, PermissionKind};
//!
//! let select = Permission::new("select").unwrap();
//! assert_eq!(select.kind(), PermissionKind::Named("select"));
//!
//! let alice = Permission::user("alice").unwrap();
//! assert_eq!(alice.as_user(), Some("alice"));
//!
//! let set = Permission::set(["select", "update", "select"]).unwrap();
//! assert_eq!(set.len(), 2);
//! ```
//!
//! ## Configuration
//!
//! - `LATCH_USER_PERMISSION_TEMPLATE`: user template, default `<user=({id})>`
//! - `LATCH_GROUP_PERMISSION_TEMPLATE`: group template, default `<group=({id})>`
//!
//! Each template must contain exactly one `{id}` placeholder; otherwise the
//! default is used. Templates are read once, on first use.

pub mod config;
pub mod error;
pub mod permission;
pub mod set;
pub mod template;

// Re-export main types for convenience
pub use config::{PermissionTemplates, TemplateConfig, GROUP_TEMPLATE_ENV, USER_TEMPLATE_ENV};
pub use error::{PermissionError, PermissionResult};
pub use permission::{Permission, PermissionKind};
pub use set::PermissionSet;
pub use template::{PermissionTemplate, DEFAULT_GROUP_TEMPLATE, DEFAULT_USER_TEMPLATE, PLACEHOLDER};
