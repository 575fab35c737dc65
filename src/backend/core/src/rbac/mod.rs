//! Role-based access control scoped to the organization tree.
//!
//! This module provides:
//! - **Roles**: the closed set of authorization levels and their scope tiers
//! - **Scope Resolver**: the units a session may see, derived from role + home unit
//! - **Page/Menu Gates**: table-driven route and navigation reachability
//! - **Content Gate**: create/edit/delete rules combining role and authorship
//! - **Route Guard**: Axum layer that enforces the page gate per request
//!
//! # Usage
//!
//! ```rust,ignore
//! use garrison_core::rbac::{PageGate, Role, ScopeResolver, Session};
//!
//! let session = Session::new(Role::Division, "div-1");
//! let scope = session.scope(&tree);
//! assert!(scope.contains("bn-1-1"));
//!
//! let pages = PageGate::default();
//! assert!(!pages.can_access(Some(session.role), "/data"));
//! ```

pub mod content;
pub mod gate;
pub mod middleware;
pub mod roles;
pub mod scope;
pub mod session;

pub use content::{
    can_change_user_role, can_create_content, can_delete_content, can_edit_content,
    is_own_content, Author, ContentKind, OwnershipGate, OwnershipKey,
};
pub use gate::{AccessTable, GateDecision, MenuGate, PageGate, UnmappedPolicy};
pub use middleware::{RbacContext, RequirePageAccessLayer, RequirePageAccessService};
pub use roles::{Role, ScopeTier};
pub use scope::{AccessScope, ScopeResolver, SelectableUnits};
pub use session::Session;
