#![allow(clippy::result_large_err)]
//! # Garrison Core
//!
//! Hierarchical, unit-scoped access control for the safety-risk dashboard.
//!
//! ## Architecture
//!
//! - **Organization**: in-memory unit tree with parent/child/subtree traversal
//! - **Scope Resolver**: role + home unit -> the set of units a session may see
//! - **Gates**: page, menu and content-ownership checks
//! - **Route Guard**: Axum layer redirecting sessions away from pages they may not reach
//! - **Selector**: cascading unit picker kept consistent with the tree
//! - **Telemetry**: structured logging

pub mod config;
pub mod error;
pub mod org;
pub mod rbac;
pub mod selector;
pub mod telemetry;

pub use error::{ErrorCode, ErrorContext, ErrorDetails, ErrorSeverity, GarrisonError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{AccessConfig, Config, OrganizationConfig};
    pub use crate::error::{ErrorCode, ErrorContext, ErrorDetails, ErrorSeverity, GarrisonError, Result};
    pub use crate::org::{OrgTree, RiskBand, SharedTree, TreeError, Unit, UnitId, UnitLevel};
    pub use crate::rbac::{
        can_change_user_role, can_create_content, can_delete_content, can_edit_content,
        is_own_content, AccessScope, AccessTable, Author, ContentKind, GateDecision, MenuGate,
        OwnershipGate, OwnershipKey, PageGate, RbacContext, RequirePageAccessLayer, Role,
        ScopeResolver, ScopeTier, SelectableUnits, Session, UnmappedPolicy,
    };
    pub use crate::selector::{CascadeSelector, SelectorError, SelectorLevel};
}
