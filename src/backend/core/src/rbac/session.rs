//! Session identity: the role/unit claim of the authenticated user.

use serde::{Deserialize, Serialize};

use super::roles::Role;
use super::scope::{AccessScope, ScopeResolver};
use crate::org::{OrgTree, UnitId};

/// The authenticated user's claim, as handed over by the authenticator.
///
/// `home_unit_id` should name an existing unit; a stale id resolves to an
/// empty scope rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Authorization role.
    pub role: Role,
    /// Unit the user belongs to.
    pub home_unit_id: UnitId,
    /// Stable account identifier, when the authenticator provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Display name (matched against content authors).
    #[serde(default)]
    pub display_name: String,
}

impl Session {
    pub fn new(role: Role, home_unit_id: impl Into<String>) -> Self {
        Self {
            role,
            home_unit_id: UnitId::new(home_unit_id),
            user_id: None,
            display_name: String::new(),
        }
    }

    /// Attach the user's account id and display name.
    pub fn with_user(mut self, user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self.display_name = display_name.into();
        self
    }

    /// Resolve the set of units this session may see.
    pub fn scope(&self, tree: &OrgTree) -> AccessScope {
        ScopeResolver::new(tree).resolve(Some(self.role), self.home_unit_id.as_str())
    }
}
