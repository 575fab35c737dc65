//! Content ownership: who may create, edit and delete notices, reports,
//! schedules and user accounts.
//!
//! Headquarters may touch everything. Everyone else may only edit what they
//! authored. Authorship is matched on display name by default; two authors
//! sharing a display name are indistinguishable under that rule, so
//! [`OwnershipGate`] can be switched to stable author ids.

use serde::{Deserialize, Serialize};

use super::roles::Role;
use super::session::Session;

/// Kinds of user-authored content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Notice,
    Report,
    Schedule,
    User,
}

impl ContentKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Notice => "notice",
            Self::Report => "report",
            Self::Schedule => "schedule",
            Self::User => "user",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Name-keyed rules
// ═══════════════════════════════════════════════════════════════════════════════

/// Whether `current_user_name` owns content written by `author_name`.
pub fn is_own_content(role: Option<Role>, author_name: &str, current_user_name: &str) -> bool {
    match role {
        Some(Role::Headquarters) => true,
        Some(_) => author_name == current_user_name,
        None => false,
    }
}

pub fn can_edit_content(role: Option<Role>, author_name: &str, current_user_name: &str) -> bool {
    is_own_content(role, author_name, current_user_name)
}

pub fn can_delete_content(role: Option<Role>, author_name: &str, current_user_name: &str) -> bool {
    can_edit_content(role, author_name, current_user_name)
}

/// Only headquarters may change another account's role.
pub fn can_change_user_role(role: Option<Role>) -> bool {
    matches!(role, Some(Role::Headquarters))
}

pub fn can_create_content(role: Option<Role>, kind: ContentKind) -> bool {
    let Some(role) = role else {
        return false;
    };
    match kind {
        ContentKind::Notice | ContentKind::User => {
            matches!(role, Role::Headquarters | Role::Division)
        }
        ContentKind::Report | ContentKind::Schedule => true,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Ownership gate
// ═══════════════════════════════════════════════════════════════════════════════

/// What identifies the author of a piece of content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipKey {
    /// Exact display-name equality.
    #[default]
    DisplayName,
    /// Stable account id; content without an author id is never owned.
    AuthorId,
}

/// The author (or viewer) of a piece of content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

impl Author {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl From<&Session> for Author {
    fn from(session: &Session) -> Self {
        Self {
            id: session.user_id.clone(),
            name: session.display_name.clone(),
        }
    }
}

/// Edit/delete authorization with a configurable ownership key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OwnershipGate {
    key: OwnershipKey,
}

impl OwnershipGate {
    pub fn new(key: OwnershipKey) -> Self {
        Self { key }
    }

    pub fn key(&self) -> OwnershipKey {
        self.key
    }

    pub fn is_own_content(&self, role: Option<Role>, author: &Author, viewer: &Author) -> bool {
        match self.key {
            OwnershipKey::DisplayName => is_own_content(role, &author.name, &viewer.name),
            OwnershipKey::AuthorId => match role {
                Some(Role::Headquarters) => true,
                Some(_) => matches!(
                    (&author.id, &viewer.id),
                    (Some(author), Some(viewer)) if author == viewer
                ),
                None => false,
            },
        }
    }

    pub fn can_edit(&self, role: Option<Role>, author: &Author, viewer: &Author) -> bool {
        self.is_own_content(role, author, viewer)
    }

    pub fn can_delete(&self, role: Option<Role>, author: &Author, viewer: &Author) -> bool {
        self.can_edit(role, author, viewer)
    }

    /// Shorthand for checking a session against content by `author`.
    pub fn session_can_edit(&self, session: &Session, author: &Author) -> bool {
        self.can_edit(Some(session.role), author, &Author::from(session))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_ownership() {
        assert!(can_edit_content(Some(Role::Battalion), "Kim", "Kim"));
        assert!(!can_edit_content(Some(Role::Battalion), "Kim", "Lee"));
        assert!(!can_edit_content(Some(Role::Division), "Kim", "Lee"));
        assert!(can_edit_content(Some(Role::Headquarters), "Kim", "Lee"));
        assert!(!can_edit_content(None, "Kim", "Kim"));
        assert!(can_delete_content(Some(Role::Battalion), "Kim", "Kim"));
        assert!(!can_delete_content(Some(Role::Battalion), "Kim", "Lee"));
    }

    #[test]
    fn test_create_table() {
        use ContentKind::*;
        assert!(can_create_content(Some(Role::Division), Notice));
        assert!(!can_create_content(Some(Role::Battalion), Notice));
        assert!(!can_create_content(Some(Role::Battalion), User));
        assert!(can_create_content(Some(Role::Battalion), Report));
        assert!(can_create_content(Some(Role::Battalion), Schedule));
        assert!(!can_create_content(None, Report));
    }

    #[test]
    fn test_role_change_is_headquarters_only() {
        assert!(can_change_user_role(Some(Role::Headquarters)));
        assert!(!can_change_user_role(Some(Role::Division)));
        assert!(!can_change_user_role(None));
    }

    #[test]
    fn test_author_id_ownership() {
        let gate = OwnershipGate::new(OwnershipKey::AuthorId);
        let kim_a = Author::named("Kim").with_id("17");
        let kim_b = Author::named("Kim").with_id("42");

        assert!(gate.can_edit(Some(Role::Battalion), &kim_a, &kim_a.clone()));
        assert!(!gate.can_edit(Some(Role::Battalion), &kim_a, &kim_b));
        // No id on the content: never owned, even with a matching name.
        assert!(!gate.can_edit(Some(Role::Battalion), &Author::named("Kim"), &kim_a));
        assert!(gate.can_delete(Some(Role::Headquarters), &kim_a, &kim_b));

        // The default keys on names and conflates the two.
        assert!(OwnershipGate::default().can_edit(Some(Role::Battalion), &kim_a, &kim_b));
    }

    #[test]
    fn test_session_can_edit() {
        let session = Session::new(Role::Division, "div-1").with_user("7", "Lee");
        let gate = OwnershipGate::default();
        assert!(gate.session_can_edit(&session, &Author::named("Lee")));
        assert!(!gate.session_can_edit(&session, &Author::named("Park")));
    }
}
