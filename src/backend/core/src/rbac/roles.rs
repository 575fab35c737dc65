//! The closed set of authorization roles.
//!
//! | Role          | Wire id    | Scope tier | Sees                                |
//! |---------------|------------|------------|-------------------------------------|
//! | Headquarters  | `ROLE_HQ`  | Global     | Every unit in the organization      |
//! | Division      | `ROLE_DIV` | Subtree    | Its home unit and everything below  |
//! | Battalion     | `ROLE_BN`  | OwnUnit    | Its home unit only                  |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ErrorCode, GarrisonError};

/// How far a role's visibility extends from its home unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeTier {
    /// The whole organization.
    Global,
    /// The home unit and all of its descendants.
    Subtree,
    /// The home unit alone.
    OwnUnit,
}

/// Authorization role carried by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ROLE_HQ")]
    Headquarters,
    #[serde(rename = "ROLE_DIV")]
    Division,
    #[serde(rename = "ROLE_BN")]
    Battalion,
}

impl Role {
    /// Wire identifier (`ROLE_HQ`, ...).
    pub fn id(&self) -> &'static str {
        match self {
            Self::Headquarters => "ROLE_HQ",
            Self::Division => "ROLE_DIV",
            Self::Battalion => "ROLE_BN",
        }
    }

    /// Account-level label shown in user management.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Headquarters => "Super Admin",
            Self::Division => "Admin",
            Self::Battalion => "User",
        }
    }

    /// Description of the data a holder of this role can see.
    pub fn scope_label(&self) -> &'static str {
        match self {
            Self::Headquarters => "All units",
            Self::Division => "Subordinate units",
            Self::Battalion => "Own unit",
        }
    }

    pub fn tier(&self) -> ScopeTier {
        match self {
            Self::Headquarters => ScopeTier::Global,
            Self::Division => ScopeTier::Subtree,
            Self::Battalion => ScopeTier::OwnUnit,
        }
    }

    /// Whether the dashboard shows the organization-wide incident ticker.
    pub fn sees_ticker(&self) -> bool {
        matches!(self, Self::Headquarters | Self::Division)
    }

    /// Parse a wire identifier. Unknown strings yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "ROLE_HQ" => Some(Self::Headquarters),
            "ROLE_DIV" => Some(Self::Division),
            "ROLE_BN" => Some(Self::Battalion),
            _ => None,
        }
    }

    /// All roles, broadest first.
    pub fn all() -> [Role; 3] {
        [Self::Headquarters, Self::Division, Self::Battalion]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Role {
    type Err = GarrisonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            GarrisonError::new(ErrorCode::UnknownRole, format!("Unknown role: {}", s))
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ids_round_trip() {
        for role in Role::all() {
            assert_eq!(Role::parse(role.id()), Some(role));
            assert_eq!(role.to_string(), role.id());
        }
        assert_eq!(Role::parse("ROLE_ADMIN"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_from_str_error() {
        assert_eq!("ROLE_DIV".parse::<Role>().unwrap(), Role::Division);
        let err = "ROLE_SUPER".parse::<Role>().unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnknownRole);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(Role::Headquarters.tier(), ScopeTier::Global);
        assert_eq!(Role::Division.tier(), ScopeTier::Subtree);
        assert_eq!(Role::Battalion.tier(), ScopeTier::OwnUnit);
    }

    #[test]
    fn test_serde_uses_wire_ids() {
        let json = serde_json::to_string(&Role::Battalion).unwrap();
        assert_eq!(json, "\"ROLE_BN\"");
        let role: Role = serde_json::from_str("\"ROLE_HQ\"").unwrap();
        assert_eq!(role, Role::Headquarters);
    }

    #[test]
    fn test_labels_and_ticker() {
        assert_eq!(Role::Headquarters.label(), "Super Admin");
        assert_eq!(Role::Battalion.scope_label(), "Own unit");
        assert!(Role::Division.sees_ticker());
        assert!(!Role::Battalion.sees_ticker());
    }
}
