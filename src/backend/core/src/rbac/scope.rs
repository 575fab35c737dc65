//! Scope resolution: which units a role anchored at a home unit may see.
//!
//! The resolver answers the question:
//! "Given role R at home unit H, which units of the organization are visible?"
//!
//! Scope is always self-inclusive and never widens sideways: a division-scope
//! session sees its home unit and the units beneath it, never a sibling
//! branch. Missing roles and unknown home units resolve to an empty scope.

use std::collections::HashSet;
use tracing::debug;

use super::roles::{Role, ScopeTier};
use crate::org::{OrgTree, Unit, UnitId};

// ═══════════════════════════════════════════════════════════════════════════════
// Access scope
// ═══════════════════════════════════════════════════════════════════════════════

/// A resolved, immutable set of visible unit ids.
///
/// Ids keep the order they were resolved in: tree insertion order for the
/// global tier, depth-first pre-order for the subtree tier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessScope {
    ids: Vec<UnitId>,
    members: HashSet<UnitId>,
}

impl AccessScope {
    /// The deny-all scope.
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_ids(ids: Vec<UnitId>) -> Self {
        let members = ids.iter().cloned().collect();
        Self { ids, members }
    }

    pub fn unit_ids(&self) -> &[UnitId] {
        &self.ids
    }

    pub fn contains(&self, unit_id: &str) -> bool {
        self.members.contains(unit_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Records for the ids in this scope that still exist in `tree`.
    pub fn units<'t>(&self, tree: &'t OrgTree) -> Vec<&'t Unit> {
        self.ids.iter().filter_map(|id| tree.get(id.as_str())).collect()
    }

    /// Whether every unit visible here is also visible in `other`.
    pub fn is_subset(&self, other: &AccessScope) -> bool {
        self.members.is_subset(&other.members)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Selectable units
// ═══════════════════════════════════════════════════════════════════════════════

/// Units a unit picker may offer to a session.
#[derive(Debug, Clone)]
pub struct SelectableUnits<'t> {
    pub units: Vec<&'t Unit>,
    /// The picker must render read-only; the session cannot pick another unit.
    pub is_fixed: bool,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Resolver
// ═══════════════════════════════════════════════════════════════════════════════

/// The single authority for "what can this session see".
#[derive(Debug, Clone, Copy)]
pub struct ScopeResolver<'t> {
    tree: &'t OrgTree,
}

impl<'t> ScopeResolver<'t> {
    pub fn new(tree: &'t OrgTree) -> Self {
        Self { tree }
    }

    /// Resolve the access scope for `role` at `home_unit_id`.
    pub fn resolve(&self, role: Option<Role>, home_unit_id: &str) -> AccessScope {
        AccessScope::from_ids(self.accessible_unit_ids(role, home_unit_id))
    }

    /// Ids of every unit visible to `role` at `home_unit_id`.
    ///
    /// - Global tier: all units.
    /// - Subtree tier: the home unit and its descendants.
    /// - Own-unit tier: the home unit.
    /// - No role, or a home unit that is not in the tree: nothing.
    pub fn accessible_unit_ids(&self, role: Option<Role>, home_unit_id: &str) -> Vec<UnitId> {
        let Some(role) = role else {
            debug!(home_unit_id, "No role on session; empty scope");
            return Vec::new();
        };
        let Some(home) = self.tree.get(home_unit_id) else {
            debug!(role = %role, home_unit_id, "Unknown home unit; empty scope");
            return Vec::new();
        };

        match role.tier() {
            ScopeTier::Global => self.tree.unit_ids(),
            ScopeTier::Subtree => self.tree.subordinate_unit_ids(home.id.as_str()),
            ScopeTier::OwnUnit => vec![home.id.clone()],
        }
    }

    /// Records for [`accessible_unit_ids`](Self::accessible_unit_ids).
    pub fn accessible_units(&self, role: Option<Role>, home_unit_id: &str) -> Vec<&'t Unit> {
        self.accessible_unit_ids(role, home_unit_id)
            .iter()
            .filter_map(|id| self.tree.get(id.as_str()))
            .collect()
    }

    /// Guard for showing or mutating another unit's data.
    pub fn can_access_unit(&self, role: Option<Role>, home_unit_id: &str, target_unit_id: &str) -> bool {
        let Some(role) = role else {
            return false;
        };
        if !self.tree.contains(home_unit_id) || !self.tree.contains(target_unit_id) {
            return false;
        }
        match role.tier() {
            ScopeTier::Global => true,
            ScopeTier::Subtree => self.tree.is_within(target_unit_id, home_unit_id),
            ScopeTier::OwnUnit => home_unit_id == target_unit_id,
        }
    }

    /// Units a picker should offer, and whether the picker is locked.
    pub fn selectable_units(&self, role: Option<Role>, home_unit_id: &str) -> SelectableUnits<'t> {
        let is_fixed = matches!(role.map(|r| r.tier()), Some(ScopeTier::OwnUnit));
        SelectableUnits {
            units: self.accessible_units(role, home_unit_id),
            is_fixed,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
