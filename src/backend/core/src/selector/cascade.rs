//! Level generation and selection state for the cascading picker.

use std::fmt;
use tracing::debug;

use super::SelectorError;
use crate::org::{OrgTree, Unit, UnitId, FULL_NAME_SEPARATOR};
use crate::rbac::{AccessScope, Role, ScopeResolver, ScopeTier};

type ChangeHandler<'t> = Box<dyn FnMut(&str) + 't>;

/// One rendered picker control.
#[derive(Debug, Clone)]
pub struct SelectorLevel<'t> {
    pub level: usize,
    pub options: Vec<&'t Unit>,
    /// `None` while the control is idle.
    pub selected: Option<UnitId>,
}

impl SelectorLevel<'_> {
    pub fn is_idle(&self) -> bool {
        self.selected.is_none()
    }
}

/// Top-down selection path over an [`OrgTree`].
///
/// `selections[0]` is picked among the top-level options, and each following
/// entry is a child of the one before it.
pub struct CascadeSelector<'t> {
    tree: &'t OrgTree,
    anchor: Option<UnitId>,
    scope: Option<AccessScope>,
    fixed: bool,
    selections: Vec<UnitId>,
    on_change: Option<ChangeHandler<'t>>,
}

impl<'t> CascadeSelector<'t> {
    pub fn new(tree: &'t OrgTree) -> Self {
        Self {
            tree,
            anchor: None,
            scope: None,
            fixed: false,
            selections: Vec::new(),
            on_change: None,
        }
    }

    /// Start level 0 at the children of `unit_id` instead of the tree's root.
    pub fn anchored_at(mut self, unit_id: impl Into<String>) -> Self {
        self.anchor = Some(UnitId::new(unit_id));
        self.resync();
        self
    }

    /// Offer only units inside `scope`.
    pub fn within_scope(mut self, scope: AccessScope) -> Self {
        self.scope = Some(scope);
        self.resync();
        self
    }

    /// Lock the picker: `select` and `clear` are rejected.
    pub fn fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn on_change<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&str) + 't,
    {
        self.on_change = Some(Box::new(handler));
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    /// The picker a session may use.
    ///
    /// Headquarters browses the whole tree. Division and battalion sessions
    /// start at their home unit's level, see only their scope, and begin with
    /// the home unit selected; the battalion picker is fixed. A session that
    /// resolves to an empty scope (no role, or a stale home unit) gets a
    /// picker with no options, whatever its role.
    pub fn for_session(tree: &'t OrgTree, role: Option<Role>, home_unit_id: &str) -> Self {
        let scope = ScopeResolver::new(tree).resolve(role, home_unit_id);
        let Some(tier) = role.map(|r| r.tier()).filter(|_| !scope.is_empty()) else {
            return Self::new(tree).within_scope(scope);
        };
        if tier == ScopeTier::Global {
            return Self::new(tree);
        }

        let mut selector = Self::new(tree);
        if let Some(parent) = tree.get(home_unit_id).and_then(|u| u.parent_id.as_ref()) {
            selector = selector.anchored_at(parent.as_str());
        }
        selector
            .within_scope(scope)
            .fixed(tier == ScopeTier::OwnUnit)
            .with_value(home_unit_id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State
    // ─────────────────────────────────────────────────────────────────────────

    /// Sync the path to an externally supplied unit id without firing `on_change`.
    ///
    /// An empty, unknown, detached, out-of-anchor or out-of-scope value clears
    /// the path.
    pub fn set_value(&mut self, value: &str) {
        self.selections = self.path_for(value);
    }

    fn resync(&mut self) {
        let value = self.value().to_string();
        self.set_value(&value);
    }

    fn path_for(&self, value: &str) -> Vec<UnitId> {
        if value.is_empty() {
            return Vec::new();
        }
        let mut chain = self.tree.parent_chain(value);
        chain.reverse();

        match &self.anchor {
            Some(anchor) => match chain.iter().position(|id| id == anchor) {
                Some(pos) => {
                    chain.drain(..=pos);
                }
                None => {
                    debug!(value, anchor = %anchor, "Value is outside the selector anchor");
                    return Vec::new();
                }
            },
            // A chain that stops at a dangling parent never reaches the root.
            None if chain.first() != Some(&self.tree.root().id) => {
                debug!(value, "Value is detached from the organization root");
                return Vec::new();
            }
            None => {}
        }

        if let Some(scope) = &self.scope {
            if let Some(outside) = chain.iter().find(|id| !scope.contains(id.as_str())) {
                debug!(value, unit_id = %outside, "Value is outside the selector scope");
                return Vec::new();
            }
        }
        chain
    }

    /// The currently selected unit id, or `""` when nothing is selected.
    pub fn value(&self) -> &str {
        self.selections.last().map(UnitId::as_str).unwrap_or("")
    }

    pub fn selections(&self) -> &[UnitId] {
        &self.selections
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn anchor(&self) -> Option<&UnitId> {
        self.anchor.as_ref()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Levels
    // ─────────────────────────────────────────────────────────────────────────

    /// Options offered at `level`. Deeper levels than the path supports are empty.
    pub fn options(&self, level: usize) -> Vec<&'t Unit> {
        let units = if level == 0 {
            self.tree.child_units(self.anchor.as_ref().map(UnitId::as_str))
        } else {
            match self.selections.get(level - 1) {
                Some(parent) => self.tree.child_units(Some(parent.as_str())),
                None => Vec::new(),
            }
        };
        match &self.scope {
            Some(scope) => units
                .into_iter()
                .filter(|u| scope.contains(u.id.as_str()))
                .collect(),
            None => units,
        }
    }

    /// Number of controls to render: one per selection, plus one more while
    /// the deepest selection still has children.
    pub fn visible_levels(&self) -> usize {
        if self.selections.is_empty() {
            return 1;
        }
        let depth = self.selections.len();
        if self.options(depth).is_empty() {
            depth
        } else {
            depth + 1
        }
    }

    /// The rendered controls. Level 0 is always present.
    pub fn levels(&self) -> Vec<SelectorLevel<'t>> {
        let mut levels = Vec::new();
        for level in 0..self.visible_levels() {
            let options = self.options(level);
            if level > 0 && options.is_empty() {
                break;
            }
            levels.push(SelectorLevel {
                level,
                options,
                selected: self.selections.get(level).cloned(),
            });
        }
        levels
    }

    /// Breadcrumb of the selected unit names.
    pub fn display_path(&self) -> String {
        self.selections
            .iter()
            .filter_map(|id| self.tree.get(id.as_str()))
            .map(|u| u.name.as_str())
            .collect::<Vec<_>>()
            .join(FULL_NAME_SEPARATOR)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Interaction
    // ─────────────────────────────────────────────────────────────────────────

    /// Pick `unit_id` at `level`, dropping any deeper selections.
    ///
    /// Fires `on_change(unit_id)` and returns the new value.
    pub fn select(&mut self, level: usize, unit_id: &str) -> Result<&str, SelectorError> {
        self.check_interactive(level)?;
        if !self.options(level).iter().any(|u| u.id == unit_id) {
            return Err(SelectorError::InvalidOption {
                level,
                unit_id: unit_id.to_string(),
            });
        }

        self.selections.truncate(level);
        self.selections.push(UnitId::new(unit_id));
        self.emit();
        Ok(self.value())
    }

    /// Clear the control at `level` and everything below it.
    ///
    /// Fires `on_change` with the deepest remaining selection (`""` when the
    /// path is now empty) and returns it.
    pub fn clear(&mut self, level: usize) -> Result<&str, SelectorError> {
        self.check_interactive(level)?;
        self.selections.truncate(level);
        self.emit();
        Ok(self.value())
    }

    fn check_interactive(&self, level: usize) -> Result<(), SelectorError> {
        if self.fixed {
            return Err(SelectorError::Fixed);
        }
        let visible = self.levels().len();
        if level >= visible {
            return Err(SelectorError::InvalidLevel { level, visible });
        }
        Ok(())
    }

    fn emit(&mut self) {
        let value = self.value().to_string();
        if let Some(handler) = self.on_change.as_mut() {
            handler(&value);
        }
    }
}

impl fmt::Debug for CascadeSelector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CascadeSelector")
            .field("anchor", &self.anchor)
            .field("scoped", &self.scope.is_some())
            .field("fixed", &self.fixed)
            .field("selections", &self.selections)
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
