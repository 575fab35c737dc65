//! Page and menu gates: static, table-driven reachability checks.
//!
//! Both gates deny a missing role outright. A page path is decided by the
//! most specific table key that covers it (`/admin/settings` beats `/admin`
//! for `/admin/settings/x`). Keys absent from the table fall through to the
//! gate's [`UnmappedPolicy`], which defaults to allow: unmapped routes are
//! not gated unless the table names them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

use super::roles::Role;

// ═══════════════════════════════════════════════════════════════════════════════
// Decision
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of a gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Access is allowed.
    Allow,
    /// Access is denied, with a reason.
    Deny(String),
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Deny(_))
    }
}

/// What a gate answers for a key its table does not mention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedPolicy {
    /// Unmapped keys are reachable by any role.
    #[default]
    Allow,
    /// Unmapped keys are unreachable.
    Deny,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Table
// ═══════════════════════════════════════════════════════════════════════════════

/// Mapping from a route path or menu id to the roles that may reach it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessTable {
    entries: HashMap<String, HashSet<Role>>,
}

impl AccessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an entry.
    pub fn with_entry(mut self, key: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        self.entries.insert(key.into(), roles.into_iter().collect());
        self
    }

    pub fn get(&self, key: &str) -> Option<&HashSet<Role>> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The dashboard's page table.
    pub fn default_pages() -> Self {
        use Role::{Battalion as Bn, Division as Div, Headquarters as Hq};
        Self::new()
            .with_entry("/dashboard", [Hq, Div, Bn])
            .with_entry("/forecast", [Hq, Div, Bn])
            .with_entry("/chatbot", [Hq, Div, Bn])
            .with_entry("/reports", [Hq, Div, Bn])
            .with_entry("/admin/notice", [Hq, Div])
            .with_entry("/admin/schedule", [Hq, Div, Bn])
            .with_entry("/data", [Hq])
            .with_entry("/admin/users", [Hq, Div])
            .with_entry("/admin/settings", [Hq])
            .with_entry("/admin/chatbot-starter", [Hq])
    }

    /// The side navigation's menu table.
    pub fn default_menus() -> Self {
        use Role::{Battalion as Bn, Division as Div, Headquarters as Hq};
        Self::new()
            .with_entry("dashboard", [Hq, Div, Bn])
            .with_entry("forecast", [Hq, Div, Bn])
            .with_entry("chatbot", [Hq, Div, Bn])
            .with_entry("reports", [Hq, Div, Bn])
            .with_entry("notice", [Hq, Div])
            .with_entry("schedule", [Hq, Div, Bn])
            .with_entry("data", [Hq])
            .with_entry("users", [Hq, Div])
            .with_entry("settings", [Hq])
    }
}

impl From<BTreeMap<String, Vec<Role>>> for AccessTable {
    fn from(map: BTreeMap<String, Vec<Role>>) -> Self {
        Self {
            entries: map
                .into_iter()
                .map(|(key, roles)| (key, roles.into_iter().collect()))
                .collect(),
        }
    }
}

impl From<&AccessTable> for BTreeMap<String, Vec<Role>> {
    fn from(table: &AccessTable) -> Self {
        table
            .entries
            .iter()
            .map(|(key, roles)| {
                let mut roles: Vec<Role> = roles.iter().copied().collect();
                roles.sort();
                (key.clone(), roles)
            })
            .collect()
    }
}

fn role_decision(roles: &HashSet<Role>, role: Role, key: &str) -> GateDecision {
    if roles.contains(&role) {
        GateDecision::Allow
    } else {
        GateDecision::Deny(format!("Role {} may not access {}", role, key))
    }
}

fn unmapped_decision(policy: UnmappedPolicy, key: &str) -> GateDecision {
    match policy {
        UnmappedPolicy::Allow => GateDecision::Allow,
        UnmappedPolicy::Deny => GateDecision::Deny(format!("{} is not listed in the access table", key)),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Page gate
// ═══════════════════════════════════════════════════════════════════════════════

/// Route reachability with longest-prefix matching.
#[derive(Debug, Clone)]
pub struct PageGate {
    table: AccessTable,
    /// Table keys, longest first.
    by_specificity: Vec<String>,
    unmapped: UnmappedPolicy,
}

impl PageGate {
    pub fn new(table: AccessTable) -> Self {
        let mut by_specificity: Vec<String> = table.keys().map(str::to_string).collect();
        // Longest first; ties broken lexically so iteration order never leaks in.
        by_specificity.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Self {
            table,
            by_specificity,
            unmapped: UnmappedPolicy::default(),
        }
    }

    pub fn with_unmapped(mut self, policy: UnmappedPolicy) -> Self {
        self.unmapped = policy;
        self
    }

    pub fn table(&self) -> &AccessTable {
        &self.table
    }

    pub fn unmapped_policy(&self) -> UnmappedPolicy {
        self.unmapped
    }

    /// The table key that governs `path`, if any.
    pub fn matching_key(&self, path: &str) -> Option<&str> {
        if let Some((key, _)) = self.table.entries.get_key_value(path) {
            return Some(key.as_str());
        }
        self.by_specificity
            .iter()
            .find(|key| {
                path.strip_prefix(key.as_str())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
            })
            .map(String::as_str)
    }

    pub fn decide(&self, role: Option<Role>, path: &str) -> GateDecision {
        let Some(role) = role else {
            return GateDecision::Deny("No role on session".to_string());
        };

        let decision = match self.matching_key(path) {
            Some(key) => match self.table.get(key) {
                Some(roles) => role_decision(roles, role, key),
                None => unmapped_decision(self.unmapped, path),
            },
            None => unmapped_decision(self.unmapped, path),
        };

        if let GateDecision::Deny(reason) = &decision {
            debug!(role = %role, path, reason = %reason, "Page access denied");
        }
        decision
    }

    pub fn can_access(&self, role: Option<Role>, path: &str) -> bool {
        self.decide(role, path).is_allowed()
    }
}

impl Default for PageGate {
    fn default() -> Self {
        Self::new(AccessTable::default_pages())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Menu gate
// ═══════════════════════════════════════════════════════════════════════════════

/// Menu entry visibility by exact id.
#[derive(Debug, Clone)]
pub struct MenuGate {
    table: AccessTable,
    unmapped: UnmappedPolicy,
}

impl MenuGate {
    pub fn new(table: AccessTable) -> Self {
        Self {
            table,
            unmapped: UnmappedPolicy::default(),
        }
    }

    pub fn with_unmapped(mut self, policy: UnmappedPolicy) -> Self {
        self.unmapped = policy;
        self
    }

    pub fn table(&self) -> &AccessTable {
        &self.table
    }

    pub fn decide(&self, role: Option<Role>, menu_id: &str) -> GateDecision {
        let Some(role) = role else {
            return GateDecision::Deny("No role on session".to_string());
        };
        match self.table.get(menu_id) {
            Some(roles) => role_decision(roles, role, menu_id),
            None => unmapped_decision(self.unmapped, menu_id),
        }
    }

    pub fn can_access(&self, role: Option<Role>, menu_id: &str) -> bool {
        self.decide(role, menu_id).is_allowed()
    }

    /// Filter a navigation list down to the entries `role` may see, keeping order.
    pub fn visible_menus<'a, I>(&self, role: Option<Role>, menu_ids: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        menu_ids
            .into_iter()
            .filter(|id| self.can_access(role, id))
            .collect()
    }
}

impl Default for MenuGate {
    fn default() -> Self {
        Self::new(AccessTable::default_menus())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const HQ: Option<Role> = Some(Role::Headquarters);
    const DIV: Option<Role> = Some(Role::Division);
    const BN: Option<Role> = Some(Role::Battalion);

    #[test]
    fn test_exact_match() {
        let gate = PageGate::default();
        assert!(gate.can_access(BN, "/dashboard"));
        assert!(gate.can_access(HQ, "/data"));
        assert!(!gate.can_access(DIV, "/data"));
        assert!(!gate.can_access(BN, "/admin/users"));
    }

    #[test]
    fn test_prefix_match() {
        let gate = PageGate::default();
        assert!(gate.can_access(DIV, "/admin/notice/new"));
        assert!(!gate.can_access(BN, "/admin/notice/42/edit"));
        assert_eq!(gate.matching_key("/admin/notice/new"), Some("/admin/notice"));
        // Only whole segments match.
        assert_eq!(gate.matching_key("/dataset"), None);
        assert_eq!(gate.matching_key("/data/"), Some("/data"));
    }

    #[test]
    fn test_longest_prefix_wins() {
        let gate = PageGate::new(
            AccessTable::new()
                .with_entry("/admin", Role::all())
                .with_entry("/admin/settings", [Role::Headquarters]),
        );
        assert!(gate.can_access(BN, "/admin/profile"));
        assert!(!gate.can_access(BN, "/admin/settings/x"));
        assert!(gate.can_access(HQ, "/admin/settings/x"));
        assert_eq!(gate.matching_key("/admin/settings/x"), Some("/admin/settings"));
    }

    #[test]
    fn test_unmapped_default_allow() {
        let gate = PageGate::default();
        assert!(gate.can_access(BN, "/font-preview"));
        assert!(gate.can_access(BN, "/"));

        let strict = PageGate::default().with_unmapped(UnmappedPolicy::Deny);
        assert!(strict.decide(BN, "/font-preview").is_denied());
        assert!(strict.can_access(BN, "/dashboard"));
    }

    #[test]
    fn test_missing_role_denied() {
        let pages = PageGate::default();
        let menus = MenuGate::default();
        assert!(!pages.can_access(None, "/dashboard"));
        assert!(!pages.can_access(None, "/unmapped"));
        assert!(!menus.can_access(None, "dashboard"));
        assert!(!menus.can_access(None, "unmapped"));
    }

    #[test]
    fn test_menu_gate() {
        let gate = MenuGate::default();
        assert!(gate.can_access(DIV, "notice"));
        assert!(!gate.can_access(BN, "notice"));
        assert!(!gate.can_access(DIV, "settings"));
        assert!(gate.can_access(BN, "font-preview"));

        let nav = ["dashboard", "forecast", "notice", "data", "users", "settings"];
        assert_eq!(gate.visible_menus(BN, nav), vec!["dashboard", "forecast"]);
        assert_eq!(gate.visible_menus(DIV, nav), vec!["dashboard", "forecast", "notice", "users"]);
        assert_eq!(gate.visible_menus(HQ, nav).len(), 6);

        let strict = MenuGate::default().with_unmapped(UnmappedPolicy::Deny);
        assert!(!strict.can_access(HQ, "font-preview"));
    }

    #[test]
    fn test_table_round_trips_through_config_shape() {
        let map: BTreeMap<String, Vec<Role>> = (&AccessTable::default_menus()).into();
        assert_eq!(map["notice"], vec![Role::Headquarters, Role::Division]);
        assert_eq!(AccessTable::from(map), AccessTable::default_menus());
    }
}
