//! Configuration management.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::Result;
use crate::org::OrgTree;
use crate::rbac::{
    AccessTable, MenuGate, OwnershipGate, OwnershipKey, PageGate, Role, UnmappedPolicy,
};
use crate::telemetry::TelemetryConfig;

/// Prefix of environment overrides, e.g. `GARRISON__ACCESS__UNMAPPED_PAGES=deny`.
const ENV_PREFIX: &str = "GARRISON";

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Organization tree source
    #[serde(default)]
    pub organization: OrganizationConfig,

    /// Access tables and policies
    #[serde(default)]
    pub access: AccessConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrganizationConfig {
    /// JSON or TOML unit file; the bundled organization is used when unset
    #[serde(default)]
    pub units_path: Option<PathBuf>,
}

impl OrganizationConfig {
    pub fn load_tree(&self) -> Result<OrgTree> {
        match &self.units_path {
            Some(path) => OrgTree::load(path),
            None => OrgTree::seed(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessConfig {
    /// Route path -> roles allowed to reach it
    #[serde(default = "default_pages")]
    pub pages: BTreeMap<String, Vec<Role>>,

    /// Menu id -> roles allowed to see it
    #[serde(default = "default_menus")]
    pub menus: BTreeMap<String, Vec<Role>>,

    /// Answer for routes missing from `pages`
    #[serde(default)]
    pub unmapped_pages: UnmappedPolicy,

    /// Answer for menu ids missing from `menus`
    #[serde(default)]
    pub unmapped_menus: UnmappedPolicy,

    /// How content authorship is matched
    #[serde(default)]
    pub ownership: OwnershipKey,

    /// Redirect target for requests without a session
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Redirect target for denied requests
    #[serde(default = "default_fallback_path")]
    pub fallback_path: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            pages: default_pages(),
            menus: default_menus(),
            unmapped_pages: UnmappedPolicy::default(),
            unmapped_menus: UnmappedPolicy::default(),
            ownership: OwnershipKey::default(),
            login_path: default_login_path(),
            fallback_path: default_fallback_path(),
        }
    }
}

impl AccessConfig {
    pub fn page_gate(&self) -> PageGate {
        PageGate::new(AccessTable::from(self.pages.clone())).with_unmapped(self.unmapped_pages)
    }

    pub fn menu_gate(&self) -> MenuGate {
        MenuGate::new(AccessTable::from(self.menus.clone())).with_unmapped(self.unmapped_menus)
    }

    pub fn ownership_gate(&self) -> OwnershipGate {
        OwnershipGate::new(self.ownership)
    }
}

// Default value functions
fn default_pages() -> BTreeMap<String, Vec<Role>> { (&AccessTable::default_pages()).into() }
fn default_menus() -> BTreeMap<String, Vec<Role>> { (&AccessTable::default_menus()).into() }
fn default_login_path() -> String { crate::rbac::middleware::DEFAULT_LOGIN_PATH.to_string() }
fn default_fallback_path() -> String { crate::rbac::middleware::DEFAULT_FALLBACK_PATH.to_string() }

impl Config {
    /// Load configuration from environment variables alone.
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        Ok(cfg)
    }

    /// Load from a specific file path, with environment overrides on top.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_builtin_tables() {
        let access = AccessConfig::default();
        assert_eq!(access.pages.len(), 10);
        assert_eq!(access.menus["users"], vec![Role::Headquarters, Role::Division]);
        assert_eq!(access.login_path, "/login");
        assert_eq!(access.fallback_path, "/dashboard");

        let pages = access.page_gate();
        assert!(pages.can_access(Some(Role::Battalion), "/unlisted"));
        assert!(!pages.can_access(Some(Role::Division), "/data"));
    }

    #[test]
    fn test_gates_follow_policies() {
        let access = AccessConfig {
            unmapped_menus: UnmappedPolicy::Deny,
            ownership: OwnershipKey::AuthorId,
            ..AccessConfig::default()
        };
        assert!(!access.menu_gate().can_access(Some(Role::Headquarters), "font-preview"));
        assert_eq!(access.ownership_gate().key(), OwnershipKey::AuthorId);
    }

    #[test]
    fn test_seed_tree_when_no_path() {
        let tree = OrganizationConfig::default().load_tree().unwrap();
        assert_eq!(tree.root().id, "hq");
    }
}
