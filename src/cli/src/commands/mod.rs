//! Subcommands of the `garrison` CLI.

pub mod check;
pub mod scope;
pub mod select;
pub mod units;

use garrison_core::config::Config;
use garrison_core::org::OrgTree;
use garrison_core::rbac::Role;

/// Loaded configuration plus the organization it points at.
pub struct Workspace {
    pub config: Config,
    pub tree: OrgTree,
}

impl Workspace {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let tree = config.organization.load_tree()?;
        tracing::debug!(units = tree.len(), root = %tree.root().id, "Organization loaded");
        Ok(Self { config, tree })
    }
}

/// Parse `ROLE_HQ`/`ROLE_DIV`/`ROLE_BN`, case-insensitively and with the
/// `ROLE_` prefix optional.
pub fn parse_role(s: &str) -> Result<Role, String> {
    let upper = s.trim().to_ascii_uppercase();
    let id = if upper.starts_with("ROLE_") {
        upper
    } else {
        format!("ROLE_{}", upper)
    };
    Role::parse(&id).ok_or_else(|| format!("unknown role '{}' (expected ROLE_HQ, ROLE_DIV or ROLE_BN)", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role_shorthands() {
        assert_eq!(parse_role("ROLE_HQ"), Ok(Role::Headquarters));
        assert_eq!(parse_role("div"), Ok(Role::Division));
        assert_eq!(parse_role("role_bn"), Ok(Role::Battalion));
        assert!(parse_role("admin").is_err());
    }
}
