//! Integration tests for configuration and organization loading.

use std::io::Write;

use garrison_core::config::Config;
use garrison_core::error::ErrorCode;
use garrison_core::org::OrgTree;
use garrison_core::rbac::{OwnershipKey, Role, UnmappedPolicy};

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn test_config_file_overrides_tables_and_policies() {
    let dir = tempfile::tempdir().unwrap();
    let units = write_file(
        &dir,
        "units.toml",
        r#"
        [[units]]
        id = "hq"
        name = "Headquarters"

        [[units]]
        id = "div-1"
        name = "1st Division"
        parent_id = "hq"
        "#,
    );
    let config_path = write_file(
        &dir,
        "garrison.toml",
        &format!(
            r#"
            [organization]
            units_path = "{}"

            [access]
            unmapped_pages = "deny"
            ownership = "author_id"
            fallback_path = "/home"

            [access.pages]
            "/home" = ["ROLE_HQ", "ROLE_DIV", "ROLE_BN"]
            "/audit" = ["ROLE_HQ"]
            "#,
            units.display()
        ),
    );

    let config = Config::from_file(config_path.to_str().unwrap()).unwrap();

    assert_eq!(config.access.unmapped_pages, UnmappedPolicy::Deny);
    assert_eq!(config.access.unmapped_menus, UnmappedPolicy::Allow);
    assert_eq!(config.access.ownership, OwnershipKey::AuthorId);
    assert_eq!(config.access.fallback_path, "/home");
    assert_eq!(config.access.login_path, "/login");

    let pages = config.access.page_gate();
    assert!(pages.can_access(Some(Role::Battalion), "/home"));
    assert!(!pages.can_access(Some(Role::Division), "/audit"));
    assert!(!pages.can_access(Some(Role::Headquarters), "/dashboard"));

    // Menus were not overridden and keep the built-in table.
    assert!(!config.access.menu_gate().can_access(Some(Role::Battalion), "users"));

    let tree = config.organization.load_tree().unwrap();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.root().name, "Headquarters");
}

#[test]
fn test_missing_sections_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "empty.toml", "");

    let config = Config::from_file(path.to_str().unwrap()).unwrap();
    assert!(config.organization.units_path.is_none());
    assert_eq!(config.access.pages.len(), 10);
    assert_eq!(config.telemetry.service_name, "garrison");
    assert_eq!(config.organization.load_tree().unwrap().len(), 18);
}

#[test]
fn test_load_json_units_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "units.json",
        r#"{"units": [
            {"id": "hq", "name": "HQ"},
            {"id": "div-1", "name": "1st Division", "parentId": "hq", "risk": 62}
        ]}"#,
    );

    let tree = OrgTree::load(&path).unwrap();
    assert_eq!(tree.child_units(Some("hq")).len(), 1);
    assert_eq!(tree.get("div-1").and_then(|u| u.risk), Some(62));
}

#[test]
fn test_broken_units_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let two_roots = write_file(
        &dir,
        "units.json",
        r#"[{"id": "a", "name": "A"}, {"id": "b", "name": "B"}]"#,
    );
    let err = OrgTree::load(&two_roots).unwrap_err();
    assert_eq!(err.code(), ErrorCode::MultipleRootUnits);

    let err = OrgTree::load(dir.path().join("missing.json")).unwrap_err();
    assert_eq!(err.code(), ErrorCode::FileNotFound);

    let garbage = write_file(&dir, "garbage.json", "{ not json");
    let err = OrgTree::load(&garbage).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidJson);
}
