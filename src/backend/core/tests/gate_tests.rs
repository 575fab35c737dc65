//! Integration tests for page, menu and content gates.

use garrison_core::rbac::{
    can_create_content, can_delete_content, can_edit_content, AccessTable, Author, ContentKind,
    MenuGate, OwnershipGate, OwnershipKey, PageGate, Role, UnmappedPolicy,
};

const HQ: Option<Role> = Some(Role::Headquarters);
const DIV: Option<Role> = Some(Role::Division);
const BN: Option<Role> = Some(Role::Battalion);

#[test]
fn test_default_page_table() {
    let gate = PageGate::default();

    for page in ["/dashboard", "/forecast", "/chatbot", "/reports", "/admin/schedule"] {
        for role in Role::all() {
            assert!(gate.can_access(Some(role), page), "{} on {}", role, page);
        }
    }
    for page in ["/admin/notice", "/admin/users"] {
        assert!(gate.can_access(HQ, page));
        assert!(gate.can_access(DIV, page));
        assert!(!gate.can_access(BN, page));
    }
    for page in ["/data", "/admin/settings", "/admin/chatbot-starter"] {
        assert!(gate.can_access(HQ, page));
        assert!(!gate.can_access(DIV, page));
        assert!(!gate.can_access(BN, page));
    }
}

#[test]
fn test_nested_routes_inherit_their_prefix() {
    let gate = PageGate::default();
    assert!(!gate.can_access(DIV, "/admin/settings/thresholds"));
    assert!(gate.can_access(DIV, "/admin/users/42"));
    assert!(!gate.can_access(BN, "/data/upload"));
}

#[test]
fn test_most_specific_prefix_wins() {
    let gate = PageGate::new(
        AccessTable::new()
            .with_entry("/admin", [Role::Headquarters, Role::Division])
            .with_entry("/admin/settings", [Role::Headquarters])
            .with_entry("/admin/settings/profile", Role::all()),
    );

    assert!(!gate.can_access(BN, "/admin/audit"));
    assert!(!gate.can_access(DIV, "/admin/settings/x"));
    assert!(gate.can_access(BN, "/admin/settings/profile/photo"));
    assert_eq!(gate.matching_key("/admin/settings/x"), Some("/admin/settings"));
}

#[test]
fn test_unmapped_routes_and_menus_default_to_allow() {
    let pages = PageGate::default();
    let menus = MenuGate::default();

    assert_eq!(pages.unmapped_policy(), UnmappedPolicy::Allow);
    for role in Role::all() {
        assert!(pages.can_access(Some(role), "/font-preview"));
        assert!(menus.can_access(Some(role), "font-preview"));
    }
}

#[test]
fn test_deny_policy_closes_unmapped_entries() {
    let pages = PageGate::default().with_unmapped(UnmappedPolicy::Deny);
    let menus = MenuGate::default().with_unmapped(UnmappedPolicy::Deny);

    assert!(!pages.can_access(HQ, "/font-preview"));
    assert!(!menus.can_access(HQ, "font-preview"));
    assert!(pages.can_access(BN, "/reports"));
}

#[test]
fn test_missing_role_is_denied_everywhere() {
    let pages = PageGate::default();
    let menus = MenuGate::default();

    assert!(pages.decide(None, "/dashboard").is_denied());
    assert!(pages.decide(None, "/font-preview").is_denied());
    assert!(!menus.can_access(None, "dashboard"));
    assert!(menus.visible_menus(None, ["dashboard", "reports"]).is_empty());
}

#[test]
fn test_side_navigation() {
    let menus = MenuGate::default();
    let nav = [
        "dashboard", "forecast", "chatbot", "reports", "notice", "schedule", "data", "users",
        "settings",
    ];

    assert_eq!(menus.visible_menus(HQ, nav).len(), 9);
    assert_eq!(
        menus.visible_menus(DIV, nav),
        vec!["dashboard", "forecast", "chatbot", "reports", "notice", "schedule", "users"]
    );
    assert_eq!(
        menus.visible_menus(BN, nav),
        vec!["dashboard", "forecast", "chatbot", "reports", "schedule"]
    );
}

#[test]
fn test_ownership_scenario() {
    assert!(can_edit_content(BN, "Kim", "Kim"));
    assert!(!can_edit_content(BN, "Kim", "Lee"));
    assert!(can_edit_content(HQ, "Kim", "Lee"));
    assert_eq!(can_delete_content(DIV, "Kim", "Lee"), can_edit_content(DIV, "Kim", "Lee"));
}

#[test]
fn test_same_name_authors_by_key() {
    let first_kim = Author::named("Kim").with_id("101");
    let second_kim = Author::named("Kim").with_id("202");

    let by_name = OwnershipGate::new(OwnershipKey::DisplayName);
    let by_id = OwnershipGate::new(OwnershipKey::AuthorId);

    assert!(by_name.can_edit(BN, &first_kim, &second_kim));
    assert!(!by_id.can_edit(BN, &first_kim, &second_kim));
    assert!(by_id.can_edit(BN, &first_kim, &first_kim));
}

#[test]
fn test_creation_rights() {
    assert!(can_create_content(DIV, ContentKind::Notice));
    assert!(!can_create_content(BN, ContentKind::Notice));
    assert!(can_create_content(BN, ContentKind::Schedule));
    assert!(can_create_content(BN, ContentKind::Report));
    assert!(!can_create_content(BN, ContentKind::User));
    assert!(can_create_content(HQ, ContentKind::User));
}
