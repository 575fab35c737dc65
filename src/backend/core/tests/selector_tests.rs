//! Integration tests for the cascading unit selector.

use std::cell::RefCell;

use garrison_core::org::{OrgTree, Unit};
use garrison_core::rbac::Role;
use garrison_core::selector::{CascadeSelector, SelectorError, SelectorLevel};

fn drill_down_tree() -> OrgTree {
    OrgTree::new(vec![
        Unit::new("hq", "HQ"),
        Unit::new("div-1", "1st Division").with_parent("hq"),
        Unit::new("div-3", "3rd Division").with_parent("hq"),
        Unit::new("bn-1-1", "1st Battalion").with_parent("div-1"),
        Unit::new("bn-1-2", "2nd Battalion").with_parent("div-1"),
    ])
    .unwrap()
}

fn option_ids<'a>(level: &'a SelectorLevel<'_>) -> Vec<&'a str> {
    level.options.iter().map(|u| u.id.as_str()).collect()
}

#[test]
fn test_drill_down_scenario() {
    let tree = drill_down_tree();
    let emitted = RefCell::new(Vec::new());
    let mut selector = CascadeSelector::new(&tree)
        .anchored_at("hq")
        .with_value("")
        .on_change(|id| emitted.borrow_mut().push(id.to_string()));

    let levels = selector.levels();
    assert_eq!(levels.len(), 1);
    assert_eq!(option_ids(&levels[0]), vec!["div-1", "div-3"]);

    selector.select(0, "div-1").unwrap();
    let levels = selector.levels();
    assert_eq!(levels.len(), 2);
    assert_eq!(option_ids(&levels[1]), vec!["bn-1-1", "bn-1-2"]);
    assert!(levels[1].is_idle());

    selector.select(1, "bn-1-1").unwrap();
    let levels = selector.levels();
    assert_eq!(levels.len(), 2);
    assert_eq!(levels[1].selected.as_ref().map(|id| id.as_str()), Some("bn-1-1"));

    drop(selector);
    assert_eq!(emitted.into_inner(), vec!["div-1", "bn-1-1"]);
}

#[test]
fn test_external_value_drives_the_path() {
    let tree = OrgTree::seed().unwrap();
    let mut selector = CascadeSelector::new(&tree).with_value("bn-11-3");

    assert_eq!(
        selector.display_path(),
        "Army Headquarters > Ground Operations Command > I Corps > 1st Infantry Division \
         > 11th Infantry Regiment > 3rd Battalion, 11th Regiment"
    );
    assert_eq!(selector.selections().len(), 6);
    // The battalion is a leaf: no extra level is offered.
    assert_eq!(selector.visible_levels(), 6);

    selector.set_value("corps-2");
    assert_eq!(selector.value(), "corps-2");
    assert_eq!(selector.visible_levels(), 4);
}

#[test]
fn test_every_rendered_level_is_consistent_with_the_tree() {
    let tree = OrgTree::seed().unwrap();

    for unit in tree.iter() {
        let selector = CascadeSelector::new(&tree).with_value(unit.id.as_str());
        let levels = selector.levels();
        for pair in levels.windows(2) {
            let parent = pair[0].selected.as_ref().unwrap();
            for option in &pair[1].options {
                assert_eq!(option.parent_id.as_ref(), Some(parent));
            }
        }
        assert_eq!(selector.value(), unit.id.as_str());
    }
}

#[test]
fn test_reselecting_a_shallow_level_truncates() {
    let tree = OrgTree::seed().unwrap();
    let mut selector = CascadeSelector::new(&tree).with_value("bn-1-2");

    selector.select(2, "corps-2").unwrap();
    assert_eq!(selector.value(), "corps-2");
    assert_eq!(selector.selections().len(), 3);
    assert_eq!(selector.visible_levels(), 4);
}

#[test]
fn test_clear_reports_the_remaining_value() {
    let tree = drill_down_tree();
    let emitted = RefCell::new(Vec::new());
    let mut selector = CascadeSelector::new(&tree)
        .anchored_at("hq")
        .with_value("bn-1-2")
        .on_change(|id| emitted.borrow_mut().push(id.to_string()));

    assert_eq!(selector.clear(1).unwrap(), "div-1");
    assert_eq!(selector.clear(0).unwrap(), "");
    assert_eq!(selector.levels().len(), 1);

    drop(selector);
    assert_eq!(emitted.into_inner(), vec!["div-1", ""]);
}

#[test]
fn test_session_pickers() {
    let tree = OrgTree::seed().unwrap();

    let division = CascadeSelector::for_session(&tree, Some(Role::Division), "div-1");
    assert!(!division.is_fixed());
    assert_eq!(option_ids(&division.levels()[0]), vec!["div-1"]);
    assert_eq!(
        option_ids(&division.levels()[1]),
        vec!["bn-1-1", "bn-1-2", "reg-11"]
    );

    let mut battalion = CascadeSelector::for_session(&tree, Some(Role::Battalion), "bn-3-1");
    assert!(battalion.is_fixed());
    assert_eq!(battalion.value(), "bn-3-1");
    assert_eq!(battalion.clear(0), Err(SelectorError::Fixed));
    assert_eq!(battalion.value(), "bn-3-1");

    // A stale home unit fails closed even for headquarters.
    let mut stale = CascadeSelector::for_session(&tree, Some(Role::Headquarters), "div-99");
    assert!(stale.levels()[0].options.is_empty());
    assert_eq!(stale.value(), "");
    assert_eq!(
        stale.select(0, "hq"),
        Err(SelectorError::InvalidOption { level: 0, unit_id: "hq".into() })
    );
    assert_eq!(stale.value(), "");
}

#[test]
fn test_detached_value_clears_path() {
    let tree = OrgTree::new(vec![
        Unit::new("hq", "HQ"),
        Unit::new("div-1", "1st Division").with_parent("hq"),
        Unit::new("orphan", "Orphan Battalion").with_parent("ghost"),
        Unit::new("orphan-co", "Orphan Company").with_parent("orphan"),
    ])
    .unwrap();

    let mut selector = CascadeSelector::new(&tree).with_value("orphan-co");
    assert!(selector.selections().is_empty());
    let levels = selector.levels();
    assert_eq!(levels.len(), 1);
    assert_eq!(option_ids(&levels[0]), vec!["hq"]);
    assert!(levels[0].is_idle());

    selector.set_value("div-1");
    assert_eq!(selector.value(), "div-1");
    selector.set_value("orphan");
    assert_eq!(selector.value(), "");
}
