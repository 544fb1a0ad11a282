#![allow(clippy::unwrap_used)]

use std::rc::Rc;

use super::*;
use crate::models::NodeKind;
use crate::store::{FailingStore, MemoryStore};

fn sample_tree() -> ProjectTree {
    ProjectTree::from_nodes(seed::project_nodes())
}

fn child_ids(tree: &ProjectTree, id: &str) -> Vec<String> {
    tree.get(id).unwrap().children.clone()
}

// ── Tree queries ──────────────────────────────────────────────

#[test]
fn test_path_and_parent() {
    let tree = sample_tree();
    assert_eq!(
        tree.path("SHOT_001"),
        vec!["PROJ_001", "SQ_001", "SC_001", "SHOT_001"]
    );
    assert_eq!(tree.parent("SC_004").unwrap().id, "SQ_002");
    assert!(tree.parent("PROJ_001").is_none());
    assert!(tree.path("NOPE").is_empty());
}

#[test]
fn test_roots_lists_project_first() {
    let tree = sample_tree();
    let roots: Vec<&str> = tree.roots().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(roots, vec!["PROJ_001", "ASSETS"]);
}

#[test]
fn test_descendants_in_preorder() {
    let tree = sample_tree();
    assert_eq!(
        tree.descendants("SQ_001"),
        vec!["SC_001", "SHOT_001", "SHOT_002", "SC_002", "SHOT_003", "SC_003"]
    );
    assert!(tree.descendants("SHOT_001").is_empty());
}

#[test]
fn test_from_nodes_drops_missing_children() {
    let mut nodes = seed::project_nodes();
    nodes
        .get_mut("SC_003")
        .unwrap()
        .children
        .push("SHOT_999".into());
    let tree = ProjectTree::from_nodes(nodes);
    assert!(tree.get("SC_003").unwrap().children.is_empty());
}

// ── Add / delete / update ─────────────────────────────────────

#[test]
fn test_add_child_creates_next_kind() {
    let mut tree = sample_tree();
    let node = tree.add_child("PROJ_001").unwrap().clone();
    assert_eq!(node.kind, NodeKind::Sequence);
    assert_eq!(node.id, "SEQUENCE_003");
    assert_eq!(node.code, node.id);
    assert_eq!(node.name, "New sequence");
    assert_eq!(node.description, "A new item description.");
    assert_eq!(
        node.image.as_deref(),
        Some("https://picsum.photos/seed/SEQUENCE_003/400/225")
    );
    assert_eq!(child_ids(&tree, "PROJ_001").last().unwrap(), "SEQUENCE_003");
    assert_eq!(tree.parent("SEQUENCE_003").unwrap().id, "PROJ_001");
}

#[test]
fn test_add_child_ids_stay_unique() {
    let mut tree = sample_tree();
    let a = tree.add_child("SC_003").unwrap().id.clone();
    let b = tree.add_child("SC_003").unwrap().id.clone();
    assert_eq!(a, "SHOT_005");
    assert_eq!(b, "SHOT_006");
    assert_eq!(child_ids(&tree, "SC_003"), vec![a, b]);
}

#[test]
fn test_add_child_in_asset_tree() {
    let mut tree = sample_tree();
    let cat = tree.add_child("ASSETS").unwrap().id.clone();
    assert_eq!(tree.get(&cat).unwrap().kind, NodeKind::AssetCategory);
    let asset = tree.add_child(&cat).unwrap();
    assert_eq!(asset.kind, NodeKind::Asset);
}

#[test]
fn test_add_child_below_leaf_rejected() {
    let mut tree = sample_tree();
    let before = tree.clone();
    assert_eq!(
        tree.add_child("SHOT_001").unwrap_err(),
        HierarchyError::LeafNode(NodeKind::Shot)
    );
    assert_eq!(
        tree.add_child("ASSET_001").unwrap_err(),
        HierarchyError::LeafNode(NodeKind::Asset)
    );
    assert_eq!(tree, before);
}

#[test]
fn test_delete_scene_removes_shots_and_unlinks() {
    let mut tree = sample_tree();
    let removed = tree.delete("SC_001").unwrap();
    assert_eq!(removed, vec!["SC_001", "SHOT_001", "SHOT_002"]);
    for id in &removed {
        assert!(!tree.contains(id));
    }
    assert_eq!(child_ids(&tree, "SQ_001"), vec!["SC_002", "SC_003"]);
}

#[test]
fn test_delete_root_rejected_and_unchanged() {
    let mut tree = sample_tree();
    let before = tree.clone();
    assert_eq!(
        tree.delete("PROJ_001").unwrap_err(),
        HierarchyError::RootDeletion("PROJ_001".into())
    );
    assert_eq!(
        tree.delete("ASSETS").unwrap_err(),
        HierarchyError::RootDeletion("ASSETS".into())
    );
    assert_eq!(tree, before);
}

#[test]
fn test_delete_missing_node() {
    let mut tree = sample_tree();
    assert_eq!(
        tree.delete("SC_999").unwrap_err(),
        HierarchyError::NodeNotFound("SC_999".into())
    );
}

#[test]
fn test_update_page_range_orders_and_counts() {
    let mut tree = sample_tree();
    tree.update("SC_004", NodeEdit::PageRange { start: 12, end: 9 })
        .unwrap();
    let scene = tree.get("SC_004").unwrap();
    assert_eq!(scene.page_start, Some(9));
    assert_eq!(scene.page_end, Some(12));
    assert_eq!(scene.pages, Some(3));
}

// ── Siblings ──────────────────────────────────────────────────

#[test]
fn test_sibling_moves_within_parent() {
    let tree = sample_tree();
    assert_eq!(tree.sibling("SC_001", Direction::Next).unwrap(), "SC_002");
    assert_eq!(tree.sibling("SC_002", Direction::Prev).unwrap(), "SC_001");
}

#[test]
fn test_sibling_clamps_at_bounds() {
    let tree = sample_tree();
    assert_eq!(tree.sibling("SC_001", Direction::Prev).unwrap(), "SC_001");
    assert_eq!(tree.sibling("SC_003", Direction::Next).unwrap(), "SC_003");
    assert_eq!(tree.sibling("SC_004", Direction::Next).unwrap(), "SC_004");
    assert_eq!(tree.sibling("PROJ_001", Direction::Next).unwrap(), "PROJ_001");
}

#[test]
fn test_direction_parse() {
    assert_eq!(Direction::parse("Next"), Some(Direction::Next));
    assert_eq!(Direction::parse("prev"), Some(Direction::Prev));
    assert_eq!(Direction::parse("up"), None);
}

// ── Navigator ─────────────────────────────────────────────────

#[test]
fn test_drill_down_and_breadcrumbs() {
    let tree = sample_tree();
    let mut nav = Navigator::new("PROJ_001");
    nav.drill_down(&tree, "SQ_001").unwrap();
    nav.drill_down(&tree, "SC_002").unwrap();
    let names: Vec<&str> = nav.breadcrumbs(&tree).iter().map(|n| n.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Mountain Expedition", "Opening Title Sequence", "Yellow Bug flyover"]
    );
}

#[test]
fn test_drill_down_requires_child() {
    let tree = sample_tree();
    let mut nav = Navigator::new("PROJ_001");
    assert_eq!(
        nav.drill_down(&tree, "SC_001").unwrap_err(),
        HierarchyError::NotAChild {
            parent: "PROJ_001".into(),
            child: "SC_001".into()
        }
    );
    assert_eq!(nav.depth(), 1);
}

#[test]
fn test_jump_to_breadcrumb() {
    let tree = sample_tree();
    let mut nav = Navigator::new("PROJ_001");
    nav.drill_down(&tree, "SQ_001").unwrap();
    nav.drill_down(&tree, "SC_001").unwrap();
    assert!(!nav.jump_to(2));
    assert!(nav.jump_to(0));
    assert_eq!(nav.current(), "PROJ_001");
}

#[test]
fn test_step_sibling_clamped() {
    let tree = sample_tree();
    let mut nav = Navigator::new("PROJ_001");
    assert!(!nav.step_sibling(&tree, Direction::Next));

    nav.drill_down(&tree, "SQ_001").unwrap();
    assert!(!nav.step_sibling(&tree, Direction::Prev));
    assert_eq!(nav.current(), "SQ_001");
    assert!(nav.step_sibling(&tree, Direction::Next));
    assert_eq!(nav.current(), "SQ_002");
    assert!(!nav.step_sibling(&tree, Direction::Next));
    assert_eq!(nav.stack(), ["PROJ_001", "SQ_002"]);
}

#[test]
fn test_on_deleted_steps_back_to_parent() {
    let tree = sample_tree();
    let mut nav = Navigator::new("PROJ_001");
    nav.drill_down(&tree, "SQ_001").unwrap();
    nav.drill_down(&tree, "SC_001").unwrap();
    nav.drill_down(&tree, "SHOT_002").unwrap();

    assert!(!nav.on_deleted(&["SC_004".to_string()]));
    assert!(nav.on_deleted(&["SC_001".to_string(), "SHOT_002".to_string()]));
    assert_eq!(nav.current(), "SQ_001");
}

// ── Browser ───────────────────────────────────────────────────

#[test]
fn test_browser_seeds_store() {
    let store = Rc::new(MemoryStore::new());
    let browser = ProjectBrowser::open(store.clone());
    assert_eq!(browser.current().unwrap().id, seed::PROJECT_ROOT);
    assert!(store.get("project_data").unwrap().is_some());
}

#[test]
fn test_browser_persists_after_mutation() {
    let store = Rc::new(MemoryStore::new());
    let id = {
        let mut browser = ProjectBrowser::open(store.clone());
        let id = browser.add_child("SC_003").unwrap();
        browser
            .update(&id, NodeEdit::Name("Overlook reveal".into()))
            .unwrap();
        id
    };
    let browser = ProjectBrowser::open(store);
    assert_eq!(browser.tree().get(&id).unwrap().name, "Overlook reveal");
    assert_eq!(browser.tree().parent(&id).unwrap().id, "SC_003");
}

#[test]
fn test_browser_delete_current_steps_back() {
    let store = Rc::new(MemoryStore::new());
    let mut browser = ProjectBrowser::open(store);
    browser.drill_down("SQ_002").unwrap();
    browser.drill_down("SC_004").unwrap();
    let before = browser.revision();

    assert_eq!(browser.delete("SC_004").unwrap(), 2);
    assert_eq!(browser.current().unwrap().id, "SQ_002");
    assert!(browser.revision() > before);
}

#[test]
fn test_browser_add_child_to_current() {
    let store = Rc::new(MemoryStore::new());
    let mut browser = ProjectBrowser::open(store);
    browser.drill_down("SQ_002").unwrap();
    let id = browser.add_child_to_current().unwrap();
    assert_eq!(browser.tree().get(&id).unwrap().kind, NodeKind::Scene);
    browser.drill_down(&id).unwrap();
    let shot = browser.add_child_to_current().unwrap();
    browser.drill_down(&shot).unwrap();
    assert_eq!(browser.current().unwrap().kind, NodeKind::Shot);
    assert!(browser.add_child_to_current().is_err());
}

#[test]
fn test_browser_open_root() {
    let store = Rc::new(MemoryStore::new());
    let mut browser = ProjectBrowser::open(store);
    browser.open_root(seed::ASSET_ROOT).unwrap();
    assert_eq!(browser.navigator().stack(), [seed::ASSET_ROOT]);
    assert_eq!(
        browser.open_root("SQ_001").unwrap_err(),
        HierarchyError::NotARoot("SQ_001".into())
    );
}

#[test]
fn test_browser_corrupt_data_falls_back() {
    let store = Rc::new(MemoryStore::new());
    store.set("project_data", "[1, 2").unwrap();
    let browser = ProjectBrowser::open(store.clone());
    assert_eq!(browser.tree().len(), seed::project_nodes().len());
    assert_eq!(store.get("project_data").unwrap().as_deref(), Some("[1, 2"));
}

#[test]
fn test_browser_with_failing_store() {
    let mut browser = ProjectBrowser::open(Rc::new(FailingStore));
    let id = browser.add_child(seed::PROJECT_ROOT).unwrap();
    assert!(browser.tree().contains(&id));
}
