//! The project and asset hierarchy browser.

mod navigator;
mod tree;

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::HierarchyError;
use crate::models::{Node, NodeEdit};
use crate::seed;
use crate::store::{keys, load_json, save_json, KeyValueStore, Loaded};

pub use navigator::Navigator;
pub use tree::{Direction, ProjectTree};

/// A tree plus the view stack over it, saved under `project_data` after
/// every structural change or edit.
pub struct ProjectBrowser {
    store: Rc<dyn KeyValueStore>,
    tree: ProjectTree,
    navigator: Navigator,
    revision: u64,
}

impl ProjectBrowser {
    pub fn open(store: Rc<dyn KeyValueStore>) -> Self {
        let loaded = load_json::<BTreeMap<String, Node>>(store.as_ref(), keys::PROJECT_DATA);
        let seed_store = matches!(loaded, Loaded::Missing);
        let mut tree = ProjectTree::from_nodes(loaded.ok().unwrap_or_else(seed::project_nodes));

        let first_root = tree.roots().first().map(|n| n.id.clone());
        let root = match first_root {
            Some(root) => root,
            None => {
                log::warn!("Stored project data has no root node, using the sample project");
                tree = ProjectTree::from_nodes(seed::project_nodes());
                seed::PROJECT_ROOT.to_string()
            }
        };

        let browser = Self {
            store,
            tree,
            navigator: Navigator::new(&root),
            revision: 0,
        };
        if seed_store {
            browser.persist();
        }
        log::debug!("Opened project tree with {} node(s)", browser.tree.len());
        browser
    }

    fn persist(&self) {
        save_json(self.store.as_ref(), keys::PROJECT_DATA, self.tree.nodes());
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.persist();
    }

    pub fn tree(&self) -> &ProjectTree {
        &self.tree
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn current(&self) -> Option<&Node> {
        self.tree.get(self.navigator.current())
    }

    pub fn breadcrumbs(&self) -> Vec<&Node> {
        self.navigator.breadcrumbs(&self.tree)
    }

    // ── Navigation ────────────────────────────────────────────

    /// Start a fresh view stack at a root, e.g. to switch to the asset tree.
    pub fn open_root(&mut self, id: &str) -> Result<(), HierarchyError> {
        let node = self
            .tree
            .get(id)
            .ok_or_else(|| HierarchyError::NodeNotFound(id.to_string()))?;
        if self.tree.parent(id).is_some() || !node.kind.is_root() {
            return Err(HierarchyError::NotARoot(id.to_string()));
        }
        self.navigator = Navigator::new(id);
        Ok(())
    }

    pub fn drill_down(&mut self, child: &str) -> Result<(), HierarchyError> {
        self.navigator.drill_down(&self.tree, child)
    }

    pub fn jump_to(&mut self, index: usize) -> bool {
        self.navigator.jump_to(index)
    }

    pub fn navigate_sibling(&mut self, direction: Direction) -> bool {
        self.navigator.step_sibling(&self.tree, direction)
    }

    // ── Mutations ─────────────────────────────────────────────

    pub fn add_child(&mut self, parent: &str) -> Result<String, HierarchyError> {
        let id = self.tree.add_child(parent)?.id.clone();
        self.touch();
        log::info!("Added '{id}' under '{parent}'");
        Ok(id)
    }

    pub fn add_child_to_current(&mut self) -> Result<String, HierarchyError> {
        let parent = self.navigator.current().to_string();
        self.add_child(&parent)
    }

    /// Delete a node and its subtree. If the view was inside it, the view
    /// steps back to the deleted node's parent. Returns how many nodes went.
    pub fn delete(&mut self, id: &str) -> Result<usize, HierarchyError> {
        let removed = self.tree.delete(id)?;
        self.navigator.on_deleted(&removed);
        self.touch();
        log::info!("Deleted '{id}' and {} descendant(s)", removed.len() - 1);
        Ok(removed.len())
    }

    pub fn update(&mut self, id: &str, edit: NodeEdit) -> Result<(), HierarchyError> {
        self.tree.update(id, edit)?;
        self.touch();
        Ok(())
    }
}

#[cfg(test)]
mod tests;
