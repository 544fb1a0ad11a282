use crate::error::HierarchyError;
use crate::models::Node;

use super::tree::{Direction, ProjectTree};

/// The drill-down path from a root to the node on screen. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    stack: Vec<String>,
}

impl Navigator {
    pub fn new(root: &str) -> Self {
        Self {
            stack: vec![root.to_string()],
        }
    }

    pub fn stack(&self) -> &[String] {
        &self.stack
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn current(&self) -> &str {
        &self.stack[self.stack.len() - 1]
    }

    pub fn breadcrumbs<'t>(&self, tree: &'t ProjectTree) -> Vec<&'t Node> {
        self.stack.iter().filter_map(|id| tree.get(id)).collect()
    }

    /// Push a child of the current node.
    pub fn drill_down(&mut self, tree: &ProjectTree, child: &str) -> Result<(), HierarchyError> {
        let current = self.current();
        let node = tree
            .get(current)
            .ok_or_else(|| HierarchyError::NodeNotFound(current.to_string()))?;
        if !node.children.iter().any(|c| c == child) || !tree.contains(child) {
            return Err(HierarchyError::NotAChild {
                parent: current.to_string(),
                child: child.to_string(),
            });
        }
        self.stack.push(child.to_string());
        Ok(())
    }

    /// Truncate the stack so breadcrumb `index` is current. Out of range is a
    /// no-op.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index + 1 >= self.stack.len() {
            return false;
        }
        self.stack.truncate(index + 1);
        true
    }

    /// Replace the current node with its previous or next sibling. Clamped at
    /// both ends; returns whether the selection moved.
    pub fn step_sibling(&mut self, tree: &ProjectTree, direction: Direction) -> bool {
        if self.stack.len() < 2 {
            return false;
        }
        let current = self.current();
        let Ok(target) = tree.sibling(current, direction) else {
            return false;
        };
        if target == current {
            return false;
        }
        let target = target.to_string();
        let last = self.stack.len() - 1;
        self.stack[last] = target;
        true
    }

    /// Drop any removed ids from the path, leaving the parent of the
    /// first one on screen.
    pub fn on_deleted(&mut self, removed: &[String]) -> bool {
        let Some(pos) = self.stack.iter().position(|id| removed.contains(id)) else {
            return false;
        };
        self.stack.truncate(pos.max(1));
        true
    }
}
