use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::HierarchyError;
use crate::models::{Node, NodeEdit, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "prev" | "previous" | "p" | "left" => Some(Self::Prev),
            "next" | "n" | "right" => Some(Self::Next),
            _ => None,
        }
    }
}

/// Id-keyed node table. Edges live in each node's ordered `children`; the
/// parent index is derived from them and never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectTree {
    nodes: BTreeMap<String, Node>,
    parents: HashMap<String, String>,
}

impl ProjectTree {
    /// Build from a stored table. Child ids with no node behind them are
    /// dropped, as is a second parent claiming an already-parented node.
    pub fn from_nodes(mut nodes: BTreeMap<String, Node>) -> Self {
        let known: HashSet<String> = nodes.keys().cloned().collect();
        let mut parents = HashMap::new();
        for node in nodes.values_mut() {
            let id = node.id.clone();
            node.children.retain(|child| {
                if !known.contains(child) {
                    log::warn!("Node '{id}' lists missing child '{child}'");
                    return false;
                }
                if child == &id || parents.contains_key(child) {
                    log::warn!("Ignoring extra parent '{id}' of '{child}'");
                    return false;
                }
                parents.insert(child.clone(), id.clone());
                true
            });
        }
        Self { nodes, parents }
    }

    pub fn nodes(&self) -> &BTreeMap<String, Node> {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    fn require(&self, id: &str) -> Result<&Node, HierarchyError> {
        self.nodes
            .get(id)
            .ok_or_else(|| HierarchyError::NodeNotFound(id.to_string()))
    }

    /// Top-level nodes of each tree, project roots first.
    pub fn roots(&self) -> Vec<&Node> {
        let mut roots: Vec<&Node> = self
            .nodes
            .values()
            .filter(|n| n.kind.is_root() && !self.parents.contains_key(&n.id))
            .collect();
        roots.sort_by_key(|n| n.kind != NodeKind::Project);
        roots
    }

    pub fn children(&self, id: &str) -> Vec<&Node> {
        self.nodes
            .get(id)
            .map(|n| n.children.iter().filter_map(|c| self.nodes.get(c)).collect())
            .unwrap_or_default()
    }

    pub fn parent(&self, id: &str) -> Option<&Node> {
        self.parents.get(id).and_then(|p| self.nodes.get(p))
    }

    /// Ids from the top of the tree down to `id`, inclusive.
    pub fn path(&self, id: &str) -> Vec<String> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut path = vec![id.to_string()];
        let mut cursor = id;
        while let Some(parent) = self.parents.get(cursor) {
            if path.contains(parent) {
                break;
            }
            path.push(parent.clone());
            cursor = parent;
        }
        path.reverse();
        path
    }

    /// Every node below `id` in pre-order, excluding `id`.
    pub fn descendants(&self, id: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack: Vec<&str> = self
            .nodes
            .get(id)
            .map(|n| n.children.iter().rev().map(String::as_str).collect())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            if out.iter().any(|seen| seen == next) {
                continue;
            }
            out.push(next.to_string());
            if let Some(node) = self.nodes.get(next) {
                stack.extend(node.children.iter().rev().map(String::as_str));
            }
        }
        out
    }

    fn next_id(&self, kind: NodeKind) -> String {
        let prefix = kind.id_prefix();
        let mut n = self.nodes.values().filter(|n| n.kind == kind).count() + 1;
        loop {
            let id = format!("{prefix}_{n:03}");
            if !self.nodes.contains_key(&id) {
                return id;
            }
            n += 1;
        }
    }

    /// Append a new child of the next kind down. Leaf kinds are refused.
    pub fn add_child(&mut self, parent_id: &str) -> Result<&Node, HierarchyError> {
        let parent = self.require(parent_id)?;
        let kind = parent
            .kind
            .child_kind()
            .ok_or(HierarchyError::LeafNode(parent.kind))?;
        let id = self.next_id(kind);

        if let Some(parent) = self.nodes.get_mut(parent_id) {
            parent.children.push(id.clone());
        }
        self.parents.insert(id.clone(), parent_id.to_string());
        let node = self
            .nodes
            .entry(id.clone())
            .or_insert_with(|| Node::new(id, kind));
        Ok(node)
    }

    /// Remove a node with its whole subtree and unlink it from its parent.
    /// Returns the removed ids, `id` first.
    pub fn delete(&mut self, id: &str) -> Result<Vec<String>, HierarchyError> {
        let node = self.require(id)?;
        if node.kind.is_root() {
            return Err(HierarchyError::RootDeletion(id.to_string()));
        }

        let mut removed = vec![id.to_string()];
        removed.extend(self.descendants(id));
        for gone in &removed {
            self.nodes.remove(gone);
            self.parents.remove(gone);
        }
        for node in self.nodes.values_mut() {
            node.children.retain(|c| c != id);
        }
        Ok(removed)
    }

    pub fn update(&mut self, id: &str, edit: NodeEdit) -> Result<(), HierarchyError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| HierarchyError::NodeNotFound(id.to_string()))?;
        node.apply_edit(edit);
        Ok(())
    }

    /// The neighbour of `id` among its parent's children, clamped at both
    /// ends. A node without a parent is its own neighbour.
    pub fn sibling(&self, id: &str, direction: Direction) -> Result<&str, HierarchyError> {
        let node = self.require(id)?;
        let Some(parent) = self.parent(id) else {
            return Ok(node.id.as_str());
        };
        let siblings = &parent.children;
        let Some(idx) = siblings.iter().position(|c| c == id) else {
            return Ok(node.id.as_str());
        };
        let target = match direction {
            Direction::Prev => idx.saturating_sub(1),
            Direction::Next => (idx + 1).min(siblings.len() - 1),
        };
        Ok(siblings[target].as_str())
    }
}
