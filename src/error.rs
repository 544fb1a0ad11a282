use thiserror::Error;

use crate::models::{LineItemKind, NodeKind};

/// A workbook mutation that was refused. State is unchanged when one of these
/// is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkbookError {
    #[error("cannot delete the last remaining scenario")]
    LastScenario,
    #[error("scenario '{0}' already exists")]
    DuplicateScenario(String),
    #[error("scenario '{0}' not found")]
    ScenarioNotFound(String),
    #[error("a team role named '{0}' already exists")]
    DuplicateRoleName(String),
    #[error("name cannot be empty")]
    EmptyName,
    #[error("team role {0} not found")]
    RoleNotFound(u64),
    #[error("{kind} item {id} not found")]
    LineItemNotFound { kind: LineItemKind, id: u64 },
    #[error("production item {0} not found")]
    ProductionItemNotFound(u64),
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("cannot delete the last budget tab")]
    LastTab,
    #[error("budget tab '{0}' not found")]
    TabNotFound(String),
}

/// A hierarchy mutation or navigation that was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("node '{0}' not found")]
    NodeNotFound(String),
    #[error("cannot delete root node '{0}'")]
    RootDeletion(String),
    #[error("'{0}' is not a root node")]
    NotARoot(String),
    #[error("a {0} cannot have children")]
    LeafNode(NodeKind),
    #[error("'{child}' is not a child of '{parent}'")]
    NotAChild { parent: String, child: String },
}
