use crate::error::WorkbookError;
use crate::models::{LineItem, LineItemEdit, LineItemKind, ProductionEdit, ProductionItem};

use super::events::{next_id, DomainEvent, EventHandler};

/// The Assets or the Shots table. Rows keep insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemTable {
    kind: LineItemKind,
    items: Vec<LineItem>,
}

impl LineItemTable {
    pub fn new(kind: LineItemKind, items: Vec<LineItem>) -> Self {
        Self { kind, items }
    }

    pub fn kind(&self) -> LineItemKind {
        self.kind
    }

    pub fn as_slice(&self) -> &[LineItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    fn not_found(&self, id: u64) -> WorkbookError {
        WorkbookError::LineItemNotFound {
            kind: self.kind,
            id,
        }
    }

    pub fn add(&mut self) -> &LineItem {
        let id = next_id(self.items.iter().map(|i| i.id));
        self.items.push(LineItem::new(id, self.kind));
        let last = self.items.len() - 1;
        &self.items[last]
    }

    pub fn remove(&mut self, id: u64) -> Result<LineItem, WorkbookError> {
        let idx = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| self.not_found(id))?;
        Ok(self.items.remove(idx))
    }

    pub fn edit(&mut self, id: u64, edit: LineItemEdit) -> Result<(), WorkbookError> {
        let kind = self.kind;
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(WorkbookError::LineItemNotFound { kind, id })?;
        item.apply_edit(edit);
        Ok(())
    }

    pub fn references(&self, role_name: &str) -> usize {
        self.items.iter().filter(|i| i.is_assigned(role_name)).count()
    }
}

impl EventHandler for LineItemTable {
    fn apply(&mut self, event: &DomainEvent) -> usize {
        match event {
            DomainEvent::RoleRenamed { from, to } => self
                .items
                .iter_mut()
                .map(|item| item.rename_artist(from, to))
                .filter(|changed| *changed)
                .count(),
        }
    }
}

/// Production overhead items, matched to roles by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductionTable {
    items: Vec<ProductionItem>,
}

impl ProductionTable {
    pub fn new(items: Vec<ProductionItem>) -> Self {
        Self { items }
    }

    pub fn as_slice(&self) -> &[ProductionItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductionItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&ProductionItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn add(&mut self, name: &str) -> &ProductionItem {
        let id = next_id(self.items.iter().map(|i| i.id));
        let name = if name.trim().is_empty() {
            "New Item".to_string()
        } else {
            name.trim().to_string()
        };
        self.items.push(ProductionItem::new(id, name));
        let last = self.items.len() - 1;
        &self.items[last]
    }

    pub fn remove(&mut self, id: u64) -> Result<ProductionItem, WorkbookError> {
        let idx = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(WorkbookError::ProductionItemNotFound(id))?;
        Ok(self.items.remove(idx))
    }

    pub fn edit(&mut self, id: u64, edit: ProductionEdit) -> Result<(), WorkbookError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(WorkbookError::ProductionItemNotFound(id))?;
        item.apply_edit(edit);
        Ok(())
    }
}

impl EventHandler for ProductionTable {
    fn apply(&mut self, event: &DomainEvent) -> usize {
        match event {
            DomainEvent::RoleRenamed { from, to } => {
                let mut changed = 0;
                for item in self.items.iter_mut().filter(|i| &i.name == from) {
                    item.name = to.clone();
                    changed += 1;
                }
                changed
            }
        }
    }
}
