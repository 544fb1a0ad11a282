use crate::error::WorkbookError;
use crate::models::{RoleEdit, TeamRole};

use super::events::{next_id, DomainEvent};

const NEW_ROLE_NAME: &str = "New Role";

/// The team roster. Role names are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleTable {
    roles: Vec<TeamRole>,
}

impl RoleTable {
    /// Build from stored rows. Later duplicates of a name are dropped.
    pub fn from_rows(rows: Vec<TeamRole>) -> Self {
        let mut roles: Vec<TeamRole> = Vec::with_capacity(rows.len());
        for role in rows {
            if roles.iter().any(|r| r.name == role.name) {
                log::warn!("Dropping duplicate team role '{}'", role.name);
                continue;
            }
            roles.push(role);
        }
        Self { roles }
    }

    pub fn as_slice(&self) -> &[TeamRole] {
        &self.roles
    }

    pub fn iter(&self) -> impl Iterator<Item = &TeamRole> {
        self.roles.iter()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&TeamRole> {
        self.roles.iter().find(|r| r.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&TeamRole> {
        self.roles.iter().find(|r| r.name == name)
    }

    pub fn total_headcount(&self) -> u64 {
        self.roles.iter().map(|r| u64::from(r.headcount)).sum()
    }

    /// Add a role with default values and a unique placeholder name.
    pub fn add(&mut self) -> &TeamRole {
        let mut name = NEW_ROLE_NAME.to_string();
        let mut n = 2;
        while self.find_by_name(&name).is_some() {
            name = format!("{NEW_ROLE_NAME} {n}");
            n += 1;
        }
        self.push(name)
    }

    pub fn add_named(&mut self, name: &str) -> Result<&TeamRole, WorkbookError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WorkbookError::EmptyName);
        }
        if self.find_by_name(name).is_some() {
            return Err(WorkbookError::DuplicateRoleName(name.to_string()));
        }
        Ok(self.push(name.to_string()))
    }

    fn push(&mut self, name: String) -> &TeamRole {
        let id = next_id(self.roles.iter().map(|r| r.id));
        self.roles.push(TeamRole::new(id, name));
        let last = self.roles.len() - 1;
        &self.roles[last]
    }

    pub fn remove(&mut self, id: u64) -> Result<TeamRole, WorkbookError> {
        let idx = self
            .roles
            .iter()
            .position(|r| r.id == id)
            .ok_or(WorkbookError::RoleNotFound(id))?;
        Ok(self.roles.remove(idx))
    }

    pub fn edit(&mut self, id: u64, edit: RoleEdit) -> Result<(), WorkbookError> {
        let role = self
            .roles
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(WorkbookError::RoleNotFound(id))?;
        role.apply_edit(edit);
        Ok(())
    }

    /// Rename a role. Returns the event other collections must apply, or
    /// `None` when the name did not change.
    pub fn rename(
        &mut self,
        id: u64,
        new_name: &str,
    ) -> Result<Option<DomainEvent>, WorkbookError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(WorkbookError::EmptyName);
        }
        let current = self.get(id).ok_or(WorkbookError::RoleNotFound(id))?;
        if current.name == new_name {
            return Ok(None);
        }
        if self.find_by_name(new_name).is_some() {
            return Err(WorkbookError::DuplicateRoleName(new_name.to_string()));
        }

        let role = self
            .roles
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(WorkbookError::RoleNotFound(id))?;
        let from = std::mem::replace(&mut role.name, new_name.to_string());
        Ok(Some(DomainEvent::RoleRenamed {
            from,
            to: new_name.to_string(),
        }))
    }
}
