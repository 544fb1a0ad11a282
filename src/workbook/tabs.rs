use serde::{Deserialize, Serialize};
use std::rc::Rc;

use crate::error::WorkbookError;
use crate::store::{keys, load_json, remove_key, save_json, KeyValueStore, Loaded};

pub const DEFAULT_TAB_ID: &str = "main";
const DEFAULT_TAB_NAME: &str = "Main Budget";

/// One independently persisted workbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetTab {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: String,
}

impl BudgetTab {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// The list of budget tabs, persisted under `budget_tabs`.
pub struct TabRegistry {
    store: Rc<dyn KeyValueStore>,
    tabs: Vec<BudgetTab>,
}

impl TabRegistry {
    pub fn open(store: Rc<dyn KeyValueStore>) -> Self {
        let loaded = load_json::<Vec<BudgetTab>>(store.as_ref(), keys::BUDGET_TABS);
        let seed = matches!(loaded, Loaded::Missing);
        let tabs = match loaded.ok() {
            Some(tabs) if !tabs.is_empty() => tabs,
            _ => vec![BudgetTab::new(DEFAULT_TAB_ID.into(), DEFAULT_TAB_NAME.into())],
        };
        let registry = Self { store, tabs };
        if seed {
            registry.save();
        }
        registry
    }

    fn save(&self) {
        save_json(self.store.as_ref(), keys::BUDGET_TABS, &self.tabs);
    }

    pub fn tabs(&self) -> &[BudgetTab] {
        &self.tabs
    }

    pub fn get(&self, id: &str) -> Option<&BudgetTab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    /// First tab, used when no tab is requested.
    pub fn first(&self) -> &BudgetTab {
        &self.tabs[0]
    }

    pub fn create(&mut self, name: &str) -> Result<&BudgetTab, WorkbookError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WorkbookError::EmptyName);
        }
        let mut n = self.tabs.len() + 1;
        let mut id = format!("budget_{n}");
        while self.get(&id).is_some() {
            n += 1;
            id = format!("budget_{n}");
        }
        self.tabs.push(BudgetTab::new(id, name.to_string()));
        self.save();
        log::info!("Created budget tab '{name}'");
        let last = self.tabs.len() - 1;
        Ok(&self.tabs[last])
    }

    pub fn rename(&mut self, id: &str, name: &str) -> Result<(), WorkbookError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WorkbookError::EmptyName);
        }
        let tab = self
            .tabs
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| WorkbookError::TabNotFound(id.to_string()))?;
        tab.name = name.to_string();
        self.save();
        Ok(())
    }

    /// Delete a tab and every stored collection belonging to it.
    pub fn delete(&mut self, id: &str) -> Result<BudgetTab, WorkbookError> {
        let idx = self
            .tabs
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| WorkbookError::TabNotFound(id.to_string()))?;
        if self.tabs.len() == 1 {
            return Err(WorkbookError::LastTab);
        }
        let removed = self.tabs.remove(idx);
        for logical in keys::WORKBOOK_COLLECTIONS {
            remove_key(self.store.as_ref(), &keys::workbook_key(logical, &removed.id));
        }
        self.save();
        log::info!("Deleted budget tab '{}'", removed.name);
        Ok(removed)
    }
}
