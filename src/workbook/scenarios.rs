use rust_decimal::Decimal;

use crate::error::WorkbookError;
use crate::models::{ScenarioEdit, ScenarioParameters};

/// Named scenario parameter sets with exactly one active.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSet {
    scenarios: Vec<ScenarioParameters>,
    active: usize,
}

impl ScenarioSet {
    /// Build from stored rows. Empty input falls back to `fallback`; an
    /// unknown active name falls back to the first scenario.
    pub fn from_rows(
        rows: Vec<ScenarioParameters>,
        active: Option<&str>,
        fallback: impl FnOnce() -> Vec<ScenarioParameters>,
    ) -> Self {
        let mut scenarios: Vec<ScenarioParameters> = Vec::with_capacity(rows.len());
        for s in rows {
            if s.name.trim().is_empty() || scenarios.iter().any(|x| x.name == s.name) {
                log::warn!("Dropping invalid or duplicate scenario '{}'", s.name);
                continue;
            }
            scenarios.push(s);
        }
        if scenarios.is_empty() {
            scenarios = fallback();
        }
        if scenarios.is_empty() {
            scenarios.push(ScenarioParameters::new("Base".into()));
        }
        let active = active
            .and_then(|name| scenarios.iter().position(|s| s.name == name))
            .unwrap_or(0);
        Self { scenarios, active }
    }

    pub fn as_slice(&self) -> &[ScenarioParameters] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn active(&self) -> &ScenarioParameters {
        &self.scenarios[self.active]
    }

    pub fn get(&self, name: &str) -> Option<&ScenarioParameters> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    fn position(&self, name: &str) -> Result<usize, WorkbookError> {
        self.scenarios
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| WorkbookError::ScenarioNotFound(name.to_string()))
    }

    fn check_new_name(&self, name: &str) -> Result<String, WorkbookError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WorkbookError::EmptyName);
        }
        if self.get(name).is_some() {
            return Err(WorkbookError::DuplicateScenario(name.to_string()));
        }
        Ok(name.to_string())
    }

    /// Create a scenario with default parameters and make it active.
    pub fn create(
        &mut self,
        name: &str,
        contingency_percent: Decimal,
    ) -> Result<(), WorkbookError> {
        let name = self.check_new_name(name)?;
        self.scenarios
            .push(ScenarioParameters::with_contingency(name, contingency_percent));
        self.active = self.scenarios.len() - 1;
        Ok(())
    }

    /// Branch: copy the active parameters under a new name and activate it.
    pub fn save_as(&mut self, name: &str) -> Result<(), WorkbookError> {
        let name = self.check_new_name(name)?;
        let copy = ScenarioParameters {
            name,
            ..self.active().clone()
        };
        self.scenarios.push(copy);
        self.active = self.scenarios.len() - 1;
        Ok(())
    }

    pub fn switch(&mut self, name: &str) -> Result<(), WorkbookError> {
        self.active = self.position(name)?;
        Ok(())
    }

    /// Delete a scenario. The last one cannot be deleted. If the active
    /// scenario goes, the first remaining one becomes active.
    pub fn delete(&mut self, name: &str) -> Result<ScenarioParameters, WorkbookError> {
        let idx = self.position(name)?;
        if self.scenarios.len() == 1 {
            return Err(WorkbookError::LastScenario);
        }
        let removed = self.scenarios.remove(idx);
        if idx == self.active {
            self.active = 0;
        } else if idx < self.active {
            self.active -= 1;
        }
        Ok(removed)
    }

    pub fn edit_active(&mut self, edit: ScenarioEdit) {
        self.scenarios[self.active].apply_edit(edit);
    }
}
