//! The budget workbook: team roster, line items, production overhead and
//! scenarios, with persistence after every mutation.

mod events;
mod line_items;
mod roles;
mod scenarios;
mod tabs;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::rc::Rc;

use crate::engine::{self, ProductionCostFormula, RollupInput, Summary};
use crate::error::WorkbookError;
use crate::models::{
    LineItem, LineItemEdit, LineItemKind, ProductionEdit, ProductionItem, RoleEdit, ScenarioEdit,
    ScenarioParameters, TeamRole, DEFAULT_CONTINGENCY_PERCENT,
};
use crate::seed;
use crate::store::{keys, load_json, save_json, KeyValueStore, Loaded};

pub use events::{DomainEvent, EventHandler};
pub use line_items::{LineItemTable, ProductionTable};
pub use roles::RoleTable;
pub use scenarios::ScenarioSet;
pub use tabs::{BudgetTab, TabRegistry, DEFAULT_TAB_ID};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkbookOptions {
    /// Contingency given to scenarios created from scratch.
    pub default_contingency_percent: Decimal,
    pub production_cost_formula: ProductionCostFormula,
}

impl Default for WorkbookOptions {
    fn default() -> Self {
        Self {
            default_contingency_percent: Decimal::from(DEFAULT_CONTINGENCY_PERCENT),
            production_cost_formula: ProductionCostFormula::RateBased,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collection {
    Roles,
    Assets,
    Shots,
    Production,
    Scenarios,
}

impl From<LineItemKind> for Collection {
    fn from(kind: LineItemKind) -> Self {
        match kind {
            LineItemKind::Asset => Self::Assets,
            LineItemKind::Shot => Self::Shots,
        }
    }
}

pub struct Workbook {
    id: String,
    store: Rc<dyn KeyValueStore>,
    options: WorkbookOptions,
    roles: RoleTable,
    assets: LineItemTable,
    shots: LineItemTable,
    production: ProductionTable,
    scenarios: ScenarioSet,
    revision: u64,
}

/// Read one collection. Missing keys are seeded with the default dataset;
/// unreadable values fall back to it without overwriting what is stored.
fn load_or_seed<T, F>(store: &dyn KeyValueStore, key: &str, default: F) -> T
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> T,
{
    match load_json(store, key) {
        Loaded::Value(v) => v,
        Loaded::Missing => {
            let value = default();
            save_json(store, key, &value);
            value
        }
        Loaded::Unreadable => default(),
    }
}

impl Workbook {
    pub fn open(id: &str, store: Rc<dyn KeyValueStore>, options: WorkbookOptions) -> Self {
        let mut workbook = Self {
            id: id.to_string(),
            store,
            options,
            roles: RoleTable::default(),
            assets: LineItemTable::new(LineItemKind::Asset, Vec::new()),
            shots: LineItemTable::new(LineItemKind::Shot, Vec::new()),
            production: ProductionTable::default(),
            scenarios: ScenarioSet::from_rows(Vec::new(), None, seed::scenarios),
            revision: 0,
        };
        workbook.reload();
        log::debug!("Opened workbook '{id}'");
        workbook
    }

    /// Re-read every collection from the store.
    pub fn reload(&mut self) {
        let store = self.store.as_ref();
        let key = |logical: &str| keys::workbook_key(logical, &self.id);

        let roles: Vec<TeamRole> = load_or_seed(store, &key(keys::TEAM_ROLES), seed::team_roles);
        let assets: Vec<LineItem> = load_or_seed(store, &key(keys::ASSETS), seed::assets);
        let shots: Vec<LineItem> = load_or_seed(store, &key(keys::SHOTS), seed::shots);
        let production: Vec<ProductionItem> =
            load_or_seed(store, &key(keys::PRODUCTION), seed::production_items);
        let scenarios: Vec<ScenarioParameters> =
            load_or_seed(store, &key(keys::SCENARIOS), seed::scenarios);
        let active: Option<String> = load_json(store, &key(keys::ACTIVE_SCENARIO)).ok();

        self.roles = RoleTable::from_rows(roles);
        self.assets = LineItemTable::new(LineItemKind::Asset, assets);
        self.shots = LineItemTable::new(LineItemKind::Shot, shots);
        self.production = ProductionTable::new(production);
        self.scenarios = ScenarioSet::from_rows(scenarios, active.as_deref(), seed::scenarios);
        self.revision += 1;
    }

    fn persist(&self, collection: Collection) {
        let store = self.store.as_ref();
        let key = |logical: &str| keys::workbook_key(logical, &self.id);
        match collection {
            Collection::Roles => save_json(store, &key(keys::TEAM_ROLES), self.roles.as_slice()),
            Collection::Assets => save_json(store, &key(keys::ASSETS), self.assets.as_slice()),
            Collection::Shots => save_json(store, &key(keys::SHOTS), self.shots.as_slice()),
            Collection::Production => {
                save_json(store, &key(keys::PRODUCTION), self.production.as_slice())
            }
            Collection::Scenarios => {
                save_json(store, &key(keys::SCENARIOS), self.scenarios.as_slice());
                save_json(
                    store,
                    &key(keys::ACTIVE_SCENARIO),
                    &self.scenarios.active().name,
                );
            }
        }
    }

    fn touch(&mut self, collections: &[Collection]) {
        self.revision += 1;
        for c in collections {
            self.persist(*c);
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Bumped on every successful mutation and reload.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn options(&self) -> &WorkbookOptions {
        &self.options
    }

    pub fn roles(&self) -> &RoleTable {
        &self.roles
    }

    pub fn assets(&self) -> &LineItemTable {
        &self.assets
    }

    pub fn shots(&self) -> &LineItemTable {
        &self.shots
    }

    pub fn line_items(&self, kind: LineItemKind) -> &LineItemTable {
        match kind {
            LineItemKind::Asset => &self.assets,
            LineItemKind::Shot => &self.shots,
        }
    }

    fn line_items_mut(&mut self, kind: LineItemKind) -> &mut LineItemTable {
        match kind {
            LineItemKind::Asset => &mut self.assets,
            LineItemKind::Shot => &mut self.shots,
        }
    }

    pub fn production(&self) -> &ProductionTable {
        &self.production
    }

    pub fn scenarios(&self) -> &ScenarioSet {
        &self.scenarios
    }

    pub fn active_scenario(&self) -> &ScenarioParameters {
        self.scenarios.active()
    }

    // ── Computed values ───────────────────────────────────────

    /// (extra artists, estimate multiplier) of the active scenario for a table.
    fn scenario_factors(&self, kind: LineItemKind) -> (i32, Decimal) {
        let s = self.scenarios.active();
        match kind {
            LineItemKind::Asset => (s.assets_extra_artists, s.assets_estimate_multiplier),
            LineItemKind::Shot => (s.shots_extra_artists, s.shots_estimate_multiplier),
        }
    }

    pub fn summary(&self) -> Summary {
        engine::summarize(&RollupInput {
            roles: self.roles.as_slice(),
            assets: self.assets.as_slice(),
            shots: self.shots.as_slice(),
            production: self.production.as_slice(),
            scenario: self.scenarios.active(),
            formula: self.options.production_cost_formula,
        })
    }

    pub fn item_total_artist_days(&self, kind: LineItemKind, id: u64) -> Option<Decimal> {
        let (_, mult) = self.scenario_factors(kind);
        let item = self.line_items(kind).get(id)?;
        Some(engine::total_artist_days(item, mult))
    }

    pub fn item_cost(&self, kind: LineItemKind, id: u64) -> Option<Decimal> {
        let (extra, mult) = self.scenario_factors(kind);
        let item = self.line_items(kind).get(id)?;
        Some(engine::scenario_cost(item, self.roles.as_slice(), extra, mult))
    }

    pub fn item_local_days(&self, kind: LineItemKind, id: u64) -> Option<Decimal> {
        let (extra, mult) = self.scenario_factors(kind);
        let item = self.line_items(kind).get(id)?;
        Some(engine::local_project_days(
            item,
            self.roles.as_slice(),
            extra,
            mult,
        ))
    }

    pub fn production_item_cost(&self, id: u64) -> Option<Decimal> {
        let item = self.production.get(id)?;
        Some(engine::production_item_cost_with(
            item,
            self.roles.as_slice(),
            self.options.production_cost_formula,
        ))
    }

    // ── Team roles ────────────────────────────────────────────

    pub fn add_role(&mut self) -> u64 {
        let id = self.roles.add().id;
        self.touch(&[Collection::Roles]);
        id
    }

    pub fn add_named_role(&mut self, name: &str) -> Result<u64, WorkbookError> {
        let id = self.roles.add_named(name)?.id;
        self.touch(&[Collection::Roles]);
        Ok(id)
    }

    /// Line items still naming the removed role keep the name and price at zero.
    pub fn remove_role(&mut self, id: u64) -> Result<TeamRole, WorkbookError> {
        let role = self.roles.remove(id)?;
        self.touch(&[Collection::Roles]);
        log::info!("Removed team role '{}'", role.name);
        Ok(role)
    }

    pub fn edit_role(&mut self, id: u64, edit: RoleEdit) -> Result<(), WorkbookError> {
        self.roles.edit(id, edit)?;
        self.touch(&[Collection::Roles]);
        Ok(())
    }

    /// Edit from raw input. `name` routes through [`Workbook::rename_role`].
    pub fn edit_role_input(
        &mut self,
        id: u64,
        field: &str,
        raw: &str,
    ) -> Result<(), WorkbookError> {
        if field.trim().eq_ignore_ascii_case("name") {
            return self.rename_role(id, raw).map(|_| ());
        }
        let edit = RoleEdit::from_input(field, raw)
            .ok_or_else(|| WorkbookError::UnknownField(field.into()))?;
        self.edit_role(id, edit)
    }

    /// Rename a role and cascade the new name to every line item and
    /// production item referencing the old one. Returns the number of rows
    /// rewritten.
    pub fn rename_role(&mut self, id: u64, new_name: &str) -> Result<usize, WorkbookError> {
        let Some(event) = self.roles.rename(id, new_name)? else {
            return Ok(0);
        };
        let changed = self.dispatch(&event);
        log::info!("{event:?} rewrote {changed} row(s)");
        Ok(changed)
    }

    fn dispatch(&mut self, event: &DomainEvent) -> usize {
        let assets = self.assets.apply(event);
        let shots = self.shots.apply(event);
        let production = self.production.apply(event);

        let mut dirty = vec![Collection::Roles];
        if assets > 0 {
            dirty.push(Collection::Assets);
        }
        if shots > 0 {
            dirty.push(Collection::Shots);
        }
        if production > 0 {
            dirty.push(Collection::Production);
        }
        self.touch(&dirty);
        assets + shots + production
    }

    // ── Line items ────────────────────────────────────────────

    pub fn add_line_item(&mut self, kind: LineItemKind) -> u64 {
        let id = self.line_items_mut(kind).add().id;
        self.touch(&[Collection::from(kind)]);
        id
    }

    pub fn remove_line_item(
        &mut self,
        kind: LineItemKind,
        id: u64,
    ) -> Result<LineItem, WorkbookError> {
        let item = self.line_items_mut(kind).remove(id)?;
        self.touch(&[Collection::from(kind)]);
        Ok(item)
    }

    pub fn edit_line_item(
        &mut self,
        kind: LineItemKind,
        id: u64,
        edit: LineItemEdit,
    ) -> Result<(), WorkbookError> {
        self.line_items_mut(kind).edit(id, edit)?;
        self.touch(&[Collection::from(kind)]);
        Ok(())
    }

    pub fn edit_line_item_input(
        &mut self,
        kind: LineItemKind,
        id: u64,
        field: &str,
        raw: &str,
    ) -> Result<(), WorkbookError> {
        let edit = LineItemEdit::from_input(field, raw)
            .ok_or_else(|| WorkbookError::UnknownField(field.into()))?;
        self.edit_line_item(kind, id, edit)
    }

    // ── Production items ──────────────────────────────────────

    pub fn add_production_item(&mut self, name: &str) -> u64 {
        let id = self.production.add(name).id;
        self.touch(&[Collection::Production]);
        id
    }

    pub fn remove_production_item(&mut self, id: u64) -> Result<ProductionItem, WorkbookError> {
        let item = self.production.remove(id)?;
        self.touch(&[Collection::Production]);
        Ok(item)
    }

    pub fn edit_production_item(
        &mut self,
        id: u64,
        edit: ProductionEdit,
    ) -> Result<(), WorkbookError> {
        self.production.edit(id, edit)?;
        self.touch(&[Collection::Production]);
        Ok(())
    }

    pub fn edit_production_item_input(
        &mut self,
        id: u64,
        field: &str,
        raw: &str,
    ) -> Result<(), WorkbookError> {
        let edit = ProductionEdit::from_input(field, raw)
            .ok_or_else(|| WorkbookError::UnknownField(field.into()))?;
        self.edit_production_item(id, edit)
    }

    // ── Scenarios ─────────────────────────────────────────────

    pub fn create_scenario(&mut self, name: &str) -> Result<(), WorkbookError> {
        self.scenarios
            .create(name, self.options.default_contingency_percent)?;
        self.touch(&[Collection::Scenarios]);
        log::info!("Created scenario '{}'", name.trim());
        Ok(())
    }

    pub fn save_scenario_as(&mut self, name: &str) -> Result<(), WorkbookError> {
        self.scenarios.save_as(name)?;
        self.touch(&[Collection::Scenarios]);
        log::info!("Saved scenario as '{}'", name.trim());
        Ok(())
    }

    pub fn switch_scenario(&mut self, name: &str) -> Result<(), WorkbookError> {
        self.scenarios.switch(name)?;
        self.touch(&[Collection::Scenarios]);
        Ok(())
    }

    pub fn delete_scenario(&mut self, name: &str) -> Result<ScenarioParameters, WorkbookError> {
        let removed = self.scenarios.delete(name)?;
        self.touch(&[Collection::Scenarios]);
        log::info!("Deleted scenario '{name}'");
        Ok(removed)
    }

    pub fn edit_active_scenario(&mut self, edit: ScenarioEdit) {
        self.scenarios.edit_active(edit);
        self.touch(&[Collection::Scenarios]);
    }

    pub fn edit_active_scenario_input(
        &mut self,
        field: &str,
        raw: &str,
    ) -> Result<(), WorkbookError> {
        let edit = ScenarioEdit::from_input(field, raw)
            .ok_or_else(|| WorkbookError::UnknownField(field.into()))?;
        self.edit_active_scenario(edit);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
