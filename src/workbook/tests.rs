#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::rc::Rc;

use super::*;
use crate::models::{LineItemEdit, RateUnit};
use crate::store::{FailingStore, MemoryStore};

fn memory() -> Rc<MemoryStore> {
    Rc::new(MemoryStore::new())
}

fn open(store: &Rc<MemoryStore>) -> Workbook {
    Workbook::open("main", store.clone(), WorkbookOptions::default())
}

fn role_id(wb: &Workbook, name: &str) -> u64 {
    wb.roles().find_by_name(name).unwrap().id
}

/// A workbook holding only the Animator scenario from the worked example.
fn animator_workbook(store: &Rc<MemoryStore>) -> Workbook {
    let mut wb = open(store);
    for id in wb.assets().iter().map(|i| i.id).collect::<Vec<_>>() {
        wb.remove_line_item(LineItemKind::Asset, id).unwrap();
    }
    for id in wb.shots().iter().map(|i| i.id).collect::<Vec<_>>() {
        wb.remove_line_item(LineItemKind::Shot, id).unwrap();
    }
    let id = wb.add_line_item(LineItemKind::Shot);
    wb.edit_line_item(LineItemKind::Shot, id, LineItemEdit::ArtistDays(dec!(2)))
        .unwrap();
    wb.edit_line_item(LineItemKind::Shot, id, LineItemEdit::Revisions(dec!(1)))
        .unwrap();
    wb.edit_line_item(
        LineItemKind::Shot,
        id,
        LineItemEdit::AssignArtist("Animator".into()),
    )
    .unwrap();
    wb
}

// ── Loading ───────────────────────────────────────────────────

#[test]
fn test_open_empty_store_seeds_defaults() {
    let store = memory();
    let wb = open(&store);
    assert!(!wb.roles().is_empty());
    assert!(!wb.assets().is_empty());
    assert!(!wb.shots().is_empty());
    assert_eq!(wb.active_scenario().name, "Base");
    assert!(store.get("team_roles_main").unwrap().is_some());
    assert!(store.get("scenarios_main").unwrap().is_some());
}

#[test]
fn test_workbooks_are_keyed_independently() {
    let store = memory();
    let mut main = open(&store);
    main.add_line_item(LineItemKind::Asset);
    let other = Workbook::open("budget_2", store.clone(), WorkbookOptions::default());
    assert_eq!(other.assets().len(), main.assets().len() - 1);
}

#[test]
fn test_corrupt_value_falls_back_without_overwrite() {
    let store = memory();
    store.set("assets_main", "{broken").unwrap();
    let wb = open(&store);
    assert_eq!(wb.assets().len(), crate::seed::assets().len());
    assert_eq!(store.get("assets_main").unwrap().as_deref(), Some("{broken"));
}

#[test]
fn test_unknown_active_scenario_falls_back_to_first() {
    let store = memory();
    store.set("active_scenario_main", "\"Gone\"").unwrap();
    let wb = open(&store);
    assert_eq!(wb.active_scenario().name, "Base");
}

#[test]
fn test_failing_store_uses_in_memory_defaults() {
    let mut wb = Workbook::open("main", Rc::new(FailingStore), WorkbookOptions::default());
    assert!(!wb.roles().is_empty());
    let id = wb.add_line_item(LineItemKind::Shot);
    assert!(wb.shots().get(id).is_some());
    assert!(wb.summary().grand_total > Decimal::ZERO);
}

#[test]
fn test_partially_written_rename_gives_stale_totals_not_a_crash() {
    let store = memory();
    {
        let wb = open(&store);
        let mut roles = wb.roles().as_slice().to_vec();
        for r in roles.iter_mut().filter(|r| r.name == "Animator") {
            r.name = "Lead Animator".into();
        }
        // Roster written, line items never migrated.
        store
            .set("team_roles_main", &serde_json::to_string(&roles).unwrap())
            .unwrap();
    }
    let wb = open(&store);
    assert!(wb.roles().find_by_name("Animator").is_none());
    assert!(wb.shots().references("Animator") > 0);
    let summary = wb.summary();
    assert!(summary.shots_cost >= Decimal::ZERO);
}

// ── Persistence after mutation ────────────────────────────────

#[test]
fn test_mutations_persist_and_reload() {
    let store = memory();
    let id = {
        let mut wb = open(&store);
        let id = wb.add_line_item(LineItemKind::Asset);
        wb.edit_line_item_input(LineItemKind::Asset, id, "name", "Snow FX")
            .unwrap();
        wb.save_scenario_as("Tight").unwrap();
        id
    };
    let wb = open(&store);
    assert_eq!(wb.assets().get(id).unwrap().name, "Snow FX");
    assert_eq!(wb.active_scenario().name, "Tight");
}

#[test]
fn test_revision_bumps_on_mutation_only() {
    let store = memory();
    let mut wb = open(&store);
    let before = wb.revision();
    let _ = wb.summary();
    assert_eq!(wb.revision(), before);
    wb.add_role();
    assert!(wb.revision() > before);

    let before = wb.revision();
    assert!(wb.switch_scenario("Nope").is_err());
    assert_eq!(wb.revision(), before);
}

// ── Worked examples ───────────────────────────────────────────

#[test]
fn test_animator_example() {
    let store = memory();
    let wb = animator_workbook(&store);
    let id = wb.shots().iter().next().unwrap().id;
    assert_eq!(wb.item_total_artist_days(LineItemKind::Shot, id), Some(dec!(3)));
    assert_eq!(wb.item_cost(LineItemKind::Shot, id), Some(dec!(1800)));
    assert_eq!(wb.item_local_days(LineItemKind::Shot, id), Some(dec!(3)));
}

#[test]
fn test_animator_example_with_extra_artist() {
    let store = memory();
    let mut wb = animator_workbook(&store);
    wb.edit_active_scenario(ScenarioEdit::ShotsExtraArtists(1));
    let id = wb.shots().iter().next().unwrap().id;
    assert_eq!(wb.item_cost(LineItemKind::Shot, id), Some(dec!(3600)));
    assert_eq!(wb.item_local_days(LineItemKind::Shot, id), Some(dec!(1.5)));
}

#[test]
fn test_supervisor_production_cost() {
    let store = memory();
    let wb = open(&store);
    let sup = wb.production().iter().find(|p| p.name == "Supervisor").unwrap();
    assert_eq!(wb.production_item_cost(sup.id), Some(dec!(12600)));
}

#[test]
fn test_flat_placeholder_option() {
    let store = memory();
    let options = WorkbookOptions {
        production_cost_formula: ProductionCostFormula::FlatPlaceholder,
        ..WorkbookOptions::default()
    };
    let wb = Workbook::open("main", store, options);
    let sup = wb.production().iter().find(|p| p.name == "Supervisor").unwrap();
    assert_eq!(wb.production_item_cost(sup.id), Some(dec!(14000)));
}

// ── Team roles ────────────────────────────────────────────────

#[test]
fn test_rename_role_cascades_and_is_cost_neutral() {
    let store = memory();
    let mut wb = open(&store);
    let before = wb.summary();
    let referencing = wb.assets().references("Modeler") + wb.shots().references("Modeler");
    assert!(referencing > 0);

    let id = role_id(&wb, "Modeler");
    let changed = wb.rename_role(id, "Senior Modeler").unwrap();
    assert_eq!(changed, referencing);

    assert_eq!(wb.assets().references("Modeler"), 0);
    assert_eq!(wb.shots().references("Modeler"), 0);
    assert_eq!(
        wb.assets().references("Senior Modeler") + wb.shots().references("Senior Modeler"),
        referencing
    );
    assert_eq!(wb.summary(), before);
}

#[test]
fn test_rename_role_cascades_to_production_items() {
    let store = memory();
    let mut wb = open(&store);
    let before = wb.summary().production_cost;
    let id = role_id(&wb, "Supervisor");
    wb.rename_role(id, "VFX Supervisor").unwrap();
    assert!(wb.production().iter().any(|p| p.name == "VFX Supervisor"));
    assert_eq!(wb.summary().production_cost, before);
}

#[test]
fn test_rename_role_cascade_is_persisted() {
    let store = memory();
    {
        let mut wb = open(&store);
        let id = role_id(&wb, "Compositor");
        wb.rename_role(id, "Comp").unwrap();
    }
    let wb = open(&store);
    assert_eq!(wb.shots().references("Compositor"), 0);
    assert!(wb.shots().references("Comp") > 0);
}

#[test]
fn test_rename_role_to_existing_name_rejected() {
    let store = memory();
    let mut wb = open(&store);
    let id = role_id(&wb, "Animator");
    assert_eq!(
        wb.rename_role(id, "Compositor"),
        Err(WorkbookError::DuplicateRoleName("Compositor".into()))
    );
    assert!(wb.roles().find_by_name("Animator").is_some());
}

#[test]
fn test_rename_role_same_name_is_noop() {
    let store = memory();
    let mut wb = open(&store);
    let id = role_id(&wb, "Animator");
    assert_eq!(wb.rename_role(id, "Animator"), Ok(0));
}

#[test]
fn test_rename_event_applies_in_isolation() {
    let mut table = LineItemTable::new(LineItemKind::Shot, crate::seed::shots());
    let event = DomainEvent::RoleRenamed {
        from: "Animator".into(),
        to: "Anim".into(),
    };
    let changed = table.apply(&event);
    assert_eq!(changed, 3);
    assert_eq!(table.references("Animator"), 0);
    assert_eq!(table.references("Anim"), 3);
}

#[test]
fn test_add_roles_get_unique_names() {
    let store = memory();
    let mut wb = open(&store);
    let a = wb.add_role();
    let b = wb.add_role();
    assert_eq!(wb.roles().get(a).unwrap().name, "New Role");
    assert_eq!(wb.roles().get(b).unwrap().name, "New Role 2");
}

#[test]
fn test_remove_role_leaves_items_unpriced() {
    let store = memory();
    let mut wb = animator_workbook(&store);
    let id = role_id(&wb, "Animator");
    wb.remove_role(id).unwrap();
    let item = wb.shots().iter().next().unwrap().id;
    assert_eq!(wb.item_cost(LineItemKind::Shot, item), Some(Decimal::ZERO));
    assert!(wb.shots().get(item).unwrap().is_assigned("Animator"));
}

#[test]
fn test_edit_role_input() {
    let store = memory();
    let mut wb = open(&store);
    let id = role_id(&wb, "Animator");
    wb.edit_role_input(id, "rate", "3000").unwrap();
    wb.edit_role_input(id, "unit", "week").unwrap();
    let role = wb.roles().get(id).unwrap();
    assert_eq!(role.rate_unit, RateUnit::Week);
    assert_eq!(role.daily_rate(), dec!(600));
    assert_eq!(
        wb.edit_role_input(id, "salary", "1"),
        Err(WorkbookError::UnknownField("salary".into()))
    );
}

#[test]
fn test_extreme_rate_saturates_summary() {
    let store = memory();
    let mut wb = open(&store);
    let id = role_id(&wb, "Modeler");
    wb.edit_role_input(id, "rate", "79228162514264337593543950335")
        .unwrap();
    let asset = wb.assets().iter().next().unwrap().id;
    wb.edit_line_item_input(LineItemKind::Asset, asset, "artist_days", "1e20")
        .unwrap();

    let summary = wb.summary();
    assert_eq!(summary.assets_cost, Decimal::MAX);
    assert_eq!(summary.grand_total, Decimal::MAX);
    assert!(summary.contingency_amount > Decimal::ZERO);
    assert_eq!(
        wb.item_cost(LineItemKind::Asset, asset),
        Some(Decimal::MAX)
    );
    assert!(wb.item_local_days(LineItemKind::Asset, asset).is_some());
}

#[test]
fn test_headcounts_beyond_u32_sum() {
    let store = memory();
    let mut wb = open(&store);
    let others = wb.roles().total_headcount() - 5;
    for name in ["Animator", "Modeler"] {
        let id = role_id(&wb, name);
        wb.edit_role_input(id, "headcount", "4000000000").unwrap();
    }
    let total = wb.roles().total_headcount();
    assert_eq!(total, others + 8_000_000_000);
    assert_eq!(wb.summary().team_capacity_per_day, total);
}

// ── Line items ────────────────────────────────────────────────

#[test]
fn test_add_line_item_defaults_and_order() {
    let store = memory();
    let mut wb = open(&store);
    let last_before = wb.shots().iter().last().unwrap().id;
    let id = wb.add_line_item(LineItemKind::Shot);
    assert!(id > last_before);
    assert_eq!(wb.shots().iter().last().unwrap().id, id);
    assert_eq!(wb.shots().get(id).unwrap().name, "New Shot");
}

#[test]
fn test_invalid_numeric_input_coerced() {
    let store = memory();
    let mut wb = open(&store);
    let id = wb.add_line_item(LineItemKind::Asset);
    wb.edit_line_item_input(LineItemKind::Asset, id, "artist_days", "ten")
        .unwrap();
    wb.edit_line_item_input(LineItemKind::Asset, id, "team_size", "??")
        .unwrap();
    let item = wb.assets().get(id).unwrap();
    assert_eq!(item.artist_days, Decimal::ZERO);
    assert_eq!(item.team_size, 1);
}

#[test]
fn test_non_billable_item_stays_visible() {
    let store = memory();
    let mut wb = open(&store);
    let before = wb.summary();
    let id = wb.assets().iter().next().unwrap().id;
    wb.edit_line_item(LineItemKind::Asset, id, LineItemEdit::Billable(false))
        .unwrap();
    let after = wb.summary();
    assert_eq!(after.asset_count, before.asset_count);
    assert_eq!(after.billable_asset_count, before.billable_asset_count - 1);
    assert!(after.assets_cost < before.assets_cost);
    assert!(wb.assets().get(id).is_some());
}

#[test]
fn test_remove_missing_line_item() {
    let store = memory();
    let mut wb = open(&store);
    assert_eq!(
        wb.remove_line_item(LineItemKind::Shot, 999).unwrap_err(),
        WorkbookError::LineItemNotFound {
            kind: LineItemKind::Shot,
            id: 999
        }
    );
}

// ── Production items ──────────────────────────────────────────

#[test]
fn test_production_item_crud() {
    let store = memory();
    let mut wb = open(&store);
    let id = wb.add_production_item("Coordinator");
    wb.edit_production_item_input(id, "days", "10").unwrap();
    assert_eq!(wb.production_item_cost(id), Some(dec!(4000)));
    wb.remove_production_item(id).unwrap();
    assert!(wb.production().get(id).is_none());
}

#[test]
fn test_production_item_without_matching_role_costs_zero() {
    let store = memory();
    let mut wb = open(&store);
    let id = wb.add_production_item("Catering");
    wb.edit_production_item(id, ProductionEdit::Days(dec!(30)))
        .unwrap();
    assert_eq!(wb.production_item_cost(id), Some(Decimal::ZERO));
}

// ── Scenarios ─────────────────────────────────────────────────

#[test]
fn test_delete_last_scenario_rejected() {
    let store = memory();
    let mut wb = open(&store);
    assert_eq!(wb.delete_scenario("Base"), Err(WorkbookError::LastScenario));
    assert_eq!(wb.scenarios().len(), 1);
}

#[test]
fn test_save_as_branches_active_parameters() {
    let store = memory();
    let mut wb = open(&store);
    wb.edit_active_scenario(ScenarioEdit::AssetsEstimateMultiplier(dec!(1.25)));
    wb.save_scenario_as("Optimistic").unwrap();
    assert_eq!(wb.active_scenario().name, "Optimistic");
    assert_eq!(wb.active_scenario().assets_estimate_multiplier, dec!(1.25));

    wb.edit_active_scenario(ScenarioEdit::AssetsEstimateMultiplier(dec!(0.8)));
    assert_eq!(
        wb.scenarios().get("Base").unwrap().assets_estimate_multiplier,
        dec!(1.25)
    );
}

#[test]
fn test_create_scenario_uses_configured_contingency() {
    let store = memory();
    let options = WorkbookOptions {
        default_contingency_percent: dec!(12),
        ..WorkbookOptions::default()
    };
    let mut wb = Workbook::open("main", store, options);
    wb.create_scenario("Fresh").unwrap();
    assert_eq!(wb.active_scenario().contingency_percent, dec!(12));
    assert_eq!(
        wb.create_scenario("Fresh"),
        Err(WorkbookError::DuplicateScenario("Fresh".into()))
    );
}

#[test]
fn test_switch_and_delete_active_scenario() {
    let store = memory();
    let mut wb = open(&store);
    wb.create_scenario("Alt").unwrap();
    wb.switch_scenario("Base").unwrap();
    assert_eq!(wb.active_scenario().name, "Base");
    wb.switch_scenario("Alt").unwrap();
    wb.delete_scenario("Alt").unwrap();
    assert_eq!(wb.active_scenario().name, "Base");
}

#[test]
fn test_contingency_changes_grand_total() {
    let store = memory();
    let mut wb = open(&store);
    wb.edit_active_scenario_input("contingency", "0").unwrap();
    let s = wb.summary();
    assert_eq!(s.grand_total, s.subtotal);
    wb.edit_active_scenario_input("contingency", "20").unwrap();
    let s = wb.summary();
    assert_eq!(s.grand_total, s.subtotal * dec!(1.2));
}

// ── Budget tabs ───────────────────────────────────────────────

#[test]
fn test_tab_registry_seeds_default() {
    let store = memory();
    let tabs = TabRegistry::open(store.clone());
    assert_eq!(tabs.tabs().len(), 1);
    assert_eq!(tabs.first().id, DEFAULT_TAB_ID);
    assert!(store.get("budget_tabs").unwrap().is_some());
}

#[test]
fn test_tab_create_rename_delete() {
    let store = memory();
    let mut tabs = TabRegistry::open(store.clone());
    let id = tabs.create("Commercial cut").unwrap().id.clone();
    assert_eq!(id, "budget_2");
    tabs.rename(&id, "Festival cut").unwrap();

    let _ = Workbook::open(&id, store.clone(), WorkbookOptions::default());
    assert!(store.get("assets_budget_2").unwrap().is_some());

    let reopened = TabRegistry::open(store.clone());
    assert_eq!(reopened.get(&id).unwrap().name, "Festival cut");

    tabs.delete(&id).unwrap();
    assert!(store.get("assets_budget_2").unwrap().is_none());
    assert_eq!(tabs.delete(DEFAULT_TAB_ID), Err(WorkbookError::LastTab));
}
