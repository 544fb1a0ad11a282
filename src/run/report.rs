use anyhow::{Context, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

use vfxbudget::engine::{CostDistribution, Summary};
use vfxbudget::hierarchy::ProjectTree;
use vfxbudget::models::LineItemKind;
use vfxbudget::util::{format_amount, format_days, truncate};
use vfxbudget::workbook::{BudgetTab, Workbook};

const RULE_WIDTH: usize = 56;
const BAR_WIDTH: usize = 24;

fn rule() -> String {
    "─".repeat(RULE_WIDTH)
}

pub(crate) fn progress_bar(ratio: Decimal, width: usize) -> String {
    let ratio = ratio.clamp(Decimal::ZERO, Decimal::ONE);
    let filled = (ratio * Decimal::from(width))
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(width);
    let empty = width - filled;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

fn percent(value: Decimal) -> String {
    format!("{:>6}", format!("{}%", value.round_dp(1)))
}

pub(crate) fn distribution_chart(dist: &CostDistribution) -> String {
    let mut lines = Vec::with_capacity(dist.shares.len());
    for share in &dist.shares {
        let ratio = share.percent / Decimal::ONE_HUNDRED;
        lines.push(format!(
            "  {:<12} {} {} {:>14}",
            share.bucket.as_str(),
            progress_bar(ratio, BAR_WIDTH),
            percent(share.percent),
            format_amount(share.amount),
        ));
    }
    lines.join("\n")
}

pub(crate) fn summary_report(tab: &str, s: &Summary) -> String {
    let amount =
        |label: &str, value: Decimal| format!("  {label:<22} {:>14}", format_amount(value));
    let days = |label: &str, value: Decimal| format!("  {label:<22} {:>14}", format_days(value));

    let mut lines = vec![
        format!("{tab} (scenario: {})", s.scenario_name),
        rule(),
        format!(
            "  {:<22} {:>14}",
            "Assets",
            format!("{} ({} billable)", s.asset_count, s.billable_asset_count)
        ),
        format!(
            "  {:<22} {:>14}",
            "Shots",
            format!("{} ({} billable)", s.shot_count, s.billable_shot_count)
        ),
        days("Asset artist-days", s.assets_artist_days),
        days("Shot artist-days", s.shots_artist_days),
        days("Total artist-days", s.total_artist_days),
        format!("  {:<22} {:>14}", "Team capacity / day", s.team_capacity_per_day),
        days("Project days", s.project_days),
        rule(),
        amount("Assets cost", s.assets_cost),
        amount("Shots cost", s.shots_cost),
        amount("Labour", s.labor_cost),
        amount("Production", s.production_cost),
        amount("Subtotal", s.subtotal),
        amount(
            &format!("Contingency ({}%)", s.contingency_percent.normalize()),
            s.contingency_amount,
        ),
        amount("Grand total", s.grand_total),
        String::new(),
        "Cost distribution:".to_string(),
        distribution_chart(&s.distribution),
    ];
    if s.distribution.total.is_zero() {
        lines.push("  (nothing billable yet)".to_string());
    }
    lines.join("\n")
}

pub(crate) fn roles_table(wb: &Workbook) -> String {
    if wb.roles().is_empty() {
        return "No team roles".to_string();
    }
    let mut lines = vec![
        format!(
            "{:<4} {:<20} {:>5} {:>12} {:<5} {:>12} {:>6}",
            "ID", "Role", "Count", "Rate", "Unit", "Per day", "Prod"
        ),
        rule(),
    ];
    for role in wb.roles().iter() {
        lines.push(format!(
            "{:<4} {:<20} {:>5} {:>12} {:<5} {:>12} {:>6}",
            role.id,
            truncate(&role.name, 20),
            role.headcount,
            format_amount(role.rate),
            role.rate_unit.as_str(),
            format_amount(role.daily_rate()),
            role.productivity.normalize(),
        ));
    }
    lines.push(format!("Total headcount: {}", wb.roles().total_headcount()));
    lines.join("\n")
}

pub(crate) fn line_items_table(wb: &Workbook, kind: LineItemKind) -> String {
    let table = wb.line_items(kind);
    if table.is_empty() {
        return format!("No {} items", kind.as_str().to_lowercase());
    }
    let mut lines = vec![
        format!(
            "{:<4} {:<12} {:<28} {:>8} {:>8} {:>14}  Artists",
            "ID", "Category", "Name", "Days", "Local", "Cost"
        ),
        rule(),
    ];
    for item in table.iter() {
        let total = wb.item_total_artist_days(kind, item.id).unwrap_or_default();
        let local = wb.item_local_days(kind, item.id).unwrap_or_default();
        let cost = wb.item_cost(kind, item.id).unwrap_or_default();
        let artists: Vec<&str> = item.assigned_artists.iter().map(String::as_str).collect();
        lines.push(format!(
            "{:<4} {:<12} {:<28} {:>8} {:>8} {:>14}  {}{}",
            item.id,
            truncate(&item.category, 12),
            truncate(&item.name, 28),
            format_days(total),
            format_days(local),
            format_amount(cost),
            artists.join(", "),
            if item.billable { "" } else { "  (not billable)" },
        ));
    }
    lines.join("\n")
}

pub(crate) fn production_table(wb: &Workbook) -> String {
    if wb.production().is_empty() {
        return "No production items".to_string();
    }
    let mut lines = vec![
        format!("{:<4} {:<20} {:>8} {:>6} {:>14}", "ID", "Item", "Days", "Mult", "Cost"),
        rule(),
    ];
    for item in wb.production().iter() {
        lines.push(format!(
            "{:<4} {:<20} {:>8} {:>6} {:>14}{}",
            item.id,
            truncate(&item.name, 20),
            format_days(item.days),
            item.prod_multiplier.normalize(),
            format_amount(wb.production_item_cost(item.id).unwrap_or_default()),
            if item.billable { "" } else { "  (not billable)" },
        ));
    }
    lines.join("\n")
}

pub(crate) fn scenarios_list(wb: &Workbook) -> String {
    let active = wb.active_scenario().name.as_str();
    wb.scenarios()
        .as_slice()
        .iter()
        .map(|s| {
            format!(
                "{} {:<16} assets x{} (+{}) shots x{} (+{}) contingency {}%",
                if s.name == active { "*" } else { " " },
                s.name,
                s.assets_estimate_multiplier.normalize(),
                s.assets_extra_artists,
                s.shots_estimate_multiplier.normalize(),
                s.shots_extra_artists,
                s.contingency_percent.normalize(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn tabs_list(tabs: &[BudgetTab], current: &str) -> String {
    tabs.iter()
        .map(|t| {
            format!(
                "{} {:<12} {}",
                if t.id == current { "*" } else { " " },
                t.id,
                t.name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Indented outline of the subtree under `root`.
pub(crate) fn tree_outline(tree: &ProjectTree, root: &str) -> String {
    fn walk(tree: &ProjectTree, id: &str, depth: usize, lines: &mut Vec<String>) {
        let Some(node) = tree.get(id) else {
            return;
        };
        lines.push(format!(
            "{}{} {} [{}]",
            "  ".repeat(depth),
            node.id,
            node.name,
            node.kind
        ));
        for child in &node.children {
            walk(tree, child, depth + 1, lines);
        }
    }
    let mut lines = Vec::new();
    walk(tree, root, 0, &mut lines);
    lines.join("\n")
}

#[derive(Serialize)]
struct ExportRow<'a> {
    kind: &'static str,
    id: u64,
    category: &'a str,
    name: &'a str,
    artist_days: Decimal,
    revisions: Decimal,
    team_size: u32,
    complexity: Decimal,
    artists: String,
    billable: bool,
    total_artist_days: Decimal,
    local_days: Decimal,
    cost: Decimal,
}

/// Write every asset and shot with its computed figures. Returns the number
/// of rows written.
pub(crate) fn write_line_items_csv<W: Write>(wb: &Workbook, out: W) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(out);
    let mut count = 0;
    for kind in LineItemKind::all().iter().copied() {
        for item in wb.line_items(kind).iter() {
            writer
                .serialize(ExportRow {
                    kind: kind.as_str(),
                    id: item.id,
                    category: &item.category,
                    name: &item.name,
                    artist_days: item.artist_days,
                    revisions: item.revisions,
                    team_size: item.team_size,
                    complexity: item.complexity,
                    artists: item
                        .assigned_artists
                        .iter()
                        .map(String::as_str)
                        .collect::<Vec<_>>()
                        .join(";"),
                    billable: item.billable,
                    total_artist_days: wb.item_total_artist_days(kind, item.id).unwrap_or_default(),
                    local_days: wb.item_local_days(kind, item.id).unwrap_or_default(),
                    cost: wb.item_cost(kind, item.id).unwrap_or_default(),
                })
                .with_context(|| format!("Failed to write {} {}", kind, item.id))?;
            count += 1;
        }
    }
    writer.flush().context("Failed to flush CSV output")?;
    Ok(count)
}
