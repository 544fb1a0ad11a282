//! Per-item effort and cost formulas.
//!
//! Everything here is pure and recomputed on every read. Arithmetic
//! saturates at the `Decimal` range so extreme inputs never abort a roll-up.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{LineItem, ProductionItem, TeamRole};

/// Day rate used by the flat placeholder production formula.
pub const FLAT_PLACEHOLDER_DAY_RATE: i64 = 1000;

/// How production items are priced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductionCostFormula {
    /// `days * role daily rate * multiplier`, role resolved by name.
    #[default]
    #[serde(rename = "rate")]
    RateBased,
    /// `days * multiplier * 1000`, ignoring the roster.
    #[serde(rename = "flat_placeholder")]
    FlatPlaceholder,
}

/// Sum that clamps at `Decimal::MAX`/`Decimal::MIN` instead of overflowing.
pub(crate) fn saturating_sum<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// `(artist_days + revisions) * complexity * estimate_multiplier`.
///
/// Team size is deliberately not a factor: this is total labour.
/// Saturates on overflow.
pub fn total_artist_days(item: &LineItem, estimate_multiplier: Decimal) -> Decimal {
    item.artist_days
        .saturating_add(item.revisions)
        .saturating_mul(item.complexity)
        .saturating_mul(estimate_multiplier)
}

/// Team size plus scenario extras, floored at zero.
fn adjusted_team_size(item: &LineItem, extra_artists: i32) -> Decimal {
    let adjusted = i64::from(item.team_size) + i64::from(extra_artists);
    Decimal::from(adjusted.max(0))
}

/// Assigned roles that exist in the roster. Unknown names are skipped.
fn resolved_roles<'a>(
    item: &'a LineItem,
    roles: &'a [TeamRole],
) -> impl Iterator<Item = &'a TeamRole> + 'a {
    item.assigned_artists
        .iter()
        .filter_map(move |name| find_role(roles, name))
}

pub fn find_role<'a>(roles: &'a [TeamRole], name: &str) -> Option<&'a TeamRole> {
    roles.iter().find(|r| r.name == name)
}

/// Labour cost of one line item under a scenario.
///
/// Effort is split evenly across the assigned role types, each share is
/// priced at that role's day rate and scaled by the adjusted team size.
/// Unassigned items cost nothing.
pub fn scenario_cost(
    item: &LineItem,
    roles: &[TeamRole],
    extra_artists: i32,
    estimate_multiplier: Decimal,
) -> Decimal {
    if item.assigned_artists.is_empty() {
        return Decimal::ZERO;
    }
    let total = total_artist_days(item, estimate_multiplier);
    let adjusted = adjusted_team_size(item, extra_artists);
    let n = Decimal::from(item.assigned_artists.len());

    saturating_sum(
        resolved_roles(item, roles)
            .filter(|role| role.productivity > Decimal::ZERO)
            .filter_map(|role| {
                let role_days = total.checked_div(n.saturating_mul(role.productivity))?;
                Some(
                    role_days
                        .saturating_mul(role.daily_rate())
                        .saturating_mul(adjusted),
                )
            }),
    )
}

/// Wall-clock days for one line item given its team and their combined
/// productivity.
pub fn local_project_days(
    item: &LineItem,
    roles: &[TeamRole],
    extra_artists: i32,
    estimate_multiplier: Decimal,
) -> Decimal {
    let total = total_artist_days(item, estimate_multiplier);
    let adjusted = adjusted_team_size(item, extra_artists);

    let total_productivity = saturating_sum(resolved_roles(item, roles).map(|r| r.productivity));

    let divisor = if item.assigned_artists.is_empty() || total_productivity <= Decimal::ZERO {
        adjusted
    } else {
        adjusted.saturating_mul(total_productivity)
    };
    total.checked_div(divisor).unwrap_or(Decimal::ZERO)
}

/// Rate-based cost of a production overhead item. No matching role ⇒ zero.
pub fn production_item_cost(item: &ProductionItem, roles: &[TeamRole]) -> Decimal {
    production_item_cost_with(item, roles, ProductionCostFormula::RateBased)
}

pub fn production_item_cost_with(
    item: &ProductionItem,
    roles: &[TeamRole],
    formula: ProductionCostFormula,
) -> Decimal {
    match formula {
        ProductionCostFormula::RateBased => find_role(roles, &item.name)
            .map(|role| {
                item.days
                    .saturating_mul(role.daily_rate())
                    .saturating_mul(item.prod_multiplier)
            })
            .unwrap_or(Decimal::ZERO),
        ProductionCostFormula::FlatPlaceholder => item
            .days
            .saturating_mul(item.prod_multiplier)
            .saturating_mul(Decimal::from(FLAT_PLACEHOLDER_DAY_RATE)),
    }
}
