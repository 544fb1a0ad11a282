use rust_decimal::Decimal;

use super::effort::{
    production_item_cost_with, saturating_sum, scenario_cost, total_artist_days,
    ProductionCostFormula,
};
use crate::models::{LineItem, ProductionItem, ScenarioParameters, TeamRole};

/// Everything the aggregator reads. Collections are the full tables; the
/// billable filter is applied here.
#[derive(Debug, Clone, Copy)]
pub struct RollupInput<'a> {
    pub roles: &'a [TeamRole],
    pub assets: &'a [LineItem],
    pub shots: &'a [LineItem],
    pub production: &'a [ProductionItem],
    pub scenario: &'a ScenarioParameters,
    pub formula: ProductionCostFormula,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostBucket {
    Assets,
    Shots,
    Production,
    Contingency,
}

impl CostBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assets => "Assets",
            Self::Shots => "Shots",
            Self::Production => "Production",
            Self::Contingency => "Contingency",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostShare {
    pub bucket: CostBucket,
    pub amount: Decimal,
    /// Share of the distribution total, 0–100.
    pub percent: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostDistribution {
    pub shares: [CostShare; 4],
    pub total: Decimal,
}

impl CostDistribution {
    pub fn new(
        assets: Decimal,
        shots: Decimal,
        production: Decimal,
        contingency: Decimal,
    ) -> Self {
        let total = saturating_sum([assets, shots, production, contingency]);
        let share = |bucket, amount: Decimal| CostShare {
            bucket,
            amount,
            percent: share_percent(amount, total),
        };
        Self {
            shares: [
                share(CostBucket::Assets, assets),
                share(CostBucket::Shots, shots),
                share(CostBucket::Production, production),
                share(CostBucket::Contingency, contingency),
            ],
            total,
        }
    }

    pub fn get(&self, bucket: CostBucket) -> &CostShare {
        // shares are laid out in bucket order
        &self.shares[bucket as usize]
    }
}

/// `amount` as a percentage of `total`. Scales after dividing when the
/// amount is too large to scale first.
fn share_percent(amount: Decimal, total: Decimal) -> Decimal {
    match amount.checked_mul(Decimal::ONE_HUNDRED) {
        Some(scaled) => scaled.checked_div(total),
        None => amount
            .checked_div(total)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED)),
    }
    .unwrap_or(Decimal::ZERO)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub scenario_name: String,
    pub asset_count: usize,
    pub billable_asset_count: usize,
    pub shot_count: usize,
    pub billable_shot_count: usize,
    pub assets_artist_days: Decimal,
    pub shots_artist_days: Decimal,
    pub total_artist_days: Decimal,
    pub team_capacity_per_day: u64,
    pub project_days: Decimal,
    pub assets_cost: Decimal,
    pub shots_cost: Decimal,
    pub labor_cost: Decimal,
    pub production_cost: Decimal,
    pub subtotal: Decimal,
    pub contingency_percent: Decimal,
    pub contingency_amount: Decimal,
    pub grand_total: Decimal,
    pub distribution: CostDistribution,
}

fn billable(items: &[LineItem]) -> impl Iterator<Item = &LineItem> {
    items.iter().filter(|i| i.billable)
}

/// `percent`% of `amount`, saturating when the product overflows.
fn share_of(amount: Decimal, percent: Decimal) -> Decimal {
    match amount.checked_mul(percent) {
        Some(scaled) => scaled / Decimal::ONE_HUNDRED,
        None => (amount / Decimal::ONE_HUNDRED).saturating_mul(percent),
    }
}

/// Roll the whole workbook up under one scenario.
pub fn summarize(input: &RollupInput<'_>) -> Summary {
    let scenario = input.scenario;

    let assets_artist_days = saturating_sum(
        billable(input.assets).map(|i| total_artist_days(i, scenario.assets_estimate_multiplier)),
    );
    let shots_artist_days = saturating_sum(
        billable(input.shots).map(|i| total_artist_days(i, scenario.shots_estimate_multiplier)),
    );

    let assets_cost = saturating_sum(billable(input.assets).map(|i| {
        scenario_cost(
            i,
            input.roles,
            scenario.assets_extra_artists,
            scenario.assets_estimate_multiplier,
        )
    }));
    let shots_cost = saturating_sum(billable(input.shots).map(|i| {
        scenario_cost(
            i,
            input.roles,
            scenario.shots_extra_artists,
            scenario.shots_estimate_multiplier,
        )
    }));

    let total_artist_days = assets_artist_days.saturating_add(shots_artist_days);
    let team_capacity_per_day: u64 = input.roles.iter().map(|r| u64::from(r.headcount)).sum();
    let project_days = total_artist_days
        .checked_div(Decimal::from(team_capacity_per_day))
        .unwrap_or(Decimal::ZERO);

    let labor_cost = assets_cost.saturating_add(shots_cost);
    let production_cost = saturating_sum(
        input
            .production
            .iter()
            .filter(|p| p.billable)
            .map(|p| production_item_cost_with(p, input.roles, input.formula)),
    );

    let subtotal = labor_cost.saturating_add(production_cost);
    let contingency_amount = share_of(subtotal, scenario.contingency_percent);
    let grand_total = subtotal.saturating_add(contingency_amount);

    Summary {
        scenario_name: scenario.name.clone(),
        asset_count: input.assets.len(),
        billable_asset_count: billable(input.assets).count(),
        shot_count: input.shots.len(),
        billable_shot_count: billable(input.shots).count(),
        assets_artist_days,
        shots_artist_days,
        total_artist_days,
        team_capacity_per_day,
        project_days,
        assets_cost,
        shots_cost,
        labor_cost,
        production_cost,
        subtotal,
        contingency_percent: scenario.contingency_percent,
        contingency_amount,
        grand_total,
        distribution: CostDistribution::new(
            assets_cost,
            shots_cost,
            production_cost,
            contingency_amount,
        ),
    }
}
