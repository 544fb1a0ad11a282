mod effort;
mod rollup;

pub use effort::{
    find_role, local_project_days, production_item_cost, production_item_cost_with,
    scenario_cost, total_artist_days, ProductionCostFormula, FLAT_PLACEHOLDER_DAY_RATE,
};
pub use rollup::{summarize, CostBucket, CostDistribution, CostShare, RollupInput, Summary};
