mod line_item;
mod node;
mod production_item;
mod scenario;
mod team_role;

use rust_decimal::Decimal;

pub use line_item::{LineItem, LineItemEdit, LineItemKind};
pub use node::{placeholder_image, Node, NodeEdit, NodeKind};
pub use production_item::{ProductionEdit, ProductionItem};
pub use scenario::{ScenarioEdit, ScenarioParameters, DEFAULT_CONTINGENCY_PERCENT};
pub use team_role::{RateUnit, RoleEdit, TeamRole};

pub(crate) fn one() -> Decimal {
    Decimal::ONE
}

pub(crate) fn default_true() -> bool {
    true
}
