use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{default_true, one};
use crate::util::{parse_flag, parse_number};

/// Overhead line billed by day rate. `name` is matched against team role names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionItem {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub days: Decimal,
    #[serde(default = "one")]
    pub prod_multiplier: Decimal,
    #[serde(default = "default_true")]
    pub billable: bool,
}

impl ProductionItem {
    pub fn new(id: u64, name: String) -> Self {
        Self {
            id,
            name,
            days: Decimal::ZERO,
            prod_multiplier: Decimal::ONE,
            billable: true,
        }
    }

    pub(crate) fn apply_edit(&mut self, edit: ProductionEdit) {
        match edit {
            ProductionEdit::Name(n) => self.name = n,
            ProductionEdit::Days(d) => self.days = d.max(Decimal::ZERO),
            ProductionEdit::ProdMultiplier(m) => self.prod_multiplier = m.max(Decimal::ZERO),
            ProductionEdit::Billable(b) => self.billable = b,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductionEdit {
    Name(String),
    Days(Decimal),
    ProdMultiplier(Decimal),
    Billable(bool),
}

impl ProductionEdit {
    pub fn from_input(field: &str, raw: &str) -> Option<Self> {
        let edit = match field.trim().to_lowercase().as_str() {
            "name" => Self::Name(raw.trim().to_string()),
            "days" => Self::Days(parse_number(raw)),
            "multiplier" | "prod_multiplier" | "prodmultiplier" => {
                Self::ProdMultiplier(parse_number(raw))
            }
            "billable" => Self::Billable(parse_flag(raw)),
            _ => return None,
        };
        Some(edit)
    }
}
