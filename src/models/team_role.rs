use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::one;

/// Working days in a billing week.
const DAYS_PER_WEEK: i64 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateUnit {
    #[default]
    Day,
    Week,
}

impl RateUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "week" | "weekly" | "wk" | "w" => Self::Week,
            _ => Self::Day,
        }
    }

    pub fn all() -> &'static [RateUnit] {
        &[Self::Day, Self::Week]
    }
}

impl std::fmt::Display for RateUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRole {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub headcount: u32,
    #[serde(default)]
    pub rate_unit: RateUnit,
    #[serde(default)]
    pub rate: Decimal,
    #[serde(default = "one")]
    pub productivity: Decimal,
}

impl TeamRole {
    pub fn new(id: u64, name: String) -> Self {
        Self {
            id,
            name,
            headcount: 1,
            rate_unit: RateUnit::Day,
            rate: Decimal::ZERO,
            productivity: Decimal::ONE,
        }
    }

    /// Rate normalised to one working day.
    pub fn daily_rate(&self) -> Decimal {
        match self.rate_unit {
            RateUnit::Day => self.rate,
            RateUnit::Week => self.rate / Decimal::from(DAYS_PER_WEEK),
        }
    }

    pub(crate) fn apply_edit(&mut self, edit: RoleEdit) {
        match edit {
            RoleEdit::Headcount(n) => self.headcount = n,
            RoleEdit::Rate(r) => self.rate = r.max(Decimal::ZERO),
            RoleEdit::RateUnit(u) => self.rate_unit = u,
            RoleEdit::Productivity(p) => {
                self.productivity = if p > Decimal::ZERO { p } else { Decimal::ONE }
            }
        }
    }
}

/// A single-field edit on a team role. Renames go through the workbook so the
/// change can cascade to line items.
#[derive(Debug, Clone, PartialEq)]
pub enum RoleEdit {
    Headcount(u32),
    Rate(Decimal),
    RateUnit(RateUnit),
    Productivity(Decimal),
}

impl RoleEdit {
    /// Build an edit from raw user input. Unparseable numbers become zero;
    /// returns `None` for an unknown field name.
    pub fn from_input(field: &str, raw: &str) -> Option<Self> {
        let edit = match field.trim().to_lowercase().as_str() {
            "headcount" | "count" => Self::Headcount(crate::util::parse_count(raw)),
            "rate" => Self::Rate(crate::util::parse_number(raw)),
            "rate_unit" | "rateunit" | "unit" => Self::RateUnit(RateUnit::parse(raw)),
            "productivity" => Self::Productivity(crate::util::parse_number(raw)),
            _ => return None,
        };
        Some(edit)
    }
}
