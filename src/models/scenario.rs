use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::one;
use crate::util::{parse_number, parse_signed};

/// Contingency applied to scenarios created without an explicit value.
pub const DEFAULT_CONTINGENCY_PERCENT: i64 = 10;

fn default_contingency() -> Decimal {
    Decimal::from(DEFAULT_CONTINGENCY_PERCENT)
}

/// A named "what-if" bundle of global multipliers and contingency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioParameters {
    pub name: String,
    #[serde(default = "one")]
    pub assets_estimate_multiplier: Decimal,
    #[serde(default = "one")]
    pub shots_estimate_multiplier: Decimal,
    /// Added to each asset's team size.
    #[serde(default)]
    pub assets_extra_artists: i32,
    /// Added to each shot's team size.
    #[serde(default)]
    pub shots_extra_artists: i32,
    #[serde(default = "default_contingency")]
    pub contingency_percent: Decimal,
}

impl ScenarioParameters {
    pub fn new(name: String) -> Self {
        Self::with_contingency(name, default_contingency())
    }

    pub fn with_contingency(name: String, contingency_percent: Decimal) -> Self {
        Self {
            name,
            assets_estimate_multiplier: Decimal::ONE,
            shots_estimate_multiplier: Decimal::ONE,
            assets_extra_artists: 0,
            shots_extra_artists: 0,
            contingency_percent: contingency_percent.max(Decimal::ZERO),
        }
    }

    pub(crate) fn apply_edit(&mut self, edit: ScenarioEdit) {
        let positive_or_one = |m: Decimal| if m > Decimal::ZERO { m } else { Decimal::ONE };
        match edit {
            ScenarioEdit::AssetsEstimateMultiplier(m) => {
                self.assets_estimate_multiplier = positive_or_one(m)
            }
            ScenarioEdit::ShotsEstimateMultiplier(m) => {
                self.shots_estimate_multiplier = positive_or_one(m)
            }
            ScenarioEdit::AssetsExtraArtists(n) => self.assets_extra_artists = n,
            ScenarioEdit::ShotsExtraArtists(n) => self.shots_extra_artists = n,
            ScenarioEdit::ContingencyPercent(p) => self.contingency_percent = p.max(Decimal::ZERO),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioEdit {
    AssetsEstimateMultiplier(Decimal),
    ShotsEstimateMultiplier(Decimal),
    AssetsExtraArtists(i32),
    ShotsExtraArtists(i32),
    ContingencyPercent(Decimal),
}

impl ScenarioEdit {
    pub fn from_input(field: &str, raw: &str) -> Option<Self> {
        let edit = match field.trim().to_lowercase().as_str() {
            "assets_multiplier" | "assets_estimate_multiplier" => {
                Self::AssetsEstimateMultiplier(parse_number(raw))
            }
            "shots_multiplier" | "shots_estimate_multiplier" => {
                Self::ShotsEstimateMultiplier(parse_number(raw))
            }
            "assets_extra" | "assets_extra_artists" => Self::AssetsExtraArtists(parse_signed(raw)),
            "shots_extra" | "shots_extra_artists" => Self::ShotsExtraArtists(parse_signed(raw)),
            "contingency" | "contingency_percent" => Self::ContingencyPercent(parse_number(raw)),
            _ => return None,
        };
        Some(edit)
    }
}
