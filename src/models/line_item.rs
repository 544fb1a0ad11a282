use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{default_true, one};
use crate::util::{parse_count, parse_flag, parse_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineItemKind {
    Asset,
    Shot,
}

impl LineItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "Asset",
            Self::Shot => "Shot",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asset" | "assets" | "a" => Some(Self::Asset),
            "shot" | "shots" | "s" => Some(Self::Shot),
            _ => None,
        }
    }

    pub fn all() -> &'static [LineItemKind] {
        &[Self::Asset, Self::Shot]
    }
}

impl std::fmt::Display for LineItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the Assets or Shots table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: u64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub name: String,
    /// Base effort estimate in artist-days.
    #[serde(default)]
    pub artist_days: Decimal,
    /// Extra effort for revision passes, also in artist-days.
    #[serde(default)]
    pub revisions: Decimal,
    #[serde(default = "one_person")]
    pub team_size: u32,
    #[serde(default = "one")]
    pub complexity: Decimal,
    /// Team role names. Stale names are kept and price at zero.
    #[serde(default)]
    pub assigned_artists: BTreeSet<String>,
    #[serde(default = "default_true")]
    pub billable: bool,
}

fn one_person() -> u32 {
    1
}

impl LineItem {
    pub fn new(id: u64, kind: LineItemKind) -> Self {
        Self {
            id,
            category: String::new(),
            name: format!("New {}", kind.as_str()),
            artist_days: Decimal::ZERO,
            revisions: Decimal::ZERO,
            team_size: 1,
            complexity: Decimal::ONE,
            assigned_artists: BTreeSet::new(),
            billable: true,
        }
    }

    pub fn is_assigned(&self, role_name: &str) -> bool {
        self.assigned_artists.contains(role_name)
    }

    /// Swap one assigned role name for another. Returns whether anything changed.
    pub(crate) fn rename_artist(&mut self, from: &str, to: &str) -> bool {
        if self.assigned_artists.remove(from) {
            self.assigned_artists.insert(to.to_string());
            true
        } else {
            false
        }
    }

    pub(crate) fn apply_edit(&mut self, edit: LineItemEdit) {
        match edit {
            LineItemEdit::Category(c) => self.category = c,
            LineItemEdit::Name(n) => self.name = n,
            LineItemEdit::ArtistDays(d) => self.artist_days = d.max(Decimal::ZERO),
            LineItemEdit::Revisions(d) => self.revisions = d.max(Decimal::ZERO),
            LineItemEdit::TeamSize(n) => self.team_size = n.max(1),
            LineItemEdit::Complexity(c) => {
                self.complexity = if c > Decimal::ZERO { c } else { Decimal::ONE }
            }
            LineItemEdit::AssignArtist(name) => {
                self.assigned_artists.insert(name);
            }
            LineItemEdit::UnassignArtist(name) => {
                self.assigned_artists.remove(&name);
            }
            LineItemEdit::Artists(names) => self.assigned_artists = names,
            LineItemEdit::Billable(b) => self.billable = b,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineItemEdit {
    Category(String),
    Name(String),
    ArtistDays(Decimal),
    Revisions(Decimal),
    TeamSize(u32),
    Complexity(Decimal),
    AssignArtist(String),
    UnassignArtist(String),
    Artists(BTreeSet<String>),
    Billable(bool),
}

impl LineItemEdit {
    /// Build an edit from raw user input. Unparseable numbers become zero and
    /// are then clamped when applied; returns `None` for an unknown field.
    pub fn from_input(field: &str, raw: &str) -> Option<Self> {
        let edit = match field.trim().to_lowercase().as_str() {
            "category" => Self::Category(raw.trim().to_string()),
            "name" => Self::Name(raw.trim().to_string()),
            "artist_days" | "artistdays" | "days" => Self::ArtistDays(parse_number(raw)),
            "revisions" => Self::Revisions(parse_number(raw)),
            "team_size" | "teamsize" | "team" => Self::TeamSize(parse_count(raw)),
            "complexity" => Self::Complexity(parse_number(raw)),
            "assign" => Self::AssignArtist(raw.trim().to_string()),
            "unassign" => Self::UnassignArtist(raw.trim().to_string()),
            "artists" | "assigned_artists" => Self::Artists(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            ),
            "billable" => Self::Billable(parse_flag(raw)),
            _ => return None,
        };
        Some(edit)
    }
}
