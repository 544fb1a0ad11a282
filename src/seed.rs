//! Default datasets used when the store has nothing for a key.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::models::{
    placeholder_image, LineItem, LineItemKind, Node, NodeKind, ProductionItem, RateUnit,
    ScenarioParameters, TeamRole,
};

pub const DEFAULT_SCENARIO: &str = "Base";
pub const DEFAULT_CONTINGENCY: i64 = 15;
pub const PROJECT_ROOT: &str = "PROJ_001";
pub const ASSET_ROOT: &str = "ASSETS";

fn role(
    id: u64,
    name: &str,
    headcount: u32,
    rate: i64,
    rate_unit: RateUnit,
    productivity: Decimal,
) -> TeamRole {
    TeamRole {
        id,
        name: name.into(),
        headcount,
        rate_unit,
        rate: Decimal::from(rate),
        productivity,
    }
}

pub fn team_roles() -> Vec<TeamRole> {
    vec![
        role(1, "Animator", 3, 600, RateUnit::Day, Decimal::ONE),
        role(2, "Compositor", 2, 550, RateUnit::Day, Decimal::ONE),
        role(3, "Modeler", 2, 2500, RateUnit::Week, Decimal::ONE),
        role(4, "FX Artist", 1, 700, RateUnit::Day, Decimal::new(8, 1)),
        role(5, "Supervisor", 1, 900, RateUnit::Day, Decimal::ONE),
        role(6, "Coordinator", 1, 400, RateUnit::Day, Decimal::ONE),
    ]
}

#[allow(clippy::too_many_arguments)]
fn line_item(
    id: u64,
    kind: LineItemKind,
    category: &str,
    name: &str,
    artist_days: i64,
    revisions: i64,
    team_size: u32,
    complexity: Decimal,
    artists: &[&str],
) -> LineItem {
    LineItem {
        category: category.into(),
        name: name.into(),
        artist_days: Decimal::from(artist_days),
        revisions: Decimal::from(revisions),
        team_size,
        complexity,
        assigned_artists: artists.iter().map(|a| a.to_string()).collect(),
        ..LineItem::new(id, kind)
    }
}

pub fn assets() -> Vec<LineItem> {
    use LineItemKind::Asset;
    vec![
        line_item(
            1,
            Asset,
            "Characters",
            "Climber hero",
            12,
            3,
            1,
            Decimal::new(15, 1),
            &["Modeler"],
        ),
        line_item(
            2,
            Asset,
            "Environments",
            "Mountain peak",
            20,
            5,
            2,
            Decimal::new(12, 1),
            &["Modeler"],
        ),
        line_item(3, Asset, "Props", "Yellow bug car", 6, 2, 1, Decimal::ONE, &["Modeler"]),
    ]
}

pub fn shots() -> Vec<LineItem> {
    use LineItemKind::Shot;
    vec![
        line_item(
            1,
            Shot,
            "SQ_001",
            "Helicopter approaches lake",
            4,
            1,
            1,
            Decimal::ONE,
            &["Animator", "Compositor"],
        ),
        line_item(
            2,
            Shot,
            "SQ_001",
            "Close up on water reflection",
            3,
            1,
            1,
            Decimal::new(12, 1),
            &["Compositor"],
        ),
        line_item(
            3,
            Shot,
            "SQ_001",
            "Car drives on winding road",
            5,
            2,
            1,
            Decimal::ONE,
            &["Animator", "Compositor"],
        ),
        line_item(
            4,
            Shot,
            "SQ_002",
            "Setting up tents",
            6,
            2,
            2,
            Decimal::new(13, 1),
            &["Animator", "FX Artist", "Compositor"],
        ),
    ]
}

pub fn production_items() -> Vec<ProductionItem> {
    vec![
        ProductionItem {
            days: Decimal::from(20),
            prod_multiplier: Decimal::new(7, 1),
            ..ProductionItem::new(1, "Supervisor".into())
        },
        ProductionItem {
            days: Decimal::from(40),
            ..ProductionItem::new(2, "Coordinator".into())
        },
    ]
}

pub fn scenarios() -> Vec<ScenarioParameters> {
    vec![ScenarioParameters::with_contingency(
        DEFAULT_SCENARIO.into(),
        Decimal::from(DEFAULT_CONTINGENCY),
    )]
}

struct NodeFields<'a> {
    id: &'a str,
    kind: NodeKind,
    name: &'a str,
    description: &'a str,
    children: &'a [&'a str],
}

fn node(fields: NodeFields<'_>) -> Node {
    Node {
        name: fields.name.into(),
        description: fields.description.into(),
        children: fields.children.iter().map(|c| c.to_string()).collect(),
        image: Some(placeholder_image(fields.id)),
        ..Node::new(fields.id.into(), fields.kind)
    }
}

fn sequence(
    id: &str,
    name: &str,
    description: &str,
    pages: (&str, &str),
    children: &[&str],
) -> Node {
    Node {
        script_page_start: Some(pages.0.into()),
        script_page_end: Some(pages.1.into()),
        ..node(NodeFields {
            id,
            kind: NodeKind::Sequence,
            name,
            description,
            children,
        })
    }
}

fn scene(
    id: &str,
    name: &str,
    description: &str,
    pages: (u32, u32, u32),
    children: &[&str],
) -> Node {
    Node {
        page_start: Some(pages.0),
        page_end: Some(pages.1),
        pages: Some(pages.2),
        ..node(NodeFields {
            id,
            kind: NodeKind::Scene,
            name,
            description,
            children,
        })
    }
}

fn leaf(id: &str, kind: NodeKind, name: &str, description: &str) -> Node {
    node(NodeFields {
        id,
        kind,
        name,
        description,
        children: &[],
    })
}

/// The "Mountain Expedition" sample project plus an asset taxonomy.
pub fn project_nodes() -> BTreeMap<String, Node> {
    let nodes = vec![
        node(NodeFields {
            id: PROJECT_ROOT,
            kind: NodeKind::Project,
            name: "Mountain Expedition",
            description: "A documentary film about a mountain peak ascent.",
            children: &["SQ_001", "SQ_002"],
        }),
        sequence(
            "SQ_001",
            "Opening Title Sequence",
            "Main titles over mountain flyby",
            ("page 01", "page 06"),
            &["SC_001", "SC_002", "SC_003"],
        ),
        sequence(
            "SQ_002",
            "The Descent",
            "The team begins their dangerous descent.",
            ("page 07", "page 12"),
            &["SC_004"],
        ),
        scene(
            "SC_001",
            "Lake Flyover",
            "Slow moving helicopter shot over mountain lake",
            (1, 2, 1),
            &["SHOT_001", "SHOT_002"],
        ),
        scene(
            "SC_002",
            "Yellow Bug flyover",
            "Slow moving helicopter shot over mountain road",
            (3, 4, 1),
            &["SHOT_003"],
        ),
        scene(
            "SC_003",
            "Arrive at Overlook",
            "Slow moving helicopter shot arriving at Overlook",
            (5, 6, 1),
            &[],
        ),
        scene(
            "SC_004",
            "Night Camp",
            "The team sets up camp as darkness falls.",
            (7, 8, 2),
            &["SHOT_004"],
        ),
        leaf(
            "SHOT_001",
            NodeKind::Shot,
            "Helicopter approaches lake",
            "Wide shot of the lake and mountains.",
        ),
        leaf(
            "SHOT_002",
            NodeKind::Shot,
            "Close up on water reflection",
            "The mountain peak reflects perfectly in the water.",
        ),
        leaf(
            "SHOT_003",
            NodeKind::Shot,
            "Car drives on winding road",
            "Top-down view of the yellow car.",
        ),
        leaf(
            "SHOT_004",
            NodeKind::Shot,
            "Setting up tents",
            "Medium shot of climbers working together.",
        ),
        node(NodeFields {
            id: ASSET_ROOT,
            kind: NodeKind::AssetRoot,
            name: "Assets",
            description: "Characters, environments and props built for the film.",
            children: &["ASSET_CAT_001", "ASSET_CAT_002", "ASSET_CAT_003"],
        }),
        node(NodeFields {
            id: "ASSET_CAT_001",
            kind: NodeKind::AssetCategory,
            name: "Characters",
            description: "Digital doubles of the climbing team.",
            children: &["ASSET_001"],
        }),
        node(NodeFields {
            id: "ASSET_CAT_002",
            kind: NodeKind::AssetCategory,
            name: "Environments",
            description: "Terrain and sky builds.",
            children: &["ASSET_002"],
        }),
        node(NodeFields {
            id: "ASSET_CAT_003",
            kind: NodeKind::AssetCategory,
            name: "Props",
            description: "Vehicles and camp equipment.",
            children: &["ASSET_003"],
        }),
        leaf("ASSET_001", NodeKind::Asset, "Climber hero", "Fully rigged lead climber."),
        leaf("ASSET_002", NodeKind::Asset, "Mountain peak", "Hero peak with snow cover."),
        leaf("ASSET_003", NodeKind::Asset, "Yellow bug car", "Vintage car seen from above."),
    ];
    nodes.into_iter().map(|n| (n.id.clone(), n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_children_all_exist() {
        let nodes = project_nodes();
        for node in nodes.values() {
            for child in &node.children {
                assert!(nodes.contains_key(child), "{} missing child {child}", node.id);
            }
        }
    }

    #[test]
    fn test_production_items_resolve_against_roster() {
        let roles = team_roles();
        for item in production_items() {
            assert!(roles.iter().any(|r| r.name == item.name), "{}", item.name);
        }
    }

    #[test]
    fn test_line_items_reference_known_roles() {
        let roles = team_roles();
        for item in assets().iter().chain(shots().iter()) {
            for artist in &item.assigned_artists {
                assert!(roles.iter().any(|r| &r.name == artist), "{artist}");
            }
        }
    }
}
