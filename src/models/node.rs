use serde::{Deserialize, Serialize};

use crate::util::parse_count;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Project,
    Sequence,
    Scene,
    Shot,
    AssetRoot,
    AssetCategory,
    Asset,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::Sequence => "Sequence",
            Self::Scene => "Scene",
            Self::Shot => "Shot",
            Self::AssetRoot => "Assets",
            Self::AssetCategory => "Asset Category",
            Self::Asset => "Asset",
        }
    }

    /// The kind created by "add child", or `None` for leaf kinds.
    pub fn child_kind(&self) -> Option<NodeKind> {
        match self {
            Self::Project => Some(Self::Sequence),
            Self::Sequence => Some(Self::Scene),
            Self::Scene => Some(Self::Shot),
            Self::AssetRoot => Some(Self::AssetCategory),
            Self::AssetCategory => Some(Self::Asset),
            Self::Shot | Self::Asset => None,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Self::Project | Self::AssetRoot)
    }

    /// Prefix used when generating ids for new nodes, e.g. `SEQUENCE_004`.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Project => "PROJ",
            Self::Sequence => "SEQUENCE",
            Self::Scene => "SCENE",
            Self::Shot => "SHOT",
            Self::AssetRoot => "ASSETS",
            Self::AssetCategory => "ASSET_CAT",
            Self::Asset => "ASSET",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A node of the project or asset hierarchy. Edges point parent → children only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_page_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_page_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_end: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    #[serde(default)]
    pub children: Vec<String>,
}

impl Node {
    pub fn new(id: String, kind: NodeKind) -> Self {
        Self {
            image: Some(placeholder_image(&id)),
            code: id.clone(),
            name: format!("New {}", kind.as_str().to_lowercase()),
            description: "A new item description.".into(),
            id,
            kind,
            script_page_start: None,
            script_page_end: None,
            page_start: None,
            page_end: None,
            pages: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn apply_edit(&mut self, edit: NodeEdit) {
        match edit {
            NodeEdit::Name(v) => self.name = v,
            NodeEdit::Code(v) => self.code = v,
            NodeEdit::Description(v) => self.description = v,
            NodeEdit::Image(v) => self.image = v,
            NodeEdit::ScriptPages { start, end } => {
                self.script_page_start = Some(start);
                self.script_page_end = Some(end);
            }
            NodeEdit::PageRange { start, end } => {
                let (start, end) = (start.min(end), start.max(end));
                self.page_start = Some(start);
                self.page_end = Some(end);
                self.pages = Some(end - start);
            }
        }
    }
}

pub fn placeholder_image(id: &str) -> String {
    format!("https://picsum.photos/seed/{id}/400/225")
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeEdit {
    Name(String),
    Code(String),
    Description(String),
    Image(Option<String>),
    ScriptPages { start: String, end: String },
    /// Sets start/end and derives `pages` as `end - start`.
    PageRange { start: u32, end: u32 },
}

impl NodeEdit {
    /// Map a field name and raw text to an edit. Page ranges are written
    /// `start-end`; script pages `start..end`.
    pub fn from_input(field: &str, raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let edit = match field.trim().to_lowercase().as_str() {
            "name" => Self::Name(raw.to_string()),
            "code" => Self::Code(raw.to_string()),
            "description" | "desc" => Self::Description(raw.to_string()),
            "image" => Self::Image(Some(raw.to_string()).filter(|s| !s.is_empty())),
            "script_pages" | "script" => {
                let (start, end) = raw.split_once("..")?;
                Self::ScriptPages {
                    start: start.trim().to_string(),
                    end: end.trim().to_string(),
                }
            }
            "pages" | "page_range" => {
                let (start, end) = raw.split_once('-')?;
                Self::PageRange {
                    start: parse_count(start),
                    end: parse_count(end),
                }
            }
            _ => return None,
        };
        Some(edit)
    }
}
