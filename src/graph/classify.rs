//! Predicate classification for visualization.
//!
//! Each well-known taxonomy predicate maps to the node type of the object it
//! points at, plus a display color. The table is scanned in order and the
//! first match wins; unknown predicates fall back to a neutral gray.

use serde::{Deserialize, Serialize};

/// Node type of the entity a query was made for.
pub const PLANT_KIND: &str = "植物";
/// Color of the entity a query was made for.
pub const PLANT_COLOR: &str = "#4CAF50";

/// Type and color assigned to a node in a visualization result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStyle {
    /// Semantic node type.
    #[serde(rename = "type")]
    pub kind: String,
    /// CSS color.
    pub color: String,
}

impl NodeStyle {
    fn new(kind: &str, color: &str) -> Self {
        Self {
            kind: kind.to_string(),
            color: color.to_string(),
        }
    }

    /// Style of a plant node (a subject of taxonomy facts).
    pub fn plant() -> Self {
        Self::new(PLANT_KIND, PLANT_COLOR)
    }
}

/// (predicate label, node type, color).
const PREDICATE_TABLE: &[(&str, &str, &str)] = &[
    ("属于科", "科", "#2196F3"),
    ("属于属", "属", "#3F51B5"),
    ("拉丁学名", "拉丁学名", "#9E9E9E"),
    ("国内分布于", "国内分布地", "#FF5722"),
    ("国际分布于", "国际分布地", "#FFC107"),
    ("别名", "别名", "#9C27B0"),
    ("花期", "花期", "#FF69B4"),
    ("果期", "果期", "#8BC34A"),
    ("生境", "生境", "#795548"),
    ("治疗", "药用价值", "#008B8B"),
];

const UNKNOWN: (&str, &str) = ("未知", "#ccc");

/// Classify an already-resolved predicate label.
pub fn classify(predicate_label: &str) -> NodeStyle {
    PREDICATE_TABLE
        .iter()
        .find(|(pred, _, _)| *pred == predicate_label)
        .map(|(_, kind, color)| NodeStyle::new(kind, color))
        .unwrap_or_else(|| NodeStyle::new(UNKNOWN.0, UNKNOWN.1))
}
