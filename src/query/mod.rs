//! Query engines over the triple snapshot.
//!
//! - [`neighborhood`]: one-hop outgoing expansion from a keyword-matched subject
//! - [`detail`]: bidirectional relationships of an exact identifier
//! - [`structured`]: predicate → value(s) flattening of one entity
//!
//! Every engine is a plain function over `&TripleStore`; none of them can fail.

pub mod detail;
pub mod neighborhood;
pub mod structured;

use std::collections::HashSet;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::graph::NodeStyle;

pub use detail::{EntityDetail, Property, entity_detail};
pub use neighborhood::{Neighborhood, neighborhood};
pub use structured::{FieldValue, StructuredRecord, structured_info};

/// Result caps applied by the query engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    /// Maximum edges accepted by a neighborhood query.
    pub max_edges: usize,
    /// Maximum properties returned by a detail query.
    pub max_properties: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            max_edges: 100,
            max_properties: 20,
        }
    }
}

/// A node in a visualization result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Raw identifier or literal.
    pub id: String,
    #[serde(flatten)]
    pub style: NodeStyle,
}

/// A labelled, directed edge in a visualization result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    /// Resolved predicate label.
    pub label: String,
}

/// Nodes keyed by id, in first-registration order.
///
/// Registration is first-wins: a node keeps the style it was given when it was
/// first seen. Serializes as a JSON object `{id: {type, color}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeRegistry {
    nodes: Vec<Node>,
    seen: HashSet<String>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` unless already present. `style` is only built on insert.
    pub fn register_with(&mut self, id: &str, style: impl FnOnce() -> NodeStyle) -> bool {
        if self.seen.contains(id) {
            return false;
        }
        self.seen.insert(id.to_string());
        self.nodes.push(Node {
            id: id.to_string(),
            style: style(),
        });
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn get(&self, id: &str) -> Option<&NodeStyle> {
        self.nodes.iter().find(|n| n.id == id).map(|n| &n.style)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}

impl Serialize for NodeRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.nodes.len()))?;
        for node in &self.nodes {
            map.serialize_entry(&node.id, &node.style)?;
        }
        map.end()
    }
}
