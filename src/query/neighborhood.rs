//! Neighborhood expansion: every visible outgoing edge of the subject(s) whose
//! label matches a keyword.

use serde::{Deserialize, Serialize};

use crate::graph::{HiddenPredicates, NodeStyle, TripleStore, classify, resolve};

use super::{Edge, Node, NodeRegistry};

/// Local graph around a keyword, ready for visualization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighborhood {
    /// Deduplicated nodes in first-seen order.
    pub nodes: Vec<Node>,
    /// Edges in store order.
    pub links: Vec<Edge>,
}

impl Neighborhood {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }
}

/// Expand the neighborhood of `keyword`.
///
/// The keyword is trimmed and compared case-insensitively against the resolved
/// label of each subject; matching is exact, not substring. At most
/// `max_edges` edges are accepted across the whole scan.
pub fn neighborhood(
    store: &TripleStore,
    hidden: &HiddenPredicates,
    keyword: &str,
    max_edges: usize,
) -> Neighborhood {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() || max_edges == 0 {
        return Neighborhood::default();
    }

    let mut links = Vec::new();
    let mut nodes = NodeRegistry::new();

    for triple in store.iter().filter(|t| !hidden.hides(t)) {
        if resolve(&triple.subject).to_lowercase() != keyword {
            continue;
        }

        let label = triple.predicate_label();
        links.push(Edge {
            source: triple.subject.clone(),
            target: triple.object.clone(),
            label: label.to_string(),
        });
        nodes.register_with(&triple.subject, NodeStyle::plant);
        nodes.register_with(&triple.object, || classify(label));

        if links.len() >= max_edges {
            tracing::debug!(keyword = %keyword, max_edges, "neighborhood edge cap reached");
            break;
        }
    }

    tracing::debug!(
        keyword = %keyword,
        nodes = nodes.len(),
        links = links.len(),
        "neighborhood query"
    );

    Neighborhood {
        nodes: nodes.into_nodes(),
        links,
    }
}
