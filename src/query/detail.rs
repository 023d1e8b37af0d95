//! Entity detail: forward and reverse relationships of one exact identifier,
//! plus visualization metadata for every related entity.
//!
//! Two full passes over the same snapshot. The first collects properties and
//! the set of related entities; the second styles those entities. The
//! property cap only truncates the returned list, so node info still covers
//! every related entity.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::graph::{HiddenPredicates, NodeStyle, TripleStore, classify};

use super::NodeRegistry;

/// One relationship of the queried entity.
///
/// For reverse relationships `object` holds the subject that points at the
/// entity; direction is not otherwise recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub predicate: String,
    pub object: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityDetail {
    /// The identifier that was queried.
    pub entity: String,
    /// Forward and reverse properties in scan order, truncated.
    pub properties: Vec<Property>,
    /// Styles for every related entity, keyed by raw identifier.
    pub node_info: NodeRegistry,
}

/// Look up the relationships of `entity` by raw identifier equality.
///
/// No label resolution or case folding is applied to the entity: it must be
/// the full identifier as stored.
pub fn entity_detail(
    store: &TripleStore,
    hidden: &HiddenPredicates,
    entity: &str,
    max_properties: usize,
) -> EntityDetail {
    let entity = entity.trim();

    let mut properties = Vec::new();
    let mut related: HashSet<&str> = HashSet::new();

    for triple in store.iter().filter(|t| !hidden.hides(t)) {
        if triple.subject == entity {
            properties.push(Property {
                predicate: triple.predicate_label().to_string(),
                object: triple.object.clone(),
            });
            related.insert(triple.object.as_str());
        } else if triple.object == entity {
            properties.push(Property {
                predicate: triple.predicate_label().to_string(),
                object: triple.subject.clone(),
            });
            related.insert(triple.subject.as_str());
        }
    }

    let mut node_info = NodeRegistry::new();
    if !related.is_empty() {
        for triple in store.iter().filter(|t| !hidden.hides(t)) {
            if related.contains(triple.subject.as_str()) {
                node_info.register_with(&triple.subject, NodeStyle::plant);
            }
            if related.contains(triple.object.as_str()) {
                node_info.register_with(&triple.object, || classify(triple.predicate_label()));
            }
        }
    }

    tracing::debug!(
        entity,
        properties = properties.len(),
        related = related.len(),
        "detail query"
    );

    properties.truncate(max_properties);
    EntityDetail {
        entity: entity.to_string(),
        properties,
        node_info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Triple;

    #[test]
    fn object_side_match_yields_reverse_property() {
        let store = TripleStore::from_triples([Triple::new("A", "属于科", "Rosaceae")]);
        let detail = entity_detail(&store, &HiddenPredicates::default(), "Rosaceae", 20);

        assert_eq!(detail.entity, "Rosaceae");
        assert_eq!(
            detail.properties,
            vec![Property {
                predicate: "属于科".into(),
                object: "A".into(),
            }]
        );
        assert_eq!(detail.node_info.get("A"), Some(&NodeStyle::plant()));
    }

    #[test]
    fn forward_and_reverse_in_scan_order() {
        let store = TripleStore::from_triples([
            Triple::new("B", "别名", "A"),
            Triple::new("A", "花期", "五月"),
            Triple::new("A", "特征", "有刺"),
        ]);
        let detail = entity_detail(&store, &HiddenPredicates::default(), "A", 20);
        let preds: Vec<(&str, &str)> = detail
            .properties
            .iter()
            .map(|p| (p.predicate.as_str(), p.object.as_str()))
            .collect();
        assert_eq!(preds, [("别名", "B"), ("花期", "五月")]);
        assert_eq!(detail.node_info.get("五月").unwrap().kind, "花期");
        assert_eq!(detail.node_info.get("B").unwrap().kind, "植物");
        assert!(!detail.node_info.contains("有刺"));
    }

    #[test]
    fn matching_is_raw_and_case_sensitive() {
        let store = TripleStore::from_triples([Triple::new(
            "http://plants.example/Lotus",
            "花期",
            "六月",
        )]);
        let hidden = HiddenPredicates::default();
        assert!(entity_detail(&store, &hidden, "Lotus", 20).properties.is_empty());
        assert!(entity_detail(&store, &hidden, "http://plants.example/lotus", 20)
            .properties
            .is_empty());
        assert_eq!(
            entity_detail(&store, &hidden, " http://plants.example/Lotus ", 20)
                .properties
                .len(),
            1
        );
    }

    #[test]
    fn property_cap_does_not_limit_node_info() {
        let store = TripleStore::from_triples(
            (0..30).map(|i| Triple::new("Fern", "国内分布于", format!("省{i}"))),
        );
        let detail = entity_detail(&store, &HiddenPredicates::default(), "Fern", 20);
        assert_eq!(detail.properties.len(), 20);
        assert_eq!(detail.node_info.len(), 30);
        assert!(detail.node_info.contains("省29"));
    }

    #[test]
    fn second_pass_styles_related_subjects_as_plants() {
        // "睡莲科" is related via Lotus, and is itself the subject of another fact.
        let store = TripleStore::from_triples([
            Triple::new("睡莲科", "别名", "Nymphaeaceae"),
            Triple::new("Lotus", "属于科", "睡莲科"),
        ]);
        let detail = entity_detail(&store, &HiddenPredicates::default(), "Lotus", 20);
        assert_eq!(detail.node_info.get("睡莲科"), Some(&NodeStyle::plant()));
    }

    #[test]
    fn unknown_entity_is_empty() {
        let store = TripleStore::from_triples([Triple::new("A", "别名", "B")]);
        let detail = entity_detail(&store, &HiddenPredicates::default(), "Z", 20);
        assert!(detail.properties.is_empty());
        assert!(detail.node_info.is_empty());
    }

    #[test]
    fn self_loop_is_recorded_once_as_forward() {
        let store = TripleStore::from_triples([Triple::new("A", "别名", "A")]);
        let detail = entity_detail(&store, &HiddenPredicates::default(), "A", 20);
        assert_eq!(detail.properties.len(), 1);
    }

    #[test]
    fn serializes_node_info_as_object() {
        let store = TripleStore::from_triples([Triple::new("A", "属于科", "Rosaceae")]);
        let detail = entity_detail(&store, &HiddenPredicates::default(), "A", 20);
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["entity"], "A");
        assert_eq!(json["properties"][0]["predicate"], "属于科");
        assert_eq!(json["node_info"]["Rosaceae"]["type"], "科");
    }
}
