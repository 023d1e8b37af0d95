//! Structured-info extraction: all outgoing facts of an entity flattened into
//! predicate → value(s).
//!
//! Unlike the visualization queries this scan ignores the hidden-predicate
//! filter, and it matches the subject by resolved label rather than by raw
//! identifier.

use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::graph::label::{looks_like_uri, resolve};
use crate::graph::TripleStore;

/// Value of one predicate in a [`StructuredRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    One(String),
    Many(Vec<String>),
}

impl FieldValue {
    /// All values in occurrence order.
    pub fn values(&self) -> Vec<&str> {
        match self {
            FieldValue::One(v) => vec![v.as_str()],
            FieldValue::Many(vs) => vs.iter().map(String::as_str).collect(),
        }
    }

    /// Values joined with `sep`.
    pub fn join(&self, sep: &str) -> String {
        self.values().join(sep)
    }

    fn push(&mut self, value: String) {
        match self {
            FieldValue::One(first) => {
                let first = std::mem::take(first);
                *self = FieldValue::Many(vec![first, value]);
            }
            FieldValue::Many(vs) => vs.push(value),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.join("、"))
    }
}

/// Predicate label → value(s), in first-occurrence order of the predicates.
///
/// Serializes as a JSON object whose values are strings or string arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredRecord {
    fields: Vec<(String, FieldValue)>,
    index: HashMap<String, usize>,
}

impl StructuredRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `predicate`. The first occurrence is stored as a
    /// scalar; the second turns it into a list; later ones append.
    pub fn insert(&mut self, predicate: &str, value: String) {
        match self.index.get(predicate) {
            Some(&i) => self.fields[i].1.push(value),
            None => {
                self.index.insert(predicate.to_string(), self.fields.len());
                self.fields
                    .push((predicate.to_string(), FieldValue::One(value)));
            }
        }
    }

    pub fn get(&self, predicate: &str) -> Option<&FieldValue> {
        self.index.get(predicate).map(|&i| &self.fields[i].1)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for StructuredRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StructuredRecord {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Requires an order-preserving map on the JSON side to keep field order.
        let raw = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        let mut record = StructuredRecord::new();
        for (key, value) in raw {
            let value: FieldValue =
                serde_json::from_value(value).map_err(serde::de::Error::custom)?;
            record.index.insert(key.clone(), record.fields.len());
            record.fields.push((key, value));
        }
        Ok(record)
    }
}

/// Flatten every outgoing fact of the subject(s) whose label equals `label`.
pub fn structured_info(store: &TripleStore, label: &str) -> StructuredRecord {
    let label = label.trim();
    let mut record = StructuredRecord::new();

    for triple in store.iter().filter(|t| resolve(&t.subject) == label) {
        let value = if looks_like_uri(&triple.object) {
            resolve(&triple.object).to_string()
        } else {
            triple.object.clone()
        };
        record.insert(triple.predicate_label(), value);
    }

    tracing::debug!(label, fields = record.len(), "structured-info query");
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Triple;

    #[test]
    fn includes_hidden_predicates() {
        let store = TripleStore::from_triples([
            Triple::new("Lotus", "属于科", "睡莲科"),
            Triple::new("Lotus", "花期", "六月"),
            Triple::new("Lotus", "特征", "叶圆"),
        ]);
        let record = structured_info(&store, "Lotus");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"属于科":"睡莲科","花期":"六月","特征":"叶圆"}"#);
    }

    #[test]
    fn repeated_predicates_become_lists_in_order() {
        let store = TripleStore::from_triples([
            Triple::new("Rose", "别名", "玫瑰"),
            Triple::new("Rose", "花期", "五月"),
            Triple::new("Rose", "别名", "刺玫"),
            Triple::new("Rose", "别名", "徘徊花"),
        ]);
        let record = structured_info(&store, "Rose");
        assert_eq!(
            record.get("别名"),
            Some(&FieldValue::Many(vec![
                "玫瑰".into(),
                "刺玫".into(),
                "徘徊花".into()
            ]))
        );
        assert_eq!(record.get("花期"), Some(&FieldValue::One("五月".into())));
        let keys: Vec<&str> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["别名", "花期"]);
    }

    #[test]
    fn exactly_two_occurrences_make_a_pair() {
        let store = TripleStore::from_triples([
            Triple::new("Rose", "国内分布于", "云南"),
            Triple::new("Rose", "国内分布于", "四川"),
        ]);
        let json = serde_json::to_value(structured_info(&store, "Rose")).unwrap();
        assert_eq!(json["国内分布于"], serde_json::json!(["云南", "四川"]));
    }

    #[test]
    fn uri_objects_resolve_literals_stay_verbatim() {
        let store = TripleStore::from_triples([
            Triple::new(
                "http://plants.example/plant/Lotus",
                "http://plants.example/schema#属于科",
                "http://plants.example/plant/睡莲科",
            ),
            Triple::new(
                "http://plants.example/plant/Lotus",
                "http://plants.example/schema#生境",
                "池塘/湖泊",
            ),
        ]);
        let record = structured_info(&store, "Lotus");
        assert_eq!(record.get("属于科"), Some(&FieldValue::One("睡莲科".into())));
        assert_eq!(record.get("生境"), Some(&FieldValue::One("池塘/湖泊".into())));
    }

    #[test]
    fn label_match_is_case_sensitive() {
        let store = TripleStore::from_triples([Triple::new("Lotus", "花期", "六月")]);
        assert!(structured_info(&store, "lotus").is_empty());
        assert_eq!(structured_info(&store, " Lotus ").len(), 1);
    }

    #[test]
    fn idempotent_output() {
        let store = TripleStore::from_triples([
            Triple::new("Rose", "别名", "玫瑰"),
            Triple::new("Rose", "别名", "刺玫"),
        ]);
        let a = serde_json::to_string(&structured_info(&store, "Rose")).unwrap();
        let b = serde_json::to_string(&structured_info(&store, "Rose")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn deserializes_back_in_order() {
        let json = r#"{"花期":"六月","别名":["莲","荷花"]}"#;
        let record: StructuredRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.get("别名").unwrap().join("、"), "莲、荷花");
        let keys: Vec<&str> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["花期", "别名"]);
    }
}
