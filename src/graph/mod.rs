//! Knowledge graph: the immutable triple snapshot and the helpers every query
//! engine shares.
//!
//! - **Store** ([`TripleStore`]): ordered, pre-parsed triples loaded once from Turtle
//! - **Labels** ([`label`]): short display labels for IRIs
//! - **Classification** ([`classify`]): predicate label → node type and color
//! - **Hidden predicates** ([`HiddenPredicates`]): predicates kept out of visual queries

pub mod classify;
pub mod hidden;
pub mod label;
pub mod store;

use serde::{Deserialize, Serialize};

pub use classify::{NodeStyle, classify};
pub use hidden::HiddenPredicates;
pub use label::resolve;
pub use store::TripleStore;

/// A triple (subject, predicate, object) in the knowledge graph.
///
/// IRIs are kept as their full IRI string and literals as their lexical value,
/// so detail lookups can match the exact identifier a previous query returned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// The subject of the triple.
    pub subject: String,
    /// The predicate (relation) of the triple.
    pub predicate: String,
    /// The object of the triple: an identifier or a plain literal.
    pub object: String,
}

impl Triple {
    /// Create a new triple.
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Short label of the predicate.
    pub fn predicate_label(&self) -> &str {
        resolve(&self.predicate)
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.subject, self.predicate, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicate_label_uses_resolver() {
        let t = Triple::new(
            "http://plants.example/Lotus",
            "http://plants.example/schema#花期",
            "六月",
        );
        assert_eq!(t.predicate_label(), "花期");
    }

    #[test]
    fn display_shows_all_positions() {
        let t = Triple::new("Lotus", "属于科", "睡莲科");
        assert_eq!(t.to_string(), "(Lotus, 属于科, 睡莲科)");
    }
}
