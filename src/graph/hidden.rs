//! Predicates excluded from visualization-facing queries.

use std::collections::HashSet;

use super::Triple;
use super::label::resolve;

/// Predicate label hidden by default: free-text feature descriptions.
pub const FEATURE_PREDICATE: &str = "特征";

/// Set of predicate labels whose triples are invisible to the neighborhood and
/// detail queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenPredicates {
    labels: HashSet<String>,
}

impl HiddenPredicates {
    /// Hide the given predicate labels.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Hide nothing.
    pub fn none() -> Self {
        Self {
            labels: HashSet::new(),
        }
    }

    /// Whether a predicate (full IRI or bare label) is hidden.
    pub fn is_hidden(&self, predicate: &str) -> bool {
        self.labels.contains(resolve(predicate))
    }

    /// Whether a triple should be skipped by visualization queries.
    pub fn hides(&self, triple: &Triple) -> bool {
        self.is_hidden(&triple.predicate)
    }

    /// Number of hidden labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether nothing is hidden.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for HiddenPredicates {
    fn default() -> Self {
        Self::new([FEATURE_PREDICATE])
    }
}
