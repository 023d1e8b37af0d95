//! Immutable, ordered triple store loaded from a Turtle fact file.
//!
//! Parsing goes through `oxigraph`'s RDF parser once at startup; every query
//! afterwards is a linear scan over the pre-parsed `Vec<Triple>`, in file order.

use std::io::{BufRead, BufReader};
use std::path::Path;

use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::Term;

use crate::error::{LoadError, LoadResult};

use super::Triple;

/// Ordered sequence of triples, read-only after construction.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TripleStore {
    triples: Vec<Triple>,
}

impl TripleStore {
    /// Build a store from already-parsed triples, keeping their order.
    pub fn from_triples(triples: impl IntoIterator<Item = Triple>) -> Self {
        Self {
            triples: triples.into_iter().collect(),
        }
    }

    /// Load a Turtle fact file.
    pub fn load(path: &Path) -> LoadResult<Self> {
        let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let store = Self::from_reader(BufReader::new(file), &path.display().to_string())?;
        tracing::info!(
            path = %path.display(),
            triples = store.len(),
            "loaded fact file"
        );
        Ok(store)
    }

    /// Parse Turtle from any reader. `source` names the input in errors.
    pub fn from_reader<R: BufRead>(reader: R, source: &str) -> LoadResult<Self> {
        let mut triples = Vec::new();
        for quad in RdfParser::from_format(RdfFormat::Turtle).for_reader(reader) {
            let quad = quad.map_err(|e| LoadError::Parse {
                path: source.to_string(),
                message: e.to_string(),
            })?;
            triples.push(Triple {
                subject: term_value(Term::from(quad.subject)),
                predicate: quad.predicate.into_string(),
                object: term_value(quad.object),
            });
        }
        Ok(Self { triples })
    }

    /// Iterate over all triples in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, Triple> {
        self.triples.iter()
    }

    /// Number of triples.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Whether the store holds no triples.
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

impl<'a> IntoIterator for &'a TripleStore {
    type Item = &'a Triple;
    type IntoIter = std::slice::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for TripleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripleStore")
            .field("triples", &self.len())
            .finish()
    }
}

/// String form of an RDF term: bare IRI, `_:id` for blank nodes, lexical value
/// for literals.
#[allow(unreachable_patterns)]
fn term_value(term: Term) -> String {
    match term {
        Term::NamedNode(node) => node.into_string(),
        Term::BlankNode(node) => format!("_:{}", node.as_str()),
        Term::Literal(literal) => literal.value().to_string(),
        other => other.to_string(),
    }
}
