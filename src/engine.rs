//! Engine facade: the shared, immutable snapshot every query runs against.
//!
//! An `Engine` is built once at startup (or from synthetic parts in tests),
//! then shared behind an `Arc` by any number of concurrent callers. Nothing
//! is written after construction, so queries need no locking.

use std::sync::Arc;

use crate::autocomplete::AutocompleteIndex;
use crate::config::EngineConfig;
use crate::error::LoadResult;
use crate::graph::{HiddenPredicates, TripleStore};
use crate::query::{
    self, EntityDetail, Neighborhood, QueryLimits, StructuredRecord,
};
use crate::taxonomy::Taxonomy;

/// The plant knowledge-graph query engine.
pub struct Engine {
    store: Arc<TripleStore>,
    names: Arc<AutocompleteIndex>,
    taxonomy: Arc<Taxonomy>,
    hidden: HiddenPredicates,
    limits: QueryLimits,
    max_suggestions: usize,
}

impl Engine {
    /// Load every startup file named by `config`. Any failure aborts.
    pub fn new(config: &EngineConfig) -> LoadResult<Self> {
        let store = TripleStore::load(&config.facts_path)?;
        let names = AutocompleteIndex::load(&config.names_path)?;
        let taxonomy = match &config.taxonomy_path {
            Some(path) => Taxonomy::load(path)?,
            None => Taxonomy::empty(),
        };

        let engine = Self::from_parts(store, names, taxonomy)
            .with_hidden(HiddenPredicates::new(config.hidden_predicates.iter().cloned()))
            .with_limits(
                QueryLimits {
                    max_edges: config.max_neighborhood_edges,
                    max_properties: config.max_detail_properties,
                },
                config.max_suggestions,
            );

        tracing::info!(
            triples = engine.store.len(),
            names = engine.names.len(),
            hidden = engine.hidden.len(),
            "flora-graph engine initialized"
        );
        Ok(engine)
    }

    /// Assemble an engine from already-built parts with default filters and
    /// limits.
    pub fn from_parts(store: TripleStore, names: AutocompleteIndex, taxonomy: Taxonomy) -> Self {
        Self {
            store: Arc::new(store),
            names: Arc::new(names),
            taxonomy: Arc::new(taxonomy),
            hidden: HiddenPredicates::default(),
            limits: QueryLimits::default(),
            max_suggestions: crate::autocomplete::DEFAULT_MAX_SUGGESTIONS,
        }
    }

    /// Replace the hidden-predicate set.
    pub fn with_hidden(mut self, hidden: HiddenPredicates) -> Self {
        self.hidden = hidden;
        self
    }

    /// Replace the result caps.
    pub fn with_limits(mut self, limits: QueryLimits, max_suggestions: usize) -> Self {
        self.limits = limits;
        self.max_suggestions = max_suggestions;
        self
    }

    /// Neighborhood graph around a keyword.
    pub fn neighborhood(&self, keyword: &str) -> Neighborhood {
        query::neighborhood(&self.store, &self.hidden, keyword, self.limits.max_edges)
    }

    /// Bidirectional relationships of an exact identifier.
    pub fn detail(&self, entity: &str) -> EntityDetail {
        query::entity_detail(&self.store, &self.hidden, entity, self.limits.max_properties)
    }

    /// Flattened attributes of the entity with the given label.
    pub fn structured_info(&self, label: &str) -> StructuredRecord {
        query::structured_info(&self.store, label)
    }

    /// Name suggestions for a prefix or substring.
    pub fn autocomplete(&self, prefix: &str) -> Vec<String> {
        self.names.suggest(prefix, self.max_suggestions)
    }

    pub fn store(&self) -> &TripleStore {
        &self.store
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn hidden(&self) -> &HiddenPredicates {
        &self.hidden
    }

    pub fn limits(&self) -> QueryLimits {
        self.limits
    }

    /// Summary information about the loaded data.
    pub fn info(&self) -> EngineInfo {
        EngineInfo {
            triple_count: self.store.len(),
            name_count: self.names.len(),
            family_count: self.taxonomy.families().len(),
            hidden_predicates: self.hidden.len(),
        }
    }
}

/// Summary information about the engine state.
#[derive(Debug, Clone, serde::Serialize)]
pub struct EngineInfo {
    pub triple_count: usize,
    pub name_count: usize,
    pub family_count: usize,
    pub hidden_predicates: usize,
}

impl std::fmt::Display for EngineInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "flora-graph engine info")?;
        writeln!(f, "  triples:      {}", self.triple_count)?;
        writeln!(f, "  names:        {}", self.name_count)?;
        writeln!(f, "  families:     {}", self.family_count)?;
        writeln!(f, "  hidden preds: {}", self.hidden_predicates)?;
        Ok(())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("store", &self.store)
            .field("names", &self.names)
            .field("limits", &self.limits)
            .finish()
    }
}
