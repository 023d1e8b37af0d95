//! # flora-graph
//!
//! Query engine over a plant taxonomy knowledge graph stored as
//! subject–predicate–object triples.
//!
//! ## Architecture
//!
//! - **Triple store** (`graph`): Turtle facts parsed once into an ordered, immutable snapshot
//! - **Queries** (`query`): neighborhood expansion, entity detail, structured-info flattening
//! - **Autocomplete** (`autocomplete`): prefix-then-substring name suggestions
//! - **Engine** (`engine`): shared facade holding the snapshot and configured limits
//! - **Generation** (`generate`): client for the external text-generation service
//!
//! ## Library usage
//!
//! ```
//! use flora_graph::autocomplete::AutocompleteIndex;
//! use flora_graph::engine::Engine;
//! use flora_graph::graph::{Triple, TripleStore};
//! use flora_graph::taxonomy::Taxonomy;
//!
//! let store = TripleStore::from_triples([
//!     Triple::new("Lotus", "属于科", "睡莲科"),
//!     Triple::new("Lotus", "花期", "六月"),
//! ]);
//! let engine = Engine::from_parts(store, AutocompleteIndex::new(["Lotus"]), Taxonomy::empty());
//!
//! let graph = engine.neighborhood("lotus");
//! assert_eq!(graph.links.len(), 2);
//! assert_eq!(engine.autocomplete("lo"), ["Lotus"]);
//! ```

pub mod autocomplete;
pub mod config;
pub mod engine;
pub mod error;
pub mod generate;
pub mod graph;
pub mod query;
pub mod taxonomy;
