//! Precomputed family → genus → plant tree, loaded once and served verbatim.

use std::path::Path;

use serde_json::Value;

use crate::error::{LoadError, LoadResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Taxonomy {
    tree: Value,
}

impl Taxonomy {
    pub fn new(tree: Value) -> Self {
        Self { tree }
    }

    /// An empty tree, used when no taxonomy file is configured.
    pub fn empty() -> Self {
        Self {
            tree: Value::Object(serde_json::Map::new()),
        }
    }

    /// Load the JSON taxonomy table.
    pub fn load(path: &Path) -> LoadResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let tree: Value = serde_json::from_str(&content).map_err(|e| LoadError::Taxonomy {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::info!(path = %path.display(), "loaded taxonomy table");
        Ok(Self { tree })
    }

    /// The raw tree.
    pub fn tree(&self) -> &Value {
        &self.tree
    }

    /// Top-level keys (families) in file order, when the tree is an object.
    pub fn families(&self) -> Vec<&str> {
        self.tree
            .as_object()
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::empty()
    }
}
