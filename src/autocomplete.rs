//! Name autocomplete over a flat corpus of entity names.
//!
//! Prefix matches rank before substring-only matches; each group keeps corpus
//! order. The corpus is independent of the triple store and read-only after
//! load.

use std::path::Path;

use crate::error::{LoadError, LoadResult};

/// Header of the CSV column holding entity names.
pub const NAME_COLUMN: &str = "name";

/// Default number of suggestions returned.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 10;

/// Immutable corpus of names with a precomputed lowercase form for matching.
#[derive(Clone, Default)]
pub struct AutocompleteIndex {
    names: Vec<String>,
    folded: Vec<String>,
}

impl AutocompleteIndex {
    /// Build an index from names, keeping their order.
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let folded = names.iter().map(|n| n.to_lowercase()).collect();
        Self { names, folded }
    }

    /// Load names from the `name` column of a CSV file with a header row.
    ///
    /// Empty cells are skipped.
    pub fn load(path: &Path) -> LoadResult<Self> {
        let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let index = Self::from_reader(file, &path.display().to_string())?;
        tracing::info!(path = %path.display(), names = index.len(), "loaded name corpus");
        Ok(index)
    }

    /// Read a CSV corpus from any reader. `source` names the input in errors.
    pub fn from_reader<R: std::io::Read>(reader: R, source: &str) -> LoadResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let corpus_err = |e: csv::Error| LoadError::Corpus {
            path: source.to_string(),
            message: e.to_string(),
        };

        let column = reader
            .headers()
            .map_err(corpus_err)?
            .iter()
            .position(|h| h.trim() == NAME_COLUMN)
            .ok_or_else(|| LoadError::MissingColumn {
                path: source.to_string(),
                column: NAME_COLUMN.to_string(),
            })?;

        let mut names = Vec::new();
        for record in reader.records() {
            let record = record.map_err(corpus_err)?;
            match record.get(column) {
                Some(name) if !name.is_empty() => names.push(name.to_string()),
                _ => {}
            }
        }
        Ok(Self::new(names))
    }

    /// Suggest up to `limit` names for `query`.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<String> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let prefix = self
            .folded
            .iter()
            .enumerate()
            .filter(|(_, name)| name.starts_with(&query));
        let substring = self
            .folded
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.starts_with(&query) && name.contains(&query));

        prefix
            .chain(substring)
            .take(limit)
            .map(|(i, _)| self.names[i].clone())
            .collect()
    }

    /// Number of names in the corpus.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All names in corpus order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl std::fmt::Debug for AutocompleteIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutocompleteIndex")
            .field("names", &self.len())
            .finish()
    }
}
