//! Engine configuration, persisted as TOML.
//!
//! Every field has a serde default so a config file only needs to name what it
//! changes. Secrets are never read from the file: the text-generation API key
//! comes from the environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, LoadResult};
use crate::graph::hidden::FEATURE_PREDICATE;

/// Environment variable holding the text-generation API key.
pub const API_KEY_ENV: &str = "DEEPSEEK_API_KEY";

/// Taxonomy table used when no config file is given.
pub const DEFAULT_TAXONOMY_PATH: &str = "taxonomy_table.json";

/// Startup data files and query limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Turtle fact file.
    #[serde(default = "default_facts_path")]
    pub facts_path: PathBuf,
    /// CSV name corpus for autocomplete.
    #[serde(default = "default_names_path")]
    pub names_path: PathBuf,
    /// JSON taxonomy table. `None` serves an empty tree; a config file that
    /// leaves the key out gets `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomy_path: Option<PathBuf>,
    /// Predicate labels hidden from visualization queries.
    #[serde(default = "default_hidden_predicates")]
    pub hidden_predicates: Vec<String>,
    /// Edge cap for neighborhood queries.
    #[serde(default = "default_max_neighborhood_edges")]
    pub max_neighborhood_edges: usize,
    /// Property cap for detail queries.
    #[serde(default = "default_max_detail_properties")]
    pub max_detail_properties: usize,
    /// Suggestion cap for autocomplete.
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    #[serde(default)]
    pub generation: GenerationConfig,
}

fn default_facts_path() -> PathBuf {
    PathBuf::from("final_merged_plants.ttl")
}
fn default_names_path() -> PathBuf {
    PathBuf::from("name.csv")
}
fn default_hidden_predicates() -> Vec<String> {
    vec![FEATURE_PREDICATE.to_string()]
}
fn default_max_neighborhood_edges() -> usize {
    100
}
fn default_max_detail_properties() -> usize {
    20
}
fn default_max_suggestions() -> usize {
    crate::autocomplete::DEFAULT_MAX_SUGGESTIONS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            facts_path: default_facts_path(),
            names_path: default_names_path(),
            taxonomy_path: Some(PathBuf::from(DEFAULT_TAXONOMY_PATH)),
            hidden_predicates: default_hidden_predicates(),
            max_neighborhood_edges: default_max_neighborhood_edges(),
            max_detail_properties: default_max_detail_properties(),
            max_suggestions: default_max_suggestions(),
            generation: GenerationConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> LoadResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| LoadError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load from `path` if given, else use defaults.
    pub fn load_or_default(path: Option<&Path>) -> LoadResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> LoadResult<String> {
        toml::to_string_pretty(self).map_err(|e| LoadError::ConfigSerialize {
            message: e.to_string(),
        })
    }
}

/// Settings for the external text-generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// OpenAI-compatible chat-completions endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Timeout for description generation, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Timeout for script suggestions, in seconds.
    #[serde(default = "default_script_timeout_secs")]
    pub script_timeout_secs: u64,
    /// Read from [`API_KEY_ENV`], never from the file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_api_url() -> String {
    "https://api.deepseek.com/v1/chat/completions".into()
}
fn default_model() -> String {
    "deepseek-chat".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_script_timeout_secs() -> u64 {
    60
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            script_timeout_secs: default_script_timeout_secs(),
            api_key: None,
        }
    }
}

impl GenerationConfig {
    /// Fill `api_key` from the environment.
    pub fn with_env_api_key(mut self) -> Self {
        self.api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        self
    }
}
