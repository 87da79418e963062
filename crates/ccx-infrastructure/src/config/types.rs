//! Configuration types

use ccx_domain::constants::{
    DEFAULT_CHUNK_LIMIT, DEFAULT_CHUNK_OVERLAP, DEFAULT_EMBEDDING_BATCH_SIZE,
    DEFAULT_MAX_CHUNK_SIZE,
};
use serde::{Deserialize, Serialize};

/// Recognized indexer options.
///
/// All fields default per the domain constants; operators override them
/// through a TOML file or `CCX_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IndexerConfig {
    /// Chunks per embedding batch, lower bound 1
    pub embedding_batch_size: usize,
    /// Maximum chunk size in characters
    pub max_chunk_size: usize,
    /// Trailing overlap between size-based chunks, in characters
    pub chunk_overlap: usize,
    /// Whether collections carry the lexical field
    pub hybrid_mode: bool,
    /// Hard cap on chunks per indexing run
    pub chunk_limit: usize,
    /// Extensions indexed in addition to the defaults (leading dot)
    pub custom_extensions: Vec<String>,
    /// Ignore patterns appended after built-in, repo and global rules
    pub custom_ignore_patterns: Vec<String>,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            embedding_batch_size: DEFAULT_EMBEDDING_BATCH_SIZE,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            hybrid_mode: true,
            chunk_limit: DEFAULT_CHUNK_LIMIT,
            custom_extensions: Vec::new(),
            custom_ignore_patterns: Vec::new(),
        }
    }
}

impl IndexerConfig {
    /// The full extension allow-list: defaults plus custom entries
    pub fn indexable_extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = ccx_domain::constants::DEFAULT_INDEXABLE_EXTENSIONS
            .iter()
            .map(|ext| (*ext).to_string())
            .collect();
        for ext in &self.custom_extensions {
            let normalized = if ext.starts_with('.') {
                ext.clone()
            } else {
                format!(".{ext}")
            };
            if !extensions.contains(&normalized) {
                extensions.push(normalized);
            }
        }
        extensions
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level: trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON instead of human-readable lines
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}
