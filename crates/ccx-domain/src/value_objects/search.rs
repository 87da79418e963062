//! Search-related value objects

use crate::entities::VectorDocument;
use serde::{Deserialize, Serialize};

/// A search hit as returned to the operator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// The matched chunk content
    pub content: String,
    /// Path relative to the codebase root
    pub relative_path: String,
    /// First line of the chunk, 1-based
    pub start_line: u32,
    /// Last line of the chunk, 1-based inclusive
    pub end_line: u32,
    /// Language tag of the chunk
    pub language: String,
    /// Relevance score; higher is better
    pub score: f64,
}

/// A raw store hit: the stored document plus its similarity or fused score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    /// The stored document
    pub document: VectorDocument,
    /// Similarity score for single-leg search, fused score for hybrid search
    pub score: f64,
}

/// An opaque filter expression.
///
/// Built only by the store's `extension_filter`/`path_filter` builders and
/// handed back to the same store; the core never inspects the payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterExpr(pub String);

impl FilterExpr {
    /// Access the backend-specific payload. Only store implementations call
    /// this; the core treats the value as uninterpreted.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Options for a single-leg dense search.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Maximum number of results
    pub top_k: usize,
    /// Minimum similarity score, if any
    pub threshold: Option<f64>,
    /// Optional store-built filter
    pub filter: Option<FilterExpr>,
}

/// One leg of a hybrid search request.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchLeg {
    /// Vector similarity over the dense field
    Dense(Vec<f32>),
    /// Lexical similarity over the text field
    Sparse(String),
}

/// Fusion strategy applied across hybrid search legs.
#[derive(Debug, Clone, PartialEq)]
pub enum RerankStrategy {
    /// Reciprocal rank fusion: `score(d) = sum over legs of 1 / (k + rank)`
    Rrf {
        /// Rank damping constant
        k: f64,
    },
    /// Weighted sum of per-leg min-max normalized scores
    Weighted {
        /// One weight per leg, in leg order
        weights: Vec<f64>,
    },
}

impl Default for RerankStrategy {
    fn default() -> Self {
        Self::Rrf {
            k: crate::constants::RRF_DEFAULT_K,
        }
    }
}

/// Options for a hybrid (multi-leg) search.
#[derive(Debug, Clone, Default)]
pub struct HybridSearchOptions {
    /// Maximum number of fused results
    pub top_k: usize,
    /// Fusion strategy across legs
    pub rerank: RerankStrategy,
    /// Optional store-built filter applied to every leg
    pub filter: Option<FilterExpr>,
}
