//! Vector store provider port

use crate::entities::VectorDocument;
use crate::error::Result;
use crate::value_objects::{
    CollectionMode, FilterExpr, HybridSearchOptions, ScoredDocument, SearchLeg, SearchOptions,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// Identifier format a store accepts for document ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkIdKind {
    /// Arbitrary opaque strings
    Opaque,
    /// Hyphenated UUID strings (`8-4-4-4-12`)
    Uuid,
}

/// Contract for vector storage back-ends.
///
/// Implementations range from the in-memory development store to remote ANN
/// clusters. Collection DDL dialects, filter syntaxes and index parameters
/// stay behind this trait; the core consumes filters only through the
/// [`Self::extension_filter`] and [`Self::path_filter`] builders and never
/// interprets the returned [`FilterExpr`].
///
/// Implementations must be safe for concurrent calls; one store instance is
/// shared across codebases.
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Create a collection. Idempotent by name: an already-existing
    /// collection is success. A store that cannot create more collections
    /// fails with [`crate::Error::CollectionLimitReached`].
    async fn create_collection(
        &self,
        name: &str,
        dimension: usize,
        mode: CollectionMode,
    ) -> Result<()>;

    /// Drop a collection. Dropping a missing collection is success.
    async fn drop_collection(&self, name: &str) -> Result<()>;

    /// Whether a collection exists
    async fn has_collection(&self, name: &str) -> Result<bool>;

    /// Names of all collections
    async fn list_collections(&self) -> Result<Vec<String>>;

    /// Upsert documents keyed by `document.id`.
    ///
    /// Duplicate ids within one call are deduplicated keeping the last
    /// occurrence.
    async fn insert(&self, collection: &str, documents: Vec<VectorDocument>) -> Result<()>;

    /// Upsert documents and populate the lexical field from
    /// `document.content`. Only valid for hybrid collections.
    async fn insert_hybrid(&self, collection: &str, documents: Vec<VectorDocument>) -> Result<()>;

    /// Dense similarity search: at most `top_k` results with score at or
    /// above `threshold` (when given), ordered by descending score.
    async fn search(
        &self,
        collection: &str,
        query_vector: &[f32],
        options: &SearchOptions,
    ) -> Result<Vec<ScoredDocument>>;

    /// Multi-leg search: every leg executes independently, then results are
    /// fused according to `options.rerank`. Ties break by first-leg rank.
    async fn hybrid_search(
        &self,
        collection: &str,
        legs: &[SearchLeg],
        options: &HybridSearchOptions,
    ) -> Result<Vec<ScoredDocument>>;

    /// Non-similarity point query. The filter passes through uninterpreted
    /// by the core; `output_fields` names the document fields to return.
    async fn query(
        &self,
        collection: &str,
        filter: &FilterExpr,
        output_fields: &[&str],
        limit: Option<usize>,
    ) -> Result<Vec<HashMap<String, Value>>>;

    /// Delete documents by id. Missing ids are ignored.
    async fn delete(&self, collection: &str, ids: &[String]) -> Result<()>;

    /// Build a filter matching any of the given file extensions
    fn extension_filter(&self, extensions: &[String]) -> FilterExpr;

    /// Build a filter matching one exact relative path
    fn path_filter(&self, relative_path: &str) -> FilterExpr;

    /// Which id format this store requires
    fn id_kind(&self) -> ChunkIdKind {
        ChunkIdKind::Opaque
    }

    /// Identifier of this store implementation, for diagnostics
    fn provider_name(&self) -> &str;
}
