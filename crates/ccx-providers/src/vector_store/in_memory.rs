//! In-memory vector store
//!
//! Stores documents in concurrent hash maps. Dense search is cosine
//! similarity, the hybrid sparse leg is BM25 over document content, fusion
//! is shared with every other store through
//! [`crate::hybrid_search::fusion`]. Data is not persisted.
//!
//! The filter payloads built here (`ext:` / `path:` prefixes) are private
//! to this store; the core only ever passes them back verbatim.

use crate::hybrid_search::fusion;
use crate::hybrid_search::lexical::{self, Bm25Params, Bm25Scorer};
use async_trait::async_trait;
use ccx_domain::entities::VectorDocument;
use ccx_domain::error::{Error, Result};
use ccx_domain::ports::vector_store::{ChunkIdKind, VectorStoreProvider};
use ccx_domain::value_objects::{
    CollectionMode, FilterExpr, HybridSearchOptions, RerankStrategy, ScoredDocument, SearchLeg,
    SearchOptions,
};
use dashmap::DashMap;
use serde_json::Value;
use std::collections::HashMap;

/// One stored collection
#[derive(Debug)]
struct StoredCollection {
    dimension: usize,
    mode: CollectionMode,
    /// Documents keyed by id; upserts replace in place
    documents: HashMap<String, VectorDocument>,
}

/// Non-persistent vector store for development and tests
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    collections: DashMap<String, StoredCollection>,
    /// Optional cap on the number of collections, for exercising the
    /// collection-limit path
    max_collections: Option<usize>,
}

impl InMemoryVectorStore {
    /// Create an unbounded in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store refusing to hold more than `max` collections
    pub fn with_collection_limit(max: usize) -> Self {
        Self {
            collections: DashMap::new(),
            max_collections: Some(max),
        }
    }

    /// Total number of documents in a collection (test observability)
    pub fn document_count(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|c| c.documents.len())
            .unwrap_or(0)
    }

    fn matches_filter(document: &VectorDocument, filter: Option<&FilterExpr>) -> bool {
        let Some(filter) = filter else {
            return true;
        };
        let payload = filter.as_str();
        if let Some(extensions) = payload.strip_prefix("ext:") {
            extensions
                .split(',')
                .any(|ext| document.file_extension == normalize_extension(ext))
        } else if let Some(path) = payload.strip_prefix("path:") {
            document.relative_path == path
        } else {
            // Unknown payloads never match; this store only understands
            // its own builders.
            false
        }
    }

    /// Rank documents of one collection by cosine similarity
    fn dense_ranking(
        collection: &StoredCollection,
        query_vector: &[f32],
        filter: Option<&FilterExpr>,
    ) -> Vec<ScoredDocument> {
        let query_norm = norm(query_vector);
        let mut hits: Vec<ScoredDocument> = collection
            .documents
            .values()
            .filter(|doc| Self::matches_filter(doc, filter))
            .map(|doc| ScoredDocument {
                document: doc.clone(),
                score: cosine_similarity(query_vector, &doc.vector, query_norm),
            })
            .collect();
        sort_hits(&mut hits);
        hits
    }

    /// Rank documents of one collection by BM25 over content
    fn sparse_ranking(
        collection: &StoredCollection,
        query: &str,
        filter: Option<&FilterExpr>,
    ) -> Vec<ScoredDocument> {
        let scorer = Bm25Scorer::new(
            collection.documents.values().map(|doc| doc.content.as_str()),
            Bm25Params::default(),
        );
        let query_terms = lexical::tokenize(query);

        let mut hits: Vec<ScoredDocument> = collection
            .documents
            .values()
            .filter(|doc| Self::matches_filter(doc, filter))
            .filter_map(|doc| {
                let score = scorer.score_with_tokens(&doc.content, &query_terms);
                (score > 0.0).then(|| ScoredDocument {
                    document: doc.clone(),
                    score: f64::from(score),
                })
            })
            .collect();
        sort_hits(&mut hits);
        hits
    }

    fn upsert(
        &self,
        collection: &str,
        documents: Vec<VectorDocument>,
        require_mode: Option<CollectionMode>,
    ) -> Result<()> {
        let mut entry = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| Error::vector_store(format!("collection '{collection}' not found")))?;

        if let Some(required) = require_mode {
            if entry.mode != required {
                return Err(Error::vector_store(format!(
                    "collection '{collection}' is not in {required:?} mode"
                )));
            }
        }

        for document in documents {
            if document.vector.len() != entry.dimension {
                return Err(Error::vector_store(format!(
                    "dimension mismatch: document '{}' has {}, collection expects {}",
                    document.id,
                    document.vector.len(),
                    entry.dimension
                )));
            }
            // Last occurrence within a call wins, as does the newest upsert.
            entry.documents.insert(document.id.clone(), document);
        }
        Ok(())
    }
}

#[async_trait]
impl VectorStoreProvider for InMemoryVectorStore {
    async fn create_collection(
        &self,
        name: &str,
        dimension: usize,
        mode: CollectionMode,
    ) -> Result<()> {
        if self.collections.contains_key(name) {
            // Existing collection counts as success.
            return Ok(());
        }
        if let Some(max) = self.max_collections {
            if self.collections.len() >= max {
                return Err(Error::CollectionLimitReached);
            }
        }
        self.collections.insert(
            name.to_string(),
            StoredCollection {
                dimension,
                mode,
                documents: HashMap::new(),
            },
        );
        Ok(())
    }

    async fn drop_collection(&self, name: &str) -> Result<()> {
        self.collections.remove(name);
        Ok(())
    }

    async fn has_collection(&self, name: &str) -> Result<bool> {
        Ok(self.collections.contains_key(name))
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .collections
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn insert(&self, collection: &str, documents: Vec<VectorDocument>) -> Result<()> {
        self.upsert(collection, documents, None)
    }

    async fn insert_hybrid(&self, collection: &str, documents: Vec<VectorDocument>) -> Result<()> {
        self.upsert(collection, documents, Some(CollectionMode::Hybrid))
    }

    async fn search(
        &self,
        collection: &str,
        query_vector: &[f32],
        options: &SearchOptions,
    ) -> Result<Vec<ScoredDocument>> {
        let Some(entry) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut hits = Self::dense_ranking(&entry, query_vector, options.filter.as_ref());
        if let Some(threshold) = options.threshold {
            hits.retain(|hit| hit.score >= threshold);
        }
        hits.truncate(options.top_k);
        Ok(hits)
    }

    async fn hybrid_search(
        &self,
        collection: &str,
        legs: &[SearchLeg],
        options: &HybridSearchOptions,
    ) -> Result<Vec<ScoredDocument>> {
        let Some(entry) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };
        if !entry.mode.is_hybrid() {
            return Err(Error::vector_store(format!(
                "collection '{collection}' does not support hybrid search"
            )));
        }

        let filter = options.filter.as_ref();
        let ranked: Vec<Vec<ScoredDocument>> = legs
            .iter()
            .map(|leg| match leg {
                SearchLeg::Dense(query_vector) => {
                    Self::dense_ranking(&entry, query_vector, filter)
                }
                SearchLeg::Sparse(query) => Self::sparse_ranking(&entry, query, filter),
            })
            .collect();

        let fused = match &options.rerank {
            RerankStrategy::Rrf { k } => fusion::rrf_fuse(&ranked, *k, options.top_k),
            RerankStrategy::Weighted { weights } => {
                fusion::weighted_fuse(&ranked, weights, options.top_k)
            }
        };
        Ok(fused)
    }

    async fn query(
        &self,
        collection: &str,
        filter: &FilterExpr,
        output_fields: &[&str],
        limit: Option<usize>,
    ) -> Result<Vec<HashMap<String, Value>>> {
        let Some(entry) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut records: Vec<HashMap<String, Value>> = entry
            .documents
            .values()
            .filter(|doc| Self::matches_filter(doc, Some(filter)))
            .map(|doc| project_fields(doc, output_fields))
            .collect();
        records.sort_by_key(|record| {
            record
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        });
        if let Some(limit) = limit {
            records.truncate(limit);
        }
        Ok(records)
    }

    async fn delete(&self, collection: &str, ids: &[String]) -> Result<()> {
        let mut entry = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| Error::vector_store(format!("collection '{collection}' not found")))?;
        for id in ids {
            entry.documents.remove(id);
        }
        Ok(())
    }

    fn extension_filter(&self, extensions: &[String]) -> FilterExpr {
        let normalized: Vec<String> = extensions
            .iter()
            .map(|ext| normalize_extension(ext))
            .collect();
        FilterExpr(format!("ext:{}", normalized.join(",")))
    }

    fn path_filter(&self, relative_path: &str) -> FilterExpr {
        FilterExpr(format!("path:{relative_path}"))
    }

    fn id_kind(&self) -> ChunkIdKind {
        ChunkIdKind::Opaque
    }

    fn provider_name(&self) -> &str {
        "in_memory"
    }
}

/// Descending score, then id for deterministic ties
fn sort_hits(hits: &mut [ScoredDocument]) {
    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.document.id.cmp(&b.document.id))
    });
}

fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim();
    if trimmed.starts_with('.') {
        trimmed.to_string()
    } else {
        format!(".{trimmed}")
    }
}

fn project_fields(document: &VectorDocument, output_fields: &[&str]) -> HashMap<String, Value> {
    let mut record = HashMap::new();
    for field in output_fields {
        let value = match *field {
            "id" => Value::String(document.id.clone()),
            "content" => Value::String(document.content.clone()),
            "relative_path" => Value::String(document.relative_path.clone()),
            "start_line" => Value::from(document.start_line),
            "end_line" => Value::from(document.end_line),
            "file_extension" => Value::String(document.file_extension.clone()),
            name => document.metadata.get(name).cloned().unwrap_or(Value::Null),
        };
        record.insert((*field).to_string(), value);
    }
    // `id` always rides along so callers can chain into `delete`.
    record
        .entry("id".to_string())
        .or_insert_with(|| Value::String(document.id.clone()));
    record
}

fn norm(vector: &[f32]) -> f32 {
    vector.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity normalized into `[0, 1]`
fn cosine_similarity(a: &[f32], b: &[f32], norm_a: f32) -> f64 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    f64::from((dot / (norm_a * norm_b) + 1.0) / 2.0)
}
