//! Shared test doubles and fixtures for the application test suites
#![allow(dead_code)]

use async_trait::async_trait;
use ccx_domain::entities::VectorDocument;
use ccx_domain::error::Result;
use ccx_domain::ports::vector_store::ChunkIdKind;
use ccx_domain::ports::{EmbeddingProvider, VectorStoreProvider};
use ccx_domain::value_objects::{
    CollectionMode, Embedding, FilterExpr, HybridSearchOptions, ScoredDocument, SearchLeg,
    SearchOptions,
};
use ccx_providers::{InMemoryVectorStore, NullEmbeddingProvider};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// One observed store operation, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    CreateCollection(String),
    DropCollection(String),
    Insert { collection: String, batch: usize },
    InsertHybrid { collection: String, batch: usize },
    Delete { collection: String, ids: usize },
    Query(String),
    Search(String),
    HybridSearch(String),
}

impl StoreOp {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Self::Insert { .. } | Self::InsertHybrid { .. } | Self::Delete { .. }
        )
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Self::Insert { .. } | Self::InsertHybrid { .. })
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Self::Delete { .. })
    }
}

/// Vector store wrapper recording the operation sequence
pub struct RecordingStore {
    inner: Arc<InMemoryVectorStore>,
    ops: Mutex<Vec<StoreOp>>,
}

impl RecordingStore {
    pub fn new(inner: InMemoryVectorStore) -> Self {
        Self {
            inner: Arc::new(inner),
            ops: Mutex::new(Vec::new()),
        }
    }

    pub fn inner(&self) -> Arc<InMemoryVectorStore> {
        Arc::clone(&self.inner)
    }

    pub fn ops(&self) -> Vec<StoreOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn clear_ops(&self) {
        self.ops.lock().unwrap().clear();
    }

    fn record(&self, op: StoreOp) {
        self.ops.lock().unwrap().push(op);
    }
}

#[async_trait]
impl VectorStoreProvider for RecordingStore {
    async fn create_collection(
        &self,
        name: &str,
        dimension: usize,
        mode: CollectionMode,
    ) -> Result<()> {
        self.record(StoreOp::CreateCollection(name.to_string()));
        self.inner.create_collection(name, dimension, mode).await
    }

    async fn drop_collection(&self, name: &str) -> Result<()> {
        self.record(StoreOp::DropCollection(name.to_string()));
        self.inner.drop_collection(name).await
    }

    async fn has_collection(&self, name: &str) -> Result<bool> {
        self.inner.has_collection(name).await
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        self.inner.list_collections().await
    }

    async fn insert(&self, collection: &str, documents: Vec<VectorDocument>) -> Result<()> {
        self.record(StoreOp::Insert {
            collection: collection.to_string(),
            batch: documents.len(),
        });
        self.inner.insert(collection, documents).await
    }

    async fn insert_hybrid(&self, collection: &str, documents: Vec<VectorDocument>) -> Result<()> {
        self.record(StoreOp::InsertHybrid {
            collection: collection.to_string(),
            batch: documents.len(),
        });
        self.inner.insert_hybrid(collection, documents).await
    }

    async fn search(
        &self,
        collection: &str,
        query_vector: &[f32],
        options: &SearchOptions,
    ) -> Result<Vec<ScoredDocument>> {
        self.record(StoreOp::Search(collection.to_string()));
        self.inner.search(collection, query_vector, options).await
    }

    async fn hybrid_search(
        &self,
        collection: &str,
        legs: &[SearchLeg],
        options: &HybridSearchOptions,
    ) -> Result<Vec<ScoredDocument>> {
        self.record(StoreOp::HybridSearch(collection.to_string()));
        self.inner.hybrid_search(collection, legs, options).await
    }

    async fn query(
        &self,
        collection: &str,
        filter: &FilterExpr,
        output_fields: &[&str],
        limit: Option<usize>,
    ) -> Result<Vec<HashMap<String, Value>>> {
        self.record(StoreOp::Query(collection.to_string()));
        self.inner.query(collection, filter, output_fields, limit).await
    }

    async fn delete(&self, collection: &str, ids: &[String]) -> Result<()> {
        self.record(StoreOp::Delete {
            collection: collection.to_string(),
            ids: ids.len(),
        });
        self.inner.delete(collection, ids).await
    }

    fn extension_filter(&self, extensions: &[String]) -> FilterExpr {
        self.inner.extension_filter(extensions)
    }

    fn path_filter(&self, relative_path: &str) -> FilterExpr {
        self.inner.path_filter(relative_path)
    }

    fn id_kind(&self) -> ChunkIdKind {
        self.inner.id_kind()
    }

    fn provider_name(&self) -> &str {
        "recording"
    }
}

/// Embedding wrapper recording batch sizes
pub struct CountingEmbedding {
    inner: NullEmbeddingProvider,
    batches: Mutex<Vec<usize>>,
}

impl CountingEmbedding {
    pub fn new() -> Self {
        Self {
            inner: NullEmbeddingProvider::new(),
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmbeddingProvider for CountingEmbedding {
    async fn dimension(&self) -> Result<usize> {
        self.inner.dimension().await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        self.batches.lock().unwrap().push(texts.len());
        self.inner.embed_batch(texts).await
    }

    fn provider_name(&self) -> &str {
        "counting"
    }
}

/// Embedding provider that blocks `embed_batch` until permits arrive
pub struct GatedEmbedding {
    inner: NullEmbeddingProvider,
    gate: Arc<tokio::sync::Semaphore>,
}

impl GatedEmbedding {
    pub fn new() -> (Self, Arc<tokio::sync::Semaphore>) {
        let gate = Arc::new(tokio::sync::Semaphore::new(0));
        (
            Self {
                inner: NullEmbeddingProvider::new(),
                gate: Arc::clone(&gate),
            },
            gate,
        )
    }
}

#[async_trait]
impl EmbeddingProvider for GatedEmbedding {
    async fn dimension(&self) -> Result<usize> {
        self.inner.dimension().await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| ccx_domain::Error::embedding_transient("gate closed"))?;
        self.inner.embed_batch(texts).await
    }

    fn provider_name(&self) -> &str {
        "gated"
    }
}

/// Embedding provider returning one vector fewer than requested
pub struct MisalignedEmbedding {
    inner: NullEmbeddingProvider,
}

impl MisalignedEmbedding {
    pub fn new() -> Self {
        Self {
            inner: NullEmbeddingProvider::new(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for MisalignedEmbedding {
    async fn dimension(&self) -> Result<usize> {
        self.inner.dimension().await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        let mut embeddings = self.inner.embed_batch(texts).await?;
        embeddings.pop();
        Ok(embeddings)
    }

    fn provider_name(&self) -> &str {
        "misaligned"
    }
}

/// Write a file under the fixture root, creating parent directories
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Ten lines of Python with a single function
pub fn python_fixture() -> &'static str {
    "\
\"\"\"Fixture module.\"\"\"


def fixture_function(value):
    \"\"\"Double the input.\"\"\"
    result = value * 2
    if result > 10:
        result = 10
    return result

"
}

/// A small TypeScript class
pub fn typescript_fixture() -> &'static str {
    "\
export class Greeter {
    private name: string;

    constructor(name: string) {
        this.name = name;
    }

    greet(): string {
        return `hello ${this.name}`;
    }
}
"
}
