//! Streaming chunk pipeline
//!
//! Reads files, splits them into chunks, embeds chunk batches and writes
//! them to the vector store. Failures are contained at the smallest useful
//! scope: a failed read or split skips one file, a failed embedding or
//! insert discards one batch; both keep the run going. A global chunk cap
//! bounds the run, cooperative cancellation is observed between files and
//! between batches, and memory stays bounded by one batch plus one file's
//! chunks because batches are never pipelined.

use crate::identity;
use ccx_domain::entities::{CodeChunk, VectorDocument};
use ccx_domain::error::{Error, Result};
use ccx_domain::language::{extension_of, language_from_extension};
use ccx_domain::ports::{CodeSplitter, EmbeddingProvider, VectorStoreProvider};
use ccx_domain::value_objects::{CollectionMode, IndexProgress, IndexStats, IndexStatus};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Callback receiving progress notifications during a run
pub type ProgressCallback = Arc<dyn Fn(IndexProgress) + Send + Sync>;

/// The streaming indexer for one batch of files
pub struct ChunkPipeline {
    embedding: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
    splitter: Arc<dyn CodeSplitter>,
    batch_size: usize,
    chunk_limit: usize,
}

impl ChunkPipeline {
    /// Create a pipeline over the shared providers
    pub fn new(
        embedding: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
        splitter: Arc<dyn CodeSplitter>,
        batch_size: usize,
        chunk_limit: usize,
    ) -> Self {
        Self {
            embedding,
            store,
            splitter,
            batch_size: batch_size.max(1),
            chunk_limit,
        }
    }

    /// Index `files` into `collection`.
    ///
    /// Returns aggregate counters; per-file and per-batch failures never
    /// fail the run.
    pub async fn run(
        &self,
        files: &[PathBuf],
        root: &Path,
        collection: &str,
        mode: CollectionMode,
        progress: Option<&ProgressCallback>,
        cancel: &CancellationToken,
    ) -> Result<IndexStats> {
        let mut stats = IndexStats::empty();
        let mut buffer: Vec<CodeChunk> = Vec::with_capacity(self.batch_size);
        let total_files = files.len();

        'files: for (index, file) in files.iter().enumerate() {
            if cancel.is_cancelled() {
                stats.status = IndexStatus::Cancelled;
                break;
            }

            let content = match tokio::fs::read_to_string(file).await {
                Ok(content) => content,
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "skipping unreadable file");
                    stats.skipped_files += 1;
                    continue;
                }
            };

            let extension = extension_of(&file.to_string_lossy());
            let language = language_from_extension(&extension);
            let chunks = self.splitter.split(&content, language, file);

            for chunk in chunks {
                buffer.push(chunk);
                stats.total_chunks += 1;

                if buffer.len() >= self.batch_size {
                    self.flush(&mut buffer, root, collection, mode, &mut stats)
                        .await;
                    if cancel.is_cancelled() {
                        stats.status = IndexStatus::Cancelled;
                        break 'files;
                    }
                }
                if stats.total_chunks >= self.chunk_limit {
                    debug!(limit = self.chunk_limit, "chunk limit reached");
                    stats.status = IndexStatus::LimitReached;
                    break 'files;
                }
            }

            stats.indexed_files += 1;
            if let Some(callback) = progress {
                callback(IndexProgress::processing(index + 1, total_files));
            }
        }

        self.flush(&mut buffer, root, collection, mode, &mut stats)
            .await;
        Ok(stats)
    }

    /// Flush the buffer. The buffer is emptied unconditionally; a failed
    /// batch is counted and the pipeline moves on.
    async fn flush(
        &self,
        buffer: &mut Vec<CodeChunk>,
        root: &Path,
        collection: &str,
        mode: CollectionMode,
        stats: &mut IndexStats,
    ) {
        if buffer.is_empty() {
            return;
        }
        let chunks = std::mem::take(buffer);
        let batch_size = chunks.len();

        if let Err(e) = self.flush_batch(chunks, root, collection, mode).await {
            warn!(batch_size, error = %e, "discarding failed batch");
            stats.failed_batches += 1;
        }
    }

    async fn flush_batch(
        &self,
        chunks: Vec<CodeChunk>,
        root: &Path,
        collection: &str,
        mode: CollectionMode,
    ) -> Result<()> {
        let max_chars = self.embedding.max_input_chars();
        let texts: Vec<String> = chunks
            .iter()
            .map(|chunk| prepare_embedding_input(&chunk.content, max_chars))
            .collect();

        let embeddings = self.embedding.embed_batch(&texts).await?;
        if embeddings.len() != texts.len() {
            // A misaligned batch cannot be attributed back to chunks.
            return Err(Error::embedding_permanent(format!(
                "expected {} vectors, got {}",
                texts.len(),
                embeddings.len()
            )));
        }

        let documents: Vec<VectorDocument> = chunks
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(chunk_index, (chunk, embedding))| {
                build_document(chunk, embedding.vector, chunk_index, root, self.store.id_kind())
            })
            .collect();

        match mode {
            CollectionMode::Plain => self.store.insert(collection, documents).await,
            CollectionMode::Hybrid => self.store.insert_hybrid(collection, documents).await,
        }
    }
}

/// Truncate to the provider's input budget on a char boundary; blank-only
/// content embeds as the empty string to keep batch alignment.
fn prepare_embedding_input(content: &str, max_chars: usize) -> String {
    if content.trim().is_empty() {
        return String::new();
    }
    if content.chars().count() <= max_chars {
        content.to_string()
    } else {
        content.chars().take(max_chars).collect()
    }
}

/// Assemble the stored document for one embedded chunk
fn build_document(
    chunk: CodeChunk,
    vector: Vec<f32>,
    chunk_index: usize,
    root: &Path,
    id_kind: ccx_domain::ports::vector_store::ChunkIdKind,
) -> VectorDocument {
    let relative_path = chunk
        .file_path
        .strip_prefix(root)
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|_| chunk.file_path.to_string_lossy().replace('\\', "/"));

    let id = identity::chunk_id(
        id_kind,
        &relative_path,
        chunk.start_line,
        chunk.end_line,
        &chunk.content,
    );

    let mut metadata = chunk.metadata;
    metadata.insert("language".to_string(), Value::String(chunk.language));
    metadata.insert(
        "codebase_path".to_string(),
        Value::String(root.to_string_lossy().to_string()),
    );
    metadata.insert("chunk_index".to_string(), Value::from(chunk_index));

    VectorDocument {
        id,
        vector,
        content: chunk.content,
        file_extension: extension_of(&relative_path),
        relative_path,
        start_line: chunk.start_line,
        end_line: chunk.end_line,
        metadata,
    }
}
