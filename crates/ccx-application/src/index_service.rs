//! Per-codebase orchestration
//!
//! One service instance owns the whole lifecycle of indexed codebases:
//! collection naming, fresh indexing, change-driven re-indexing against the
//! stored merkle snapshot, retrieval and teardown. At most one index or
//! sync operation runs per codebase path; distinct codebases share the
//! embedding provider and vector store.

use crate::pipeline::{ChunkPipeline, ProgressCallback};
use ccx_domain::constants::{
    COLLECTION_NAME_HASH_LEN, COLLECTION_PREFIX_HYBRID, COLLECTION_PREFIX_PLAIN,
    PHASE_INDEXING_COMPLETE, PHASE_PREPARING_COLLECTION, PHASE_SCANNING_FILES, SEARCH_RRF_K,
};
use ccx_domain::error::{Error, Result};
use ccx_domain::ports::{CodeSplitter, EmbeddingProvider, VectorStoreProvider};
use ccx_domain::value_objects::{
    CollectionMode, HybridSearchOptions, IndexProgress, IndexStats, IndexStatus, RerankStrategy,
    ScoredDocument, SearchLeg, SearchOptions, SearchResult, SyncDiff,
};
use ccx_infrastructure::config::IndexerConfig;
use ccx_infrastructure::ignore_rules::IgnoreMatcher;
use ccx_infrastructure::snapshot::{CodebaseSnapshot, SnapshotManager};
use ccx_infrastructure::walker::FileWalker;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Result of a change-driven re-index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// What changed since the stored snapshot
    pub diff: SyncDiff,
    /// Pipeline counters for the re-indexed files
    pub stats: IndexStats,
}

/// Orchestrator for indexing, syncing, searching and clearing codebases
pub struct IndexService {
    embedding: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
    splitter: Arc<dyn CodeSplitter>,
    snapshots: SnapshotManager,
    config: IndexerConfig,
    /// Embedding dimension, cached after the first successful probe
    dimension: OnceCell<usize>,
    /// Codebases with an index or sync operation in flight
    active: Mutex<HashSet<PathBuf>>,
    cancel: CancellationToken,
}

impl IndexService {
    /// Create a service over the shared providers
    pub fn new(
        embedding: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
        splitter: Arc<dyn CodeSplitter>,
        snapshots: SnapshotManager,
        config: IndexerConfig,
    ) -> Self {
        Self {
            embedding,
            store,
            splitter,
            snapshots,
            config,
            dimension: OnceCell::new(),
            active: Mutex::new(HashSet::new()),
            cancel: CancellationToken::new(),
        }
    }

    /// Token observed between files and batches; cancelling it stops
    /// in-flight index and sync runs without updating their snapshots.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Collection name for a codebase path
    pub fn collection_name(&self, codebase: &Path) -> String {
        let canonical = canonicalize_lossy(codebase);
        let digest = format!("{:x}", md5::compute(canonical.to_string_lossy().as_bytes()));
        let prefix = if self.config.hybrid_mode {
            COLLECTION_PREFIX_HYBRID
        } else {
            COLLECTION_PREFIX_PLAIN
        };
        format!("{prefix}{}", &digest[..COLLECTION_NAME_HASH_LEN])
    }

    /// Index a codebase from scratch.
    ///
    /// With `force_reindex` an existing collection is dropped and rebuilt.
    /// On a clean run the merkle snapshot is persisted as the baseline for
    /// later change-driven syncs.
    pub async fn index_codebase(
        &self,
        codebase: &Path,
        force_reindex: bool,
        progress: Option<ProgressCallback>,
    ) -> Result<IndexStats> {
        let canonical = canonicalize_strict(codebase)?;
        let _guard = self.acquire(&canonical)?;

        report(&progress, PHASE_PREPARING_COLLECTION);
        let collection = self.collection_name(&canonical);
        let mode = self.mode();
        let dimension = self.dimension().await?;

        if force_reindex && self.store.has_collection(&collection).await? {
            info!(%collection, "dropping collection for forced re-index");
            self.store.drop_collection(&collection).await?;
        }
        // Terminal failures here (collection limit among them) abort
        // before any file is walked.
        self.store
            .create_collection(&collection, dimension, mode)
            .await?;

        report(&progress, PHASE_SCANNING_FILES);
        let matcher =
            IgnoreMatcher::for_codebase(&canonical, &self.config.custom_ignore_patterns);
        let files = FileWalker::new(
            &canonical,
            self.config.indexable_extensions(),
            matcher.clone(),
        )
        .walk();
        debug!(files = files.len(), %collection, "scan complete");

        let stats = self
            .pipeline()
            .run(
                &files,
                &canonical,
                &collection,
                mode,
                progress.as_ref(),
                &self.cancel,
            )
            .await?;

        if clean_completion(&stats) {
            let snapshot_files = FileWalker::new(
                &canonical,
                self.config.indexable_extensions(),
                matcher,
            )
            .skip_hidden(true)
            .walk();
            let snapshot = CodebaseSnapshot::build(&canonical, &snapshot_files).await;
            self.snapshots.save(&canonical, &snapshot).await?;
        }

        report(&progress, PHASE_INDEXING_COMPLETE);
        info!(
            %collection,
            indexed_files = stats.indexed_files,
            total_chunks = stats.total_chunks,
            "indexing finished"
        );
        Ok(stats)
    }

    /// Re-index only what changed since the stored snapshot.
    ///
    /// Stale chunks of removed and modified files are deleted before any
    /// new chunk is inserted. The fresh snapshot is persisted only after a
    /// fully clean run, so a partial failure retries the same diff next
    /// time; content-addressed ids make that retry idempotent.
    pub async fn sync_codebase(
        &self,
        codebase: &Path,
        progress: Option<ProgressCallback>,
    ) -> Result<SyncOutcome> {
        let canonical = canonicalize_strict(codebase)?;
        let _guard = self.acquire(&canonical)?;

        // Corrupt snapshots are fatal; a missing one means everything is new.
        let previous = self
            .snapshots
            .load(&canonical)
            .await?
            .unwrap_or_else(CodebaseSnapshot::empty);

        let matcher =
            IgnoreMatcher::for_codebase(&canonical, &self.config.custom_ignore_patterns);
        let files = FileWalker::new(
            &canonical,
            self.config.indexable_extensions(),
            matcher,
        )
        .skip_hidden(true)
        .walk();
        let current = CodebaseSnapshot::build(&canonical, &files).await;

        let diff = CodebaseSnapshot::compare(&previous, &current);
        if !diff.has_changes() {
            debug!(codebase = %canonical.display(), "sync found no changes");
            return Ok(SyncOutcome {
                diff,
                stats: IndexStats::empty(),
            });
        }
        info!(
            codebase = %canonical.display(),
            added = diff.added.len(),
            removed = diff.removed.len(),
            modified = diff.modified.len(),
            "sync detected changes"
        );

        let collection = self.collection_name(&canonical);
        let mode = self.mode();
        let dimension = self.dimension().await?;
        self.store
            .create_collection(&collection, dimension, mode)
            .await?;

        // Deletions strictly precede insertions for the same paths.
        let mut delete_failures = 0usize;
        for relative in diff.removed.iter().chain(diff.modified.iter()) {
            if let Err(e) = self.delete_file_chunks(&collection, relative).await {
                warn!(path = %relative, error = %e, "failed to delete stale chunks");
                delete_failures += 1;
            }
        }

        let work: Vec<PathBuf> = diff
            .added
            .iter()
            .chain(diff.modified.iter())
            .map(|relative| canonical.join(relative))
            .collect();
        let mut stats = self
            .pipeline()
            .run(
                &work,
                &canonical,
                &collection,
                mode,
                progress.as_ref(),
                &self.cancel,
            )
            .await?;
        stats.failed_batches += delete_failures;

        if clean_completion(&stats) {
            self.snapshots.save(&canonical, &current).await?;
        } else {
            warn!(
                codebase = %canonical.display(),
                "keeping previous snapshot after partial sync"
            );
        }

        Ok(SyncOutcome { diff, stats })
    }

    /// Retrieve the most relevant chunks for a natural-language query
    pub async fn search(
        &self,
        codebase: &Path,
        query: &str,
        top_k: usize,
        threshold: Option<f64>,
        extensions: Option<&[String]>,
    ) -> Result<Vec<SearchResult>> {
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let canonical = canonicalize_lossy(codebase);
        let collection = self.collection_name(&canonical);
        let filter = extensions.map(|exts| self.store.extension_filter(exts));
        let embedding = self.embedding.embed(query).await?;

        let hits = if self.config.hybrid_mode {
            let legs = [
                SearchLeg::Dense(embedding.vector),
                SearchLeg::Sparse(query.to_string()),
            ];
            self.store
                .hybrid_search(
                    &collection,
                    &legs,
                    &HybridSearchOptions {
                        top_k,
                        rerank: RerankStrategy::Rrf { k: SEARCH_RRF_K },
                        filter,
                    },
                )
                .await?
        } else {
            self.store
                .search(
                    &collection,
                    &embedding.vector,
                    &SearchOptions {
                        top_k,
                        threshold,
                        filter,
                    },
                )
                .await?
        };

        Ok(hits.into_iter().map(to_search_result).collect())
    }

    /// Drop the collection and delete the snapshot file.
    ///
    /// Both steps always run; the first failure, if any, is reported after.
    pub async fn clear_index(&self, codebase: &Path) -> Result<()> {
        let canonical = canonicalize_lossy(codebase);
        let collection = self.collection_name(&canonical);

        let drop_result = match self.store.has_collection(&collection).await {
            Ok(true) => self.store.drop_collection(&collection).await,
            Ok(false) => Ok(()),
            Err(e) => Err(e),
        };
        let snapshot_result = self.snapshots.delete(&canonical).await;

        info!(%collection, codebase = %canonical.display(), "index cleared");
        drop_result.and(snapshot_result)
    }

    /// Embedding dimension, probed once then cached
    async fn dimension(&self) -> Result<usize> {
        self.dimension
            .get_or_try_init(|| self.embedding.dimension())
            .await
            .copied()
    }

    fn mode(&self) -> CollectionMode {
        if self.config.hybrid_mode {
            CollectionMode::Hybrid
        } else {
            CollectionMode::Plain
        }
    }

    fn pipeline(&self) -> ChunkPipeline {
        ChunkPipeline::new(
            Arc::clone(&self.embedding),
            Arc::clone(&self.store),
            Arc::clone(&self.splitter),
            self.config.embedding_batch_size,
            self.config.chunk_limit,
        )
    }

    /// Delete every stored chunk of one relative path
    async fn delete_file_chunks(&self, collection: &str, relative_path: &str) -> Result<()> {
        let filter = self.store.path_filter(relative_path);
        let records = self.store.query(collection, &filter, &["id"], None).await?;
        let ids: Vec<String> = records
            .iter()
            .filter_map(|record| record.get("id").and_then(Value::as_str).map(String::from))
            .collect();
        if ids.is_empty() {
            return Ok(());
        }
        debug!(path = %relative_path, chunks = ids.len(), "deleting stale chunks");
        self.store.delete(collection, &ids).await
    }

    /// Mark a codebase busy for the duration of the returned guard
    fn acquire(&self, canonical: &Path) -> Result<ActiveGuard<'_>> {
        let mut active = self
            .active
            .lock()
            .map_err(|_| Error::internal("active set poisoned"))?;
        if !active.insert(canonical.to_path_buf()) {
            return Err(Error::already_indexing(
                canonical.to_string_lossy().to_string(),
            ));
        }
        Ok(ActiveGuard {
            active: &self.active,
            path: canonical.to_path_buf(),
        })
    }
}

/// Removes its codebase from the active set on drop
struct ActiveGuard<'a> {
    active: &'a Mutex<HashSet<PathBuf>>,
    path: PathBuf,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut active) = self.active.lock() {
            active.remove(&self.path);
        }
    }
}

/// Snapshot persistence requires a complete run with no lost batches
fn clean_completion(stats: &IndexStats) -> bool {
    stats.status == IndexStatus::Completed && stats.failed_batches == 0
}

fn report(progress: &Option<ProgressCallback>, phase: &str) {
    if let Some(callback) = progress {
        callback(IndexProgress::phase(phase));
    }
}

fn canonicalize_strict(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .map_err(|e| Error::io_with_source(format!("cannot resolve {}", path.display()), e))
}

fn canonicalize_lossy(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

fn to_search_result(hit: ScoredDocument) -> SearchResult {
    let language = hit
        .document
        .metadata
        .get("language")
        .and_then(Value::as_str)
        .unwrap_or("text")
        .to_string();
    SearchResult {
        content: hit.document.content,
        relative_path: hit.document.relative_path,
        start_line: hit.document.start_line,
        end_line: hit.document.end_line,
        language,
        score: hit.score,
    }
}
