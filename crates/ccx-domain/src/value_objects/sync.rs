//! Indexing and synchronization reporting value objects

use serde::{Deserialize, Serialize};

/// File-level difference between two snapshots of a codebase.
///
/// The three sets are pairwise disjoint; paths are relative to the codebase
/// root with forward slashes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncDiff {
    /// Paths present only in the new snapshot
    pub added: Vec<String>,
    /// Paths present only in the old snapshot
    pub removed: Vec<String>,
    /// Paths present in both with differing content hashes
    pub modified: Vec<String>,
}

impl SyncDiff {
    /// Whether any file changed between the snapshots
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty() || !self.modified.is_empty()
    }

    /// Total number of changed paths
    pub fn total_changes(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }
}

/// Terminal status of an indexing run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IndexStatus {
    /// Every file in the work list was processed
    Completed,
    /// The global chunk cap stopped the run early
    LimitReached,
    /// A cancellation signal stopped the run early
    Cancelled,
}

/// Summary record returned by an indexing run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexStats {
    /// Files fully processed (including empty files)
    pub indexed_files: usize,
    /// Chunks produced, bounded by the chunk limit
    pub total_chunks: usize,
    /// Files skipped after read or split failures
    pub skipped_files: usize,
    /// Batches discarded after embedding or store failures
    pub failed_batches: usize,
    /// How the run ended
    pub status: IndexStatus,
}

impl IndexStats {
    /// Stats for a run that has not processed anything yet
    pub fn empty() -> Self {
        Self {
            indexed_files: 0,
            total_chunks: 0,
            skipped_files: 0,
            failed_batches: 0,
            status: IndexStatus::Completed,
        }
    }
}

/// A progress notification delivered through the progress callback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexProgress {
    /// Human-readable phase, e.g. `Processing files (3/17)`
    pub phase: String,
    /// Units completed within the phase
    pub current: usize,
    /// Total units within the phase, zero when indeterminate
    pub total: usize,
}

impl IndexProgress {
    /// Create a phase-only notification
    pub fn phase(name: impl Into<String>) -> Self {
        Self {
            phase: name.into(),
            current: 0,
            total: 0,
        }
    }

    /// Create a `Processing files (i/N)` notification
    pub fn processing(current: usize, total: usize) -> Self {
        Self {
            phase: format!("Processing files ({current}/{total})"),
            current,
            total,
        }
    }
}
