//! Per-codebase snapshot persistence and diffing
//!
//! A snapshot is the insertion-ordered `relative_path -> content_hash`
//! mapping plus its merkle DAG, serialized as JSON under
//! `<home>/.context/merkle/<md5(abs_path)>.json`. Snapshots are compared
//! per file to drive incremental re-indexing.

use crate::merkle::{MerkleDag, hash_bytes};
use ccx_domain::constants::MERKLE_STATE_DIR;
use ccx_domain::error::{Error, Result};
use ccx_domain::value_objects::SyncDiff;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The persisted state of one codebase at one point in time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodebaseSnapshot {
    /// `(relative_path, content_hash)` pairs in directory-walk order
    #[serde(rename = "fileHashes")]
    pub file_hashes: Vec<(String, String)>,
    /// The content-addressed DAG over those hashes
    #[serde(rename = "merkleDAG")]
    pub merkle_dag: MerkleDag,
}

impl CodebaseSnapshot {
    /// Build a snapshot by hashing the given files.
    ///
    /// Unreadable files are logged and excluded; they surface as `removed`
    /// in the next diff.
    pub async fn build(root: &Path, files: &[PathBuf]) -> Self {
        let mut file_hashes = Vec::with_capacity(files.len());

        for file in files {
            let relative = match file.strip_prefix(root) {
                Ok(p) => p.to_string_lossy().replace('\\', "/"),
                Err(_) => continue,
            };
            match tokio::fs::read(file).await {
                Ok(bytes) => file_hashes.push((relative, hash_bytes(&bytes))),
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "excluding unreadable file from snapshot");
                }
            }
        }

        let merkle_dag = MerkleDag::from_file_hashes(&file_hashes);
        Self {
            file_hashes,
            merkle_dag,
        }
    }

    /// An empty snapshot (no files)
    pub fn empty() -> Self {
        Self {
            file_hashes: Vec::new(),
            merkle_dag: MerkleDag::from_file_hashes(&[]),
        }
    }

    /// The mapping as a lookup table
    pub fn hash_map(&self) -> HashMap<&str, &str> {
        self.file_hashes
            .iter()
            .map(|(path, hash)| (path.as_str(), hash.as_str()))
            .collect()
    }

    /// Per-file difference from `old` to `new`.
    ///
    /// The returned sets are pairwise disjoint and sorted for determinism.
    pub fn compare(old: &Self, new: &Self) -> SyncDiff {
        let old_map = old.hash_map();
        let new_map = new.hash_map();

        let mut added = Vec::new();
        let mut modified = Vec::new();
        for (path, new_hash) in &new_map {
            match old_map.get(path) {
                None => added.push((*path).to_string()),
                Some(old_hash) if old_hash != new_hash => modified.push((*path).to_string()),
                Some(_) => {}
            }
        }

        let mut removed: Vec<String> = old_map
            .keys()
            .filter(|path| !new_map.contains_key(*path))
            .map(|path| (*path).to_string())
            .collect();

        added.sort();
        removed.sort();
        modified.sort();
        SyncDiff {
            added,
            removed,
            modified,
        }
    }
}

/// Loads, saves and deletes per-codebase snapshot files.
///
/// Writes are atomic (temp file + rename); the snapshot file for one
/// codebase is owned exclusively by its index service.
#[derive(Debug, Clone)]
pub struct SnapshotManager {
    state_dir: PathBuf,
}

impl SnapshotManager {
    /// Manager rooted at the default `<home>/.context/merkle` directory
    pub fn new() -> Result<Self> {
        let home =
            dirs::home_dir().ok_or_else(|| Error::internal("cannot determine home directory"))?;
        Ok(Self {
            state_dir: home.join(MERKLE_STATE_DIR),
        })
    }

    /// Manager rooted at an explicit directory (tests, sandboxing)
    pub fn with_state_dir(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    /// Snapshot file path for a codebase: md5 of the canonical absolute path
    pub fn snapshot_path(&self, codebase: &Path) -> PathBuf {
        let canonical = codebase
            .canonicalize()
            .unwrap_or_else(|_| codebase.to_path_buf());
        let digest = md5::compute(canonical.to_string_lossy().as_bytes());
        self.state_dir.join(format!("{digest:x}.json"))
    }

    /// Load the stored snapshot, if any.
    ///
    /// A missing file is `Ok(None)`; an unreadable or corrupt file is a
    /// fatal snapshot error.
    pub async fn load(&self, codebase: &Path) -> Result<Option<CodebaseSnapshot>> {
        let path = self.snapshot_path(codebase);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::snapshot_with_source(
                    format!("failed to read snapshot {}", path.display()),
                    e,
                ));
            }
        };

        let snapshot = serde_json::from_str(&content).map_err(|e| {
            Error::snapshot_with_source(format!("corrupt snapshot {}", path.display()), e)
        })?;
        Ok(Some(snapshot))
    }

    /// Atomically persist the snapshot for a codebase
    pub async fn save(&self, codebase: &Path, snapshot: &CodebaseSnapshot) -> Result<()> {
        tokio::fs::create_dir_all(&self.state_dir)
            .await
            .map_err(|e| {
                Error::io_with_source(
                    format!("failed to create {}", self.state_dir.display()),
                    e,
                )
            })?;

        let path = self.snapshot_path(codebase);
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string(snapshot)?;

        tokio::fs::write(&tmp_path, json).await.map_err(|e| {
            Error::io_with_source(format!("failed to write {}", tmp_path.display()), e)
        })?;
        tokio::fs::rename(&tmp_path, &path).await.map_err(|e| {
            Error::io_with_source(format!("failed to persist {}", path.display()), e)
        })?;

        debug!(snapshot = %path.display(), files = snapshot.file_hashes.len(), "snapshot saved");
        Ok(())
    }

    /// Delete the stored snapshot; a missing file is success
    pub async fn delete(&self, codebase: &Path) -> Result<()> {
        let path = self.snapshot_path(codebase);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io_with_source(
                format!("failed to delete {}", path.display()),
                e,
            )),
        }
    }
}
