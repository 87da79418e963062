//! Infrastructure layer for CCX
//!
//! Filesystem-facing building blocks of the indexer: ignore rule matching,
//! the candidate-file walker, the content-addressed merkle snapshot with its
//! on-disk persistence, configuration loading and logging setup.

pub mod config;
pub mod ignore_rules;
pub mod logging;
pub mod merkle;
pub mod snapshot;
pub mod walker;

pub use config::{ConfigLoader, IndexerConfig};
pub use ignore_rules::IgnoreMatcher;
pub use merkle::{MerkleDag, MerkleNode};
pub use snapshot::{CodebaseSnapshot, SnapshotManager};
pub use walker::FileWalker;
