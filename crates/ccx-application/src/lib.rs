//! Application layer for CCX
//!
//! Orchestrates the domain ports into the indexing engine: the streaming
//! chunk pipeline (split, embed, store, with batching and caps) and the
//! per-codebase index service (collection lifecycle, incremental sync,
//! search, clear).

pub mod identity;
pub mod index_service;
pub mod pipeline;

pub use index_service::{IndexService, SyncOutcome};
pub use pipeline::{ChunkPipeline, ProgressCallback};
