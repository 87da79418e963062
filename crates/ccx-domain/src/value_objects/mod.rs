//! Value objects of the indexing domain

pub mod collection;
pub mod embedding;
pub mod search;
pub mod sync;

pub use collection::CollectionMode;
pub use embedding::Embedding;
pub use search::{
    FilterExpr, HybridSearchOptions, RerankStrategy, ScoredDocument, SearchLeg, SearchOptions,
    SearchResult,
};
pub use sync::{IndexProgress, IndexStats, IndexStatus, SyncDiff};
