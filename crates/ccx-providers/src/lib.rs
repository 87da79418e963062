//! Provider implementations for CCX
//!
//! Concrete implementations of the domain ports: the language-aware
//! structural splitter with its size-based fallback, the deterministic null
//! embedding provider, the in-memory vector store, and backend-agnostic
//! retrieval fusion.
//!
//! Remote embedding providers and production vector store back-ends
//! implement the same ports out of tree; everything the core needs from
//! them is expressed by `ccx_domain::ports`.

pub mod embedding;
pub mod hybrid_search;
pub mod splitter;
pub mod vector_store;

pub use embedding::NullEmbeddingProvider;
pub use splitter::{AstSplitter, SizeSplitter, SplitterConfig};
pub use vector_store::InMemoryVectorStore;
