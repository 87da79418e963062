//! Provider ports
//!
//! Capability interfaces implemented outside the core: embedding providers,
//! vector store back-ends and code splitters. The application layer depends
//! only on these traits.

pub mod embedding;
pub mod splitter;
pub mod vector_store;

pub use embedding::EmbeddingProvider;
pub use splitter::CodeSplitter;
pub use vector_store::{ChunkIdKind, VectorStoreProvider};
