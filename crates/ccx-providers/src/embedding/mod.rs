//! Embedding provider implementations
//!
//! Remote providers (OpenAI-compatible endpoints, local inference servers)
//! implement [`ccx_domain::ports::EmbeddingProvider`] out of tree; this
//! module ships the deterministic null provider used by tests, development
//! and the integration suite.

pub mod null;

pub use null::NullEmbeddingProvider;
