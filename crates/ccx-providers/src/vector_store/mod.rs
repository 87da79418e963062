//! Vector store implementations
//!
//! Production back-ends (Milvus and friends) implement
//! [`ccx_domain::ports::VectorStoreProvider`] out of tree; this module
//! ships the in-memory store used by development and the integration
//! suite.

pub mod in_memory;

pub use in_memory::InMemoryVectorStore;
