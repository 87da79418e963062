//! Hybrid retrieval building blocks
//!
//! A lexical BM25 scorer for the sparse leg and backend-agnostic rank
//! fusion. Stores execute their legs however they like; fusion only sees
//! per-leg ranked results.

pub mod fusion;
pub mod lexical;

pub use fusion::{rrf_fuse, weighted_fuse};
pub use lexical::{Bm25Params, Bm25Scorer};
