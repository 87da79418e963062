//! Code splitting providers
//!
//! `AstSplitter` chunks source along top-level declarations using
//! tree-sitter and degrades to `SizeSplitter` for unknown languages and
//! unparseable input. `SizeSplitter` is the character-window fallback with
//! trailing overlap.

pub mod ast;
pub mod profiles;
pub mod size;

pub use ast::AstSplitter;
pub use size::SizeSplitter;

use ccx_domain::constants::{DEFAULT_CHUNK_OVERLAP, DEFAULT_MAX_CHUNK_SIZE, DEFAULT_MIN_CHUNK_SIZE};

/// Splitter sizing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitterConfig {
    /// Maximum chunk size in characters; larger chunks are subdivided
    pub max_chunk_size: usize,
    /// Trailing overlap between size-based windows, in characters
    pub overlap: usize,
    /// Structural chunks shorter than this coalesce with their next sibling
    pub min_chunk_size: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
            min_chunk_size: DEFAULT_MIN_CHUNK_SIZE,
        }
    }
}
