//! Core entities of the indexing engine
//!
//! A `CodeChunk` is the unit produced by the splitter and consumed by the
//! pipeline; a `VectorDocument` is the unit handed to the vector store once
//! the chunk has been embedded.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

/// A contiguous slice of a source file with its line span and language.
///
/// Lines are 1-based and inclusive; `start_line <= end_line` always holds
/// for splitter output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodeChunk {
    /// The chunk text, a contiguous slice of the source file
    pub content: String,
    /// Language tag of the source file (see [`crate::language`])
    pub language: String,
    /// Absolute path of the source file
    pub file_path: PathBuf,
    /// First line of the chunk, 1-based
    pub start_line: u32,
    /// Last line of the chunk, 1-based inclusive
    pub end_line: u32,
    /// Extra key/value pairs carried into the stored document metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

impl CodeChunk {
    /// Create a chunk without extra metadata
    pub fn new(
        content: impl Into<String>,
        language: impl Into<String>,
        file_path: impl Into<PathBuf>,
        start_line: u32,
        end_line: u32,
    ) -> Self {
        Self {
            content: content.into(),
            language: language.into(),
            file_path: file_path.into(),
            start_line,
            end_line,
            metadata: HashMap::new(),
        }
    }

    /// Number of lines spanned by this chunk
    pub fn line_count(&self) -> u32 {
        self.end_line - self.start_line + 1
    }
}

/// An embedded chunk ready for storage.
///
/// The id is deterministic over `(relative_path, start_line, end_line,
/// content)`, which makes re-indexing idempotent: identical chunks upsert
/// onto themselves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorDocument {
    /// Deterministic chunk identifier
    pub id: String,
    /// Embedding vector; length equals the collection dimension
    pub vector: Vec<f32>,
    /// The chunk text
    pub content: String,
    /// Path relative to the codebase root, forward slashes
    pub relative_path: String,
    /// First line of the chunk, 1-based
    pub start_line: u32,
    /// Last line of the chunk, 1-based inclusive
    pub end_line: u32,
    /// File extension including the leading dot, or empty
    pub file_extension: String,
    /// Chunk metadata: inherited pairs plus `language`, `codebase_path`
    /// and `chunk_index`
    pub metadata: HashMap<String, Value>,
}
