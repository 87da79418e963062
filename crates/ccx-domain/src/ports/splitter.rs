//! Code splitter port

use crate::entities::CodeChunk;
use std::path::Path;

/// Contract for turning source text into chunks.
///
/// `split` is total for valid UTF-8 input: unsupported languages and parse
/// failures degrade to size-based splitting instead of failing. Non-blank
/// input yields at least one chunk; blank-only input yields none. Chunk
/// spans are non-decreasing and together cover every source line (ignoring
/// blank trailing lines).
pub trait CodeSplitter: Send + Sync {
    /// Split `content` of `file_path`, parsed as `language`, into chunks
    fn split(&self, content: &str, language: &str, file_path: &Path) -> Vec<CodeChunk>;
}
