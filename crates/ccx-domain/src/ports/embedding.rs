//! Embedding provider port

use crate::constants::DEFAULT_EMBEDDING_MAX_INPUT_CHARS;
use crate::error::{Error, Result};
use crate::value_objects::Embedding;
use async_trait::async_trait;

/// Contract for services that turn text into fixed-dimension vectors.
///
/// Implementations live outside the core (remote HTTP clients, local ONNX
/// runtimes, the deterministic null provider). Retry policy for transient
/// failures is the implementation's responsibility; the pipeline only
/// distinguishes [`Error::EmbeddingTransient`] from
/// [`Error::EmbeddingPermanent`] when deciding whether a batch is lost.
///
/// Implementations must be safe for concurrent calls; one provider instance
/// is shared across codebases.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Dimensionality of the produced vectors.
    ///
    /// May involve a probe call on first use; callers cache the value after
    /// the first success.
    async fn dimension(&self) -> Result<usize>;

    /// Embed a single text (default implementation delegates to
    /// [`Self::embed_batch`])
    async fn embed(&self, text: &str) -> Result<Embedding> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| Error::embedding_permanent("provider returned no embedding"))
    }

    /// Embed a batch of texts.
    ///
    /// Must return exactly `texts.len()` vectors in input order; the
    /// pipeline discards batches that come back misaligned.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>>;

    /// Client-side truncation target in characters, approximating the
    /// provider's token limit
    fn max_input_chars(&self) -> usize {
        DEFAULT_EMBEDDING_MAX_INPUT_CHARS
    }

    /// Identifier of this provider implementation, for diagnostics
    fn provider_name(&self) -> &str;
}
