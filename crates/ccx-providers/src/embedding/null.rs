//! Null embedding provider for testing and development
//!
//! Produces deterministic, hash-derived embeddings with no external
//! dependencies. Identical text always yields an identical vector, which is
//! what the content-addressed idempotence tests rely on.

use async_trait::async_trait;
use ccx_domain::error::Result;
use ccx_domain::ports::EmbeddingProvider;
use ccx_domain::value_objects::Embedding;
use std::hash::{DefaultHasher, Hash, Hasher};

/// Dimensionality of null embeddings (matches common small embedding models)
pub const NULL_EMBEDDING_DIMENSION: usize = 384;

/// Offline embedding provider returning hash-derived vectors.
///
/// Vectors depend only on the input text, never on batch position. Empty
/// input embeds to the zero vector.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEmbeddingProvider;

impl NullEmbeddingProvider {
    /// Create a new null embedding provider
    pub fn new() -> Self {
        Self
    }

    fn embed_text(text: &str) -> Embedding {
        if text.is_empty() {
            return Embedding::new(vec![0.0; NULL_EMBEDDING_DIMENSION], "null");
        }

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let seed = hasher.finish();
        let base = (seed % 1000) as f32 / 1000.0;

        let vector = (0..NULL_EMBEDDING_DIMENSION)
            .map(|j| {
                let variation = ((seed % 8191) as f32 * 0.001 + j as f32 * 0.01).sin();
                (base + variation * 0.1).clamp(0.0, 1.0)
            })
            .collect();

        Embedding::new(vector, "null")
    }
}

#[async_trait]
impl EmbeddingProvider for NullEmbeddingProvider {
    async fn dimension(&self) -> Result<usize> {
        Ok(NULL_EMBEDDING_DIMENSION)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        Ok(texts.iter().map(|text| Self::embed_text(text)).collect())
    }

    fn provider_name(&self) -> &str {
        "null"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn identical_text_gets_identical_vectors() {
        let provider = NullEmbeddingProvider::new();
        let a = provider.embed("fn main() {}").await.unwrap();
        let b = provider.embed("fn main() {}").await.unwrap();
        assert_eq!(a.vector, b.vector);
    }

    #[tokio::test]
    async fn different_text_gets_different_vectors() {
        let provider = NullEmbeddingProvider::new();
        let a = provider.embed("fn alpha() {}").await.unwrap();
        let b = provider.embed("fn omega() {}").await.unwrap();
        assert_ne!(a.vector, b.vector);
    }

    #[tokio::test]
    async fn batch_preserves_order_and_length() {
        let provider = NullEmbeddingProvider::new();
        let texts = vec!["one".to_string(), "two".to_string(), "one".to_string()];
        let embeddings = provider.embed_batch(&texts).await.unwrap();

        assert_eq!(embeddings.len(), 3);
        assert_eq!(embeddings[0].vector, embeddings[2].vector);
        assert_ne!(embeddings[0].vector, embeddings[1].vector);
        for embedding in &embeddings {
            assert_eq!(embedding.dimensions, NULL_EMBEDDING_DIMENSION);
        }
    }

    #[tokio::test]
    async fn batch_position_does_not_change_vectors() {
        let provider = NullEmbeddingProvider::new();
        let first = provider
            .embed_batch(&["x".to_string(), "target".to_string()])
            .await
            .unwrap();
        let second = provider.embed_batch(&["target".to_string()]).await.unwrap();
        assert_eq!(first[1].vector, second[0].vector);
    }

    #[tokio::test]
    async fn empty_text_embeds_to_zero_vector() {
        let provider = NullEmbeddingProvider::new();
        let embedding = provider.embed("").await.unwrap();
        assert!(embedding.vector.iter().all(|v| *v == 0.0));
        assert_eq!(embedding.dimensions, NULL_EMBEDDING_DIMENSION);
    }

    #[tokio::test]
    async fn reported_dimension_matches_vectors() {
        let provider = NullEmbeddingProvider::new();
        assert_eq!(provider.dimension().await.unwrap(), NULL_EMBEDDING_DIMENSION);
        let embedding = provider.embed("check").await.unwrap();
        assert_eq!(embedding.vector.len(), NULL_EMBEDDING_DIMENSION);
    }
}
