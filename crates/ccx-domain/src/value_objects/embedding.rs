//! Semantic embedding value object

use serde::{Deserialize, Serialize};

/// A vector embedding of a piece of text.
///
/// `model` identifies the generating provider and is diagnostic only; the
/// pipeline relies solely on `vector` and its length.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Embedding {
    /// The embedding vector values
    pub vector: Vec<f32>,
    /// Name of the model that generated this embedding
    pub model: String,
    /// Dimensionality of the embedding vector
    pub dimensions: usize,
}

impl Embedding {
    /// Create an embedding, deriving `dimensions` from the vector length
    pub fn new(vector: Vec<f32>, model: impl Into<String>) -> Self {
        let dimensions = vector.len();
        Self {
            vector,
            model: model.into(),
            dimensions,
        }
    }
}
