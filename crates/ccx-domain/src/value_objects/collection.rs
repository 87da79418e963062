//! Collection configuration value objects

use serde::{Deserialize, Serialize};

/// Retrieval mode of a collection.
///
/// Hybrid collections carry a secondary lexical field derived from document
/// content next to the dense vector field; plain collections carry only the
/// dense field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CollectionMode {
    /// Dense vector field only
    Plain,
    /// Dense vector field plus lexical field
    Hybrid,
}

impl CollectionMode {
    /// Whether this mode carries the lexical field
    pub fn is_hybrid(self) -> bool {
        matches!(self, Self::Hybrid)
    }
}
