//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the CCX indexing engine
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (simple form)
    #[error("I/O error: {source}")]
    IoSimple {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// I/O operation error (with context)
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Transient filesystem problem for a single directory entry
    #[error("Walk error: {message}")]
    Walk {
        /// Description of the walk error
        message: String,
    },

    /// Unexpected parser failure for a single file
    #[error("Split error for {file}: {message}")]
    Split {
        /// File the splitter choked on
        file: String,
        /// Description of the parser failure
        message: String,
    },

    /// Retryable embedding provider failure
    #[error("Embedding error (transient): {message}")]
    EmbeddingTransient {
        /// Description of the transient failure
        message: String,
    },

    /// Non-retryable embedding provider failure; the batch is discarded
    #[error("Embedding error (permanent): {message}")]
    EmbeddingPermanent {
        /// Description of the permanent failure
        message: String,
    },

    /// Vector store operation error
    #[error("Vector store error: {message}")]
    VectorStore {
        /// Description of the store error
        message: String,
    },

    /// The store refused to create another collection. Terminal; the display
    /// string is matched verbatim by operator front-ends.
    #[error("{}", crate::constants::COLLECTION_LIMIT_MESSAGE)]
    CollectionLimitReached,

    /// Reading an existing snapshot failed (corruption). Fatal for the codebase.
    #[error("Snapshot error: {message}")]
    Snapshot {
        /// Description of the snapshot failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Another index or sync operation is already running for this codebase
    #[error("Already indexing codebase: {path}")]
    AlreadyIndexing {
        /// The contended codebase path
        path: String,
    },

    /// The operation observed a cancellation signal
    #[error("Operation cancelled")]
    Cancelled,

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },

    /// Resource not found error
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Basic error creation methods
impl Error {
    /// Create a contextual I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create an I/O error with source
    pub fn io_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a walk error
    pub fn walk<S: Into<String>>(message: S) -> Self {
        Self::Walk {
            message: message.into(),
        }
    }

    /// Create a split error for a file
    pub fn split<F: Into<String>, S: Into<String>>(file: F, message: S) -> Self {
        Self::Split {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a transient embedding error
    pub fn embedding_transient<S: Into<String>>(message: S) -> Self {
        Self::EmbeddingTransient {
            message: message.into(),
        }
    }

    /// Create a permanent embedding error
    pub fn embedding_permanent<S: Into<String>>(message: S) -> Self {
        Self::EmbeddingPermanent {
            message: message.into(),
        }
    }

    /// Create a vector store error
    pub fn vector_store<S: Into<String>>(message: S) -> Self {
        Self::VectorStore {
            message: message.into(),
        }
    }

    /// Create a snapshot error
    pub fn snapshot<S: Into<String>>(message: S) -> Self {
        Self::Snapshot {
            message: message.into(),
            source: None,
        }
    }

    /// Create a snapshot error with source
    pub fn snapshot_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Snapshot {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an already-indexing error for a codebase path
    pub fn already_indexing<S: Into<String>>(path: S) -> Self {
        Self::AlreadyIndexing { path: path.into() }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl Error {
    /// Whether this error aborts a whole index or sync operation.
    ///
    /// Per-file and per-batch failures are contained by the pipeline; only
    /// these kinds propagate to the operator.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::CollectionLimitReached
                | Self::Snapshot { .. }
                | Self::AlreadyIndexing { .. }
                | Self::Cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::COLLECTION_LIMIT_MESSAGE;

    #[test]
    fn collection_limit_displays_marker_verbatim() {
        let err = Error::CollectionLimitReached;
        assert_eq!(err.to_string(), COLLECTION_LIMIT_MESSAGE);
    }

    #[test]
    fn terminal_classification() {
        assert!(Error::CollectionLimitReached.is_terminal());
        assert!(Error::snapshot("corrupt").is_terminal());
        assert!(Error::already_indexing("/a").is_terminal());
        assert!(!Error::walk("transient").is_terminal());
        assert!(!Error::embedding_permanent("bad batch").is_terminal());
    }
}
