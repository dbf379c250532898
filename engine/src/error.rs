//! Error types for the search engine.

use std::path::PathBuf;

use thiserror::Error;

use semsearch_embeddings::EmbeddingError;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Fatal artifact-loading errors.
///
/// Any of these means the process cannot serve requests; artifact loading
/// is local disk I/O with no retry path.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Artifact file does not exist.
    #[error("missing artifact file: {path}")]
    MissingArtifact { path: PathBuf },

    /// IO error while reading an artifact.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON artifact failed to parse.
    #[error("malformed {file}: {source}")]
    MalformedJson {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// The embedding matrix failed to parse.
    #[error("malformed embeddings.npy: {0}")]
    MalformedNpy(String),

    /// Metadata and embedding matrix disagree on corpus size.
    #[error("row count mismatch: {embeddings} embedding rows, {metadata} metadata entries")]
    RowCountMismatch { embeddings: usize, metadata: usize },

    /// Configuration value out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Errors that can occur while serving a search request.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Artifact loading failed (startup-class failure).
    #[error("artifact error: {0}")]
    Artifacts(#[from] ArtifactError),

    /// Embedding subsystem failed; remote-service failures pass through
    /// here unchanged so the caller sees the root cause.
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// The query embedding has zero norm and cannot be scored.
    #[error("degenerate query: embedding has zero norm")]
    DegenerateQuery,

    /// Query embedding dimension does not match the corpus.
    #[error("dimension mismatch: corpus dimension {expected}, query dimension {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
