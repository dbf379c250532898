//! Error types for the embedding subsystem.

use thiserror::Error;

/// Result type alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Errors that can occur in the embedding subsystem.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Remote embedding service failed after exhausting the retry budget.
    #[error("remote embedding service failed after {attempts} attempts: {last_error}")]
    RemoteService { attempts: u32, last_error: String },

    /// API request failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// Invalid response from the remote endpoint.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Dimension mismatch.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Vector has zero length and cannot be normalized.
    #[error("cannot normalize a zero-norm vector")]
    ZeroNorm,

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
