//! # Embeddings
//!
//! This crate provides query-embedding generation and vector similarity
//! math for the semantic chunk search engine.
//!
//! ## Features
//!
//! - **Embedding Generation**: Convert query text to dense vectors via a
//!   remote feature-extraction endpoint
//! - **Bounded Retry**: Fresh connection per attempt, fixed backoff
//! - **Similarity Math**: Dot products, L2 normalization, top-K selection
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Embedding Subsystem                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingClient ──► RetryPolicy ──► EmbeddingBackend           │
//! │        │                                   │                    │
//! │        ▼                                   ▼                    │
//! │   Embedding ──► similarity (dot / normalize / top-K)            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod error;
pub mod retry;
pub mod similarity;

pub use client::{EmbeddingBackend, EmbeddingClient, HfInferenceBackend};
pub use error::{EmbeddingError, Result};
pub use retry::RetryPolicy;
pub use similarity::{dot_product, l2_norm, normalize, top_k_indices};

/// A dense vector embedding.
///
/// Vectors are stored and accumulated as `f32` end to end; the remote
/// endpoint's floats are parsed at this precision.
pub type Embedding = Vec<f32>;
