//! # Search Engine
//!
//! This crate provides a semantic search engine over a fixed corpus of
//! pre-embedded text chunks:
//!
//! - **Artifact Store**: Load-once configuration, embedding matrix, and
//!   chunk metadata
//! - **Ranking Engine**: Exact cosine-similarity scoring and top-K selection
//! - **Snippet Sanitizer**: Display-ready excerpts of chunk text
//! - **Request Orchestrator**: Wall-clock deadline and degraded outcomes
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Semantic Search Engine                      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                  │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐          │
//! │  │   Artifact   │  │  Embedding   │  │   Snippet    │          │
//! │  │    Store     │  │    Client    │  │  Sanitizer   │          │
//! │  └──────────────┘  └──────────────┘  └──────────────┘          │
//! │         │                │                  │                   │
//! │         └────────────────┼──────────────────┘                   │
//! │                          ▼                                      │
//! │                  ┌──────────────┐                               │
//! │                  │   Ranking    │                               │
//! │                  │    Engine    │                               │
//! │                  └──────────────┘                               │
//! │                          │                                      │
//! │                          ▼                                      │
//! │                  ┌──────────────┐                               │
//! │                  │   Request    │                               │
//! │                  │ Orchestrator │                               │
//! │                  └──────────────┘                               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use semsearch_engine::{ArtifactStore, SearchEngine, orchestrator};
//!
//! let engine = SearchEngine::new(ArtifactStore::new("artifacts"));
//! engine.preload()?; // fail fast on bad artifacts
//!
//! let outcome = orchestrator::run_search(&engine, "renal failure", None).await;
//! ```

pub mod artifacts;
pub mod engine;
pub mod error;
pub mod npy;
pub mod orchestrator;
pub mod snippet;

pub use artifacts::{ArtifactStore, ChunkMeta, EngineConfig, EngineData};
pub use engine::{SearchEngine, SearchResult};
pub use error::{ArtifactError, Result, SearchError};
pub use npy::EmbeddingMatrix;
pub use orchestrator::{DegradedReason, SearchOutcome, run_search};
pub use snippet::{DEFAULT_SNIPPET_CHARS, clean_snippet};
