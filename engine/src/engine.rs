//! Ranking engine: exact similarity scoring over the corpus matrix.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use semsearch_embeddings::{EmbeddingClient, EmbeddingError, dot_product, normalize, top_k_indices};

use crate::artifacts::ArtifactStore;
use crate::error::{Result, SearchError};
use crate::snippet::{DEFAULT_SNIPPET_CHARS, clean_snippet};

/// One ranked search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// 1-based rank.
    pub rank: usize,

    /// Title of the source article.
    pub article_title: String,

    /// Sanitized excerpt of the chunk text.
    pub snippet: String,

    /// Raw dot-product similarity against the normalized query.
    pub score: f32,

    /// Stable chunk identifier.
    pub chunk_id: String,
}

type ClientFactory = dyn Fn() -> EmbeddingClient + Send + Sync;

/// Semantic search engine over a fixed, pre-embedded corpus.
///
/// Holds no mutable state beyond the load-once artifact cache, so a single
/// instance serves unbounded concurrent requests. Each request obtains a
/// fresh [`EmbeddingClient`] from the factory; clients are deliberately
/// not pooled.
pub struct SearchEngine {
    store: ArtifactStore,
    make_client: Arc<ClientFactory>,
}

impl SearchEngine {
    /// Create an engine over the given artifact store, embedding queries
    /// via the Hugging Face Inference API.
    pub fn new(store: ArtifactStore) -> Self {
        Self {
            store,
            make_client: Arc::new(EmbeddingClient::hf_from_env),
        }
    }

    /// Replace the embedding-client factory (primarily for tests and
    /// alternative backends).
    pub fn with_client_factory<F>(mut self, make_client: F) -> Self
    where
        F: Fn() -> EmbeddingClient + Send + Sync + 'static,
    {
        self.make_client = Arc::new(make_client);
        self
    }

    /// Force the artifacts to load now, so hosts can fail fast at startup
    /// instead of on the first query.
    pub fn preload(&self) -> Result<()> {
        self.store.get()?;
        Ok(())
    }

    /// Run a semantic search for `query`.
    ///
    /// `top_k` falls back to the configured default when `None`. Returns
    /// at most `top_k` results ordered by score descending (ties broken by
    /// ascending corpus row); `top_k = 0` and an empty corpus both yield an
    /// empty list. Remote-service failures propagate unchanged.
    pub async fn search(&self, query: &str, top_k: Option<usize>) -> Result<Vec<SearchResult>> {
        let data = self.store.get()?;
        let top_k = top_k.unwrap_or(data.config.top_k);

        debug!("Searching for {top_k} results: {query}");

        // Fresh client per request; stale pooled connections to the remote
        // endpoint have bitten before.
        let client = (self.make_client)();
        let mut query_vector = client.embed(query, &data.config.model_name).await?;

        if !data.embeddings.is_empty() && query_vector.len() != data.embeddings.dim() {
            return Err(SearchError::DimensionMismatch {
                expected: data.embeddings.dim(),
                actual: query_vector.len(),
            });
        }

        // Corpus rows are unit-length already; only the query needs it.
        match normalize(&mut query_vector) {
            Ok(()) => {}
            Err(EmbeddingError::ZeroNorm) => return Err(SearchError::DegenerateQuery),
            Err(e) => return Err(e.into()),
        }

        let mut scores = Vec::with_capacity(data.embeddings.rows());
        for i in 0..data.embeddings.rows() {
            let score = dot_product(data.embeddings.row(i), &query_vector)
                .map_err(SearchError::Embedding)?;
            scores.push(score);
        }

        let results = top_k_indices(&scores, top_k)
            .into_iter()
            .enumerate()
            .map(|(rank, idx)| {
                let chunk = &data.metadata[idx];
                SearchResult {
                    rank: rank + 1,
                    article_title: chunk.article_title.clone(),
                    snippet: clean_snippet(&chunk.text, DEFAULT_SNIPPET_CHARS),
                    score: scores[idx],
                    chunk_id: chunk.chunk_id.clone(),
                }
            })
            .collect();

        Ok(results)
    }
}
