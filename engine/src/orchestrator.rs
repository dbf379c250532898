//! Request orchestration: deadlines and degraded outcomes.
//!
//! The presentation layer consumes [`SearchOutcome`], never a raw error: a
//! request either produces ranked results or a degraded state with a
//! distinct user-facing message per failure kind. Nothing here panics and
//! nothing hangs past the deadline.

use std::time::Duration;

use tracing::error;

use semsearch_embeddings::EmbeddingError;

use crate::engine::{SearchEngine, SearchResult};
use crate::error::SearchError;

/// Wall-clock budget per search request.
///
/// Strictly greater than the embedding client's per-attempt timeout, so a
/// single slow attempt cannot trip the request deadline on its own.
pub const SEARCH_DEADLINE: Duration = Duration::from_secs(25);

/// Terminal state of one search request.
#[derive(Debug)]
pub enum SearchOutcome {
    /// Ranked results, possibly empty.
    Results(Vec<SearchResult>),

    /// The request failed; carry a user-presentable reason.
    Degraded(DegradedReason),
}

/// Why a request degraded.
#[derive(Debug)]
pub enum DegradedReason {
    /// The overall deadline fired.
    Timeout,

    /// The remote embedding service failed after all retries.
    RemoteUnavailable { attempts: u32, detail: String },

    /// The query produced a zero-norm embedding.
    DegenerateQuery,

    /// Anything else (artifact trouble surfacing late, dimension drift).
    Internal(String),
}

impl DegradedReason {
    /// User-facing message for this failure kind.
    pub fn user_message(&self) -> String {
        match self {
            Self::Timeout => {
                "Request timeout — the search took too long to complete. Please try again."
                    .to_string()
            }
            Self::RemoteUnavailable { attempts, .. } => format!(
                "The embedding service could not be reached after {attempts} attempts. Please try again."
            ),
            Self::DegenerateQuery => {
                "The query could not be interpreted. Please rephrase and try again.".to_string()
            }
            Self::Internal(_) => "An internal error occurred. Please try again.".to_string(),
        }
    }
}

/// Run a search under the default deadline.
pub async fn run_search(
    engine: &SearchEngine,
    query: &str,
    top_k: Option<usize>,
) -> SearchOutcome {
    run_search_with_deadline(engine, query, top_k, SEARCH_DEADLINE).await
}

/// Run a search under an explicit deadline.
///
/// When the deadline fires the in-flight search future is dropped —
/// best-effort cancellation of the underlying network call — and no
/// partial results are ever produced.
pub async fn run_search_with_deadline(
    engine: &SearchEngine,
    query: &str,
    top_k: Option<usize>,
    deadline: Duration,
) -> SearchOutcome {
    match tokio::time::timeout(deadline, engine.search(query, top_k)).await {
        Ok(Ok(results)) => SearchOutcome::Results(results),
        Ok(Err(e)) => {
            error!("Search failed: {e}");
            SearchOutcome::Degraded(classify(e))
        }
        Err(_) => {
            error!("Search timed out after {}s", deadline.as_secs());
            SearchOutcome::Degraded(DegradedReason::Timeout)
        }
    }
}

fn classify(error: SearchError) -> DegradedReason {
    match error {
        SearchError::Embedding(EmbeddingError::RemoteService {
            attempts,
            last_error,
        }) => DegradedReason::RemoteUnavailable {
            attempts,
            detail: last_error,
        },
        SearchError::DegenerateQuery => DegradedReason::DegenerateQuery,
        other => DegradedReason::Internal(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_distinct_per_kind() {
        let reasons = [
            DegradedReason::Timeout,
            DegradedReason::RemoteUnavailable {
                attempts: 2,
                detail: "connection reset".to_string(),
            },
            DegradedReason::DegenerateQuery,
            DegradedReason::Internal("boom".to_string()),
        ];

        let messages: Vec<String> = reasons.iter().map(DegradedReason::user_message).collect();
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_deadline_exceeds_single_attempt_timeout() {
        assert!(SEARCH_DEADLINE > semsearch_embeddings::client::REQUEST_TIMEOUT);
    }
}
