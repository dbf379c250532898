//! Embedding client for the remote feature-extraction endpoint.
//!
//! The remote service recycles idle connections aggressively, so every
//! attempt runs on a brand-new backend with a brand-new HTTP client.
//! Connection reuse across attempts is deliberately avoided.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::retry::RetryPolicy;

/// Per-attempt HTTP timeout for the remote endpoint.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Trait for embedding backends.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Generate an embedding for the given text.
    async fn embed(&self, text: &str, model: &str) -> Result<Embedding>;
}

/// Hugging Face Inference API backend (feature-extraction pipeline).
pub struct HfInferenceBackend {
    /// API token.
    api_token: Option<String>,

    /// API base URL.
    base_url: String,

    /// Per-request timeout.
    request_timeout: Duration,
}

impl HfInferenceBackend {
    /// Create a new backend with the default endpoint.
    pub fn new() -> Self {
        Self {
            api_token: None,
            base_url: "https://router.huggingface.co/hf-inference/models".to_string(),
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    /// Create a backend with the API token taken from `HF_TOKEN`.
    pub fn from_env() -> Self {
        Self::new().with_api_token_opt(std::env::var("HF_TOKEN").ok())
    }

    /// Set the API token.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set or clear the API token.
    pub fn with_api_token_opt(mut self, token: Option<String>) -> Self {
        self.api_token = token;
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for HfInferenceBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingBackend for HfInferenceBackend {
    fn name(&self) -> &str {
        "hf-inference"
    }

    async fn embed(&self, text: &str, model: &str) -> Result<Embedding> {
        debug!("Generating embedding with model: {model}");

        // A fresh client per call: no pooled connections survive between
        // attempts.
        let client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()?;

        let body = serde_json::json!({ "inputs": text });

        let mut request = client
            .post(format!(
                "{}/{model}/pipeline/feature-extraction",
                self.base_url
            ))
            .header("Content-Type", "application/json")
            .json(&body);

        if let Some(token) = &self.api_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ApiRequest(format!(
                "API error ({status}): {error_text}"
            )));
        }

        let value: serde_json::Value = response.json().await?;
        parse_vector(&value)
    }
}

/// Parse the endpoint's JSON payload into a vector.
///
/// The feature-extraction pipeline returns either a flat `[f32]` for a
/// single input or a nested `[[f32]]` with one row per input; both shapes
/// are accepted.
fn parse_vector(value: &serde_json::Value) -> Result<Embedding> {
    let row = match value.as_array() {
        Some(items) if items.first().is_some_and(serde_json::Value::is_array) => items
            .first()
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| EmbeddingError::InvalidResponse("empty outer array".to_string()))?,
        Some(items) => items,
        None => {
            return Err(EmbeddingError::InvalidResponse(
                "expected a JSON array of numbers".to_string(),
            ));
        }
    };

    let vector: Embedding = row
        .iter()
        .map(|v| {
            v.as_f64().map(|f| f as f32).ok_or_else(|| {
                EmbeddingError::InvalidResponse("non-numeric element in vector".to_string())
            })
        })
        .collect::<Result<_>>()?;

    if vector.is_empty() {
        return Err(EmbeddingError::InvalidResponse(
            "empty embedding vector".to_string(),
        ));
    }

    Ok(vector)
}

type BackendFactory = dyn Fn() -> Box<dyn EmbeddingBackend> + Send + Sync;

/// Retry-wrapping embedding client.
///
/// Holds a backend factory rather than a backend: the factory is invoked
/// once per attempt, so a failed attempt never shares connection state
/// with its retry.
pub struct EmbeddingClient {
    make_backend: Arc<BackendFactory>,
    policy: RetryPolicy,
}

impl EmbeddingClient {
    /// Create a client from a backend factory.
    pub fn new<F>(make_backend: F) -> Self
    where
        F: Fn() -> Box<dyn EmbeddingBackend> + Send + Sync + 'static,
    {
        Self {
            make_backend: Arc::new(make_backend),
            policy: RetryPolicy::default(),
        }
    }

    /// Create a client backed by the Hugging Face Inference API, with the
    /// token taken from the environment.
    pub fn hf_from_env() -> Self {
        Self::new(|| Box::new(HfInferenceBackend::from_env()))
    }

    /// Set the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Generate an embedding for the given text, retrying per the policy.
    ///
    /// On exhaustion the error is [`EmbeddingError::RemoteService`] with
    /// the attempt count and last cause; it is never swallowed here.
    pub async fn embed(&self, text: &str, model: &str) -> Result<Embedding> {
        let make_backend = Arc::clone(&self.make_backend);
        self.policy
            .run(|attempt| {
                let backend = make_backend();
                async move {
                    debug!("Embedding attempt {attempt} via {}", backend.name());
                    backend.embed(text, model).await
                }
            })
            .await
    }
}
