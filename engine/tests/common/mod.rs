//! Shared fixtures for engine integration tests.
#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use semsearch_embeddings::{Embedding, EmbeddingBackend, EmbeddingError};

/// Backend that returns the same vector for every query.
pub struct FixedBackend {
    vector: Embedding,
}

impl FixedBackend {
    pub fn new(vector: Embedding) -> Self {
        Self { vector }
    }
}

#[async_trait]
impl EmbeddingBackend for FixedBackend {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn embed(&self, _text: &str, _model: &str) -> semsearch_embeddings::Result<Embedding> {
        Ok(self.vector.clone())
    }
}

/// Backend that fails every attempt.
pub struct FailingBackend;

#[async_trait]
impl EmbeddingBackend for FailingBackend {
    fn name(&self) -> &str {
        "failing"
    }

    async fn embed(&self, _text: &str, _model: &str) -> semsearch_embeddings::Result<Embedding> {
        Err(EmbeddingError::ApiRequest("service down".to_string()))
    }
}

/// Backend that never completes within any reasonable deadline.
pub struct HangingBackend;

#[async_trait]
impl EmbeddingBackend for HangingBackend {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn embed(&self, _text: &str, _model: &str) -> semsearch_embeddings::Result<Embedding> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(EmbeddingError::ApiRequest("unreachable".to_string()))
    }
}

/// Serialize rows into v1 `.npy` bytes.
pub fn npy_bytes(rows: &[Vec<f32>], dim: usize) -> Vec<u8> {
    let header = format!(
        "{{'descr': '<f4', 'fortran_order': False, 'shape': ({}, {dim}), }}",
        rows.len()
    );
    let mut padded = header.into_bytes();
    while (10 + padded.len() + 1) % 64 != 0 {
        padded.push(b' ');
    }
    padded.push(b'\n');

    let mut out = Vec::new();
    out.extend_from_slice(b"\x93NUMPY");
    out.push(1);
    out.push(0);
    out.extend_from_slice(&(padded.len() as u16).to_le_bytes());
    out.extend_from_slice(&padded);
    for row in rows {
        for v in row {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }
    out
}

/// Write a full artifact directory: config (top_k = 2), embeddings, and
/// index-aligned metadata with wiki markup in the chunk text.
pub fn write_artifacts(dir: &Path, rows: &[Vec<f32>], dim: usize, chunk_ids: &[&str]) {
    let config = serde_json::json!({
        "model_name": "sentence-transformers/all-MiniLM-L6-v2",
        "top_k": 2
    });
    std::fs::write(dir.join("config.json"), config.to_string()).unwrap();

    std::fs::write(dir.join("embeddings.npy"), npy_bytes(rows, dim)).unwrap();

    let metadata: Vec<serde_json::Value> = chunk_ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "chunk_id": id,
                "article_title": format!("Article {id}"),
                "text": format!("== Overview ==  Body of  chunk {id}.")
            })
        })
        .collect();
    std::fs::write(
        dir.join("metadata.json"),
        serde_json::to_string(&metadata).unwrap(),
    )
    .unwrap();
}
