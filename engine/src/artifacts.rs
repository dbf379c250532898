//! Load-once artifact store.
//!
//! Three static artifacts back the engine: `config.json`, `embeddings.npy`,
//! and `metadata.json`, produced offline by the corpus build. They are
//! loaded lazily on first access, validated together, and cached for the
//! process lifetime. There is no reload path and no retry: a bad artifact
//! is a fatal startup condition.

use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ArtifactError;
use crate::npy::{self, EmbeddingMatrix};

/// Config artifact filename.
pub const CONFIG_FILE: &str = "config.json";

/// Embedding matrix artifact filename.
pub const EMBEDDINGS_FILE: &str = "embeddings.npy";

/// Chunk metadata artifact filename.
pub const METADATA_FILE: &str = "metadata.json";

/// Engine configuration, from `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Remote embedding model identifier.
    pub model_name: String,

    /// Default number of results when the caller does not specify one.
    pub top_k: usize,
}

/// Metadata for one corpus chunk, from `metadata.json`.
///
/// Entry `i` describes row `i` of the embedding matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMeta {
    /// Stable chunk identifier.
    pub chunk_id: String,

    /// Title of the source article.
    pub article_title: String,

    /// Raw chunk text (sanitized at query time, not here).
    pub text: String,
}

/// The three artifacts, validated and immutable after load.
#[derive(Debug, Clone)]
pub struct EngineData {
    /// Engine configuration.
    pub config: EngineConfig,

    /// Pre-normalized corpus embeddings.
    pub embeddings: EmbeddingMatrix,

    /// Chunk metadata, index-aligned to the matrix.
    pub metadata: Vec<ChunkMeta>,
}

/// Lazy, thread-safe-once artifact cache.
///
/// Concurrent first calls to [`get`](Self::get) are serialized so the
/// artifacts load exactly once; every later access is a lock-free read.
pub struct ArtifactStore {
    dir: PathBuf,
    cell: OnceCell<EngineData>,
}

impl ArtifactStore {
    /// Create a store over the given artifact directory. Nothing is read
    /// until the first [`get`](Self::get).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cell: OnceCell::new(),
        }
    }

    /// The conventional artifact location, `artifacts/` under the working
    /// directory.
    pub fn default_dir() -> PathBuf {
        PathBuf::from("artifacts")
    }

    /// Get the engine data, loading it on first call.
    pub fn get(&self) -> Result<&EngineData, ArtifactError> {
        self.cell.get_or_try_init(|| load(&self.dir))
    }

    /// Artifact directory this store reads from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::new(Self::default_dir())
    }
}

/// Load and cross-validate all three artifacts.
fn load(dir: &Path) -> Result<EngineData, ArtifactError> {
    let config: EngineConfig = read_json(&dir.join(CONFIG_FILE))?;
    if config.top_k == 0 {
        return Err(ArtifactError::InvalidConfig(
            "top_k must be greater than zero".to_string(),
        ));
    }

    let embeddings = npy::read_matrix(&dir.join(EMBEDDINGS_FILE))?;
    let metadata: Vec<ChunkMeta> = read_json(&dir.join(METADATA_FILE))?;

    if metadata.len() != embeddings.rows() {
        return Err(ArtifactError::RowCountMismatch {
            embeddings: embeddings.rows(),
            metadata: metadata.len(),
        });
    }

    info!(
        "Loaded engine artifacts: {} chunks, model {}",
        metadata.len(),
        config.model_name
    );

    Ok(EngineData {
        config,
        embeddings,
        metadata,
    })
}

/// Read and deserialize a JSON artifact.
fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::MissingArtifact {
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::Io(e)
        }
    })?;

    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::MalformedJson {
        file: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        source,
    })
}
