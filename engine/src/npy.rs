//! Minimal reader for 2-D float matrices in NumPy `.npy` format.
//!
//! Supports format versions 1.x and 2.x, little-endian `<f4`/`<f8`
//! payloads, C (row-major) order only. `<f8` data is narrowed to `f32` at
//! load; all scoring happens at `f32` precision.

use std::path::Path;

use tracing::info;

use crate::error::ArtifactError;

const MAGIC: &[u8] = b"\x93NUMPY";

/// A dense row-major matrix of corpus embeddings.
///
/// Row index is the sole join key to chunk metadata. Rows are expected to
/// be L2-normalized at artifact-build time; the engine never re-normalizes
/// them.
#[derive(Debug, Clone)]
pub struct EmbeddingMatrix {
    data: Vec<f32>,
    rows: usize,
    dim: usize,
}

impl EmbeddingMatrix {
    /// Build a matrix from row-major data.
    pub fn from_raw(data: Vec<f32>, rows: usize, dim: usize) -> Result<Self, ArtifactError> {
        if data.len() != rows * dim {
            return Err(ArtifactError::MalformedNpy(format!(
                "payload holds {} values, shape ({rows}, {dim}) needs {}",
                data.len(),
                rows * dim
            )));
        }
        Ok(Self { data, rows, dim })
    }

    /// Number of corpus rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Embedding dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Whether the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Borrow row `i`.
    ///
    /// Panics if `i >= rows`; callers iterate `0..rows()`.
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }
}

/// Read a 2-D `.npy` file from disk.
pub fn read_matrix(path: &Path) -> Result<EmbeddingMatrix, ArtifactError> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::MissingArtifact {
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::Io(e)
        }
    })?;

    let matrix = parse_matrix(&bytes)?;
    info!(
        "Loaded embedding matrix: {} rows x {} dims",
        matrix.rows(),
        matrix.dim()
    );
    Ok(matrix)
}

/// Parse `.npy` bytes into a matrix.
pub fn parse_matrix(bytes: &[u8]) -> Result<EmbeddingMatrix, ArtifactError> {
    if bytes.len() < 10 || &bytes[..6] != MAGIC {
        return Err(ArtifactError::MalformedNpy(
            "missing NumPy magic string".to_string(),
        ));
    }

    let version = bytes[6];
    let (header_len, header_start): (usize, usize) = match version {
        1 => (u16::from_le_bytes([bytes[8], bytes[9]]) as usize, 10),
        2 | 3 => {
            if bytes.len() < 12 {
                return Err(ArtifactError::MalformedNpy(
                    "truncated v2 header length".to_string(),
                ));
            }
            let len = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
            (len, 12)
        }
        other => {
            return Err(ArtifactError::MalformedNpy(format!(
                "unsupported format version {other}"
            )));
        }
    };

    let header_end = header_start
        .checked_add(header_len)
        .filter(|&end| end <= bytes.len())
        .ok_or_else(|| ArtifactError::MalformedNpy("truncated header".to_string()))?;

    let header = std::str::from_utf8(&bytes[header_start..header_end])
        .map_err(|_| ArtifactError::MalformedNpy("header is not UTF-8".to_string()))?;

    let descr = extract_quoted(header, "descr")?;
    let item_size = match descr.as_str() {
        "<f4" => 4,
        "<f8" => 8,
        other => {
            return Err(ArtifactError::MalformedNpy(format!(
                "unsupported dtype {other:?}, expected <f4 or <f8"
            )));
        }
    };

    if !header.contains("'fortran_order': False") {
        return Err(ArtifactError::MalformedNpy(
            "expected C-order (fortran_order False)".to_string(),
        ));
    }

    let (rows, dim) = extract_shape(header)?;

    let payload = &bytes[header_end..];
    let expected = rows
        .checked_mul(dim)
        .and_then(|n| n.checked_mul(item_size))
        .ok_or_else(|| ArtifactError::MalformedNpy("shape overflow".to_string()))?;
    if payload.len() != expected {
        return Err(ArtifactError::MalformedNpy(format!(
            "payload is {} bytes, shape ({rows}, {dim}) with {item_size}-byte items needs {expected}",
            payload.len()
        )));
    }

    let data: Vec<f32> = if item_size == 4 {
        payload
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    } else {
        payload
            .chunks_exact(8)
            .map(|c| {
                f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]) as f32
            })
            .collect()
    };

    EmbeddingMatrix::from_raw(data, rows, dim)
}

/// Extract a single-quoted string value from the header dict.
fn extract_quoted(header: &str, key: &str) -> Result<String, ArtifactError> {
    let marker = format!("'{key}':");
    let after = header
        .split_once(&marker)
        .map(|(_, rest)| rest)
        .ok_or_else(|| ArtifactError::MalformedNpy(format!("header missing {key:?}")))?;

    let open = after
        .find('\'')
        .ok_or_else(|| ArtifactError::MalformedNpy(format!("unquoted {key:?} value")))?;
    let rest = &after[open + 1..];
    let close = rest
        .find('\'')
        .ok_or_else(|| ArtifactError::MalformedNpy(format!("unterminated {key:?} value")))?;

    Ok(rest[..close].to_string())
}

/// Extract the 2-D shape tuple from the header dict.
fn extract_shape(header: &str) -> Result<(usize, usize), ArtifactError> {
    let after = header
        .split_once("'shape':")
        .map(|(_, rest)| rest)
        .ok_or_else(|| ArtifactError::MalformedNpy("header missing 'shape'".to_string()))?;

    let open = after
        .find('(')
        .ok_or_else(|| ArtifactError::MalformedNpy("shape is not a tuple".to_string()))?;
    let close = after[open..]
        .find(')')
        .map(|i| open + i)
        .ok_or_else(|| ArtifactError::MalformedNpy("unterminated shape tuple".to_string()))?;

    let dims: Vec<usize> = after[open + 1..close]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| ArtifactError::MalformedNpy(format!("bad shape element {s:?}")))
        })
        .collect::<Result<_, _>>()?;

    match dims.as_slice() {
        [rows, dim] => Ok((*rows, *dim)),
        other => Err(ArtifactError::MalformedNpy(format!(
            "expected a 2-D array, got {}-D",
            other.len()
        ))),
    }
}
