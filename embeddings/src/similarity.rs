//! Similarity computation for embeddings.

use ordered_float::OrderedFloat;

use crate::Embedding;
use crate::error::{EmbeddingError, Result};

/// Compute the dot product between two vectors.
///
/// For two unit-length vectors this is their cosine similarity.
pub fn dot_product(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    Ok(a.iter().zip(b.iter()).map(|(x, y)| x * y).sum())
}

/// Compute the L2 norm of a vector.
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Normalize a vector to unit length in place.
///
/// Fails with [`EmbeddingError::ZeroNorm`] for a zero-length vector; a
/// degenerate embedding must surface to the caller rather than silently
/// score everything at zero.
pub fn normalize(v: &mut Embedding) -> Result<()> {
    let magnitude = l2_norm(v);
    if magnitude == 0.0 {
        return Err(EmbeddingError::ZeroNorm);
    }
    for x in v.iter_mut() {
        *x /= magnitude;
    }
    Ok(())
}

/// Select the indices of the `k` highest scores.
///
/// Returned indices are ordered by score descending; equal scores are
/// broken by ascending original index so results are deterministic.
pub fn top_k_indices(scores: &[f32], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        OrderedFloat(scores[b])
            .cmp(&OrderedFloat(scores[a]))
            .then_with(|| a.cmp(&b))
    });
    order.truncate(k);
    order
}
