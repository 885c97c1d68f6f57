use crate::error::{Error, Result};

/// How unequal-length inputs are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimilarityMode {
    /// Fail the comparison with `Error::DimensionMismatch`.
    Strict,
    /// Score the pair as 0.
    Lenient,
}

/// Cosine similarity `dot(a, b) / (|a| * |b|)`, accumulated in f64.
///
/// A zero-norm input scores 0 in both modes.
pub fn cosine_similarity(a: &[f32], b: &[f32], mode: SimilarityMode) -> Result<f64> {
    if a.len() != b.len() {
        return match mode {
            SimilarityMode::Strict => Err(Error::DimensionMismatch { left: a.len(), right: b.len() }),
            SimilarityMode::Lenient => Ok(0.0),
        };
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}

/// Edge weights and scores are published with two decimals.
pub fn round_weight(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}
