//! Cosine nearest-neighbour search over standardised vectors

use rayon::prelude::*;
use std::cmp::Ordering;

/// A retrieved pool case and its cosine similarity to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Index into the historical pool
    pub index: usize,
    pub similarity: f64,
}

/// Cosine similarity; zero-norm or mismatched vectors have similarity 0
#[must_use]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a < 1e-10 || norm_b < 1e-10 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Find the `k` candidates closest to `query` by cosine distance
///
/// `candidates` are indices into `pool`. Results are ordered by increasing distance with
/// ties broken by pool index. Similarities are computed with rayon once the candidate
/// count exceeds `parallel_threshold`.
#[must_use]
pub fn nearest_neighbors(
    query: &[f64],
    pool: &[Vec<f64>],
    candidates: &[usize],
    k: usize,
    parallel_threshold: usize,
) -> Vec<Neighbor> {
    let score = |&index: &usize| Neighbor {
        index,
        similarity: cosine_similarity(query, &pool[index]),
    };

    let mut neighbors: Vec<Neighbor> = if candidates.len() > parallel_threshold {
        candidates.par_iter().map(score).collect()
    } else {
        candidates.iter().map(score).collect()
    };

    neighbors.sort_by(compare_neighbors);
    neighbors.truncate(k);
    neighbors
}

/// Closest first; NaN similarities sort last; equal distances fall back to pool order
fn compare_neighbors(a: &Neighbor, b: &Neighbor) -> Ordering {
    let distance = |n: &Neighbor| {
        if n.similarity.is_nan() {
            f64::INFINITY
        } else {
            1.0 - n.similarity
        }
    };
    distance(a)
        .total_cmp(&distance(b))
        .then_with(|| a.index.cmp(&b.index))
}
