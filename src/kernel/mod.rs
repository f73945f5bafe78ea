//! Histogram distance kernels.
//!
//! A [`Distance`] compares two signatures built with the same bin count and
//! returns a non-negative dissimilarity. Values are only used for ranking
//! templates against each other.

use crate::histogram::ColorHistogram;
use crate::util::{HistMatchError, HistMatchResult};

/// Dissimilarity between two color histograms.
pub trait Distance {
    /// Short metric name for logs and reports.
    const NAME: &'static str;

    /// Compares two equal-length signatures.
    fn distance(a: &ColorHistogram, b: &ColorHistogram) -> HistMatchResult<f64>;
}

/// L2 distance over bin counts: `sqrt(sum_i (a_i - b_i)^2)`.
///
/// Symmetric, zero only for identical signatures, and satisfies the triangle
/// inequality.
#[derive(Clone, Copy, Debug, Default)]
pub struct Euclidean;

impl Distance for Euclidean {
    const NAME: &'static str = "euclidean";

    fn distance(a: &ColorHistogram, b: &ColorHistogram) -> HistMatchResult<f64> {
        ensure_same_len(a, b)?;
        Ok(euclidean_counts(a.counts(), b.counts()))
    }
}

/// Euclidean distance between two histograms.
pub fn histogram_distance(a: &ColorHistogram, b: &ColorHistogram) -> HistMatchResult<f64> {
    Euclidean::distance(a, b)
}

pub(crate) fn ensure_same_len(a: &ColorHistogram, b: &ColorHistogram) -> HistMatchResult<()> {
    if a.len() != b.len() {
        return Err(HistMatchError::SignatureMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }
    Ok(())
}

fn euclidean_counts(a: &[u64], b: &[u64]) -> f64 {
    let sum_sq: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| {
            let diff = x.abs_diff(y) as f64;
            diff * diff
        })
        .sum();
    sum_sq.sqrt()
}

pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;
