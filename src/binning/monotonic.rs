//! Monotonicity oracle for bucketed columns.
//!
//! Classifies the relationship between bucket order and the empirical
//! response rate of a binary label. The merge reducers use this to decide
//! whether a bucket layout is acceptable.

use serde::Serialize;

use super::boundaries::BinBoundaries;

/// Direction of the bucket-to-response relationship.
///
/// `Flat` covers the case where every bucket has the same response rate (the
/// sequence is both non-decreasing and non-increasing). It counts as
/// monotonic: the chi-square merge loop keys its exit on [`Monotonicity::holds`],
/// and a flat sequence must satisfy it or a no-signal column would merge
/// forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Monotonicity {
    /// Response rate never decreases across buckets, and is not constant.
    Increasing,
    /// Response rate never increases across buckets, and is not constant.
    Decreasing,
    /// Response rate is constant across all buckets.
    Flat,
    /// Neither non-decreasing nor non-increasing.
    None,
}

impl Monotonicity {
    /// Whether this outcome satisfies the monotonicity requirement.
    pub fn holds(self) -> bool {
        !matches!(self, Monotonicity::None)
    }
}

impl std::fmt::Display for Monotonicity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Monotonicity::Increasing => write!(f, "increasing"),
            Monotonicity::Decreasing => write!(f, "decreasing"),
            Monotonicity::Flat => write!(f, "flat"),
            Monotonicity::None => write!(f, "none"),
        }
    }
}

/// Judge the monotonicity of per-bucket response rates.
///
/// Bucketizes `values` with `boundaries`, computes the mean of `labels`
/// within each bucket in increasing bucket order, and classifies the
/// resulting rate sequence. Empty buckets contribute no rate and are skipped.
///
/// `values` and `labels` must be row-aligned; values outside the boundary
/// range are ignored, matching interval assignment.
pub fn judge_monotonic(values: &[f64], labels: &[u8], boundaries: &BinBoundaries) -> Monotonicity {
    let rates = bucket_response_rates(values, labels, boundaries);

    let non_decreasing = rates.windows(2).all(|w| w[0] <= w[1]);
    let non_increasing = rates.windows(2).all(|w| w[0] >= w[1]);

    match (non_decreasing, non_increasing) {
        (true, true) => Monotonicity::Flat,
        (true, false) => Monotonicity::Increasing,
        (false, true) => Monotonicity::Decreasing,
        (false, false) => Monotonicity::None,
    }
}

/// Mean label per bucket, in bucket order, skipping empty buckets.
pub(crate) fn bucket_response_rates(
    values: &[f64],
    labels: &[u8],
    boundaries: &BinBoundaries,
) -> Vec<f64> {
    let mut events = vec![0usize; boundaries.bucket_count()];
    let mut totals = vec![0usize; boundaries.bucket_count()];

    for (&v, &y) in values.iter().zip(labels.iter()) {
        if let Some(idx) = boundaries.bucket_of(v) {
            events[idx] += y as usize;
            totals[idx] += 1;
        }
    }

    events
        .iter()
        .zip(totals.iter())
        .filter(|(_, &n)| n > 0)
        .map(|(&e, &n)| e as f64 / n as f64)
        .collect()
}
