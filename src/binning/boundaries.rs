//! Bucket boundary lists and interval assignment.
//!
//! A boundary list is an ordered sequence of cut points defining half-open
//! intervals `(lo, hi]`. Values are assigned to buckets by interval
//! membership; the first cut sits slightly below the observed minimum so the
//! minimum itself lands inside bucket 0.

use serde::{Deserialize, Serialize};

use crate::error::BinError;

/// Margin subtracted from the observed minimum so it falls inside the first
/// interval.
pub(crate) const EDGE_MARGIN: f64 = 0.01;

/// Ordered cut points over a numeric column.
///
/// Invariants: cuts are strictly increasing and there are at least two of
/// them, so `bucket_count() >= 1`. Boundary lists are immutable once built;
/// merge steps produce a new list via [`BinBoundaries::with_cut_removed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinBoundaries {
    cuts: Vec<f64>,
}

impl BinBoundaries {
    /// Build a boundary list from raw cut points, validating the invariants.
    pub fn from_cuts(cuts: Vec<f64>) -> Result<Self, BinError> {
        if cuts.len() < 2 {
            return Err(BinError::EmptyColumn);
        }
        if cuts.windows(2).any(|w| w[0] >= w[1]) {
            return Err(BinError::UnsortedBoundaries);
        }
        Ok(Self { cuts })
    }

    /// Build the initial boundary list for an ordered column: one cut per
    /// distinct observed value, preceded by a cut just below the minimum.
    pub fn from_distinct_values(values: &[f64]) -> Result<Self, BinError> {
        let mut distinct: Vec<f64> = values.to_vec();
        distinct.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        distinct.dedup();
        if distinct.is_empty() {
            return Err(BinError::EmptyColumn);
        }
        let mut cuts = Vec::with_capacity(distinct.len() + 1);
        cuts.push(distinct[0] - EDGE_MARGIN);
        cuts.extend(distinct);
        Ok(Self { cuts })
    }

    /// The raw cut points.
    pub fn cuts(&self) -> &[f64] {
        &self.cuts
    }

    /// Number of buckets defined by this list: `len(cuts) - 1`.
    pub fn bucket_count(&self) -> usize {
        self.cuts.len() - 1
    }

    /// Bucket index for a value by `(lo, hi]` membership, or `None` when the
    /// value lies outside every interval.
    pub fn bucket_of(&self, value: f64) -> Option<usize> {
        self.cuts
            .windows(2)
            .position(|w| value > w[0] && value <= w[1])
    }

    /// Assign every value to its bucket index.
    pub fn assign(&self, values: &[f64]) -> Vec<Option<usize>> {
        values.iter().map(|&v| self.bucket_of(v)).collect()
    }

    /// Per-bucket population counts for a column.
    pub fn population(&self, values: &[f64]) -> Vec<usize> {
        let mut counts = vec![0usize; self.bucket_count()];
        for &v in values {
            if let Some(idx) = self.bucket_of(v) {
                counts[idx] += 1;
            }
        }
        counts
    }

    /// A new boundary list with the cut at `idx` removed, merging the two
    /// buckets it separated. `idx` must be an interior index.
    pub fn with_cut_removed(&self, idx: usize) -> Self {
        debug_assert!(idx > 0 && idx < self.cuts.len() - 1);
        let mut cuts = self.cuts.clone();
        cuts.remove(idx);
        Self { cuts }
    }
}
