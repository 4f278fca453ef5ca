//! Binning for ordered discrete and continuous columns.
//!
//! Ordered discrete columns start from one bucket per distinct value and are
//! reduced by count merging, falling back to chi-square merging when the
//! count-merged layout is not monotonic. Continuous columns are first
//! quantile-cut into equal-frequency pre-buckets and then flow through the
//! same pipeline, so both column kinds share one merge machinery.

use log::debug;
use serde::{Deserialize, Serialize};

use super::boundaries::{BinBoundaries, EDGE_MARGIN};
use super::chi_merge::merge_by_chi_square;
use super::count_merge::merge_by_count;
use super::monotonic::judge_monotonic;
use crate::error::BinError;

/// A fitted ordered binning: value-domain boundaries plus an optional
/// dedicated bucket for missing values.
///
/// When `missing_bin` is set, missing values occupy bucket 0 and every
/// real-value bucket shifts up by one. Missingness is carried as an explicit
/// marker rather than an in-band sentinel value, so no representable real
/// number is reserved for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedBins {
    pub boundaries: BinBoundaries,
    pub missing_bin: bool,
}

impl OrderedBins {
    /// Total bucket count, including the missing bucket when present.
    pub fn bucket_count(&self) -> usize {
        self.boundaries.bucket_count() + usize::from(self.missing_bin)
    }

    /// Assign each value to its bucket index.
    ///
    /// Missing values map to bucket 0 when a missing bucket was fitted, and
    /// to `None` otherwise. Non-missing values outside the boundary range
    /// also map to `None`.
    pub fn assign(&self, values: &[Option<f64>]) -> Vec<Option<usize>> {
        let offset = usize::from(self.missing_bin);
        values
            .iter()
            .map(|v| match v {
                None if self.missing_bin => Some(0),
                None => None,
                Some(v) => self.boundaries.bucket_of(*v).map(|b| b + offset),
            })
            .collect()
    }
}

/// Bin an ordered discrete column against a binary label.
///
/// Builds one bucket per distinct value, shrinks to `target_count` by count
/// merging, and, if the result is not monotonic, redoes the reduction with
/// chi-square merging starting from the initial one-bucket-per-value
/// layout.
///
/// When the column contains missing values they are carved out first: the
/// real values are binned against a target reduced by one and the missing
/// values receive dedicated bucket 0, so `target_count` must be at least 2
/// in that case.
pub fn bin_ordered(
    values: &[Option<f64>],
    labels: &[u8],
    target_count: usize,
) -> Result<OrderedBins, BinError> {
    let (dense, dense_labels, missing_bin) = split_missing(values, labels, target_count)?;
    let boundaries = bin_ordered_dense(&dense, &dense_labels, effective_target(target_count, missing_bin))?;
    Ok(OrderedBins {
        boundaries,
        missing_bin,
    })
}

/// Bin a continuous column against a binary label.
///
/// The column is first cut into `pre_bins` equal-frequency pre-buckets
/// (duplicate quantile edges dropped), the pre-bucket indices are binned as
/// an ordered discrete column, and the surviving index cuts are translated
/// back to value-domain edges. Missing values are handled exactly as in
/// [`bin_ordered`].
pub fn bin_continuous(
    values: &[Option<f64>],
    labels: &[u8],
    pre_bins: usize,
    target_count: usize,
) -> Result<OrderedBins, BinError> {
    if pre_bins < 1 {
        return Err(BinError::InvalidTargetCount(pre_bins));
    }
    let (dense, dense_labels, missing_bin) = split_missing(values, labels, target_count)?;

    let edges = quantile_edges(&dense, pre_bins);
    let prebin = BinBoundaries::from_cuts(edges.clone())?;
    let indices: Vec<f64> = dense
        .iter()
        .map(|&v| {
            prebin
                .bucket_of(v)
                .expect("edges span all observed values") as f64
        })
        .collect();

    let index_cuts = bin_ordered_dense(
        &indices,
        &dense_labels,
        effective_target(target_count, missing_bin),
    )?;

    // Translate surviving index cuts back to value-domain edges: index i
    // maps to the upper edge of pre-bucket i.
    let mut cuts = Vec::with_capacity(index_cuts.cuts().len());
    cuts.push(edges[0]);
    for &c in &index_cuts.cuts()[1..] {
        cuts.push(edges[c.round() as usize + 1]);
    }

    Ok(OrderedBins {
        boundaries: BinBoundaries::from_cuts(cuts)?,
        missing_bin,
    })
}

/// Count merge with chi-square fallback over a dense (no-missing) column.
fn bin_ordered_dense(
    values: &[f64],
    labels: &[u8],
    target_count: usize,
) -> Result<BinBoundaries, BinError> {
    let initial = BinBoundaries::from_distinct_values(values)?;
    let merged = merge_by_count(values, &initial, target_count)?;

    let monotonic = judge_monotonic(values, labels, &merged);
    if monotonic.holds() {
        debug!("count merge accepted: monotonicity is {}", monotonic);
        return Ok(merged);
    }

    // Count-merged layout broke monotonicity: discard it and re-reduce from
    // the untouched initial boundaries with the chi-square strategy.
    debug!("count merge is non-monotonic, falling back to chi-square merge");
    merge_by_chi_square(values, labels, &initial, target_count)
}

/// Validate inputs and partition out missing values.
fn split_missing(
    values: &[Option<f64>],
    labels: &[u8],
    target_count: usize,
) -> Result<(Vec<f64>, Vec<u8>, bool), BinError> {
    if target_count < 1 {
        return Err(BinError::InvalidTargetCount(target_count));
    }
    if values.len() != labels.len() {
        return Err(BinError::LengthMismatch {
            values: values.len(),
            labels: labels.len(),
        });
    }
    if labels.iter().any(|&y| y > 1) {
        return Err(BinError::NonBinaryLabel);
    }

    let mut dense = Vec::with_capacity(values.len());
    let mut dense_labels = Vec::with_capacity(values.len());
    let mut missing_bin = false;
    for (v, &y) in values.iter().zip(labels.iter()) {
        match v {
            Some(v) => {
                dense.push(*v);
                dense_labels.push(y);
            }
            None => missing_bin = true,
        }
    }
    if dense.is_empty() {
        return Err(BinError::EmptyColumn);
    }
    if missing_bin && target_count < 2 {
        // The missing bucket consumes one slot of the target.
        return Err(BinError::InvalidTargetCount(target_count));
    }
    Ok((dense, dense_labels, missing_bin))
}

fn effective_target(target_count: usize, missing_bin: bool) -> usize {
    target_count - usize::from(missing_bin)
}

/// Equal-frequency quantile edges over a column, duplicates dropped, first
/// edge lowered below the minimum.
fn quantile_edges(values: &[f64], pre_bins: usize) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut edges: Vec<f64> = (0..=pre_bins)
        .map(|i| interpolated_quantile(&sorted, i as f64 / pre_bins as f64))
        .collect();
    edges.dedup();
    if edges.len() < 2 {
        // Constant column: keep a single bucket spanning the lone value.
        edges.push(edges[0]);
    }
    edges[0] -= EDGE_MARGIN;
    edges
}

/// Linear-interpolated quantile of a sorted slice.
fn interpolated_quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] + frac * (sorted[hi] - sorted[lo])
    }
}
