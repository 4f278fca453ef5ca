//! Count-based bucket merging.
//!
//! Repeatedly folds the smallest-population bucket into one of its neighbors
//! until the target bucket count is reached. Which neighbor absorbs the
//! bucket depends on position and on the neighbors' own populations.

use log::debug;

use super::boundaries::BinBoundaries;
use crate::error::BinError;

/// Merge buckets by population until exactly `target_count` remain.
///
/// Each pass finds the bucket with the globally smallest population (first
/// occurrence wins on ties) and removes one boundary next to it:
///
/// - the first bucket merges forward into its right neighbor,
/// - the last bucket merges backward into its left neighbor,
/// - an interior bucket merges toward whichever neighbor yields the smaller
///   combined population, merging forward on ties.
///
/// Columns with fewer distinct buckets than `target_count` are returned
/// unchanged. `target_count` must be at least 1.
pub fn merge_by_count(
    values: &[f64],
    boundaries: &BinBoundaries,
    target_count: usize,
) -> Result<BinBoundaries, BinError> {
    if target_count < 1 {
        return Err(BinError::InvalidTargetCount(target_count));
    }

    let mut bounds = boundaries.clone();
    while bounds.bucket_count() > target_count {
        // counts[i] is the population of the bucket left of cut i + 1
        let counts = bounds.population(values);
        let min_bucket = counts
            .iter()
            .enumerate()
            .min_by_key(|(_, &c)| c)
            .map(|(i, _)| i)
            .expect("loop guard ensures at least two buckets");
        // Cut index whose left bucket is the smallest
        let min_idx = min_bucket + 1;
        let last_idx = bounds.cuts().len() - 1;

        let drop_idx = if min_idx == 1 {
            min_idx
        } else if min_idx == last_idx {
            min_idx - 1
        } else if counts[min_bucket - 1] < counts[min_bucket + 1] {
            // Merging backward gives the smaller combined bucket
            min_idx - 1
        } else {
            min_idx
        };

        debug!(
            "count merge: bucket {} (population {}) absorbed via cut {}",
            min_bucket, counts[min_bucket], drop_idx
        );
        bounds = bounds.with_cut_removed(drop_idx);
    }

    Ok(bounds)
}
