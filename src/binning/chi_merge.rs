//! Chi-square bucket merging.
//!
//! Merges the pair of adjacent buckets whose label distributions are least
//! distinguishable (lowest Pearson chi-square statistic) until the bucket
//! count is within target and the layout is monotonic.

use log::debug;

use super::boundaries::BinBoundaries;
use super::monotonic::judge_monotonic;
use crate::error::BinError;

/// Merge buckets by chi-square until `target_count` is reached and the
/// per-bucket response rates are monotonic.
///
/// The loop always performs at least one merge, then keeps merging while the
/// bucket count exceeds `target_count` or the latest monotonicity check
/// failed. Each pass scores every strictly-interior boundary by the Pearson
/// chi-square statistic of the 2x2 contingency table over its two adjacent
/// buckets and removes the lowest-scoring one (first occurrence wins ties).
///
/// Running out of interior boundaries before the exit condition is met
/// surfaces [`BinError::TargetInfeasible`] instead of looping; every pass
/// removes a cut, so the merge count is structurally bounded.
pub fn merge_by_chi_square(
    values: &[f64],
    labels: &[u8],
    boundaries: &BinBoundaries,
    target_count: usize,
) -> Result<BinBoundaries, BinError> {
    if target_count < 1 {
        return Err(BinError::InvalidTargetCount(target_count));
    }
    if values.len() != labels.len() {
        return Err(BinError::LengthMismatch {
            values: values.len(),
            labels: labels.len(),
        });
    }

    let mut bounds = boundaries.clone();
    let mut merges = 0usize;

    loop {
        let cuts = bounds.cuts();
        // Strictly interior cuts only: never score the two end boundaries.
        if cuts.len() < 3 {
            return Err(BinError::TargetInfeasible {
                target: target_count,
                merges,
            });
        }

        let mut min_idx = 1;
        let mut min_chi2 = f64::INFINITY;
        for idx in 1..cuts.len() - 1 {
            let chi2 = adjacent_chi_square(values, labels, cuts, idx);
            if chi2 < min_chi2 {
                min_chi2 = chi2;
                min_idx = idx;
            }
        }

        debug!(
            "chi-square merge: dropping cut {} (chi2 = {:.6})",
            min_idx, min_chi2
        );
        bounds = bounds.with_cut_removed(min_idx);
        merges += 1;

        let monotonic = judge_monotonic(values, labels, &bounds);
        if bounds.bucket_count() <= target_count && monotonic.holds() {
            debug!("chi-square merge done: monotonicity is {}", monotonic);
            return Ok(bounds);
        }
    }
}

/// Pearson chi-square statistic for the 2x2 table formed by the two buckets
/// adjacent to interior cut `idx` against the binary label.
///
/// Degenerate tables (an empty row or column) carry no evidence either way
/// and score 0.0, the weakest possible signal, so the merge loop keeps
/// progressing.
fn adjacent_chi_square(values: &[f64], labels: &[u8], cuts: &[f64], idx: usize) -> f64 {
    let lo = cuts[idx - 1];
    let mid = cuts[idx];
    let hi = cuts[idx + 1];

    // observed[row][col]: row = left/right bucket, col = label 0/1
    let mut observed = [[0.0f64; 2]; 2];
    for (&v, &y) in values.iter().zip(labels.iter()) {
        if v > lo && v <= hi {
            let row = usize::from(v > mid);
            observed[row][y as usize] += 1.0;
        }
    }

    pearson_chi_square(&observed)
}

/// Standard Pearson statistic of independence for a 2x2 contingency table,
/// without continuity correction.
fn pearson_chi_square(observed: &[[f64; 2]; 2]) -> f64 {
    let row_totals = [
        observed[0][0] + observed[0][1],
        observed[1][0] + observed[1][1],
    ];
    let col_totals = [
        observed[0][0] + observed[1][0],
        observed[0][1] + observed[1][1],
    ];
    let grand_total: f64 = row_totals.iter().sum();

    if grand_total == 0.0
        || row_totals.iter().any(|&t| t == 0.0)
        || col_totals.iter().any(|&t| t == 0.0)
    {
        return 0.0;
    }

    let mut statistic = 0.0;
    for (r, &row_total) in row_totals.iter().enumerate() {
        for (c, &col_total) in col_totals.iter().enumerate() {
            let expected = row_total * col_total / grand_total;
            let delta = observed[r][c] - expected;
            statistic += delta * delta / expected;
        }
    }
    statistic
}
