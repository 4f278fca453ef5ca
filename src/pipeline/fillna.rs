//! Missing-value filling strategies.
//!
//! Numeric columns can be filled with a caller-chosen constant, the column
//! mean, or the column mode. Categorical columns get a dedicated label so
//! their missing group flows through the unordered binner as a category of
//! its own.

use crate::error::BinError;

/// Fill missing values with a constant; returns the filled column and the
/// fill value used.
pub fn fill_constant(values: &[Option<f64>], fill: f64) -> (Vec<f64>, f64) {
    (values.iter().map(|v| v.unwrap_or(fill)).collect(), fill)
}

/// Fill missing values with the mean of the non-missing values.
pub fn fill_mean(values: &[Option<f64>]) -> Result<(Vec<f64>, f64), BinError> {
    let dense: Vec<f64> = values.iter().filter_map(|v| *v).collect();
    if dense.is_empty() {
        return Err(BinError::EmptyColumn);
    }
    let mean = dense.iter().sum::<f64>() / dense.len() as f64;
    Ok((values.iter().map(|v| v.unwrap_or(mean)).collect(), mean))
}

/// Fill missing values with the mode of the non-missing values.
///
/// The most frequent value wins; equally frequent values tie-break to the
/// smallest, so the result is deterministic.
pub fn fill_mode(values: &[Option<f64>]) -> Result<(Vec<f64>, f64), BinError> {
    let mut dense: Vec<f64> = values.iter().filter_map(|v| *v).collect();
    if dense.is_empty() {
        return Err(BinError::EmptyColumn);
    }
    dense.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    // Longest run in the sorted column; earlier (smaller) runs win ties
    let mut mode = dense[0];
    let mut best_len = 0usize;
    let mut run_start = 0usize;
    for i in 0..=dense.len() {
        if i == dense.len() || dense[i] != dense[run_start] {
            if i - run_start > best_len {
                best_len = i - run_start;
                mode = dense[run_start];
            }
            run_start = i;
        }
    }

    Ok((values.iter().map(|v| v.unwrap_or(mode)).collect(), mode))
}

/// Replace missing categorical values with a dedicated label.
pub fn fill_missing_label(values: &[Option<&str>], label: &str) -> Vec<String> {
    values
        .iter()
        .map(|v| v.unwrap_or(label).to_string())
        .collect()
}
