//! Outlier compression: clamping extreme values to mean +- N standard deviations.

use log::debug;
use serde::Serialize;

use crate::error::BinError;

/// Whether clamp bounds stay fractional or are truncated to whole numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClampStyle {
    Float,
    Int,
}

/// Result of compressing a column: the clamped values and the bounds used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressedColumn {
    pub values: Vec<Option<f64>>,
    pub lower: f64,
    pub upper: f64,
    /// Number of samples that were clamped to either bound
    pub clamped: usize,
}

/// Clamp a column to `mean +- n_std * std`, leaving missing values untouched.
///
/// The standard deviation is the sample estimate (n - 1 denominator). With
/// [`ClampStyle::Int`] the bounds are truncated toward zero before clamping,
/// for columns that are integral in nature.
pub fn compress_nstd(
    values: &[Option<f64>],
    n_std: f64,
    style: ClampStyle,
) -> Result<CompressedColumn, BinError> {
    let dense: Vec<f64> = values.iter().filter_map(|v| *v).collect();
    if dense.is_empty() {
        return Err(BinError::EmptyColumn);
    }

    let mean = dense.iter().sum::<f64>() / dense.len() as f64;
    let std = if dense.len() > 1 {
        let var = dense.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (dense.len() - 1) as f64;
        var.sqrt()
    } else {
        0.0
    };

    let (mut lower, mut upper) = (mean - n_std * std, mean + n_std * std);
    if style == ClampStyle::Int {
        lower = lower.trunc();
        upper = upper.trunc();
    }

    let mut clamped = 0usize;
    let compressed = values
        .iter()
        .map(|v| {
            v.map(|v| {
                if v > upper {
                    clamped += 1;
                    upper
                } else if v < lower {
                    clamped += 1;
                    lower
                } else {
                    v
                }
            })
        })
        .collect();

    debug!(
        "compressed {} samples into [{}, {}]",
        clamped, lower, upper
    );

    Ok(CompressedColumn {
        values: compressed,
        lower,
        upper,
        clamped,
    })
}
