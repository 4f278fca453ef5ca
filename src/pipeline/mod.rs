//! Pipeline module - DataFrame-level orchestration of the column transforms

pub mod compress;
pub mod dataset;
pub mod derive;
pub mod fillna;
pub mod screen;

pub use compress::*;
pub use dataset::*;
pub use derive::*;
pub use fillna::*;
pub use screen::*;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::binning::{
    bin_continuous, bin_ordered, bin_unordered, CategoryMap, EncodedColumn, OrderedBins,
    UnorderedConfig,
};
use crate::error::BinError;

/// Tolerance for floating point comparison when checking binary 0/1 labels
const TOLERANCE: f64 = 1e-9;

/// Label substituted for missing values in categorical columns, so the
/// missing group participates in long-tail grouping and bin counting.
pub const MISSING_LABEL: &str = "MISSING";

/// Configuration for fitting the binning engine across a DataFrame.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BinningConfig {
    /// Number of equal-frequency pre-buckets for continuous columns
    pub pre_bins: usize,
    /// Target number of buckets after merging
    pub target_bins: usize,
    /// Unordered-category settings
    pub unordered: UnorderedConfig,
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self {
            pre_bins: 20,
            target_bins: 5,
            unordered: UnorderedConfig::default(),
        }
    }
}

impl BinningConfig {
    fn validate(&self) -> Result<(), BinError> {
        if self.target_bins < 1 {
            return Err(BinError::InvalidTargetCount(self.target_bins));
        }
        if self.pre_bins < 1 {
            return Err(BinError::InvalidTargetCount(self.pre_bins));
        }
        let ratio = self.unordered.ratio_threshold;
        if ratio <= 0.0 || ratio > 1.0 {
            return Err(BinError::InvalidRatioThreshold(ratio));
        }
        Ok(())
    }
}

/// A fitted, persistable encoding for one column.
///
/// Serializes to JSON as either a boundary list or a category map and can be
/// reapplied to new data with the same semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnEncoding {
    /// Bucket boundaries for continuous and ordered discrete columns
    Bins(OrderedBins),
    /// Category mapping for unordered columns
    Categories(CategoryMap),
}

/// A column name together with its fitted encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedColumn {
    pub name: String,
    pub encoding: ColumnEncoding,
}

/// Extract a binary label column as 0/1 values.
///
/// Handles integer and float storage uniformly; any null or non-binary
/// entry is an error.
pub fn extract_labels(df: &DataFrame, target: &str) -> Result<Vec<u8>> {
    let target_col = df
        .column(target)
        .with_context(|| format!("Target column '{}' not found", target))?;

    if target_col.len() == 0 {
        anyhow::bail!("Target column '{}' is empty", target);
    }

    let float_col = target_col
        .cast(&DataType::Float64)
        .with_context(|| format!("Target column '{}' must be numeric", target))?;

    float_col
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            Some(v) if (v - 0.0).abs() < TOLERANCE => Ok(0u8),
            Some(v) if (v - 1.0).abs() < TOLERANCE => Ok(1u8),
            Some(v) => anyhow::bail!(
                "Target column '{}' must be binary (0/1). Found {} at row {}",
                target,
                v,
                row
            ),
            None => anyhow::bail!("Target column '{}' is null at row {}", target, row),
        })
        .collect()
}

/// Fit the binning engine over every feature column of a DataFrame.
///
/// Float columns run through the continuous pipeline, integer columns
/// through the ordered-category pipeline, and string/categorical columns
/// through the unordered-category pipeline (with nulls mapped to
/// [`MISSING_LABEL`]). Columns are fitted in parallel; columns that cannot
/// be fitted (e.g. all null) are skipped with a warning.
pub fn fit_columns(
    df: &DataFrame,
    target: &str,
    config: &BinningConfig,
) -> Result<Vec<FittedColumn>> {
    config.validate()?;
    let labels = Arc::new(extract_labels(df, target)?);

    let feature_cols: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|col| col.name() != target && is_supported_dtype(col.dtype()))
        .map(|col| col.name().to_string())
        .collect();

    if feature_cols.is_empty() {
        return Ok(Vec::new());
    }

    // Create progress bar
    let pb = ProgressBar::new(feature_cols.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("   Fitting bins [{bar:40.cyan/blue}] {pos}/{len} columns ({percent}%) [{eta}]")
            .unwrap()
            .progress_chars("=>-"),
    );
    let progress_counter = Arc::new(AtomicU64::new(0));

    let fitted: Vec<FittedColumn> = feature_cols
        .par_iter()
        .filter_map(|col_name| {
            let result = fit_single_column(df, col_name, &labels, config);

            let count = progress_counter.fetch_add(1, Ordering::Relaxed);
            if count % 10 == 0 || count == (feature_cols.len() as u64 - 1) {
                pb.set_position(count + 1);
            }

            match result {
                Ok(encoding) => Some(FittedColumn {
                    name: col_name.clone(),
                    encoding,
                }),
                Err(err) => {
                    log::warn!("skipping column '{}': {:#}", col_name, err);
                    None
                }
            }
        })
        .collect();

    pb.finish_with_message(format!("   [OK] Fitted {} columns", fitted.len()));

    Ok(fitted)
}

/// Apply fitted encodings, producing a DataFrame where every fitted column
/// is replaced by its bucket indices or encoded values.
pub fn apply_encodings(df: &DataFrame, fitted: &[FittedColumn]) -> Result<DataFrame> {
    let by_name: std::collections::HashMap<&str, &ColumnEncoding> = fitted
        .iter()
        .map(|f| (f.name.as_str(), &f.encoding))
        .collect();

    let columns: Vec<Column> = df
        .get_columns()
        .iter()
        .map(|col| match by_name.get(col.name().as_str()) {
            Some(encoding) => apply_to_column(col, encoding),
            None => Ok(col.clone()),
        })
        .collect::<Result<_>>()?;

    DataFrame::new(columns).context("Failed to assemble transformed DataFrame")
}

fn is_supported_dtype(dtype: &DataType) -> bool {
    dtype.is_primitive_numeric() || matches!(dtype, DataType::String | DataType::Categorical(_, _))
}

fn fit_single_column(
    df: &DataFrame,
    col_name: &str,
    labels: &[u8],
    config: &BinningConfig,
) -> Result<ColumnEncoding> {
    let col = df.column(col_name)?;
    let dtype = col.dtype().clone();

    let encoding = if dtype.is_float() {
        let values = numeric_values(col)?;
        ColumnEncoding::Bins(
            bin_continuous(&values, labels, config.pre_bins, config.target_bins)
                .with_context(|| format!("Failed to bin continuous column '{}'", col_name))?,
        )
    } else if dtype.is_primitive_numeric() {
        let values = numeric_values(col)?;
        ColumnEncoding::Bins(
            bin_ordered(&values, labels, config.target_bins)
                .with_context(|| format!("Failed to bin ordered column '{}'", col_name))?,
        )
    } else {
        let values = categorical_values(col)?;
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        ColumnEncoding::Categories(
            bin_unordered(&refs, labels, &config.unordered)
                .with_context(|| format!("Failed to bin unordered column '{}'", col_name))?,
        )
    };

    Ok(encoding)
}

fn apply_to_column(col: &Column, encoding: &ColumnEncoding) -> Result<Column> {
    let name = col.name().clone();
    match encoding {
        ColumnEncoding::Bins(bins) => {
            let values = numeric_values(col)?;
            let assigned: Vec<Option<u32>> = bins
                .assign(&values)
                .into_iter()
                .map(|b| b.map(|idx| idx as u32))
                .collect();
            Ok(Column::new(name, assigned))
        }
        ColumnEncoding::Categories(map) => {
            let values = categorical_values(col)?;
            let refs: Vec<&str> = values.iter().map(String::as_str).collect();
            match map.apply(&refs)? {
                EncodedColumn::Labels(labels) => Ok(Column::new(name, labels)),
                EncodedColumn::Scores(scores) => Ok(Column::new(name, scores)),
            }
        }
    }
}

/// Column values as optional floats, nulls preserved.
pub(crate) fn numeric_values(col: &Column) -> Result<Vec<Option<f64>>> {
    let float_col = col.cast(&DataType::Float64)?;
    Ok(float_col.f64()?.into_iter().collect())
}

/// Column values as strings, nulls mapped to [`MISSING_LABEL`].
pub(crate) fn categorical_values(col: &Column) -> Result<Vec<String>> {
    let string_col = col.cast(&DataType::String)?;
    Ok(string_col
        .str()?
        .into_iter()
        .map(|v| v.map_or_else(|| MISSING_LABEL.to_string(), str::to_string))
        .collect())
}
