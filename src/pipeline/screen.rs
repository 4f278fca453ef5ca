//! Column screening: saturation and dominant-value analysis.
//!
//! Flags columns that carry too little information to be worth transforming:
//! mostly-missing columns and columns dominated by a single value.

use anyhow::Result;
use polars::prelude::*;
use std::collections::HashMap;

/// Saturation (non-null ratio) of every column, sorted ascending so the
/// emptiest columns come first.
pub fn saturation_ratios(df: &DataFrame) -> Result<Vec<(String, f64)>> {
    if df.height() == 0 {
        return Ok(Vec::new());
    }

    let mut ratios: Vec<(String, f64)> = df
        .get_columns()
        .iter()
        .map(|col| {
            let filled = col.len() - col.null_count();
            (col.name().to_string(), filled as f64 / col.len() as f64)
        })
        .collect();

    ratios.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    Ok(ratios)
}

/// Columns whose saturation falls below `threshold`, excluding the target.
pub fn columns_below_saturation(
    ratios: &[(String, f64)],
    threshold: f64,
    target_column: &str,
) -> Vec<String> {
    ratios
        .iter()
        .filter(|(name, ratio)| *ratio < threshold && name != target_column)
        .map(|(name, _)| name.clone())
        .collect()
}

/// Share of the single most frequent non-null value in every column, sorted
/// descending so the most degenerate columns come first.
pub fn dominant_value_shares(df: &DataFrame) -> Result<Vec<(String, f64)>> {
    if df.height() == 0 {
        return Ok(Vec::new());
    }

    let mut shares: Vec<(String, f64)> = Vec::with_capacity(df.width());
    for col in df.get_columns() {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for value in col.as_materialized_series().iter() {
            if !value.is_null() {
                *counts.entry(value.to_string()).or_insert(0) += 1;
            }
        }
        let top = counts.values().max().copied().unwrap_or(0);
        shares.push((col.name().to_string(), top as f64 / col.len() as f64));
    }

    shares.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    Ok(shares)
}

/// Columns where a single value exceeds `threshold` of the rows, excluding
/// the target.
pub fn columns_with_dominant_value(
    shares: &[(String, f64)],
    threshold: f64,
    target_column: &str,
) -> Vec<String> {
    shares
        .iter()
        .filter(|(name, share)| *share > threshold && name != target_column)
        .map(|(name, _)| name.clone())
        .collect()
}
