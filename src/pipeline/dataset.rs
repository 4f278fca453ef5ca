//! Dataset assembly: loading feature/label tables and joining them by key.

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

/// Load a CSV file into an in-memory DataFrame.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    LazyCsvReader::new(path)
        .finish()
        .with_context(|| format!("Failed to load CSV file: {}", path.display()))?
        .collect()
        .with_context(|| format!("Failed to materialize CSV file: {}", path.display()))
}

/// Left-join per-period feature tables onto a base (label) table by key.
///
/// Every row of the base table is kept; feature rows without a matching key
/// contribute nulls, which downstream transforms treat as missing values.
pub fn merge_features(base: &DataFrame, features: &[DataFrame], key: &str) -> Result<DataFrame> {
    base.column(key)
        .with_context(|| format!("Join key '{}' not found in base table", key))?;

    let mut merged = base.clone().lazy();
    for (i, feature_df) in features.iter().enumerate() {
        feature_df
            .column(key)
            .with_context(|| format!("Join key '{}' not found in feature table {}", key, i))?;
        merged = merged.join(
            feature_df.clone().lazy(),
            [col(key)],
            [col(key)],
            JoinArgs::new(JoinType::Left),
        );
    }

    merged
        .collect()
        .context("Failed to merge feature tables onto base table")
}

/// Count label occurrences in a binary target column.
///
/// Returns `(non_event_count, event_count)`.
pub fn label_counts(df: &DataFrame, target: &str) -> Result<(usize, usize)> {
    let labels = super::extract_labels(df, target)?;
    let events = labels.iter().filter(|&&y| y == 1).count();
    Ok((labels.len() - events, events))
}
