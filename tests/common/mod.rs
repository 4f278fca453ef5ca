//! Shared test utilities and fixture generators

use polars::prelude::*;

/// Create a small credit-scoring DataFrame with known characteristics
///
/// This DataFrame includes:
/// - `target`: Binary target column (0/1), risk rising with row index
/// - `balance`: Continuous numeric feature aligned with the target
/// - `age_band`: Ordered discrete feature (four bands)
/// - `region`: Low-cardinality unordered feature
pub fn create_scoring_dataframe() -> DataFrame {
    let n = 40usize;
    let target: Vec<i32> = (0..n).map(|i| i32::from(i >= 20)).collect();
    let balance: Vec<f64> = (0..n).map(|i| i as f64 * 10.0).collect();
    let age_band: Vec<i32> = (0..n).map(|i| (i / 10) as i32 + 1).collect();
    let regions = ["north", "south", "east", "west"];
    let region: Vec<&str> = (0..n).map(|i| regions[i % regions.len()]).collect();

    df! {
        "target" => target,
        "balance" => balance,
        "age_band" => age_band,
        "region" => region,
    }
    .unwrap()
}

/// Create a DataFrame with missing values in both numeric and categorical
/// feature columns
pub fn create_missing_dataframe() -> DataFrame {
    let n = 30usize;
    let target: Vec<i32> = (0..n).map(|i| i32::from(i >= 15)).collect();
    let score: Vec<Option<f64>> = (0..n)
        .map(|i| if i % 10 == 0 { None } else { Some(i as f64) })
        .collect();
    let channel: Vec<Option<&str>> = (0..n)
        .map(|i| if i % 7 == 0 { None } else { Some("branch") })
        .collect();

    df! {
        "target" => target,
        "score" => score,
        "channel" => channel,
    }
    .unwrap()
}

/// Generate a high-cardinality categorical column with a long tail
///
/// Returns `(values, labels)` where three head categories cover 95% of the
/// rows and the remainder is spread over rare categories.
pub fn create_long_tail_column() -> (Vec<String>, Vec<u8>) {
    let mut values: Vec<String> = Vec::new();
    values.extend(std::iter::repeat("a".to_string()).take(50));
    values.extend(std::iter::repeat("b".to_string()).take(30));
    values.extend(std::iter::repeat("c".to_string()).take(15));
    values.extend(std::iter::repeat("d".to_string()).take(5));
    let labels: Vec<u8> = (0..values.len()).map(|i| (i % 2) as u8).collect();
    (values, labels)
}
