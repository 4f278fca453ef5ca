//! Derived-feature generators: date arithmetic, flags, crosses, and ratios.

use chrono::NaiveDate;

/// Smoothing constant keeping ratio features finite on zero denominators.
const RATIO_EPSILON: f64 = 1.0e-4;

/// Days elapsed between each date and `as_of`.
///
/// Missing dates are treated as `as_of` itself and contribute zero days,
/// matching the fill-with-current-date convention for date columns.
pub fn days_since(dates: &[Option<NaiveDate>], as_of: NaiveDate) -> Vec<i64> {
    dates
        .iter()
        .map(|d| (as_of - d.unwrap_or(as_of)).num_days())
        .collect()
}

/// 0/1 flag for whether a value is strictly positive.
pub fn flag_positive(values: &[f64]) -> Vec<u8> {
    values.iter().map(|&v| u8::from(v > 0.0)).collect()
}

/// Cross two categorical columns into a single combined category.
pub fn cross<A: std::fmt::Display, B: std::fmt::Display>(a: &[A], b: &[B]) -> Vec<String> {
    a.iter()
        .zip(b.iter())
        .map(|(a, b)| format!("{}{}", a, b))
        .collect()
}

/// Log of the smoothed ratio between two columns: `ln(a / (b + eps) + eps)`.
pub fn log_ratio(numerator: &[f64], denominator: &[f64]) -> Vec<f64> {
    numerator
        .iter()
        .zip(denominator.iter())
        .map(|(&a, &b)| (a / (b + RATIO_EPSILON) + RATIO_EPSILON).ln())
        .collect()
}

/// Smoothed share of one column in another: `a / (b + eps)`.
pub fn percent(numerator: &[f64], denominator: &[f64]) -> Vec<f64> {
    numerator
        .iter()
        .zip(denominator.iter())
        .map(|(&a, &b)| a / (b + RATIO_EPSILON))
        .collect()
}

/// Row-wise total over a set of columns.
pub fn row_total(columns: &[&[f64]]) -> Vec<f64> {
    let rows = columns.first().map_or(0, |c| c.len());
    (0..rows)
        .map(|i| columns.iter().map(|c| c[i]).sum())
        .collect()
}
