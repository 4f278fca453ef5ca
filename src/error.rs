//! Error types for the binning engine.

use thiserror::Error;

/// Errors surfaced by the binning engine.
///
/// Configuration violations (bad target counts, out-of-range thresholds) are
/// reported immediately rather than silently coerced.
#[derive(Debug, Error)]
pub enum BinError {
    /// Target bucket count below the minimum of 1.
    #[error("target bucket count must be at least 1, got {0}")]
    InvalidTargetCount(usize),

    /// Ratio threshold outside the half-open interval (0, 1].
    #[error("ratio threshold must lie in (0, 1], got {0}")]
    InvalidRatioThreshold(f64),

    /// Value and label sequences are not row-aligned.
    #[error("values and labels must have the same length ({values} vs {labels})")]
    LengthMismatch { values: usize, labels: usize },

    /// A label other than 0 or 1 was encountered.
    #[error("labels must be binary (0 or 1)")]
    NonBinaryLabel,

    /// No non-missing values were available to bin.
    #[error("column has no non-missing values to bin")]
    EmptyColumn,

    /// Boundary cut points are not strictly increasing.
    #[error("bucket boundaries must be strictly increasing")]
    UnsortedBoundaries,

    /// Chi-square merging ran out of interior boundaries before reaching the
    /// target bucket count with a monotonic layout.
    #[error(
        "target of {target} buckets is unreachable under the monotonicity \
         constraint (stopped after {merges} merges)"
    )]
    TargetInfeasible { target: usize, merges: usize },

    /// A category map without an "other" fallback was applied to an unseen value.
    #[error("category '{0}' has no mapping and the map defines no \"other\" fallback")]
    MissingOtherFallback(String),
}
