//! Riskprep: Feature Engineering for Credit Scoring
//!
//! A library for preparing tabular credit-scoring data: merging per-period
//! feature tables, compressing outliers, filling missing values, deriving
//! features, and discretizing columns with monotonic binning.

pub mod binning;
pub mod error;
pub mod pipeline;

pub use binning::{
    bin_continuous, bin_ordered, bin_unordered, judge_monotonic, merge_by_chi_square,
    merge_by_count, BinBoundaries, CategoryMap, EncodedColumn, Monotonicity, OrderedBins,
    UnorderedConfig,
};
pub use error::BinError;
