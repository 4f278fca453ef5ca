//! The binning engine.
//!
//! Converts continuous and categorical columns into a small number of
//! ordered buckets while preserving (or repairing) the monotonic association
//! between bucket order and a binary outcome label. The engine is pure: the
//! reducers consume value and label slices and emit new boundary or mapping
//! structures, never touching I/O or shared state, so callers are free to
//! fit many columns in parallel.

mod boundaries;
mod chi_merge;
mod count_merge;
mod monotonic;
mod ordered;
mod unordered;

pub use boundaries::BinBoundaries;
pub use chi_merge::merge_by_chi_square;
pub use count_merge::merge_by_count;
pub use monotonic::{judge_monotonic, Monotonicity};
pub use ordered::{bin_continuous, bin_ordered, OrderedBins};
pub use unordered::{bin_unordered, CategoryMap, EncodedColumn, UnorderedConfig, OTHER_KEY};
