//! Binning for unordered categorical columns.
//!
//! High-cardinality unordered columns are reduced in two stages: long-tail
//! grouping collapses rare categories into a single "other" group, and when
//! the cardinality is still too high the categories are recoded to a
//! supervised log-odds score ("bin counting"), turning the column into a
//! continuous feature.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::BinError;

/// Reserved fallback key resolving raw values unseen at fit time.
pub const OTHER_KEY: &str = "other";

/// Smoothing constant in the log-odds score, avoiding division by zero.
const LOG_ODDS_EPSILON: f64 = 1.0e-5;

/// Configuration for unordered-category binning.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UnorderedConfig {
    /// Columns with at most this many distinct values pass through untouched;
    /// after grouping, more than this many kept categories triggers the
    /// log-odds recoding.
    pub box_threshold: usize,
    /// Cumulative frequency share at which the long tail is cut off.
    pub ratio_threshold: f64,
}

impl Default for UnorderedConfig {
    fn default() -> Self {
        Self {
            box_threshold: 5,
            ratio_threshold: 0.95,
        }
    }
}

/// A fitted mapping from raw category values to their encoded form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CategoryMap {
    /// Cardinality was within threshold; the column passes through unchanged.
    Identity,
    /// Long-tail grouping: raw category to kept category label, with an
    /// `"other"` entry absorbing the tail.
    Grouped(HashMap<String, String>),
    /// Supervised log-odds recoding: raw category to `ln((pos + eps) / (neg + eps))`.
    LogOdds(HashMap<String, f64>),
}

/// A column encoded by [`CategoryMap::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedColumn {
    /// Category labels (identity or grouped mapping).
    Labels(Vec<String>),
    /// Continuous log-odds scores (bin counting).
    Scores(Vec<f64>),
}

impl CategoryMap {
    /// Apply the mapping to a column.
    ///
    /// Raw values without an explicit entry resolve through the `"other"`
    /// key; applying a map with no `"other"` entry to an unseen value is a
    /// configuration error, never a silent default.
    pub fn apply(&self, values: &[&str]) -> Result<EncodedColumn, BinError> {
        match self {
            CategoryMap::Identity => Ok(EncodedColumn::Labels(
                values.iter().map(|v| v.to_string()).collect(),
            )),
            CategoryMap::Grouped(mapping) => {
                let labels = values
                    .iter()
                    .map(|v| resolve(mapping, v).cloned())
                    .collect::<Result<_, _>>()?;
                Ok(EncodedColumn::Labels(labels))
            }
            CategoryMap::LogOdds(scores) => {
                let scores = values
                    .iter()
                    .map(|v| resolve(scores, v).copied())
                    .collect::<Result<_, _>>()?;
                Ok(EncodedColumn::Scores(scores))
            }
        }
    }
}

fn resolve<'a, T>(map: &'a HashMap<String, T>, raw: &str) -> Result<&'a T, BinError> {
    map.get(raw)
        .or_else(|| map.get(OTHER_KEY))
        .ok_or_else(|| BinError::MissingOtherFallback(raw.to_string()))
}

/// Fit an unordered-category binning against a binary label.
///
/// Columns with at most `box_threshold` distinct values need no reduction
/// and map to [`CategoryMap::Identity`]. Otherwise categories are sorted by
/// descending frequency and accumulated until the cumulative share reaches
/// `ratio_threshold`; the category whose addition crosses the threshold is
/// the last kept singleton and also labels the `"other"` group that absorbs
/// every remaining category. If the grouped map still carries more than
/// `box_threshold + 1` entries, the grouping is replaced by a log-odds
/// recoding computed per grouped label and fanned back out to the raw keys.
pub fn bin_unordered(
    values: &[&str],
    labels: &[u8],
    config: &UnorderedConfig,
) -> Result<CategoryMap, BinError> {
    if config.ratio_threshold <= 0.0 || config.ratio_threshold > 1.0 {
        return Err(BinError::InvalidRatioThreshold(config.ratio_threshold));
    }
    if values.len() != labels.len() {
        return Err(BinError::LengthMismatch {
            values: values.len(),
            labels: labels.len(),
        });
    }
    if labels.iter().any(|&y| y > 1) {
        return Err(BinError::NonBinaryLabel);
    }
    if values.is_empty() {
        return Err(BinError::EmptyColumn);
    }

    let mut frequencies: HashMap<&str, usize> = HashMap::new();
    for &v in values {
        *frequencies.entry(v).or_insert(0) += 1;
    }
    if frequencies.len() <= config.box_threshold {
        return Ok(CategoryMap::Identity);
    }

    let mapping = long_tail_grouping(&frequencies, values.len(), config.ratio_threshold);
    debug!(
        "long-tail grouping kept {} of {} categories",
        mapping.len() - usize::from(mapping.contains_key(OTHER_KEY)),
        frequencies.len()
    );

    if mapping.len() > config.box_threshold + 1 {
        debug!("cardinality still above threshold, recoding to log-odds scores");
        return Ok(CategoryMap::LogOdds(log_odds_recoding(
            values, labels, &mapping,
        )?));
    }
    Ok(CategoryMap::Grouped(mapping))
}

/// Collapse the low-frequency tail of a column into a single `"other"` group.
///
/// Categories are visited in descending frequency order (ties broken by
/// category value so the outcome is deterministic). Every category up to and
/// including the one whose share pushes the running total past
/// `ratio_threshold` keeps its own label; that crossing category's label is
/// reused for the `"other"` group. When the final category is itself the
/// crossing one there is no tail left and no `"other"` entry is produced.
fn long_tail_grouping(
    frequencies: &HashMap<&str, usize>,
    total: usize,
    ratio_threshold: f64,
) -> HashMap<String, String> {
    let mut ordered: Vec<(&str, usize)> = frequencies.iter().map(|(&v, &n)| (v, n)).collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut mapping = HashMap::new();
    let mut cumulative = 0.0;
    for (i, (category, count)) in ordered.iter().enumerate() {
        mapping.insert(category.to_string(), category.to_string());
        cumulative += *count as f64 / total as f64;
        if cumulative >= ratio_threshold {
            // Only carry an "other" entry when a tail actually remains.
            if i + 1 < ordered.len() {
                mapping.insert(OTHER_KEY.to_string(), category.to_string());
            }
            break;
        }
    }
    mapping
}

/// Supervised log-odds recoding of a grouped column.
///
/// Scores are computed per grouped label over the whole column, then every
/// raw key of the grouping (including `"other"`) maps to its group's score.
fn log_odds_recoding(
    values: &[&str],
    labels: &[u8],
    mapping: &HashMap<String, String>,
) -> Result<HashMap<String, f64>, BinError> {
    // Event / non-event counts per grouped label
    let mut counts: HashMap<&str, (f64, f64)> = HashMap::new();
    for (&raw, &y) in values.iter().zip(labels.iter()) {
        let group = resolve(mapping, raw)?;
        let entry = counts.entry(group.as_str()).or_insert((0.0, 0.0));
        if y == 1 {
            entry.0 += 1.0;
        } else {
            entry.1 += 1.0;
        }
    }

    let score_of = |group: &str| -> f64 {
        let (events, non_events) = counts.get(group).copied().unwrap_or((0.0, 0.0));
        ((events + LOG_ODDS_EPSILON) / (non_events + LOG_ODDS_EPSILON)).ln()
    };

    Ok(mapping
        .iter()
        .map(|(raw, group)| (raw.clone(), score_of(group)))
        .collect())
}
