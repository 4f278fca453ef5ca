//! Tests for the binning engine against its documented scenarios

mod common;

use riskprep::{
    bin_continuous, bin_ordered, bin_unordered, judge_monotonic, merge_by_chi_square,
    merge_by_count, BinBoundaries, BinError, CategoryMap, EncodedColumn, Monotonicity,
    UnorderedConfig,
};

fn opt(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().map(|&v| Some(v)).collect()
}

/// Per-bucket response rates for asserting monotonic layouts
fn response_rates(values: &[f64], labels: &[u8], bounds: &BinBoundaries) -> Vec<f64> {
    let mut events = vec![0usize; bounds.bucket_count()];
    let mut totals = vec![0usize; bounds.bucket_count()];
    for (&v, &y) in values.iter().zip(labels.iter()) {
        let idx = bounds.bucket_of(v).unwrap();
        events[idx] += y as usize;
        totals[idx] += 1;
    }
    events
        .iter()
        .zip(totals.iter())
        .map(|(&e, &n)| e as f64 / n as f64)
        .collect()
}

#[test]
fn test_count_merge_splits_clean_step_column() {
    // Ten distinct values with labels flipping from 0 to 1 halfway: count
    // merging to two buckets keeps the layout monotonic increasing.
    let values: Vec<f64> = (1..=10).map(|v| v as f64).collect();
    let labels: Vec<u8> = (1..=10).map(|v| u8::from(v > 5)).collect();

    let initial = BinBoundaries::from_distinct_values(&values).unwrap();
    let merged = merge_by_count(&values, &initial, 2).unwrap();

    assert_eq!(merged.bucket_count(), 2);
    assert_eq!(merged.cuts(), &[0.99, 4.0, 10.0]);

    let rates = response_rates(&values, &labels, &merged);
    assert_eq!(rates[0], 0.0);
    assert!((rates[1] - 5.0 / 6.0).abs() < 1e-12);
    assert_eq!(
        judge_monotonic(&values, &labels, &merged),
        Monotonicity::Increasing
    );
}

#[test]
fn test_count_merge_folds_singleton_into_neighbor() {
    // Two initial buckets; the singleton bucket holding the lone 2 merges
    // into its only neighbor, leaving a single bucket.
    let values = [1.0, 1.0, 1.0, 1.0, 2.0];

    let initial = BinBoundaries::from_distinct_values(&values).unwrap();
    assert_eq!(initial.bucket_count(), 2);

    let merged = merge_by_count(&values, &initial, 1).unwrap();
    assert_eq!(merged.bucket_count(), 1);
    assert!(merged.population(&values).iter().sum::<usize>() == 5);
}

#[test]
fn test_count_merge_hits_exact_target_with_enough_values() {
    let values: Vec<f64> = (0..100).map(|v| v as f64).collect();
    let initial = BinBoundaries::from_distinct_values(&values).unwrap();
    for target in [1, 2, 5, 10, 50] {
        let merged = merge_by_count(&values, &initial, target).unwrap();
        assert_eq!(merged.bucket_count(), target);
        assert!(merged.cuts().windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn test_chi_square_merge_guarantees_monotonic_rates() {
    // Sawtooth response by value; chi-square merging must end monotonic.
    let mut values = Vec::new();
    let mut labels = Vec::new();
    for v in 1..=8 {
        for s in 0..4u8 {
            values.push(v as f64);
            labels.push(if v % 2 == 0 { u8::from(s < 3) } else { u8::from(s < 1) });
        }
    }

    let initial = BinBoundaries::from_distinct_values(&values).unwrap();
    let merged = merge_by_chi_square(&values, &labels, &initial, 4).unwrap();

    assert!(merged.bucket_count() <= 4);
    let rates = response_rates(&values, &labels, &merged);
    let non_decreasing = rates.windows(2).all(|w| w[0] <= w[1]);
    let non_increasing = rates.windows(2).all(|w| w[0] >= w[1]);
    assert!(
        non_decreasing || non_increasing,
        "rates {:?} are not monotonic",
        rates
    );
}

#[test]
fn test_ordered_binning_restarts_chi_square_from_initial_boundaries() {
    // Count merging to 3 buckets produces a non-monotonic layout for this
    // column, so the ordered binner falls back to chi-square merging. The
    // fallback works from the full one-bucket-per-value layout and can
    // therefore place cuts the count merge already destroyed.
    let values = opt(&[1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0, 5.0, 5.0, 6.0, 6.0]);
    let labels = [0, 0, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0];
    let bins = bin_ordered(&values, &labels, 3).unwrap();

    let dense: Vec<f64> = values.iter().map(|v| v.unwrap()).collect();
    assert!(bins.bucket_count() <= 3);
    assert!(judge_monotonic(&dense, &labels, &bins.boundaries).holds());
}

#[test]
fn test_flat_response_terminates_merging() {
    // Every value has the same response rate. The flat sequence counts as
    // monotonic, so binning terminates instead of merging forever.
    let values = opt(&[1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0]);
    let labels = [0, 1, 0, 1, 0, 1, 0, 1];
    let bins = bin_ordered(&values, &labels, 2).unwrap();
    assert!(bins.bucket_count() <= 2);

    let dense: Vec<f64> = values.iter().map(|v| v.unwrap()).collect();
    assert_eq!(
        judge_monotonic(&dense, &labels, &bins.boundaries),
        Monotonicity::Flat
    );
}

#[test]
fn test_infeasible_chi_square_target_surfaces_error() {
    // A single interior cut and a forced first merge leave nothing to merge
    // on the second pass; the reducer must fail rather than loop.
    let values = [1.0, 2.0];
    let labels = [1, 0];
    let bounds = BinBoundaries::from_cuts(vec![0.99, 2.0]).unwrap();
    let result = merge_by_chi_square(&values, &labels, &bounds, 1);
    assert!(matches!(result, Err(BinError::TargetInfeasible { .. })));
}

#[test]
fn test_continuous_binning_reapplies_identically() {
    let raw: Vec<f64> = (0..200).map(|i| (i as f64).sqrt() * 3.0).collect();
    let labels: Vec<u8> = (0..200).map(|i| u8::from(i >= 100)).collect();
    let values = opt(&raw);

    let bins = bin_continuous(&values, &labels, 10, 5).unwrap();
    assert!(bins.bucket_count() <= 5);

    // Boundary invariants
    let cuts = bins.boundaries.cuts();
    assert!(cuts.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(bins.boundaries.bucket_count(), cuts.len() - 1);

    // Idempotent reapplication
    let first = bins.assign(&values);
    let second = bins.assign(&values);
    assert_eq!(first, second);
    assert!(first.iter().all(|a| a.is_some()));
}

#[test]
fn test_missing_values_occupy_bucket_zero() {
    let mut values = opt(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0]);
    values.push(None);
    values.push(None);
    let labels = [0, 0, 0, 0, 1, 1, 1, 1, 1, 0];

    let bins = bin_ordered(&values, &labels, 4).unwrap();
    assert!(bins.missing_bin);

    let assigned = bins.assign(&values);
    assert_eq!(assigned[8], Some(0));
    assert_eq!(assigned[9], Some(0));
    let real_min = assigned[..8].iter().map(|a| a.unwrap()).min().unwrap();
    assert!(real_min >= 1, "real values must not share the missing bucket");
}

#[test]
fn test_long_tail_grouping_scenario() {
    // Shares a=50%, b=30%, c=15%, d=5% with a 0.95 ratio threshold: a, b
    // and c stay singletons and d collapses into "other", labeled 'c'.
    let (values, labels) = common::create_long_tail_column();
    let refs: Vec<&str> = values.iter().map(String::as_str).collect();

    let config = UnorderedConfig {
        box_threshold: 3,
        ratio_threshold: 0.95,
    };
    let map = bin_unordered(&refs, &labels, &config).unwrap();

    let CategoryMap::Grouped(mapping) = &map else {
        panic!("expected grouped mapping, got {:?}", map);
    };
    assert_eq!(mapping.get("a").map(String::as_str), Some("a"));
    assert_eq!(mapping.get("b").map(String::as_str), Some("b"));
    assert_eq!(mapping.get("c").map(String::as_str), Some("c"));
    assert_eq!(mapping.get("other").map(String::as_str), Some("c"));

    let encoded = map.apply(&["d"]).unwrap();
    assert_eq!(encoded, EncodedColumn::Labels(vec!["c".to_string()]));
}

#[test]
fn test_bin_counting_scores_are_log_odds() {
    // Ten near-even categories push past the threshold into bin counting;
    // category 'x' with 8 events and 2 non-events scores ln(8/2) ~ 1.386.
    let mut values: Vec<&str> = Vec::new();
    let mut labels: Vec<u8> = Vec::new();
    for cat in ["q", "r", "s", "t", "u", "v"] {
        for i in 0..15 {
            values.push(cat);
            labels.push((i % 2) as u8);
        }
    }
    for i in 0..10 {
        values.push("x");
        labels.push(u8::from(i < 8));
    }

    let config = UnorderedConfig {
        box_threshold: 4,
        ratio_threshold: 0.95,
    };
    let map = bin_unordered(&values, &labels, &config).unwrap();

    let CategoryMap::LogOdds(scores) = &map else {
        panic!("expected log-odds recoding, got {:?}", map);
    };
    let expected = ((8.0_f64 + 1.0e-5) / (2.0 + 1.0e-5)).ln();
    assert!((scores["x"] - expected).abs() < 1e-9);
    assert!((scores["x"] - 1.386).abs() < 1e-3);
}

#[test]
fn test_invalid_configuration_is_surfaced() {
    let values = opt(&[1.0, 2.0, 3.0]);
    let labels = [0, 1, 0];
    assert!(matches!(
        bin_ordered(&values, &labels, 0),
        Err(BinError::InvalidTargetCount(0))
    ));

    let refs = ["a", "b"];
    let config = UnorderedConfig {
        box_threshold: 1,
        ratio_threshold: 1.2,
    };
    assert!(matches!(
        bin_unordered(&refs, &[0, 1], &config),
        Err(BinError::InvalidRatioThreshold(_))
    ));
}
