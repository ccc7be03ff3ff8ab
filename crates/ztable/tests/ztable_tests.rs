//! Z-table integration tests
//!
//! Covers both queries over the full standard table, equivalence across
//! bucket sizes and evaluators, with property-based checks of the
//! nearest-neighbour search.

use proptest::prelude::*;
use rstest::rstest;
use ztable::{ErfCdf, GaussLegendreCdf, ZTable, ZTableOptions};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn table_with_bucket_size(bucket_size: i64) -> ZTable {
    ZTable::new(Some(&ZTableOptions::with_bucket_size(bucket_size)))
}

// === FindPercentage ===

#[test]
fn test_find_percentage_is_monotonic() {
    init_tracing();
    let table = ZTable::new(None);

    let percentages: Vec<f64> = (-400..=400)
        .map(|h| table.find_percentage(h as f64 / 100.0))
        .collect();

    assert!(percentages.iter().all(|&p| p > 0.0));
    assert!(percentages.windows(2).all(|w| w[0] <= w[1]));
}

#[rstest]
#[case(-4.0, 0.0)]
#[case(0.0, 0.5)]
#[case(4.0, 1.0)]
#[case(1.96, 0.975)]
#[case(-1.0, 0.158_655)]
fn test_find_percentage_values(#[case] z: f64, #[case] expected: f64) {
    let table = ZTable::new(None);
    let actual = table.find_percentage(z);
    assert!(
        (actual - expected).abs() < 1e-4,
        "Φ({z}) = {actual}, expected ~{expected}"
    );
}

#[rstest]
#[case(1.005)]
#[case(0.123)]
#[case(0.001)]
#[case(-4.01)]
#[case(4.01)]
#[case(100.0)]
fn test_find_percentage_misses_return_zero(#[case] z: f64) {
    let table = ZTable::new(None);
    assert_eq!(table.find_percentage(z), 0.0);
    assert_eq!(table.lookup_percentage(z), None);
}

#[test]
fn test_find_percentage_accepts_drifted_input() {
    let table = ZTable::new(None);
    let drifted = 0.1 + 0.2; // 0.30000000000000004
    assert_eq!(table.find_percentage(drifted), table.find_percentage(0.3));
    assert_ne!(table.find_percentage(drifted), 0.0);
}

// === FindZScore ===

#[rstest]
#[case(1)]
#[case(10)]
#[case(30)]
#[case(100)]
fn test_round_trip_every_leaf(#[case] bucket_size: i64) {
    init_tracing();
    let table = table_with_bucket_size(bucket_size);

    for leaf in table.leaves() {
        let z = table.find_z_score(leaf.percentage).unwrap();
        assert_eq!(z, leaf.z_score, "bucket size {bucket_size}, leaf {}", leaf.key);
    }
}

#[rstest]
#[case(1)]
#[case(10)]
#[case(30)]
#[case(100)]
fn test_out_of_range_percentages(#[case] bucket_size: i64) {
    let table = table_with_bucket_size(bucket_size);
    assert_eq!(table.find_z_score(0.0).unwrap(), -4.0);
    assert_eq!(table.find_z_score(1.0).unwrap(), 4.0);
    assert_eq!(table.find_z_score(1.5).unwrap(), 4.0);
}

#[test]
fn test_nearest_neighbour_between_leaves() {
    let table = ZTable::new(None);
    let leaves = table.leaves();

    for pair in leaves.windows(2) {
        let (low, high) = (&pair[0], &pair[1]);
        let gap = high.percentage - low.percentage;

        let near_low = low.percentage + gap * 0.25;
        let near_high = low.percentage + gap * 0.75;

        assert_eq!(table.find_z_score(near_low).unwrap(), low.z_score);
        assert_eq!(table.find_z_score(near_high).unwrap(), high.z_score);
    }
}

#[test]
fn test_tie_goes_to_lower_z_score() {
    // Dyadic percentages make the midpoint an exact tie
    let dyadic = |z: f64| ((z * 100.0).round() + 401.0) / 1024.0;
    let table = ZTable::with_evaluator(None, &dyadic);

    let low = table.find_percentage(0.5);
    let high = table.find_percentage(0.51);
    let midpoint = (low + high) / 2.0;

    assert_eq!(midpoint - low, high - midpoint);
    assert_eq!(table.find_z_score(midpoint).unwrap(), 0.5);
}

#[test]
fn test_known_quantiles() {
    let table = ZTable::new(None);
    assert_eq!(table.find_z_score(0.5).unwrap(), 0.0);
    assert_eq!(table.find_z_score(0.975).unwrap(), 1.96);
    assert_eq!(table.find_z_score(0.025).unwrap(), -1.96);
    assert_eq!(table.find_z_score(0.95).unwrap(), 1.64);
}

// === Options and evaluators ===

#[rstest]
#[case(0)]
#[case(-1)]
#[case(-30)]
fn test_non_positive_bucket_size_uses_default(#[case] bucket_size: i64) {
    let table = table_with_bucket_size(bucket_size);
    assert_eq!(table.bucket_size(), 30);
    assert_eq!(table.tree_depth(), ZTable::new(None).tree_depth());
}

#[test]
fn test_bucket_size_from_toml() {
    let options = ZTableOptions::from_toml_str("bucket_size = 100").unwrap();
    let table = ZTable::new(Some(&options));
    assert_eq!(table.bucket_size(), 100);
    // 8 complete buckets -> 4 -> 2 -> 1
    assert_eq!(table.boundary_count(), 8);
    assert_eq!(table.tree_depth(), 4);
}

#[test]
fn test_bucket_larger_than_table_has_no_tree() {
    let table = table_with_bucket_size(1000);
    assert_eq!(table.tree_depth(), 0);
    assert!(table.find_z_score(0.5).unwrap_err().is_not_found());
    assert!((table.find_percentage(0.0) - 0.5).abs() < 1e-12);
}

#[test]
fn test_quadrature_table_matches_closed_form() {
    let closed = ZTable::with_evaluator(None, &ErfCdf);
    let quad = ZTable::with_evaluator(None, &GaussLegendreCdf::standard().unwrap());

    for (a, b) in closed.leaves().iter().zip(quad.leaves()) {
        assert_eq!(a.key, b.key);
        assert!((a.percentage - b.percentage).abs() < 1e-10);
    }
    for p in [0.001, 0.1, 0.5, 0.9, 0.999] {
        assert_eq!(
            closed.find_z_score(p).unwrap(),
            quad.find_z_score(p).unwrap()
        );
    }
}

#[test]
fn test_concurrent_readers() {
    let table = std::sync::Arc::new(ZTable::new(None));
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let table = std::sync::Arc::clone(&table);
            std::thread::spawn(move || {
                (0..100)
                    .map(|i| table.find_z_score((t * 100 + i) as f64 / 400.0).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        let results = handle.join().unwrap();
        assert!(results.windows(2).all(|w| w[0] <= w[1]));
    }
}

// === Property-based tests ===

proptest! {
    #[test]
    fn prop_result_is_nearest_leaf(p in 0.0f64..1.0) {
        let table = ZTable::new(None);
        let z = table.find_z_score(p).unwrap();
        let chosen = (table.find_percentage(z) - p).abs();

        for leaf in table.leaves() {
            prop_assert!(chosen <= (leaf.percentage - p).abs());
        }
    }

    #[test]
    fn prop_bucket_size_does_not_change_result(p in -0.5f64..1.5) {
        let reference = table_with_bucket_size(30).find_z_score(p).unwrap();
        for bucket_size in [1, 10, 100] {
            let z = table_with_bucket_size(bucket_size).find_z_score(p).unwrap();
            prop_assert_eq!(z, reference);
        }
    }

    #[test]
    fn prop_find_percentage_round_trips(h in -400i32..=400) {
        let table = ZTable::new(None);
        let z = h as f64 / 100.0;
        let p = table.find_percentage(z);
        prop_assert!(p > 0.0);
        prop_assert_eq!(table.find_z_score(p).unwrap(), z);
    }
}
