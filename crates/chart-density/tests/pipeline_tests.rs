//! End-to-end density estimation tests
//!
//! Runs the estimator over the penguin fixtures and checks the curve
//! properties charts rely on, with property-based tests for arbitrary
//! samples.

mod common;

use chart_density::{
    density_at, estimate_density, evaluate_density, extract_complete_samples, extract_sample,
    kde, silverman_bandwidth, DensityConfig, DensityEstimator, EvaluationGrid, GridSpec,
    MissingPolicy, DEFAULT_POINTS,
};
use common::fixtures::{penguins_csv, penguins_json, MORPHOLOGY_FIELDS};
use proptest::prelude::*;

// === Fixtures ===

#[test]
fn test_morphology_curves() {
    let records = penguins_json();
    let estimator = DensityEstimator::default();
    let curves = estimator.estimate_fields(&records, &MORPHOLOGY_FIELDS);

    assert_eq!(curves.len(), 3);
    for field in MORPHOLOGY_FIELDS {
        let curve = &curves[field];
        assert_eq!(curve.len(), DEFAULT_POINTS, "field {}", field);
        assert!(curve.iter().all(|p| p.density >= 0.0 && p.density.is_finite()));
        assert!(curve.points().windows(2).all(|w| w[0].value < w[1].value));
    }
}

#[test]
fn test_morphology_drop_record_matches_listwise_filter() {
    let records = penguins_json();
    let config = DensityConfig::default().with_missing(MissingPolicy::DropRecord);
    let estimator = DensityEstimator::new(config).unwrap();
    let curves = estimator.estimate_fields(&records, &MORPHOLOGY_FIELDS);

    let samples = extract_complete_samples(&records, &MORPHOLOGY_FIELDS);
    assert!(samples.iter().all(|s| s.len() == 18));
    for (field, sample) in MORPHOLOGY_FIELDS.iter().zip(&samples) {
        assert_eq!(curves[*field], kde(sample));
    }
}

#[test]
fn test_csv_and_json_agree() {
    let from_json = penguins_json();
    let from_csv = penguins_csv();
    assert_eq!(from_json.len(), from_csv.len());

    for field in MORPHOLOGY_FIELDS {
        assert_eq!(
            extract_sample(&from_json, field),
            extract_sample(&from_csv, field)
        );
    }

    let estimator = DensityEstimator::default();
    assert_eq!(
        estimator.estimate_fields(&from_json, &MORPHOLOGY_FIELDS),
        estimator.estimate_fields(&from_csv, &MORPHOLOGY_FIELDS)
    );
}

#[test]
fn test_body_mass_by_species() {
    let records = penguins_json();
    let config = DensityConfig::default().with_grid(GridSpec::Ticks {
        start: 2500.0,
        end: 6500.0,
        step: 50.0,
    });
    let estimator = DensityEstimator::new(config).unwrap();
    let curves = estimator.estimate_groups(&records, "Species", "Body Mass (g)");

    assert_eq!(curves.len(), 3);
    for (species, curve) in &curves {
        assert_eq!(curve.len(), 81, "species {}", species);
        // The ticks cover the bulk of every species' mass distribution
        assert!(curve.area() > 0.9, "species {} area {}", species, curve.area());
    }

    let gentoo = curves["Gentoo"].peak().unwrap();
    let adelie = curves["Adelie"].peak().unwrap();
    assert!(gentoo.value > adelie.value);
}

#[test]
fn test_missing_field_gives_empty_curve() {
    let records = penguins_json();
    let curves = DensityEstimator::default().estimate_fields(&records, &["Wing Span (cm)"]);
    assert!(curves["Wing Span (cm)"].is_empty());
}

// === Known values ===

#[test]
fn test_silverman_reference_sample() {
    let sample = [1.0, 2.0, 3.0, 4.0, 5.0];
    let h = silverman_bandwidth(&sample);
    let expected = 0.9 * (2.0 / 1.34) * 5f64.powf(-0.2);
    assert!((h - expected).abs() < 1e-3, "h = {}", h);

    let curve = kde(&sample);
    let peak = curve.peak().unwrap();
    let step = EvaluationGrid::padded(&sample, DEFAULT_POINTS, 0.1)
        .step()
        .unwrap();
    assert!((peak.value - 3.0).abs() <= step);
    assert!(peak.density >= density_at(&sample, h, 3.0) - 1e-3);
}

#[test]
fn test_identical_values() {
    let sample = [5.0, 5.0, 5.0, 5.0];
    let h = silverman_bandwidth(&sample);
    assert!(h.is_finite() && h > 0.0);

    let curve = kde(&sample);
    assert_eq!(curve.len(), DEFAULT_POINTS);
    assert!(curve.iter().all(|p| p.density.is_finite()));
}

#[test]
fn test_empty_sample() {
    assert!(kde(&[]).is_empty());
    assert!(DensityEstimator::default().estimate(&[]).is_empty());
}

#[test]
fn test_smoothing_lowers_peak() {
    let sample = [1.0, 2.0, 2.5, 3.0, 7.0, 7.5, 9.0];
    let grid = EvaluationGrid::padded(&sample, DEFAULT_POINTS, 0.1);

    let peaks: Vec<f64> = [0.5, 1.0, 2.0, 4.0, 8.0]
        .iter()
        .map(|&h| evaluate_density(&sample, h, &grid).peak().unwrap().density)
        .collect();

    assert!(peaks.windows(2).all(|w| w[0] > w[1]), "peaks {:?}", peaks);
}

#[test]
fn test_smoothing_broadens_curve() {
    // A wider kernel moves mass out into the tails
    let sample = [4.0, 5.0, 5.0, 6.0];
    let grid = EvaluationGrid::linspace(0.0, 10.0, DEFAULT_POINTS);
    let narrow = evaluate_density(&sample, 0.3, &grid);
    let wide = evaluate_density(&sample, 1.5, &grid);

    assert!(wide.points()[0].density > narrow.points()[0].density);
    assert!(wide.points()[99].density > narrow.points()[99].density);

    let curve = estimate_density(&sample, 0.3, DEFAULT_POINTS);
    assert_eq!(curve.len(), DEFAULT_POINTS);
}

// === Property-Based Tests ===

proptest! {
    #[test]
    fn test_density_non_negative(sample in prop::collection::vec(-1000.0f64..1000.0, 1..60)) {
        let curve = kde(&sample);
        prop_assert_eq!(curve.len(), DEFAULT_POINTS);
        prop_assert!(curve.iter().all(|p| p.density >= 0.0 && p.density.is_finite()));
    }

    #[test]
    fn test_grid_strictly_ascending(
        sample in prop::collection::vec(-1000.0f64..1000.0, 2..60),
        points in 2usize..300,
    ) {
        let (min, max) = sample
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
        prop_assume!(max - min > 1e-6);

        let curve = estimate_density(&sample, silverman_bandwidth(&sample), points);
        prop_assert_eq!(curve.len(), points);
        prop_assert!(curve.points().windows(2).all(|w| w[0].value < w[1].value));
    }

    #[test]
    fn test_bandwidth_always_positive(sample in prop::collection::vec(-1e6f64..1e6, 0..80)) {
        let h = silverman_bandwidth(&sample);
        prop_assert!(h.is_finite() && h > 0.0, "bandwidth {}", h);
    }

    #[test]
    fn test_constant_sample_bandwidth(value in -1e6f64..1e6, n in 1usize..50) {
        let sample = vec![value; n];
        let h = silverman_bandwidth(&sample);
        prop_assert!(h.is_finite() && h > 0.0);
        prop_assert!(kde(&sample).iter().all(|p| p.density.is_finite()));
    }

    #[test]
    fn test_estimation_is_deterministic(sample in prop::collection::vec(-100.0f64..100.0, 0..40)) {
        let first = kde(&sample);
        let second = kde(&sample);
        prop_assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            prop_assert_eq!(a.value.to_bits(), b.value.to_bits());
            prop_assert_eq!(a.density.to_bits(), b.density.to_bits());
        }
    }

    #[test]
    fn test_wider_bandwidth_lowers_peak(
        sample in prop::collection::vec(0.0f64..100.0, 1..30),
        scale in 1.0f64..3.0,
    ) {
        // Bandwidths at least as wide as the data keep the peak well resolved
        // by the grid, so the comparison is not blurred by grid spacing
        let (min, max) = sample
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
        let h = (max - min).max(1.0) * scale;
        let grid = EvaluationGrid::padded(&sample, DEFAULT_POINTS, 0.1);

        let narrow = evaluate_density(&sample, h, &grid).peak().unwrap().density;
        let wide = evaluate_density(&sample, 2.0 * h, &grid).peak().unwrap().density;
        prop_assert!(wide < narrow, "h = {}: {} vs {}", h, narrow, wide);
    }
}
