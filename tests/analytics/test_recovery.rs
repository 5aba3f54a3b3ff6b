//! Tests for the natural recovery model
//!
//! Tests cover:
//! - Shape of the suppression curve
//! - Relaxation toward the sex-specific baselines
//! - Natural change over a period, with and without suppression

use approx::assert_relative_eq;
use hormtrack::analytics::recovery::*;
use hormtrack::analytics::HormonePair;
use hormtrack::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_suppression_rate_is_monotone_and_bounded() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut levels: Vec<f64> = (0..2000).map(|_| rng.random_range(0.0..2000.0)).collect();
    levels.extend([0.0, 59.9, 60.0, 134.9, 135.0, 199.9, 200.0, 499.9, 500.0, 1000.0, 1e6]);
    levels.sort_by(|a, b| a.total_cmp(b));

    let rates: Vec<f64> = levels.iter().map(|&e| suppression_rate(e)).collect();
    for rate in &rates {
        assert!((0.0..=MAX_SUPPRESSION).contains(rate));
    }
    for pair in rates.windows(2) {
        assert!(pair[1] >= pair[0], "{} then {}", pair[0], pair[1]);
    }
}

#[test]
fn test_suppression_rate_breakpoints() {
    assert_eq!(suppression_rate(50.0), 0.0);
    assert_eq!(suppression_rate(100.0), 0.0);
    assert_eq!(suppression_rate(135.0), 0.0);
    assert_relative_eq!(suppression_rate(200.0), 0.5, epsilon = 1e-12);
    assert_relative_eq!(suppression_rate(350.0), 0.7, epsilon = 1e-12);
    assert_relative_eq!(suppression_rate(500.0), 0.9, epsilon = 1e-12);
    assert_relative_eq!(suppression_rate(1000.0), 0.95, epsilon = 1e-12);
    assert_relative_eq!(suppression_rate(5000.0), MAX_SUPPRESSION, epsilon = 1e-12);
}

#[test]
fn test_baselines_by_configuration() {
    let male = Baselines::new(BiologicalSex::Male, Mode::Feminizing);
    assert_eq!(male.testosterone, Some(630.0));
    assert_eq!(male.estrogen, None);

    let female_ftm = Baselines::new(BiologicalSex::Female, Mode::Masculinizing);
    assert_eq!(female_ftm.testosterone, Some(30.0));
    assert_eq!(female_ftm.estrogen, Some(115.0));

    let other = Baselines::new(BiologicalSex::Other, Mode::Masculinizing);
    assert_eq!(other.testosterone, None);
    assert_eq!(other.estrogen, None);
}

#[test]
fn test_relaxation_toward_baseline() {
    // one time constant closes 1 - 1/e of the gap
    let change = natural_change(HALF_LIFE_DAYS, 230.0, Some(630.0), HALF_LIFE_DAYS);
    assert_relative_eq!(change, 400.0 * (1.0 - (-1.0f64).exp()), epsilon = 1e-9);

    // above baseline it falls
    assert!(natural_change(7.0, 800.0, Some(630.0), HALF_LIFE_DAYS) < 0.0);
    // long periods close the gap entirely
    assert_relative_eq!(
        natural_change(365.0, 100.0, Some(630.0), HALF_LIFE_DAYS),
        530.0,
        epsilon = 1e-9
    );
    assert_eq!(natural_change(7.0, 100.0, None, HALF_LIFE_DAYS), 0.0);
}

#[test]
fn test_natural_delta_with_suppression() {
    let baselines = Baselines::new(BiologicalSex::Other, Mode::Feminizing);
    let prev = HormonePair::new(180.0, 400.0);
    let curr = HormonePair::new(220.0, 300.0);
    let delta = natural_delta(prev, curr, 7.0, &baselines);

    // mean estrogen 200: half of production suppressed
    let persistence = 1.0 - (1.0 - SUPPRESSION_FLOOR) * (-7.0f64 / SUPPRESSION_TIME_CONSTANT_DAYS).exp();
    assert_eq!(delta.estrogen, 0.0);
    assert_relative_eq!(delta.testosterone, -400.0 * 0.5 * persistence, epsilon = 1e-9);
}

#[test]
fn test_natural_delta_without_suppression() {
    let baselines = Baselines::new(BiologicalSex::Female, Mode::Masculinizing);
    let prev = HormonePair::new(60.0, 300.0);
    let curr = HormonePair::new(80.0, 350.0);
    let delta = natural_delta(prev, curr, 14.0, &baselines);

    assert_relative_eq!(
        delta.estrogen,
        natural_change(14.0, 60.0, Some(115.0), HALF_LIFE_DAYS),
        epsilon = 1e-12
    );
    assert_relative_eq!(
        delta.testosterone,
        natural_change(14.0, 300.0, Some(30.0), HALF_LIFE_DAYS),
        epsilon = 1e-12
    );
}

#[test]
fn test_daily_suppression() {
    assert_relative_eq!(
        daily_suppression(BiologicalSex::Male, 500.0).unwrap(),
        -567.0,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        daily_suppression(BiologicalSex::Female, 200.0).unwrap(),
        -15.0,
        epsilon = 1e-9
    );
    assert_eq!(daily_suppression(BiologicalSex::Other, 500.0), None);
}
