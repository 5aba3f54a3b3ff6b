//! End-to-end scenarios through `compute`
//!
//! Tests cover:
//! - Exact attribution for a single substance without natural recovery
//! - Feminizing and masculinizing histories
//! - JSON output shape
//! - Configuration parsed from JSON, including units and targets

use approx::assert_relative_eq;
use hormtrack::prelude::*;
use serde_json::Value;

/// Estradiol raising estrogen by 14 pg/mL per week on 2 mg daily
fn linear_estradiol_history() -> Vec<MeasurementRecord> {
    let mut records = vec![MeasurementRecord::at_day(0).estrogen(50.0).testosterone(300.0).build()];
    for week in 1..=4 {
        records.push(
            MeasurementRecord::at_day(7 * week)
                .estrogen(50.0 + 14.0 * week as f64)
                .testosterone(300.0)
                .dose(KnownSubstance::Estradiol, 2.0)
                .build(),
        );
    }
    records
}

#[test]
fn test_single_substance_exact_influence() {
    let config = Config::new(BiologicalSex::Other, Mode::Feminizing);
    let result = compute(&linear_estradiol_history(), &config).unwrap();

    let estradiol = result
        .influence
        .get(&SubstanceId::Known(KnownSubstance::Estradiol))
        .unwrap();
    // 14 pg/mL per week from 14 mg per week
    assert_relative_eq!(estradiol.estrogen_per_mg_week, 1.0, epsilon = 1e-12);
    assert_relative_eq!(estradiol.testosterone_per_mg_week, 0.0, epsilon = 1e-12);

    let estrogen = &result.estrogen_level;
    assert_eq!(estrogen.current, Some(106.0));
    assert_eq!(estrogen.weekly_change, Some(14.0));
    assert_eq!(estrogen.total_change, Some(56.0));
    // look-back point is day 0
    assert_relative_eq!(estrogen.monthly_avg_change.unwrap(), 14.0, epsilon = 1e-12);
    assert_relative_eq!(estrogen.predicted_next.unwrap(), 120.0, epsilon = 1e-12);
    assert_eq!(estrogen.trend, Trend::RapidlyIncreasing);
    assert_relative_eq!(estrogen.confidence.unwrap(), 1.0, epsilon = 1e-12);

    assert_eq!(result.testosterone_level.level.trend, Trend::Stable);
    assert_eq!(result.testosterone_level.daily_suppression, None);
}

#[test]
fn test_target_estimate_on_linear_history() {
    let config = Config::new(BiologicalSex::Other, Mode::Feminizing)
        .with_target(Hormone::Estrogen, 204.0);
    let estrogen = compute(&linear_estradiol_history(), &config)
        .unwrap()
        .estrogen_level;

    // 98 pg/mL to go at 2 per day
    assert_eq!(estrogen.days_to_target, Some(49));
    assert_eq!(estrogen.target_status, Some(TargetStatus::OnTrack));
    // 56 of 154 covered
    assert_relative_eq!(
        estrogen.target_progress.unwrap(),
        56.0 / 154.0 * 100.0,
        epsilon = 1e-9
    );
}

#[test]
fn test_masculinizing_history_respects_roles() {
    let records = vec![
        MeasurementRecord::at_day(0).estrogen(140.0).testosterone(35.0).build(),
        MeasurementRecord::at_day(14)
            .estrogen(120.0)
            .testosterone(180.0)
            .dose(KnownSubstance::Testosterone, 7.0)
            .build(),
        MeasurementRecord::at_day(28)
            .estrogen(100.0)
            .testosterone(320.0)
            .dose(KnownSubstance::Testosterone, 7.0)
            .dose(KnownSubstance::AntiEstrogen, 0.5)
            .build(),
        MeasurementRecord::at_day(49)
            .estrogen(70.0)
            .testosterone(450.0)
            .dose(KnownSubstance::Testosterone, 10.0)
            .dose(KnownSubstance::AntiEstrogen, 0.5)
            .build(),
        MeasurementRecord::at_day(63)
            .estrogen(75.0)
            .testosterone(520.0)
            .dose(KnownSubstance::Testosterone, 10.0)
            .dose(KnownSubstance::AntiEstrogen, 1.0)
            .build(),
    ];
    let config = Config::new(BiologicalSex::Female, Mode::Masculinizing)
        .with_target(Hormone::Testosterone, 600.0);
    let result = compute(&records, &config).unwrap();

    let ids: Vec<String> = result.influence.ids().map(|id| id.to_string()).collect();
    assert_eq!(ids, vec!["testosterone", "antiEstrogen"]);

    let testosterone = result
        .influence
        .get(&SubstanceId::Known(KnownSubstance::Testosterone))
        .unwrap();
    let anti_estrogen = result
        .influence
        .get(&SubstanceId::Known(KnownSubstance::AntiEstrogen))
        .unwrap();
    assert!(testosterone.testosterone_per_mg_week >= 0.0);
    assert!(anti_estrogen.estrogen_per_mg_week <= 0.0);

    let level = &result.testosterone_level.level;
    assert_eq!(level.current, Some(520.0));
    assert_eq!(level.target_status, Some(TargetStatus::OnTrack));
    // estrogen at 75 pg/mL suppresses nothing
    assert_eq!(result.testosterone_level.daily_suppression, Some(0.0));
}

#[test]
fn test_result_json_shape() {
    let config = Config::new(BiologicalSex::Male, Mode::Feminizing).with_target(Hormone::Estrogen, 150.0);
    let result = compute(&linear_estradiol_history(), &config).unwrap();
    let json: Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();

    let estrogen = &json["estrogenLevel"];
    for key in [
        "current",
        "weeklyChange",
        "monthlyAvgChange",
        "totalChange",
        "initial",
        "predictedNext",
        "daysToTarget",
        "trend",
        "confidence",
        "targetProgress",
        "targetStatus",
    ] {
        assert!(estrogen.get(key).is_some(), "missing estrogenLevel.{}", key);
    }
    assert_eq!(estrogen["trend"], "rapidlyIncreasing");
    assert_eq!(estrogen["targetStatus"], "onTrack");

    let testosterone = &json["testosteroneLevel"];
    assert!(testosterone.get("dailySuppression").is_some());
    assert!(testosterone.get("current").is_some());
    assert!(testosterone.get("level").is_none());

    let influence = json["influence"].as_object().unwrap();
    let keys: Vec<&String> = influence.keys().collect();
    assert!(keys.iter().any(|k| k.as_str() == "estradiol"));
    assert!(influence["estradiol"].get("estrogen").is_some());
    assert!(influence["estradiol"].get("testosterone").is_some());

    let back: AnalyticsResult = serde_json::from_value(json).unwrap();
    assert_eq!(back.influence.ids().count(), result.influence.len());
}

#[test]
fn test_config_from_json_with_units() {
    // same history, estrogen logged in pmol/L
    let records: Vec<MeasurementRecord> = linear_estradiol_history()
        .into_iter()
        .map(|r| MeasurementRecord {
            estrogen_level: r.estrogen_level.map(|e| e / 0.2724),
            ..r
        })
        .collect();
    let config = Config::from_json(
        r#"{
            "biologicalSex": "other",
            "mode": "mtf",
            "targets": { "estrogenLevel": "204" },
            "units": { "estrogen": "pmol/L", "testosterone": "ng/dL" }
        }"#,
    )
    .unwrap();

    let result = compute(&records, &config).unwrap();
    let estradiol = result
        .influence
        .get(&SubstanceId::Known(KnownSubstance::Estradiol))
        .unwrap();
    assert_relative_eq!(estradiol.estrogen_per_mg_week, 1.0, epsilon = 1e-9);
    assert_relative_eq!(result.estrogen_level.current.unwrap(), 106.0, epsilon = 1e-9);
    assert_eq!(result.estrogen_level.days_to_target, Some(49));
}

#[test]
fn test_trait_matches_free_function() {
    let records = linear_estradiol_history();
    let config = Config::new(BiologicalSex::Male, Mode::Feminizing);
    let options = AnalyticsOptions::default().with_iterations(30);

    assert_eq!(records.trajectory(&config), compute(&records, &config));
    assert_eq!(
        records.trajectory_with(&config, &options),
        try_compute_with(&records, &config, &options)
    );
}

#[test]
fn test_errors_convert_to_crate_error() {
    let err: HormoneError = try_compute(&[], &Config::default()).unwrap_err().into();
    assert!(matches!(
        err,
        HormoneError::AnalyticsError(AnalyticsError::InsufficientData { n: 0, required: 2 })
    ));
}
