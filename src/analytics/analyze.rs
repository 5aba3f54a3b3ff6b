//! Main analytics orchestrator
//!
//! Builds the substance registry and period samples, subtracts modeled natural recovery,
//! runs the attribution solver, and merges in the per-hormone summaries and forecasts.
//! Every call recomputes the whole history from scratch.

use std::borrow::Cow;
use tracing::{debug, warn};

use super::attribution::AttributionSolver;
use super::error::AnalyticsError;
use super::forecast::{summarize, HormoneSeries};
use super::period::{build_periods, PeriodSample};
use super::recovery::{daily_suppression, natural_delta, Baselines};
use super::types::{AnalyticsOptions, AnalyticsResult, TestosteroneSummary};
use crate::data::{Config, Hormone, MeasurementRecord, SubstanceRegistry};

/// Fewest records a computation accepts
pub const MIN_RECORDS: usize = 2;

/// Analyze a record history; `None` when there are fewer than two records
///
/// Records must be in ascending timestamp order. Results are a pure function of the
/// arguments.
///
/// # Example
///
/// ```rust
/// use hormtrack::prelude::*;
///
/// let records = vec![
///     MeasurementRecord::at_day(0).estrogen(40.0).testosterone(520.0).build(),
///     MeasurementRecord::at_day(14)
///         .estrogen(110.0)
///         .testosterone(310.0)
///         .dose(KnownSubstance::Estradiol, 4.0)
///         .build(),
/// ];
/// let config = Config::new(BiologicalSex::Male, Mode::Feminizing);
///
/// let result = compute(&records, &config).expect("two records are enough");
/// assert_eq!(result.estrogen_level.current, Some(110.0));
/// assert!(compute(&records[..1], &config).is_none());
/// ```
pub fn compute(records: &[MeasurementRecord], config: &Config) -> Option<AnalyticsResult> {
    match try_compute(records, config) {
        Ok(result) => Some(result),
        Err(e) => {
            debug!("No analytics result: {}", e);
            None
        }
    }
}

/// Analyze a record history with the default options
pub fn try_compute(
    records: &[MeasurementRecord],
    config: &Config,
) -> Result<AnalyticsResult, AnalyticsError> {
    try_compute_with(records, config, &AnalyticsOptions::default())
}

/// Analyze a record history with explicit options
pub fn try_compute_with(
    records: &[MeasurementRecord],
    config: &Config,
    options: &AnalyticsOptions,
) -> Result<AnalyticsResult, AnalyticsError> {
    options.validate()?;
    if records.len() < MIN_RECORDS {
        return Err(AnalyticsError::InsufficientData {
            n: records.len(),
            required: MIN_RECORDS,
        });
    }
    warn_if_unordered(records);

    let records: Cow<[MeasurementRecord]> = if config.units.is_standard() {
        Cow::Borrowed(records)
    } else {
        Cow::Owned(
            records
                .iter()
                .map(|r| r.to_standard_units(&config.units))
                .collect(),
        )
    };

    let registry = SubstanceRegistry::from_records(&records, config);
    let baselines = Baselines::new(config.biological_sex, config.mode);

    let periods: Vec<PeriodSample> = build_periods(&records, &registry, options.min_days_interval)
        .into_iter()
        .map(|period| {
            let natural = natural_delta(period.start, period.end, period.day_delta, &baselines);
            period.with_natural(natural)
        })
        .collect();

    debug!(
        records = records.len(),
        periods = periods.len(),
        substances = registry.len(),
        "Computing hormone trajectory analytics"
    );

    let influence = AttributionSolver::new(options).solve(&registry, &periods);

    let estrogen = HormoneSeries::from_records(&records, Hormone::Estrogen);
    let testosterone = HormoneSeries::from_records(&records, Hormone::Testosterone);

    let estrogen_level = summarize(&estrogen, config.targets.get(Hormone::Estrogen), options);
    let testosterone_level = TestosteroneSummary {
        level: summarize(
            &testosterone,
            config.targets.get(Hormone::Testosterone),
            options,
        ),
        // no estrogen reading gives no estimate, like a missing baseline
        daily_suppression: estrogen
            .latest()
            .and_then(|(_, e)| daily_suppression(config.biological_sex, e)),
    };

    Ok(AnalyticsResult {
        estrogen_level,
        testosterone_level,
        influence,
    })
}

fn warn_if_unordered(records: &[MeasurementRecord]) {
    if let Some(idx) = records
        .windows(2)
        .position(|w| w[1].timestamp <= w[0].timestamp)
    {
        warn!(
            index = idx + 1,
            "Record timestamps are not strictly ascending; results are unspecified"
        );
    }
}
