//! Period samples built from consecutive record pairs
//!
//! A period is the span between two consecutive records that both carry usable estrogen
//! and testosterone levels and are at least `min_days_interval` apart. Each period holds
//! the weekly dose of every registered substance at its end, and its observed level change.

use tracing::debug;

use super::types::HormonePair;
use crate::data::{Hormone, MeasurementRecord, SubstanceRegistry};

/// Both hormone levels of a record, if both are usable
pub fn levels(record: &MeasurementRecord) -> Option<HormonePair> {
    Some(HormonePair::new(
        record.level(Hormone::Estrogen)?,
        record.level(Hormone::Testosterone)?,
    ))
}

/// One consecutive record pair prepared for attribution
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSample<'a> {
    pub prev: &'a MeasurementRecord,
    pub curr: &'a MeasurementRecord,
    /// Levels at the start of the period
    pub start: HormonePair,
    /// Levels at the end of the period
    pub end: HormonePair,
    /// Length in days, never below the minimum interval
    pub day_delta: f64,
    /// Daily dose × 7 at the end of the period, in registry order
    pub weekly_dose: Vec<f64>,
    /// Modeled natural change, scaled to 7 days
    pub weekly_natural: HormonePair,
}

impl<'a> PeriodSample<'a> {
    /// Observed change over the period
    pub fn raw_delta(&self) -> HormonePair {
        self.end - self.start
    }

    /// Observed change scaled to 7 days
    pub fn weekly_observed(&self) -> HormonePair {
        self.raw_delta() * (7.0 / self.day_delta)
    }

    /// Observed weekly change not explained by natural recovery
    pub fn weekly_attributed(&self) -> HormonePair {
        self.weekly_observed() - self.weekly_natural
    }

    /// Attach the modeled natural change over the whole period
    pub fn with_natural(mut self, natural_delta: HormonePair) -> Self {
        self.weekly_natural = natural_delta * (7.0 / self.day_delta);
        self
    }
}

/// Build the period samples of a record history
///
/// Pairs with a missing level on either side, or shorter than `min_days_interval`, are
/// skipped. Natural change is left at zero; see [`PeriodSample::with_natural`].
pub fn build_periods<'a>(
    records: &'a [MeasurementRecord],
    registry: &SubstanceRegistry,
    min_days_interval: f64,
) -> Vec<PeriodSample<'a>> {
    records
        .windows(2)
        .filter_map(|pair| {
            let (prev, curr) = (&pair[0], &pair[1]);

            let (Some(start), Some(end)) = (levels(prev), levels(curr)) else {
                debug!(
                    prev = prev.timestamp,
                    curr = curr.timestamp,
                    "Skipping period: missing hormone level"
                );
                return None;
            };

            let day_delta = curr.days_since(prev);
            if !(day_delta >= min_days_interval) {
                debug!(
                    prev = prev.timestamp,
                    curr = curr.timestamp,
                    day_delta,
                    "Skipping period: gap shorter than minimum interval"
                );
                return None;
            }

            let weekly_dose = (0..registry.len())
                .map(|idx| registry.daily_dose(curr, idx) * 7.0)
                .collect();

            Some(PeriodSample {
                prev,
                curr,
                start,
                end,
                day_delta,
                weekly_dose,
                weekly_natural: HormonePair::default(),
            })
        })
        .collect()
}
