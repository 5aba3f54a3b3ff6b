//! Natural recovery model
//!
//! Pure functions describing how hormone levels would move without any exogenous
//! substance: exponential relaxation toward a sex-specific baseline, and suppression of
//! endogenous testosterone production by circulating estrogen.
//!
//! Levels are in standard units (estrogen pg/mL, testosterone ng/dL).

use super::types::HormonePair;
use crate::data::{BiologicalSex, Mode};

/// Time constant (days) of the relaxation toward baseline, both hormones
pub const HALF_LIFE_DAYS: f64 = 1.5;

/// Fraction of the suppression that persists once it has fully relaxed
pub const SUPPRESSION_FLOOR: f64 = 0.82;

/// Time constant (days) of the suppression relaxation
pub const SUPPRESSION_TIME_CONSTANT_DAYS: f64 = 3.0;

/// Upper bound of [`suppression_rate`]
pub const MAX_SUPPRESSION: f64 = 0.95;

/// Natural testosterone baseline for a biological sex (ng/dL)
pub fn testosterone_baseline(sex: BiologicalSex) -> Option<f64> {
    match sex {
        BiologicalSex::Male => Some(630.0),
        BiologicalSex::Female => Some(30.0),
        BiologicalSex::Other => None,
    }
}

/// Natural estrogen baseline (pg/mL)
///
/// Only defined for a female body on masculinizing therapy, where estrogen drifts back
/// to its own production level.
pub fn estrogen_baseline(sex: BiologicalSex, mode: Mode) -> Option<f64> {
    match (sex, mode) {
        (BiologicalSex::Female, Mode::Masculinizing) => Some(115.0),
        _ => None,
    }
}

/// Baselines applicable to one configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baselines {
    pub estrogen: Option<f64>,
    pub testosterone: Option<f64>,
}

impl Baselines {
    pub fn new(sex: BiologicalSex, mode: Mode) -> Self {
        Self {
            estrogen: estrogen_baseline(sex, mode),
            testosterone: testosterone_baseline(sex),
        }
    }
}

/// Fraction of endogenous testosterone production suppressed at estrogen level `e`
///
/// Piecewise: zero up to 135 pg/mL, a steep ramp to 0.5 at 200, a gentler one to 0.9 at
/// 500, then saturating at [`MAX_SUPPRESSION`]. Non-decreasing, always in [0, 0.95].
pub fn suppression_rate(e: f64) -> f64 {
    let rate = if !(e >= 60.0) {
        0.0
    } else if e < 200.0 {
        0.5 * (e - 135.0) / 65.0
    } else if e < 500.0 {
        0.5 + 0.4 * (e - 200.0) / 300.0
    } else {
        (0.9 + 0.05 * (e - 500.0) / 500.0).min(MAX_SUPPRESSION)
    };
    // the [60, 135) segment of the ramp is negative
    rate.max(0.0)
}

/// Change over `days` of a level relaxing exponentially from `start` toward `baseline`
///
/// Zero when no baseline applies.
pub fn natural_change(days: f64, start: f64, baseline: Option<f64>, half_life: f64) -> f64 {
    match baseline {
        Some(baseline) => (baseline - (baseline - start) * (-days / half_life).exp()) - start,
        None => 0.0,
    }
}

/// Share of the full suppression still acting after `days`
#[inline]
fn suppression_persistence(days: f64) -> f64 {
    1.0 - (1.0 - SUPPRESSION_FLOOR) * (-days / SUPPRESSION_TIME_CONSTANT_DAYS).exp()
}

/// Change in testosterone over `days` due to suppression at rate `rate`
pub fn suppression_change(prev_t: f64, rate: f64, days: f64) -> f64 {
    prev_t * (1.0 - rate * suppression_persistence(days)) - prev_t
}

/// Natural change of both hormones over one period
///
/// Estrogen relaxes toward its baseline. Testosterone relaxes toward its baseline and is
/// additionally pulled by suppression at the period's mean estrogen level.
pub fn natural_delta(
    prev: HormonePair,
    curr: HormonePair,
    days: f64,
    baselines: &Baselines,
) -> HormonePair {
    let estrogen = natural_change(days, prev.estrogen, baselines.estrogen, HALF_LIFE_DAYS);

    let recovery = natural_change(days, prev.testosterone, baselines.testosterone, HALF_LIFE_DAYS);
    let rate = suppression_rate((prev.estrogen + curr.estrogen) / 2.0);
    let testosterone = recovery + suppression_change(prev.testosterone, rate, days);

    HormonePair::new(estrogen, testosterone)
}

/// Endogenous testosterone suppressed at estrogen level `estrogen`, as a negative level
///
/// `None` when the sex has no testosterone baseline.
pub fn daily_suppression(sex: BiologicalSex, estrogen: f64) -> Option<f64> {
    testosterone_baseline(sex).map(|baseline| -baseline * suppression_rate(estrogen))
}
