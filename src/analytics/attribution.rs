//! Per-substance dose-response attribution
//!
//! Estimates, for every registered substance, the weekly level change caused by one weekly
//! mg, such that the dose-weighted sum over active substances explains the drug-attributed
//! weekly change of each period.
//!
//! The estimator is coordinate-wise: for each substance in registry order, every period in
//! which it is dosed yields one per-mg sample (the period's change minus what the other
//! substances' current estimates explain, divided by its weekly dose). The samples are
//! IQR-trimmed and averaged. Updated estimates are used immediately by the next substance.
//! The sweep runs a fixed number of times with no convergence check; results depend on the
//! iteration count and on the registry order.

use ndarray::{Array2, ArrayView1};
use tracing::trace;

use super::period::PeriodSample;
use super::types::{AnalyticsOptions, Influence, InfluenceMap};
use crate::data::{Hormone, SubstanceRegistry};

/// Fixed-iteration coordinate-wise influence estimator
#[derive(Debug, Clone)]
pub struct AttributionSolver {
    iterations: usize,
    iqr_factor: f64,
    min_iqr_samples: usize,
}

impl Default for AttributionSolver {
    fn default() -> Self {
        Self::new(&AnalyticsOptions::default())
    }
}

impl AttributionSolver {
    pub fn new(options: &AnalyticsOptions) -> Self {
        Self {
            iterations: options.iterations,
            iqr_factor: options.iqr_factor,
            min_iqr_samples: options.min_iqr_samples,
        }
    }

    /// Estimate the influence of every registered substance
    ///
    /// Starts from zero on every call. A substance never dosed in any period keeps a zero
    /// influence. After the last iteration each estimate is clamped to its declared role;
    /// dimensions without a declared role are left as estimated, so for example an
    /// anti-androgen may end up with a nonzero estrogen influence.
    pub fn solve(&self, registry: &SubstanceRegistry, periods: &[PeriodSample]) -> InfluenceMap {
        let n_substances = registry.len();

        // periods × substances
        let doses = Array2::from_shape_fn((periods.len(), n_substances), |(p, d)| {
            periods[p].weekly_dose[d]
        });
        // periods × hormones
        let changes = Array2::from_shape_fn((periods.len(), Hormone::ALL.len()), |(p, h)| {
            periods[p].weekly_attributed().get(Hormone::ALL[h])
        });
        // substances × hormones
        let mut influence = Array2::<f64>::zeros((n_substances, Hormone::ALL.len()));

        for iteration in 0..self.iterations {
            for d in 0..n_substances {
                for h in 0..Hormone::ALL.len() {
                    let samples: Vec<f64> = doses
                        .outer_iter()
                        .zip(changes.column(h))
                        .filter(|(dose_row, _)| dose_row[d] > 0.0)
                        .map(|(dose_row, &change)| {
                            let residual = change - explained_by_others(dose_row, influence.column(h), d);
                            residual / dose_row[d]
                        })
                        .collect();

                    let kept = iqr_filter(samples, self.iqr_factor, self.min_iqr_samples);
                    if let Some(estimate) = mean(&kept) {
                        influence[[d, h]] = estimate;
                    }
                }
            }
            trace!(iteration, influence = ?influence, "Attribution sweep");
        }

        let entries = registry
            .profiles()
            .iter()
            .enumerate()
            .map(|(d, profile)| {
                let estimate = Influence::new(
                    profile.role.estrogen.clamp(influence[[d, 0]]),
                    profile.role.testosterone.clamp(influence[[d, 1]]),
                );
                (profile.id.clone(), estimate)
            })
            .collect();

        InfluenceMap::new(entries)
    }
}

/// Weekly change explained by every substance except `skip`
fn explained_by_others(dose_row: ArrayView1<f64>, influence: ArrayView1<f64>, skip: usize) -> f64 {
    dose_row
        .iter()
        .zip(influence.iter())
        .enumerate()
        .filter(|(d, _)| *d != skip)
        .map(|(_, (dose, per_mg))| dose * per_mg)
        .sum()
}

/// Discard samples outside `[Q1 - k·IQR, Q3 + k·IQR]`
///
/// Quartiles are the sorted samples at `floor(n/4)` and `floor(3n/4)`. With fewer than
/// `min_samples` samples nothing is discarded.
pub(crate) fn iqr_filter(mut samples: Vec<f64>, factor: f64, min_samples: usize) -> Vec<f64> {
    if samples.is_empty() || samples.len() < min_samples {
        return samples;
    }

    samples.sort_by(|a, b| a.total_cmp(b));
    let n = samples.len();
    let q1 = samples[n / 4];
    let q3 = samples[3 * n / 4];
    let iqr = q3 - q1;
    let lower = q1 - factor * iqr;
    let upper = q3 + factor * iqr;

    samples.retain(|&s| s >= lower && s <= upper);
    samples
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
