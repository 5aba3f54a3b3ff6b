//! Trajectory summary and short-term forecast of one hormone
//!
//! Works on the raw level series only (no attribution): latest, previous and first values,
//! a weekly-normalized average change over roughly the last month, linear extrapolation
//! one week ahead, and the number of days until a target is crossed at that rate.

use super::progress::{target_progress, target_status};
use super::types::{AnalyticsOptions, HormoneSummary, Trend};
use crate::data::{days_between, Hormone, MeasurementRecord};

/// Time-ordered usable levels of one hormone
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HormoneSeries {
    points: Vec<(i64, f64)>,
}

impl HormoneSeries {
    /// Collect the usable levels of `hormone`, in record order
    pub fn from_records(records: &[MeasurementRecord], hormone: Hormone) -> Self {
        let points = records
            .iter()
            .filter_map(|r| r.level(hormone).map(|v| (r.timestamp, v)))
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<(i64, f64)> {
        self.points.last().copied()
    }

    pub fn previous(&self) -> Option<(i64, f64)> {
        self.points.len().checked_sub(2).map(|i| self.points[i])
    }

    pub fn initial(&self) -> Option<(i64, f64)> {
        self.points.first().copied()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|&(_, v)| v).collect()
    }

    /// Last point at least `lookback_days` before the latest one, or the first point
    pub fn lookback(&self, lookback_days: f64) -> Option<(i64, f64)> {
        let (latest_ts, _) = self.latest()?;
        self.points
            .iter()
            .rev()
            .find(|&&(ts, _)| days_between(ts, latest_ts) >= lookback_days)
            .or_else(|| self.points.first())
            .copied()
    }
}

/// Average change per 7 days between the look-back point and the latest point
pub fn monthly_avg_change(series: &HormoneSeries, lookback_days: f64) -> Option<f64> {
    let (latest_ts, latest) = series.latest()?;
    let (then_ts, then) = series.lookback(lookback_days)?;
    let day_span = days_between(then_ts, latest_ts);
    if day_span <= 0.0 {
        return None;
    }
    Some((latest - then) / day_span * 7.0)
}

/// Sign of a value, 0 for zero
#[inline]
fn sign(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

/// Days until `target` is reached from `current` at `monthly_avg_change` per week
///
/// `Some(0)` when already within `tolerance`. `None` unless the rate actually moves toward
/// the target, which also rules out a zero rate.
pub fn days_to_target(
    current: f64,
    target: f64,
    monthly_avg_change: Option<f64>,
    tolerance: f64,
) -> Option<i64> {
    let diff = target - current;
    if diff.abs() < tolerance {
        return Some(0);
    }
    let per_day = monthly_avg_change? / 7.0;
    if sign(diff) != sign(per_day) {
        return None;
    }
    Some((diff.abs() / per_day.abs()).round() as i64)
}

/// Classify the mean step over the last three values
pub fn classify_trend(values: &[f64]) -> Trend {
    if values.len() < 2 {
        return Trend::InsufficientData;
    }
    let recent = &values[values.len().saturating_sub(3)..];
    let steps: Vec<f64> = recent.windows(2).map(|w| w[1] - w[0]).collect();
    let avg = steps.iter().sum::<f64>() / steps.len() as f64;

    if avg.abs() < 0.1 {
        Trend::Stable
    } else if avg > 1.0 {
        Trend::RapidlyIncreasing
    } else if avg > 0.0 {
        Trend::Increasing
    } else if avg < -1.0 {
        Trend::RapidlyDecreasing
    } else {
        Trend::Decreasing
    }
}

/// R² of the least-squares line through `(i, values[i])`
///
/// A flat series fits perfectly (1.0).
fn index_fit_r_squared(values: &[f64]) -> Option<f64> {
    let n = values.len() as f64;
    if n < 2.0 {
        return None;
    }
    let mean_i = (n - 1.0) / 2.0;
    let mean_v = values.iter().sum::<f64>() / n;

    let (mut s_ii, mut s_iv, mut s_vv) = (0.0, 0.0, 0.0);
    for (i, v) in values.iter().enumerate() {
        let di = i as f64 - mean_i;
        let dv = v - mean_v;
        s_ii += di * di;
        s_iv += di * dv;
        s_vv += dv * dv;
    }

    if s_vv < 1e-15 {
        return Some(1.0);
    }
    Some(s_iv * s_iv / (s_ii * s_vv))
}

/// Goodness of a straight-line fit of the values against their index, in [0, 1]
///
/// 0.5 for two values, where any line fits exactly.
pub fn confidence(values: &[f64]) -> Option<f64> {
    match values.len() {
        0 | 1 => None,
        2 => Some(0.5),
        _ => index_fit_r_squared(values).map(|r2| r2.clamp(0.0, 1.0)),
    }
}

/// Summary, forecast and target tracking for one hormone
pub fn summarize(
    series: &HormoneSeries,
    target: Option<f64>,
    options: &AnalyticsOptions,
) -> HormoneSummary {
    let Some((_, current)) = series.latest() else {
        return HormoneSummary::default();
    };
    let tolerance = options.target_tolerance;
    let values = series.values();

    let initial = series.initial().map(|(_, v)| v);
    let monthly = monthly_avg_change(series, options.lookback_days);
    let days = target.and_then(|t| days_to_target(current, t, monthly, tolerance));

    HormoneSummary {
        current: Some(current),
        weekly_change: series.previous().map(|(_, prev)| current - prev),
        monthly_avg_change: monthly,
        total_change: initial.map(|i| current - i),
        initial,
        predicted_next: monthly.map(|m| current + m),
        days_to_target: days,
        trend: classify_trend(&values),
        confidence: confidence(&values),
        target_progress: target
            .zip(initial)
            .map(|(t, i)| target_progress(i, current, t, tolerance)),
        target_status: target.map(|t| target_status(current, t, days, monthly, tolerance)),
    }
}
