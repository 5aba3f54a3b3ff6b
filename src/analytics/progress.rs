//! Progress toward target levels

use super::types::TargetStatus;

/// Percentage of the distance from `initial` to `target` already covered, in [0, 100]
///
/// When the initial level is already within `tolerance` of the target the target counts as
/// met (100), which also avoids dividing by a vanishing distance.
pub fn target_progress(initial: f64, current: f64, target: f64, tolerance: f64) -> f64 {
    let total = (target - initial).abs();
    if total < tolerance {
        return 100.0;
    }
    let remaining = (target - current).abs();
    ((total - remaining) / total * 100.0).clamp(0.0, 100.0)
}

/// Classify the current position and trend against a target
pub fn target_status(
    current: f64,
    target: f64,
    days_to_target: Option<i64>,
    monthly_avg_change: Option<f64>,
    tolerance: f64,
) -> TargetStatus {
    let diff = target - current;
    if diff.abs() < tolerance {
        return TargetStatus::Achieved;
    }
    if days_to_target.is_some() {
        return TargetStatus::OnTrack;
    }
    match monthly_avg_change {
        Some(rate) if rate != 0.0 && (rate > 0.0) != (diff > 0.0) => TargetStatus::MovingAway,
        _ => TargetStatus::InsufficientData,
    }
}
