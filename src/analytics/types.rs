//! Analytics types: options, intermediate quantities and results
//!
//! This module defines the public types of the engine:
//! - [`AnalyticsOptions`]: engine constants
//! - [`AnalyticsResult`]: the complete output object
//! - [`InfluenceMap`]: learned per-substance influence, in registry order

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Mul, Sub};

use super::error::AnalyticsError;
use crate::data::{Hormone, SubstanceId};

// ============================================================================
// Configuration Types
// ============================================================================

/// Engine constants
///
/// The defaults are the calibrated values; results are only comparable between runs that
/// use the same options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsOptions {
    /// Outer iterations of the attribution solver (default: 15, no early exit)
    pub iterations: usize,
    /// Shortest gap in days between two records that forms a period (default: 1.0)
    pub min_days_interval: f64,
    /// IQR multiplier for outlier trimming (default: 1.5)
    pub iqr_factor: f64,
    /// Fewest per-mg samples for which trimming is applied (default: 4, at least 1)
    pub min_iqr_samples: usize,
    /// Look-back window of the monthly average change, in days (default: 28.0)
    pub lookback_days: f64,
    /// Distance to a target below which it counts as reached (default: 0.01)
    pub target_tolerance: f64,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self {
            iterations: 15,
            min_days_interval: 1.0,
            iqr_factor: 1.5,
            min_iqr_samples: 4,
            lookback_days: 28.0,
            target_tolerance: 0.01,
        }
    }
}

impl AnalyticsOptions {
    /// Set the number of solver iterations
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the IQR multiplier
    pub fn with_iqr_factor(mut self, factor: f64) -> Self {
        self.iqr_factor = factor;
        self
    }

    /// Set the monthly look-back window
    pub fn with_lookback_days(mut self, days: f64) -> Self {
        self.lookback_days = days;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), AnalyticsError> {
        let invalid = |param: &str, value: String| {
            Err(AnalyticsError::InvalidOption {
                param: param.to_string(),
                value,
            })
        };
        if self.iterations == 0 {
            return invalid("iterations", self.iterations.to_string());
        }
        if !(self.min_days_interval > 0.0) {
            return invalid("min_days_interval", self.min_days_interval.to_string());
        }
        if self.min_iqr_samples == 0 {
            return invalid("min_iqr_samples", self.min_iqr_samples.to_string());
        }
        if !(self.iqr_factor >= 0.0) {
            return invalid("iqr_factor", self.iqr_factor.to_string());
        }
        if !(self.lookback_days > 0.0) {
            return invalid("lookback_days", self.lookback_days.to_string());
        }
        if !(self.target_tolerance >= 0.0) {
            return invalid("target_tolerance", self.target_tolerance.to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Intermediate quantities
// ============================================================================

/// A pair of estrogen / testosterone quantities (levels, deltas or rates)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HormonePair {
    pub estrogen: f64,
    pub testosterone: f64,
}

impl HormonePair {
    pub fn new(estrogen: f64, testosterone: f64) -> Self {
        Self {
            estrogen,
            testosterone,
        }
    }

    pub fn get(&self, hormone: Hormone) -> f64 {
        match hormone {
            Hormone::Estrogen => self.estrogen,
            Hormone::Testosterone => self.testosterone,
        }
    }
}

impl Add for HormonePair {
    type Output = HormonePair;

    fn add(self, rhs: HormonePair) -> HormonePair {
        HormonePair::new(self.estrogen + rhs.estrogen, self.testosterone + rhs.testosterone)
    }
}

impl Sub for HormonePair {
    type Output = HormonePair;

    fn sub(self, rhs: HormonePair) -> HormonePair {
        HormonePair::new(self.estrogen - rhs.estrogen, self.testosterone - rhs.testosterone)
    }
}

impl Mul<f64> for HormonePair {
    type Output = HormonePair;

    fn mul(self, rhs: f64) -> HormonePair {
        HormonePair::new(self.estrogen * rhs, self.testosterone * rhs)
    }
}

// ============================================================================
// Influence
// ============================================================================

/// Weekly level change attributable to one weekly mg of a substance
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Influence {
    #[serde(rename = "estrogen")]
    pub estrogen_per_mg_week: f64,
    #[serde(rename = "testosterone")]
    pub testosterone_per_mg_week: f64,
}

impl Influence {
    pub fn new(estrogen_per_mg_week: f64, testosterone_per_mg_week: f64) -> Self {
        Self {
            estrogen_per_mg_week,
            testosterone_per_mg_week,
        }
    }

    pub fn get(&self, hormone: Hormone) -> f64 {
        match hormone {
            Hormone::Estrogen => self.estrogen_per_mg_week,
            Hormone::Testosterone => self.testosterone_per_mg_week,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.estrogen_per_mg_week == 0.0 && self.testosterone_per_mg_week == 0.0
    }
}

/// Learned influence per substance, kept in substance registry order
///
/// Serializes as a JSON object whose keys are substance ids, in the same order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InfluenceMap {
    entries: Vec<(SubstanceId, Influence)>,
}

impl InfluenceMap {
    pub fn new(entries: Vec<(SubstanceId, Influence)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, id: &SubstanceId) -> Option<&Influence> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SubstanceId, &Influence)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn ids(&self) -> impl Iterator<Item = &SubstanceId> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when no substance has a nonzero influence
    pub fn is_all_zero(&self) -> bool {
        self.entries.iter().all(|(_, v)| v.is_zero())
    }
}

impl Serialize for InfluenceMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, influence) in &self.entries {
            map.serialize_entry(id, influence)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for InfluenceMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct InfluenceVisitor;

        impl<'de> Visitor<'de> for InfluenceVisitor {
            type Value = InfluenceMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of substance ids to influences")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut entries = Vec::new();
                while let Some((id, influence)) = map.next_entry::<SubstanceId, Influence>()? {
                    entries.push((id, influence));
                }
                Ok(InfluenceMap { entries })
            }
        }

        deserializer.deserialize_map(InfluenceVisitor)
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Direction of the most recent steps of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Trend {
    RapidlyIncreasing,
    Increasing,
    Stable,
    Decreasing,
    RapidlyDecreasing,
    #[default]
    InsufficientData,
}

/// Where the current trajectory stands relative to a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetStatus {
    /// Current value within tolerance of the target
    Achieved,
    /// Trend moves toward the target; a day estimate is available
    OnTrack,
    /// Trend moves away from the target
    MovingAway,
    /// Not enough data to tell
    InsufficientData,
}

/// Summary and forecast of one hormone
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HormoneSummary {
    /// Latest level
    pub current: Option<f64>,
    /// Latest minus previous level
    pub weekly_change: Option<f64>,
    /// Average change per 7 days over roughly the last month
    pub monthly_avg_change: Option<f64>,
    /// Latest minus first level
    pub total_change: Option<f64>,
    /// First level
    pub initial: Option<f64>,
    /// Latest level plus one more week at the monthly average rate
    pub predicted_next: Option<f64>,
    /// Days until the target is reached at the monthly average rate
    pub days_to_target: Option<i64>,
    pub trend: Trend,
    /// R² of a linear fit over the series, in [0, 1]
    pub confidence: Option<f64>,
    /// Percentage of the way from the initial level to the target, in [0, 100]
    pub target_progress: Option<f64>,
    pub target_status: Option<TargetStatus>,
}

/// Testosterone summary, with the estrogen-driven suppression estimate
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestosteroneSummary {
    #[serde(flatten)]
    pub level: HormoneSummary,
    /// Endogenous production suppressed at the latest estrogen level (ng/dL, negative)
    ///
    /// `None` when the biological sex has no testosterone baseline, or when no record
    /// carries a usable estrogen level.
    pub daily_suppression: Option<f64>,
}

/// Complete output of one computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResult {
    pub estrogen_level: HormoneSummary,
    pub testosterone_level: TestosteroneSummary,
    pub influence: InfluenceMap,
}

impl AnalyticsResult {
    /// Summary of one hormone
    pub fn summary(&self, hormone: Hormone) -> &HormoneSummary {
        match hormone {
            Hormone::Estrogen => &self.estrogen_level,
            Hormone::Testosterone => &self.testosterone_level.level,
        }
    }

    /// Serialize to the JSON object consumed by presentation code
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
