//! Extension trait for running the engine directly on a record history
//!
//! ```rust
//! use hormtrack::prelude::*;
//!
//! let records = vec![
//!     MeasurementRecord::at_day(0).estrogen(30.0).testosterone(450.0).build(),
//!     MeasurementRecord::at_day(7).estrogen(60.0).testosterone(400.0).build(),
//! ];
//! let result = records.trajectory(&Config::default()).unwrap();
//! assert_eq!(result.estrogen_level.weekly_change, Some(30.0));
//! ```

use super::analyze::{compute, try_compute_with};
use super::error::AnalyticsError;
use super::types::{AnalyticsOptions, AnalyticsResult};
use crate::data::{Config, MeasurementRecord};

/// Hormone trajectory analytics on an ordered record history
pub trait TrajectoryAnalysis {
    /// Analyze with default options; `None` when there are fewer than two records
    fn trajectory(&self, config: &Config) -> Option<AnalyticsResult>;

    /// Analyze with explicit options
    fn trajectory_with(
        &self,
        config: &Config,
        options: &AnalyticsOptions,
    ) -> Result<AnalyticsResult, AnalyticsError>;
}

impl TrajectoryAnalysis for [MeasurementRecord] {
    fn trajectory(&self, config: &Config) -> Option<AnalyticsResult> {
        compute(self, config)
    }

    fn trajectory_with(
        &self,
        config: &Config,
        options: &AnalyticsOptions,
    ) -> Result<AnalyticsResult, AnalyticsError> {
        try_compute_with(self, config, options)
    }
}
