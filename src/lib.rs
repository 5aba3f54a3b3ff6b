//! Hormone trajectory analytics
//!
//! Estimates how much each medication contributes to the change of estrogen and
//! testosterone levels, net of the body's own recovery toward baseline, and forecasts the
//! near-term trajectory of both hormones from a sparse history of lab results.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`data`] | measurement records, configuration, units, the substance registry, CSV/JSON input |
//! | [`analytics`] | natural recovery model, period building, attribution solver, forecasts |
//! | [`error`] | crate-level error type |

pub mod analytics;
pub mod data;
pub mod error;

pub use crate::analytics::{
    compute, try_compute, try_compute_with, AnalyticsOptions, AnalyticsResult, TrajectoryAnalysis,
};
pub use crate::data::*;
pub use error::HormoneError;

pub mod prelude {
    pub mod data {
        pub use crate::data::{
            parser::{read_records, records_from_csv, records_from_json},
            Config, HormoneUnits, MeasurementRecord, SubstanceRegistry,
        };
    }
    pub mod analytics {
        pub use crate::analytics::{
            attribution::AttributionSolver,
            forecast::HormoneSeries,
            period::PeriodSample,
            recovery::{daily_suppression, suppression_rate, Baselines},
        };
    }

    pub use crate::analytics::{
        compute, try_compute, try_compute_with, AnalyticsError, AnalyticsOptions, AnalyticsResult,
        HormoneSummary, Influence, InfluenceMap, TargetStatus, TestosteroneSummary, Trend,
    };
    pub use crate::data::*;
    pub use crate::error::HormoneError;

    //extension traits
    pub use crate::analytics::TrajectoryAnalysis;
}
