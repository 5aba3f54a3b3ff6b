//! Hormone trajectory analytics
//!
//! Given a sparse, irregularly sampled history of hormone levels and concurrent daily doses,
//! this module separates medication-driven change from the change the body would undergo
//! anyway, estimates a per-substance dose-response coefficient, and forecasts near-term
//! levels and time to target.
//!
//! # Pipeline
//!
//! | Step | Module | Output |
//! |------|--------|--------|
//! | Substance discovery | [`crate::data::substance`] | [`SubstanceRegistry`](crate::data::SubstanceRegistry), fixed enumeration order |
//! | Period building | [`period`] | one [`PeriodSample`] per usable consecutive record pair |
//! | Natural recovery | [`recovery`] | modeled baseline relaxation and suppression per period |
//! | Attribution | [`attribution`] | [`InfluenceMap`]: weekly change per weekly mg |
//! | Forecast | [`forecast`], [`progress`] | [`HormoneSummary`] per hormone |
//!
//! # Usage
//!
//! ```rust
//! use hormtrack::prelude::*;
//!
//! let records = vec![
//!     MeasurementRecord::at_day(0).estrogen(35.0).testosterone(540.0).build(),
//!     MeasurementRecord::at_day(14)
//!         .estrogen(95.0)
//!         .testosterone(380.0)
//!         .dose(KnownSubstance::Estradiol, 2.0)
//!         .dose(KnownSubstance::AntiAndrogen, 12.5)
//!         .build(),
//!     MeasurementRecord::at_day(42)
//!         .estrogen(160.0)
//!         .testosterone(120.0)
//!         .dose(KnownSubstance::Estradiol, 4.0)
//!         .dose(KnownSubstance::AntiAndrogen, 12.5)
//!         .build(),
//! ];
//! let config = Config::new(BiologicalSex::Male, Mode::Feminizing)
//!     .with_target(Hormone::Estrogen, 200.0);
//!
//! let result = compute(&records, &config).unwrap();
//! let estradiol = result
//!     .influence
//!     .get(&SubstanceId::Known(KnownSubstance::Estradiol))
//!     .unwrap();
//! assert!(estradiol.estrogen_per_mg_week >= 0.0);
//! println!("{}", result.to_json().unwrap());
//! ```

mod analyze;
pub mod attribution;
mod error;
pub mod forecast;
pub mod period;
pub mod progress;
pub mod recovery;
mod traits;
mod types;


pub use analyze::{compute, try_compute, try_compute_with, MIN_RECORDS};
pub use attribution::AttributionSolver;
pub use error::AnalyticsError;
pub use forecast::HormoneSeries;
pub use period::PeriodSample;
pub use traits::TrajectoryAnalysis;
pub use types::{
    AnalyticsOptions, AnalyticsResult, HormonePair, HormoneSummary, Influence, InfluenceMap,
    TargetStatus, TestosteroneSummary, Trend,
};
