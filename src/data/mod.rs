//! Input side of the engine: measurement records, substances, configuration and units
//!
//! Records come from the tracking app's store (JSON) or a CSV export. Values are parsed
//! defensively: anything that is not a usable number reads as missing.

pub mod config;
pub mod error;
pub mod parser;
pub mod record;
pub mod substance;
pub mod units;

pub use config::{BiologicalSex, Config, Mode, Targets};
pub use error::DataError;
pub use parser::{read_records, records_from_csv, records_from_json};
pub use record::{days_between, Hormone, MeasurementRecord, RecordBuilder, MS_PER_DAY};
pub use substance::{DrugProfile, DrugRole, KnownSubstance, Role, SubstanceId, SubstanceRegistry};
pub use units::{EstrogenUnit, HormoneUnits, TestosteroneUnit};
