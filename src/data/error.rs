//! Error types for record and configuration input
//!
//! [`DataError`] covers problems with the data handed to the engine: unreadable
//! CSV/JSON input, values outside their physical domain, and unknown unit labels.
//! The analytics engine itself never raises these; it treats bad values as missing.

use thiserror::Error;

/// Errors arising from record and configuration input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// Error encountered when reading CSV data
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error encountered when parsing JSON data
    #[error("JSON error: {0}")]
    JsonError(String),

    /// A level or dose is negative or not finite
    #[error("Invalid value for {field} at timestamp {timestamp}: {value}")]
    InvalidValue {
        /// Name of the offending field
        field: String,
        /// Timestamp of the record carrying the value
        timestamp: i64,
        /// The rejected value
        value: f64,
    },

    /// A unit label that is not known for the hormone
    #[error("Unknown unit '{unit}' for {hormone}")]
    UnknownUnit {
        /// The hormone the unit was given for
        hormone: String,
        /// The unrecognized label
        unit: String,
    },
}
