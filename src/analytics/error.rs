//! Analytics error types

use thiserror::Error;

/// Errors that can occur during a computation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// Fewer records than a computation needs
    #[error("Insufficient data: {n} records, need at least {required}")]
    InsufficientData { n: usize, required: usize },

    /// Invalid option value
    #[error("Invalid option: {param} = {value}")]
    InvalidOption { param: String, value: String },
}
