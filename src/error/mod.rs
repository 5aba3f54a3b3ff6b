use thiserror::Error;

use crate::analytics::AnalyticsError;
use crate::data::DataError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HormoneError {
    #[error("Error in the input data: {0}")]
    DataError(#[from] DataError),
    #[error("Error in the analytics engine: {0}")]
    AnalyticsError(#[from] AnalyticsError),
}
