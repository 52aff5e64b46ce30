use thiserror::Error;

use crate::domain::{AmountOverflow, ValidationError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("No data for month {month}")]
    NoData { month: String },

    #[error("Invalid month '{0}' (expected YYYY-MM)")]
    InvalidMonth(String),

    #[error("{0}")]
    Overflow(#[from] AmountOverflow),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
