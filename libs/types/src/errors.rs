//! Validation errors for incoming calendar submissions

use thiserror::Error;

/// Rejection raised before any cache or store access
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyIdentifier { field: &'static str },

    #[error("coefficient must be finite, got {value}")]
    NonFiniteCoefficient { value: f64 },

    #[error("date is missing")]
    MissingDate,

    #[error("invalid timestamp: seconds={seconds}, nanos={nanos}")]
    InvalidTimestamp { seconds: i64, nanos: i32 },

    #[error("invalid date: {input}")]
    InvalidDate { input: String },

    #[error("date {date} is outside the supported range {min}..={max}")]
    DateOutOfRange {
        date: String,
        min: String,
        max: String,
    },
}
