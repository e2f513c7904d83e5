//! Error types for timecast operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimecastError {
    #[error("Out of range: {0}")]
    Overflow(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Unrecognized value: {0}")]
    Unrecognized(String),
}

pub type Result<T> = std::result::Result<T, TimecastError>;
