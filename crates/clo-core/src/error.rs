//! Crate-wide error type for date, day-count, and calendar utilities.

use thiserror::Error;

/// Errors produced by `clo-core`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A date could not be constructed (out-of-range year/month/day).
    #[error("invalid date: {message}")]
    InvalidDate {
        /// Human-readable detail.
        message: String,
    },

    /// A day-count convention string did not match any known convention.
    #[error("unsupported day-count convention: {name}")]
    UnsupportedDayCount {
        /// The unrecognised convention name.
        name: String,
    },
}

impl CoreError {
    /// Builds an [`CoreError::InvalidDate`].
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Builds an [`CoreError::UnsupportedDayCount`].
    pub fn unsupported_day_count(name: impl Into<String>) -> Self {
        Self::UnsupportedDayCount { name: name.into() }
    }
}

/// Convenience result alias for `clo-core`.
pub type CoreResult<T> = Result<T, CoreError>;
