//! Crate-wide error type for the CLO simulation engine.

use thiserror::Error;

/// Errors raised while building or simulating a [`crate::clo::Clo`].
///
/// Each variant names the failed invariant and the offending entity's
/// identifier, per the engine's error-handling design.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Negative credit, report date on or after next payment date, a missing
    /// equity tranche, an unrecognised asset kind, or an unrecognised
    /// liquidation type.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Human-readable detail naming the offending field/entity.
        reason: String,
    },

    /// An asset was already matured at construction, or the portfolio was
    /// empty after filtering matured assets.
    #[error("data integrity violation: {reason}")]
    DataIntegrity {
        /// Human-readable detail.
        reason: String,
    },

    /// The WAL-constrained reinvestment maturity could not satisfy the
    /// configured WAL limit.
    #[error("WAL limit of {limit_years} years breached while sizing reinvestment maturity: {reason}")]
    WalLimitBreached {
        /// The configured WAL ceiling, in years.
        limit_years: rust_decimal::Decimal,
        /// Human-readable detail.
        reason: String,
    },

    /// A day-count convention or dialect was requested that this engine does
    /// not support.
    #[error("unsupported configuration: {reason}")]
    UnsupportedConfiguration {
        /// Human-readable detail.
        reason: String,
    },
}

impl EngineError {
    /// Builds an [`EngineError::InvalidInput`].
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput { reason: reason.into() }
    }

    /// Builds an [`EngineError::DataIntegrity`].
    pub fn data_integrity(reason: impl Into<String>) -> Self {
        Self::DataIntegrity { reason: reason.into() }
    }

    /// Builds an [`EngineError::WalLimitBreached`].
    pub fn wal_limit_breached(limit_years: rust_decimal::Decimal, reason: impl Into<String>) -> Self {
        Self::WalLimitBreached {
            limit_years,
            reason: reason.into(),
        }
    }

    /// Builds an [`EngineError::UnsupportedConfiguration`].
    pub fn unsupported_configuration(reason: impl Into<String>) -> Self {
        Self::UnsupportedConfiguration { reason: reason.into() }
    }
}

/// Convenience result alias for `clo-engine`.
pub type EngineResult<T> = Result<T, EngineError>;
