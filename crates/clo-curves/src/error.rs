//! Errors produced while constructing or querying a forward-rate curve.

use thiserror::Error;

/// Errors produced by `clo-curves`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurveError {
    /// The curve was given mismatched or insufficient knot data.
    #[error("invalid curve '{curve_id}': {reason}")]
    InvalidCurve {
        /// The curve's identifier (e.g. `EURIBOR_3MO`).
        curve_id: String,
        /// Human-readable detail.
        reason: String,
    },

    /// A curve lookup referenced an unknown curve id.
    #[error("curve not found: {curve_id}")]
    CurveNotFound {
        /// The requested curve id.
        curve_id: String,
    },
}

impl CurveError {
    /// Builds an [`CurveError::InvalidCurve`].
    pub fn invalid_curve(curve_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCurve {
            curve_id: curve_id.into(),
            reason: reason.into(),
        }
    }

    /// Builds a [`CurveError::CurveNotFound`].
    pub fn curve_not_found(curve_id: impl Into<String>) -> Self {
        Self::CurveNotFound {
            curve_id: curve_id.into(),
        }
    }
}

/// Convenience result alias for `clo-curves`.
pub type CurveResult<T> = Result<T, CurveError>;
