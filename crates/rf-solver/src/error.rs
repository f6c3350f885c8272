//! Error types for solver operations.

use rf_core::error::RfError;
use thiserror::Error;

/// Errors that can occur in the numeric kernels.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Root not bracketed in [{lo}, {hi}]: f(lo) = {f_lo}, f(hi) = {f_hi}")]
    RootBracket {
        lo: f64,
        hi: f64,
        f_lo: f64,
        f_hi: f64,
    },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for RfError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::RootBracket { .. } => RfError::Numeric {
                what: e.to_string(),
            },
            SolverError::ConvergenceFailed { what } => RfError::Numeric { what },
            SolverError::NonFinite { what, value } => RfError::NonFinite { what, value },
            SolverError::Numeric { what } => RfError::Numeric { what },
            SolverError::InvalidArg { what } => RfError::InvalidArg { what },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracket_error_reports_interval() {
        let err = SolverError::RootBracket {
            lo: 0.0,
            hi: 1e6,
            f_lo: -1.0,
            f_hi: -0.5,
        };
        let msg = err.to_string();
        assert!(msg.contains("1000000"));
        assert!(msg.contains("-0.5"));
    }

    #[test]
    fn error_conversion() {
        let err = SolverError::InvalidArg { what: "test" };
        let rf: RfError = err.into();
        assert!(matches!(rf, RfError::InvalidArg { .. }));
    }
}
