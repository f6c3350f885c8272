//! Error types for flow solves.

use rf_core::{Real, RfError};
use rf_rheology::RheologyError;
use rf_solver::SolverError;
use thiserror::Error;

/// Errors raised by the flow solvers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    /// A bracketed search found no sign change.
    #[error("No {what} solution for target {target} in [{lo}, {hi}]")]
    RootBracket {
        what: &'static str,
        target: Real,
        lo: Real,
        hi: Real,
    },

    /// A dependent quantity was read before any driver was set.
    #[error("{what} is unavailable: no driver has been set")]
    Unsolved { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// An iterative solve stopped without a root for its target.
    #[error("No converged {what} solution for target {target}: {reason}")]
    Unconverged {
        what: &'static str,
        target: Real,
        reason: String,
    },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("Rheology error: {0}")]
    Rheology(#[from] RheologyError),
}

pub type FlowResult<T> = Result<T, FlowError>;

impl FlowError {
    /// Attach the searched quantity and its target to a bare bracket failure.
    ///
    /// Errors that already carry context (or are not bracket failures) pass
    /// through unchanged.
    pub(crate) fn bracket_context(self, what: &'static str, target: Real) -> Self {
        match self {
            FlowError::Solver(SolverError::RootBracket { lo, hi, .. }) => FlowError::RootBracket {
                what,
                target,
                lo,
                hi,
            },
            other => other,
        }
    }

    /// Attach the driven quantity and its target to a numeric kernel failure.
    pub(crate) fn convergence_context(self, what: &'static str, target: Real) -> Self {
        match self {
            FlowError::Solver(e) => FlowError::Unconverged {
                what,
                target,
                reason: e.to_string(),
            },
            other => other,
        }
    }
}

impl From<FlowError> for RfError {
    fn from(e: FlowError) -> Self {
        match e {
            FlowError::InvalidArg { what } => RfError::InvalidArg { what },
            FlowError::NonPhysical { what } | FlowError::Unsolved { what } => {
                RfError::Invariant { what }
            }
            FlowError::Solver(e) => e.into(),
            FlowError::Rheology(e) => e.into(),
            e @ (FlowError::RootBracket { .. } | FlowError::Unconverged { .. }) => {
                RfError::Numeric {
                    what: e.to_string(),
                }
            }
        }
    }
}
