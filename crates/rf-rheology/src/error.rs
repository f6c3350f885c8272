//! Viscosity model errors.

use rf_core::RfError;
use thiserror::Error;

/// Result type for viscosity model operations.
pub type RheologyResult<T> = Result<T, RheologyError>;

/// Errors raised while building or sampling viscosity models.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RheologyError {
    /// Model parameter outside its physical range.
    #[error("Invalid parameter {what}: {value}")]
    InvalidParameter { what: &'static str, value: f64 },

    /// Model evaluated to a non-positive or non-finite viscosity.
    #[error("Non-physical viscosity {value} at shear rate {rate}")]
    NonPhysical { rate: f64, value: f64 },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl From<RheologyError> for RfError {
    fn from(err: RheologyError) -> Self {
        match err {
            RheologyError::InvalidParameter { what, .. } => RfError::InvalidArg { what },
            RheologyError::NonPhysical { rate, value } => RfError::Numeric {
                what: format!("non-physical viscosity {value} at shear rate {rate}"),
            },
            RheologyError::InvalidArg { what } => RfError::InvalidArg { what },
        }
    }
}
