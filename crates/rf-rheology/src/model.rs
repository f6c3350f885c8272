//! Viscosity model trait and parameter validation helpers.

use crate::error::{RheologyError, RheologyResult};
use rf_core::Real;

/// Shear-rate offset applied by models that are singular at zero rate.
///
/// Keeps power-law and yield-stress viscosities finite at `rate = 0`.
pub const RATE_EPSILON: Real = 1e-9;

/// Trait for generalized Newtonian viscosity models.
///
/// Implementations must be thread-safe (Send + Sync) so independent flow
/// solves can share one model. `viscosity` must be total, positive and finite
/// for every `rate >= 0`; the solvers assume nothing else about the curve
/// (no differentiability, convexity or monotonicity).
pub trait ViscosityModel: Send + Sync {
    /// Model name (for debugging/logging).
    fn name(&self) -> &str {
        "custom"
    }

    /// Apparent viscosity [Pa·s] at shear rate `rate` [1/s].
    fn viscosity(&self, rate: Real) -> Real;

    /// Shear stress [Pa] at shear rate `rate` [1/s].
    fn stress(&self, rate: Real) -> Real {
        rate * self.viscosity(rate)
    }
}

impl<F> ViscosityModel for F
where
    F: Fn(Real) -> Real + Send + Sync,
{
    fn viscosity(&self, rate: Real) -> Real {
        self(rate)
    }
}

/// Validation helpers for model parameters.
pub(crate) mod validation {
    use super::*;

    /// Ensure a parameter is strictly positive and finite.
    pub fn positive(value: Real, what: &'static str) -> RheologyResult<Real> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(RheologyError::InvalidParameter { what, value })
        }
    }

    /// Ensure a parameter is non-negative and finite.
    pub fn non_negative(value: Real, what: &'static str) -> RheologyResult<Real> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(RheologyError::InvalidParameter { what, value })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_models() {
        let model = |_rate: Real| 2.5;
        assert_eq!(model.viscosity(10.0), 2.5);
        assert_eq!(model.stress(10.0), 25.0);
        assert_eq!(model.name(), "custom");
    }

    #[test]
    fn validation_rejects_bad_values() {
        assert!(validation::positive(0.0, "k").is_err());
        assert!(validation::positive(Real::NAN, "k").is_err());
        assert!(validation::non_negative(0.0, "tau_y").is_ok());
        assert!(validation::non_negative(-1e-3, "tau_y").is_err());
    }
}
