//! Common checks shared by the flow solvers.

use crate::error::{FlowError, FlowResult};
use rf_core::Real;
use rf_rheology::ViscosityModel;

/// Ensure a parameter is finite and strictly positive.
pub fn check_positive(value: Real, what: &'static str) -> FlowResult<Real> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(FlowError::InvalidArg { what })
    }
}

/// Evaluate a viscosity model, rejecting non-positive or non-finite output.
pub fn viscosity_at<V: ViscosityModel + ?Sized>(
    viscosity: &V,
    rate: Real,
    what: &'static str,
) -> FlowResult<Real> {
    let mu = viscosity.viscosity(rate);
    if mu.is_finite() && mu > 0.0 {
        Ok(mu)
    } else {
        Err(FlowError::NonPhysical { what })
    }
}
