//! Three-component yield-stress model.

use crate::error::RheologyResult;
use crate::herschel_bulkley::Regularization;
use crate::model::{RATE_EPSILON, ViscosityModel, validation};
use rf_core::Real;

/// Yield stress plus a square-root shear-thinning term plus a Newtonian
/// background:
///
/// `tau = tau_y + tau_y * sqrt(rate / rate_c) + eta_bg * rate`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThreeComponent {
    yield_stress: Real,
    critical_rate: Real,
    background_viscosity: Real,
    regularization: Regularization,
}

impl ThreeComponent {
    pub fn new(
        yield_stress: Real,
        critical_rate: Real,
        background_viscosity: Real,
        regularization: Regularization,
    ) -> RheologyResult<Self> {
        Ok(Self {
            yield_stress: validation::non_negative(yield_stress, "yield stress")?,
            critical_rate: validation::positive(critical_rate, "critical shear rate")?,
            background_viscosity: validation::positive(
                background_viscosity,
                "background viscosity",
            )?,
            regularization: regularization.validated()?,
        })
    }

    pub fn yield_stress(&self) -> Real {
        self.yield_stress
    }

    pub fn critical_rate(&self) -> Real {
        self.critical_rate
    }

    pub fn background_viscosity(&self) -> Real {
        self.background_viscosity
    }
}

impl Default for ThreeComponent {
    fn default() -> Self {
        Self {
            yield_stress: 1.0,
            critical_rate: 1.0,
            background_viscosity: 1.0,
            regularization: Regularization::default(),
        }
    }
}

impl ViscosityModel for ThreeComponent {
    fn name(&self) -> &str {
        "ThreeComponent"
    }

    fn viscosity(&self, rate: Real) -> Real {
        let yield_term = self.yield_stress / (rate + RATE_EPSILON);
        self.regularization.factor(rate) * yield_term
            + yield_term * (rate / self.critical_rate).sqrt()
            + self.background_viscosity
    }
}
