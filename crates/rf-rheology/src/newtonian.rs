//! Constant-viscosity fluid.

use crate::error::RheologyResult;
use crate::model::{ViscosityModel, validation};
use rf_core::Real;
use rf_core::units::DynVisc;

/// Newtonian fluid: viscosity independent of shear rate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Newtonian {
    mu: Real,
}

impl Newtonian {
    pub fn new(mu: DynVisc) -> RheologyResult<Self> {
        Ok(Self {
            mu: validation::positive(mu.value, "viscosity")?,
        })
    }

    /// Dynamic viscosity [Pa·s].
    pub fn mu(&self) -> Real {
        self.mu
    }
}

impl Default for Newtonian {
    fn default() -> Self {
        Self { mu: 1.0 }
    }
}

impl ViscosityModel for Newtonian {
    fn name(&self) -> &str {
        "Newtonian"
    }

    fn viscosity(&self, _rate: Real) -> Real {
        self.mu
    }
}
