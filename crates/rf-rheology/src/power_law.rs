//! Ostwald-de Waele power-law fluid.

use crate::error::RheologyResult;
use crate::model::{RATE_EPSILON, ViscosityModel, validation};
use rf_core::Real;

/// Power-law fluid, `eta = k * rate^(n-1)`.
///
/// `n < 1` is shear-thinning, `n > 1` shear-thickening. The rate is offset by
/// [`RATE_EPSILON`] so the viscosity stays finite at zero rate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerLaw {
    k: Real,
    n: Real,
}

impl PowerLaw {
    /// `k` is the consistency index [Pa·s^n], `n` the flow index.
    pub fn new(k: Real, n: Real) -> RheologyResult<Self> {
        Ok(Self {
            k: validation::positive(k, "consistency index")?,
            n: validation::positive(n, "flow index")?,
        })
    }

    pub fn k(&self) -> Real {
        self.k
    }

    pub fn n(&self) -> Real {
        self.n
    }
}

impl Default for PowerLaw {
    fn default() -> Self {
        Self { k: 1.0, n: 0.5 }
    }
}

impl ViscosityModel for PowerLaw {
    fn name(&self) -> &str {
        "PowerLaw"
    }

    fn viscosity(&self, rate: Real) -> Real {
        self.k * (rate + RATE_EPSILON).powf(self.n - 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shear_thinning_decreases() {
        let model = PowerLaw::new(2.0, 0.5).unwrap();
        assert!(model.viscosity(10.0) > model.viscosity(100.0));
        // eta(100) = 2 * 100^-0.5 = 0.2
        assert!((model.viscosity(100.0) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn finite_at_zero_rate() {
        let model = PowerLaw::default();
        let eta = model.viscosity(0.0);
        assert!(eta.is_finite() && eta > 0.0);
    }

    #[test]
    fn unit_index_is_newtonian() {
        let model = PowerLaw::new(0.3, 1.0).unwrap();
        assert_eq!(model.viscosity(5.0), 0.3);
    }
}
