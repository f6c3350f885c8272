//! Herschel-Bulkley yield-stress fluid.

use crate::error::RheologyResult;
use crate::model::{RATE_EPSILON, ViscosityModel, validation};
use rf_core::Real;

/// Treatment of the yield-stress singularity at zero shear rate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Regularization {
    /// Plain `tau_y / (rate + eps)` term.
    None,
    /// Papanastasiou: yield term scaled by `1 - exp(-m * rate)`.
    Papanastasiou { m: Real },
}

impl Default for Regularization {
    fn default() -> Self {
        Regularization::Papanastasiou { m: 1000.0 }
    }
}

impl Regularization {
    /// Multiplier applied to the yield-stress term.
    pub fn factor(&self, rate: Real) -> Real {
        match self {
            Regularization::None => 1.0,
            Regularization::Papanastasiou { m } => 1.0 - (-m * rate).exp(),
        }
    }

    pub(crate) fn validated(self) -> RheologyResult<Self> {
        match self {
            Regularization::None => Ok(self),
            Regularization::Papanastasiou { m } => {
                validation::positive(m, "regularization exponent")?;
                Ok(self)
            }
        }
    }
}

/// Herschel-Bulkley fluid, `tau = tau_y + k * rate^n` above yield.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HerschelBulkley {
    yield_stress: Real,
    k: Real,
    n: Real,
    regularization: Regularization,
}

impl HerschelBulkley {
    pub fn new(
        yield_stress: Real,
        k: Real,
        n: Real,
        regularization: Regularization,
    ) -> RheologyResult<Self> {
        Ok(Self {
            yield_stress: validation::non_negative(yield_stress, "yield stress")?,
            k: validation::positive(k, "consistency index")?,
            n: validation::positive(n, "flow index")?,
            regularization: regularization.validated()?,
        })
    }

    pub fn yield_stress(&self) -> Real {
        self.yield_stress
    }

    pub fn k(&self) -> Real {
        self.k
    }

    pub fn n(&self) -> Real {
        self.n
    }

    pub fn regularization(&self) -> Regularization {
        self.regularization
    }
}

impl Default for HerschelBulkley {
    fn default() -> Self {
        Self {
            yield_stress: 1.0,
            k: 1.0,
            n: 1.0,
            regularization: Regularization::default(),
        }
    }
}

impl ViscosityModel for HerschelBulkley {
    fn name(&self) -> &str {
        "HerschelBulkley"
    }

    fn viscosity(&self, rate: Real) -> Real {
        let shifted = rate + RATE_EPSILON;
        self.regularization.factor(rate) * self.yield_stress / shifted
            + self.k * shifted.powf(self.n - 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bingham_stress_above_yield() {
        let model = HerschelBulkley::new(2.0, 0.5, 1.0, Regularization::None).unwrap();
        // tau = 2 + 0.5 * 10
        assert!((model.stress(10.0) - 7.0).abs() < 1e-6);
    }

    #[test]
    fn regularized_model_is_finite_at_zero() {
        let model = HerschelBulkley::default();
        let eta = model.viscosity(0.0);
        assert!(eta.is_finite() && eta > 0.0);
        // Papanastasiou factor removes the 1/eps blow-up at rate 0
        assert!(eta < 10.0);
    }

    #[test]
    fn unregularized_model_is_large_at_zero() {
        let model = HerschelBulkley::new(1.0, 1.0, 1.0, Regularization::None).unwrap();
        assert!(model.viscosity(0.0) > 1e8);
    }

    #[test]
    fn rejects_bad_regularization() {
        let reg = Regularization::Papanastasiou { m: 0.0 };
        assert!(HerschelBulkley::new(1.0, 1.0, 1.0, reg).is_err());
    }
}
