//! Carreau-Yasuda fluid.

use crate::error::RheologyResult;
use crate::model::{ViscosityModel, validation};
use rf_core::Real;

/// Carreau(-Yasuda) fluid with zero- and infinite-shear plateaus.
///
/// `eta = eta_inf + (eta0 - eta_inf) / (1 + (lambda*rate)^a)^((1-n)/a)`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Carreau {
    eta0: Real,
    eta_inf: Real,
    relaxation_time: Real,
    a: Real,
    n: Real,
}

impl Carreau {
    pub fn new(
        eta0: Real,
        eta_inf: Real,
        relaxation_time: Real,
        a: Real,
        n: Real,
    ) -> RheologyResult<Self> {
        Ok(Self {
            eta0: validation::positive(eta0, "zero-shear viscosity")?,
            eta_inf: validation::non_negative(eta_inf, "infinite-shear viscosity")?,
            relaxation_time: validation::positive(relaxation_time, "relaxation time")?,
            a: validation::positive(a, "transition exponent")?,
            n: validation::positive(n, "flow index")?,
        })
    }

    pub fn eta0(&self) -> Real {
        self.eta0
    }

    pub fn eta_inf(&self) -> Real {
        self.eta_inf
    }

    pub fn relaxation_time(&self) -> Real {
        self.relaxation_time
    }

    pub fn a(&self) -> Real {
        self.a
    }

    pub fn n(&self) -> Real {
        self.n
    }
}

impl Default for Carreau {
    fn default() -> Self {
        Self {
            eta0: 10.0,
            eta_inf: 0.1,
            relaxation_time: 1.0,
            a: 2.0,
            n: 0.5,
        }
    }
}

impl ViscosityModel for Carreau {
    fn name(&self) -> &str {
        "Carreau"
    }

    fn viscosity(&self, rate: Real) -> Real {
        let lr = (self.relaxation_time * rate).powf(self.a);
        self.eta_inf + (self.eta0 - self.eta_inf) / (1.0 + lr).powf((1.0 - self.n) / self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plateaus() {
        let model = Carreau::default();
        assert!((model.viscosity(0.0) - 10.0).abs() < 1e-12);
        let high = model.viscosity(1e12);
        assert!(high > 0.1 && high < 0.1 + 1e-4);
    }

    #[test]
    fn monotone_between_plateaus() {
        let model = Carreau::default();
        let rates = [0.01, 0.1, 1.0, 10.0, 100.0];
        for w in rates.windows(2) {
            assert!(model.viscosity(w[0]) > model.viscosity(w[1]));
        }
    }
}
