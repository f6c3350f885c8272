//! Two power-law branches joined at a switch rate.

use crate::error::{RheologyError, RheologyResult};
use crate::model::{RATE_EPSILON, ViscosityModel, validation};
use rf_core::Real;

/// Bi-power-law fluid.
///
/// The switch rate is where the two branches intersect,
/// `rate_s = 10^(log10(k_high/k_low) / (n_low - n_high))`; the high branch
/// applies for `rate >= rate_s`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BiPowerLaw {
    k_low: Real,
    n_low: Real,
    k_high: Real,
    n_high: Real,
    rate_switch: Real,
}

impl BiPowerLaw {
    pub fn new(k_low: Real, n_low: Real, k_high: Real, n_high: Real) -> RheologyResult<Self> {
        let k_low = validation::positive(k_low, "low-rate consistency index")?;
        let n_low = validation::positive(n_low, "low-rate flow index")?;
        let k_high = validation::positive(k_high, "high-rate consistency index")?;
        let n_high = validation::positive(n_high, "high-rate flow index")?;
        if n_low == n_high {
            return Err(RheologyError::InvalidParameter {
                what: "flow indices must differ",
                value: n_high,
            });
        }
        Ok(Self {
            k_low,
            n_low,
            k_high,
            n_high,
            rate_switch: switch_rate(k_low, n_low, k_high, n_high),
        })
    }

    /// Shear rate [1/s] where the branches meet.
    pub fn rate_switch(&self) -> Real {
        self.rate_switch
    }

    pub fn k_low(&self) -> Real {
        self.k_low
    }

    pub fn n_low(&self) -> Real {
        self.n_low
    }

    pub fn k_high(&self) -> Real {
        self.k_high
    }

    pub fn n_high(&self) -> Real {
        self.n_high
    }
}

fn switch_rate(k_low: Real, n_low: Real, k_high: Real, n_high: Real) -> Real {
    10.0_f64.powf((k_high / k_low).log10() / (n_low - n_high))
}

impl Default for BiPowerLaw {
    fn default() -> Self {
        Self {
            k_low: 1.0,
            n_low: 0.9,
            k_high: 1.0,
            n_high: 0.5,
            rate_switch: switch_rate(1.0, 0.9, 1.0, 0.5),
        }
    }
}

impl ViscosityModel for BiPowerLaw {
    fn name(&self) -> &str {
        "BiPowerLaw"
    }

    fn viscosity(&self, rate: Real) -> Real {
        let shifted = rate + RATE_EPSILON;
        if rate >= self.rate_switch {
            self.k_high * shifted.powf(self.n_high - 1.0)
        } else {
            self.k_low * shifted.powf(self.n_low - 1.0)
        }
    }
}
