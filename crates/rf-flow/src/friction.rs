//! Fanning friction factor for generalized Newtonian pipe flow.
//!
//! [`DodgeMetzner`] adapts the Newtonian von Kármán form to non-Newtonian
//! fluids through the generalized flow index `n'`, the local log-log slope
//! of the wall stress against the wall shear rate.

use crate::error::{FlowError, FlowResult};
use crate::shear::invert_shear_rate;
use rf_core::Real;
use rf_rheology::ViscosityModel;
use rf_solver::{BracketConfig, SolverError, brent};
use serde::{Deserialize, Serialize};

/// Offset keeping the turbulent correlation finite at `f = 0`.
pub const FRICTION_EPSILON: Real = 1e-9;

/// Laminar friction factor below which flow is treated as turbulent.
pub const TURBULENT_CUTOFF: Real = 0.008;

/// Flow regime as classified by the friction correlation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowRegime {
    Laminar,
    Turbulent,
}

/// Laminar Fanning friction factor `16 / re`.
pub fn laminar_fanning(re: Real) -> Real {
    16.0 / (re.abs() + 1e-9)
}

/// Unclamped generalized flow index at `rate`.
///
/// Forward difference of `log10(stress)` against `log10(rate)` with step
/// `step` in rate.
pub fn generalized_index<V: ViscosityModel + ?Sized>(
    viscosity: &V,
    rate: Real,
    step: Real,
) -> Real {
    let ahead = rate + step;
    (viscosity.stress(ahead).log10() - viscosity.stress(rate).log10())
        / (ahead.log10() - rate.log10())
}

/// Friction factor correlation seam for the pipe solver.
pub trait FrictionCorrelation: Send + Sync {
    fn name(&self) -> &str;

    /// Fanning friction factor at Reynolds number `re` and wall stress
    /// `stress_wall` [Pa].
    fn fanning(&self, re: Real, stress_wall: Real, viscosity: &dyn ViscosityModel)
    -> FlowResult<Real>;

    fn regime(&self, re: Real) -> FlowRegime;
}

/// Dodge-Metzner configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrictionConfig {
    /// Shear-rate step for the flow index difference [1/s]
    pub index_step: Real,
    /// Lower clamp for the flow index
    pub index_min: Real,
    /// Upper clamp for the flow index
    pub index_max: Real,
    /// Laminar friction factor below which the turbulent branch applies
    pub turbulent_cutoff: Real,
    /// Wall shear-rate search bound [1/s]
    pub rate_upper: Real,
    /// Friction factor search bound for the turbulent branch
    pub friction_upper: Real,
    pub bracket: BracketConfig,
}

impl Default for FrictionConfig {
    fn default() -> Self {
        Self {
            index_step: 0.01,
            index_min: 0.01,
            index_max: 1.0,
            turbulent_cutoff: TURBULENT_CUTOFF,
            rate_upper: 1e9,
            friction_upper: 1e6,
            bracket: BracketConfig::default(),
        }
    }
}

impl FrictionConfig {
    pub fn validated(self) -> FlowResult<Self> {
        let positive = |v: Real| v.is_finite() && v > 0.0;
        if !positive(self.index_step) {
            return Err(FlowError::InvalidArg {
                what: "flow index step must be positive",
            });
        }
        let ordered = self.index_max.is_finite() && self.index_min <= self.index_max;
        if !(positive(self.index_min) && ordered) {
            return Err(FlowError::InvalidArg {
                what: "flow index clamp range must be positive and ordered",
            });
        }
        let bounds = positive(self.rate_upper) && positive(self.friction_upper);
        if !(positive(self.turbulent_cutoff) && bounds) {
            return Err(FlowError::InvalidArg {
                what: "friction cutoff and search bounds must be positive",
            });
        }
        Ok(self)
    }
}

/// Dodge-Metzner correlation with a laminar `16 / re` branch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DodgeMetzner {
    config: FrictionConfig,
}

impl DodgeMetzner {
    pub fn new(config: FrictionConfig) -> FlowResult<Self> {
        Ok(Self {
            config: config.validated()?,
        })
    }

    pub fn config(&self) -> &FrictionConfig {
        &self.config
    }

    /// Wall shear rate carrying `stress_wall`.
    pub fn wall_shear_rate<V: ViscosityModel + ?Sized>(
        &self,
        stress_wall: Real,
        viscosity: &V,
    ) -> FlowResult<Real> {
        invert_shear_rate(stress_wall, viscosity, self.config.rate_upper, &self.config.bracket)
    }

    /// Generalized flow index at `rate`, clamped to the configured range.
    pub fn flow_index<V: ViscosityModel + ?Sized>(
        &self,
        viscosity: &V,
        rate: Real,
    ) -> FlowResult<Real> {
        let raw = generalized_index(viscosity, rate, self.config.index_step);
        if raw.is_nan() {
            return Err(FlowError::NonPhysical {
                what: "generalized flow index is undefined at the wall shear rate",
            });
        }
        Ok(raw.clamp(self.config.index_min, self.config.index_max))
    }

    /// Turbulent branch: solve the Dodge-Metzner equation for `f` at index `n`.
    pub fn turbulent_fanning(&self, re: Real, n: Real) -> FlowResult<Real> {
        let slope = 4.0 / n.powf(0.75);
        let offset = 0.4 / n.powf(1.2);
        let exponent = 1.0 - n / 2.0;
        brent(
            |f: Real| {
                let fe = f + FRICTION_EPSILON;
                let log_term = (re * fe.powf(exponent)).abs().log10();
                Ok::<_, SolverError>(1.0 / fe.sqrt() - slope * log_term + offset)
            },
            0.0,
            self.config.friction_upper,
            &self.config.bracket,
        )
        .map_err(|e| FlowError::from(e).bracket_context("turbulent friction factor", re))
    }
}

impl FrictionCorrelation for DodgeMetzner {
    fn name(&self) -> &str {
        "Dodge-Metzner"
    }

    fn fanning(
        &self,
        re: Real,
        stress_wall: Real,
        viscosity: &dyn ViscosityModel,
    ) -> FlowResult<Real> {
        if !re.is_finite() {
            return Err(FlowError::InvalidArg {
                what: "Reynolds number must be finite",
            });
        }
        let rate = self.wall_shear_rate(stress_wall, viscosity)?;
        let n = self.flow_index(viscosity, rate)?;

        match self.regime(re) {
            FlowRegime::Laminar => Ok(laminar_fanning(re)),
            FlowRegime::Turbulent => self.turbulent_fanning(re, n),
        }
    }

    fn regime(&self, re: Real) -> FlowRegime {
        if laminar_fanning(re) < self.config.turbulent_cutoff {
            FlowRegime::Turbulent
        } else {
            FlowRegime::Laminar
        }
    }
}
