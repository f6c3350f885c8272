//! Laminar conjugate solver for pipes and slits.
//!
//! Pressure drop to flow rate is a direct (nested) quadrature. Flow rate to
//! pressure drop brackets the root of `flow_rate(dp) - q` around the
//! pressure drop a Newtonian fluid would need at the apparent wall shear
//! rate, which keeps the bracket tight for any shear-thinning or thickening
//! model.

use crate::common::{check_positive, viscosity_at};
use crate::error::{FlowError, FlowResult};
use crate::geometry::Geometry;
use crate::profile::{self, IntegratorConfig, ProfilePoint};
use crate::shear::invert_shear_rate;
use crate::state::{Driver, FlowState};
use crate::traits::{ConjugateFlow, FlowSolution};
use rf_core::Real;
use rf_core::units::{Density, Pressure, Velocity, VolumeRate};
use rf_rheology::ViscosityModel;
use rf_solver::{BracketConfig, brent};
use serde::{Deserialize, Serialize};

/// Laminar solver configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaminarConfig {
    pub integrator: IntegratorConfig,
    /// Root finder for the flow-rate to pressure-drop search
    pub pressure_bracket: BracketConfig,
    /// Lower search bound as a multiple of the apparent pressure drop
    pub bracket_lo_factor: Real,
    /// Upper search bound as a multiple of the apparent pressure drop
    pub bracket_hi_factor: Real,
}

impl Default for LaminarConfig {
    fn default() -> Self {
        Self {
            integrator: IntegratorConfig::default(),
            pressure_bracket: BracketConfig::default(),
            bracket_lo_factor: 0.01,
            bracket_hi_factor: 2.0,
        }
    }
}

impl LaminarConfig {
    pub fn validated(self) -> FlowResult<Self> {
        check_positive(self.bracket_lo_factor, "bracket factors must be positive")?;
        if !(self.bracket_hi_factor.is_finite() && self.bracket_hi_factor > self.bracket_lo_factor)
        {
            return Err(FlowError::InvalidArg {
                what: "upper bracket factor must exceed the lower one",
            });
        }
        if let Some(upper) = self.integrator.rate_upper {
            check_positive(upper, "shear-rate search bound must be positive")?;
        }
        Ok(self)
    }
}

/// Consistent laminar flow snapshot. SI units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaminarSolution {
    pub driver: Driver,
    pub pressure_drop: Real,
    pub flow_rate: Real,
    /// Mean velocity over the cross-section
    pub velocity: Real,
    pub shear_rate_wall: Real,
    pub stress_wall: Real,
    pub viscosity_wall: Real,
    /// Reynolds number on the hydraulic diameter and wall viscosity
    pub re_wall: Real,
}

impl FlowSolution for LaminarSolution {
    fn driver(&self) -> Driver {
        self.driver
    }

    fn pressure_drop(&self) -> Real {
        self.pressure_drop
    }

    fn flow_rate(&self) -> Real {
        self.flow_rate
    }
}

/// Laminar flow of a generalized Newtonian fluid in a pipe or slit.
#[derive(Clone, Debug)]
pub struct LaminarFlow<V> {
    geometry: Geometry,
    density: Real,
    viscosity: V,
    config: LaminarConfig,
    state: FlowState<LaminarSolution>,
}

impl<V: ViscosityModel> LaminarFlow<V> {
    /// Create an unsolved conduit.
    pub fn new(geometry: Geometry, density: Density, viscosity: V) -> FlowResult<Self> {
        Ok(Self {
            geometry: geometry.validated()?,
            density: check_positive(density.value, "density must be positive")?,
            viscosity,
            config: LaminarConfig::default(),
            state: FlowState::new(),
        })
    }

    /// Replace the configuration, re-solving any committed driver.
    pub fn with_config(mut self, config: LaminarConfig) -> FlowResult<Self> {
        self.config = config.validated()?;
        self.resolve()?;
        Ok(self)
    }

    /// Drive the conduit right away.
    pub fn with_driver(mut self, driver: Driver) -> FlowResult<Self> {
        self.drive(driver)?;
        Ok(self)
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn density(&self) -> Real {
        self.density
    }

    pub fn viscosity(&self) -> &V {
        &self.viscosity
    }

    pub fn config(&self) -> &LaminarConfig {
        &self.config
    }

    pub fn set_pressure_drop(&mut self, dp: Pressure) -> FlowResult<()> {
        self.drive(Driver::PressureDrop(dp.value))
    }

    pub fn set_flow_rate(&mut self, q: VolumeRate) -> FlowResult<()> {
        self.drive(Driver::FlowRate(q.value))
    }

    pub fn set_velocity(&mut self, u: Velocity) -> FlowResult<()> {
        self.drive(Driver::Velocity(u.value))
    }

    /// Change the conduit and re-solve from the last driver.
    pub fn set_geometry(&mut self, geometry: Geometry) -> FlowResult<()> {
        self.geometry = geometry.validated()?;
        self.resolve()
    }

    /// Change the density and re-solve from the last driver.
    pub fn set_density(&mut self, density: Density) -> FlowResult<()> {
        self.density = check_positive(density.value, "density must be positive")?;
        self.resolve()
    }

    /// Flow rate for pressure drop `dp`, independent of the committed state.
    pub fn flow_rate_for(&self, dp: Real) -> FlowResult<Real> {
        profile::flow_rate(&self.geometry, &self.viscosity, dp, &self.config.integrator)
    }

    /// Pressure drop that carries flow rate `q`, independent of the committed state.
    pub fn pressure_drop_for(&self, q: Real) -> FlowResult<Real> {
        let q = Driver::FlowRate(q).validated()?.value();
        if q == 0.0 {
            return Ok(0.0);
        }

        let g = &self.geometry;
        let rate_a = g.apparent_shear_rate(q);
        let mu_a = viscosity_at(&self.viscosity, rate_a, "apparent viscosity")?;
        let dp_a = g.apparent_pressure_drop(q, mu_a);
        let lo = dp_a * self.config.bracket_lo_factor;
        let hi = dp_a * self.config.bracket_hi_factor;

        brent(
            |dp| {
                let flow = self.flow_rate_for(dp)?;
                Ok::<_, FlowError>(flow - q)
            },
            lo,
            hi,
            &self.config.pressure_bracket,
        )
        .map_err(|e| e.bracket_context("pressure drop", q))
    }

    pub fn pressure_drop(&self) -> FlowResult<Real> {
        Ok(self.state.require("pressure drop")?.pressure_drop)
    }

    pub fn flow_rate(&self) -> FlowResult<Real> {
        Ok(self.state.require("flow rate")?.flow_rate)
    }

    pub fn velocity(&self) -> FlowResult<Real> {
        Ok(self.state.require("velocity")?.velocity)
    }

    pub fn shear_rate_wall(&self) -> FlowResult<Real> {
        Ok(self.state.require("wall shear rate")?.shear_rate_wall)
    }

    pub fn stress_wall(&self) -> FlowResult<Real> {
        Ok(self.state.require("wall stress")?.stress_wall)
    }

    pub fn viscosity_wall(&self) -> FlowResult<Real> {
        Ok(self.state.require("wall viscosity")?.viscosity_wall)
    }

    pub fn re_wall(&self) -> FlowResult<Real> {
        Ok(self.state.require("wall Reynolds number")?.re_wall)
    }

    /// Shear rate across the conduit at the committed pressure drop.
    pub fn shear_rate_profile(&self, points: usize) -> FlowResult<Vec<ProfilePoint>> {
        let dp = self.pressure_drop()?;
        profile::shear_rate_profile(
            &self.geometry,
            &self.viscosity,
            dp,
            points,
            &self.config.integrator,
        )
    }

    /// Velocity across the conduit at the committed pressure drop.
    pub fn velocity_profile(&self, points: usize) -> FlowResult<Vec<ProfilePoint>> {
        let dp = self.pressure_drop()?;
        profile::velocity_profile(
            &self.geometry,
            &self.viscosity,
            dp,
            points,
            &self.config.integrator,
        )
    }
}

impl<V: ViscosityModel> ConjugateFlow for LaminarFlow<V> {
    type Solution = LaminarSolution;

    fn solve(&self, driver: Driver) -> FlowResult<LaminarSolution> {
        let g = &self.geometry;
        let (pressure_drop, flow_rate) = match driver {
            Driver::PressureDrop(dp) => (dp, self.flow_rate_for(dp)?),
            Driver::FlowRate(q) => (self.pressure_drop_for(q)?, q),
            Driver::Velocity(u) => {
                let q = u * g.area();
                (self.pressure_drop_for(q)?, q)
            }
        };

        let stress_wall = g.stress_wall(pressure_drop);
        let shear_rate_wall = invert_shear_rate(
            stress_wall,
            &self.viscosity,
            self.config.integrator.rate_upper(g),
            &self.config.integrator.bracket,
        )?;
        let viscosity_wall = viscosity_at(&self.viscosity, shear_rate_wall, "wall viscosity")?;
        let velocity = flow_rate / g.area();
        let re_wall = self.density * g.hydraulic_diameter() * velocity / viscosity_wall;

        Ok(LaminarSolution {
            driver,
            pressure_drop,
            flow_rate,
            velocity,
            shear_rate_wall,
            stress_wall,
            viscosity_wall,
            re_wall,
        })
    }

    fn state(&self) -> &FlowState<LaminarSolution> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FlowState<LaminarSolution> {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_core::units::{kg_per_m3, m, m3ps, mps, pa, pa_s};
    use rf_rheology::{Newtonian, PowerLaw};
    use std::f64::consts::PI;

    fn newtonian_pipe(mu: Real) -> LaminarFlow<Newtonian> {
        let geometry = Geometry::pipe(m(0.01), m(1.0)).unwrap();
        LaminarFlow::new(geometry, kg_per_m3(1000.0), Newtonian::new(pa_s(mu)).unwrap()).unwrap()
    }

    #[test]
    fn unsolved_until_driven() {
        let flow = newtonian_pipe(1.0);
        assert_eq!(
            flow.pressure_drop(),
            Err(FlowError::Unsolved {
                what: "pressure drop"
            })
        );
        assert!(matches!(flow.re_wall(), Err(FlowError::Unsolved { .. })));
        assert!(matches!(
            flow.velocity_profile(11),
            Err(FlowError::Unsolved { .. })
        ));
    }

    #[test]
    fn pressure_drive_fills_wall_quantities() {
        let mut flow = newtonian_pipe(1.0);
        flow.set_pressure_drop(pa(100.0)).unwrap();

        let s = *flow.solution().unwrap();
        let q_hp = PI * 100.0 * 1e-8 / 8.0;
        assert!((s.flow_rate / q_hp - 1.0).abs() < 1e-8);
        // R/2 * dp/L = 0.5 Pa, so 0.5 1/s at 1 Pa.s
        assert!((s.stress_wall - 0.5).abs() < 1e-12);
        assert!((s.shear_rate_wall - 0.5).abs() < 1e-9);
        assert!((s.viscosity_wall - 1.0).abs() < 1e-12);
        let u = q_hp / (PI * 1e-4);
        assert!((s.re_wall / (1000.0 * 0.02 * u) - 1.0).abs() < 1e-8);
    }

    #[test]
    fn flow_rate_drive_recovers_pressure_drop() {
        let mut flow = newtonian_pipe(1.0);
        let q = PI * 250.0 * 1e-8 / 8.0;
        flow.set_flow_rate(m3ps(q)).unwrap();
        assert!((flow.pressure_drop().unwrap() / 250.0 - 1.0).abs() < 1e-8);
    }

    #[test]
    fn velocity_drive_uses_cross_section() {
        let mut by_velocity = newtonian_pipe(0.2);
        let mut by_flow = newtonian_pipe(0.2);
        by_velocity.set_velocity(mps(0.05)).unwrap();
        by_flow.set_flow_rate(m3ps(0.05 * PI * 1e-4)).unwrap();

        let a = by_velocity.pressure_drop().unwrap();
        let b = by_flow.pressure_drop().unwrap();
        assert!((a / b - 1.0).abs() < 1e-12);
        assert_eq!(
            by_velocity.solution().unwrap().driver,
            Driver::Velocity(0.05)
        );
    }

    #[test]
    fn zero_driver_clears_the_other_side() {
        let mut flow = newtonian_pipe(1.0);
        flow.set_pressure_drop(pa(100.0)).unwrap();
        flow.set_flow_rate(m3ps(0.0)).unwrap();
        assert!(matches!(
            flow.pressure_drop(),
            Err(FlowError::Unsolved { .. })
        ));
        assert!(flow.state().driver().is_none());

        flow.set_flow_rate(m3ps(1e-6)).unwrap();
        flow.set_pressure_drop(pa(0.0)).unwrap();
        assert!(matches!(flow.flow_rate(), Err(FlowError::Unsolved { .. })));
    }

    #[test]
    fn invalid_driver_keeps_previous_state() {
        let mut flow = newtonian_pipe(1.0);
        flow.set_pressure_drop(pa(100.0)).unwrap();
        let before = *flow.solution().unwrap();

        assert!(matches!(
            flow.set_flow_rate(m3ps(-1.0)),
            Err(FlowError::InvalidArg { .. })
        ));
        assert!(flow.set_velocity(mps(f64::NAN)).is_err());
        assert_eq!(flow.solution().unwrap(), &before);
    }

    #[test]
    fn geometry_change_resolves_from_last_driver() {
        let mut flow = newtonian_pipe(1.0);
        flow.set_flow_rate(m3ps(1e-7)).unwrap();
        let dp_small_length = flow.pressure_drop().unwrap();

        flow.set_geometry(Geometry::pipe(m(0.01), m(2.0)).unwrap())
            .unwrap();
        // Flow rate stays the driver, pressure drop doubles with length
        assert_eq!(flow.flow_rate().unwrap(), 1e-7);
        assert!((flow.pressure_drop().unwrap() / dp_small_length - 2.0).abs() < 1e-8);
    }

    #[test]
    fn density_change_scales_reynolds_only() {
        let mut flow = newtonian_pipe(1.0);
        flow.set_pressure_drop(pa(100.0)).unwrap();
        let re = flow.re_wall().unwrap();
        let q = flow.flow_rate().unwrap();

        flow.set_density(kg_per_m3(500.0)).unwrap();
        assert!((flow.re_wall().unwrap() / re - 0.5).abs() < 1e-12);
        assert_eq!(flow.flow_rate().unwrap(), q);
        assert!(flow.set_density(kg_per_m3(0.0)).is_err());
    }

    #[test]
    fn failed_resolve_drops_snapshot_but_keeps_driver() {
        // 1e-6 Pa.s cannot carry 25 Pa at the wall below the 1e6 1/s bound
        let geometry = Geometry::pipe(m(0.01), m(1.0)).unwrap();
        let mut flow =
            LaminarFlow::new(geometry, kg_per_m3(1000.0), Newtonian::new(pa_s(1e-6)).unwrap())
                .unwrap();
        flow.set_pressure_drop(pa(100.0)).unwrap();

        let err = flow.set_geometry(Geometry::pipe(m(0.01), m(0.02)).unwrap());
        assert!(matches!(err, Err(FlowError::RootBracket { .. })));
        assert!(!flow.state().is_solved());
        assert_eq!(flow.state().driver(), Some(Driver::PressureDrop(100.0)));
    }

    #[test]
    fn slit_wall_reynolds_uses_gap() {
        let slit = Geometry::slit(m(0.01), m(0.1), m(1.0)).unwrap();
        let mut flow =
            LaminarFlow::new(slit, kg_per_m3(1000.0), Newtonian::new(pa_s(0.5)).unwrap()).unwrap();
        flow.set_velocity(mps(0.01)).unwrap();

        // rho * gap * u / mu
        assert!((flow.re_wall().unwrap() - 1000.0 * 0.01 * 0.01 / 0.5).abs() < 1e-9);
        // H * dp/L = mu * 3u/H for a Newtonian slit
        assert!((flow.stress_wall().unwrap() - 0.5 * 3.0 * 0.01 / 0.005).abs() < 1e-8);
    }

    #[test]
    fn bad_config_is_rejected() {
        let flow = newtonian_pipe(1.0);
        let config = LaminarConfig {
            bracket_lo_factor: 3.0,
            ..LaminarConfig::default()
        };
        assert!(matches!(
            flow.with_config(config),
            Err(FlowError::InvalidArg { .. })
        ));
    }

    #[test]
    fn profiles_follow_committed_pressure_drop() {
        let geometry = Geometry::pipe(m(0.01), m(1.0)).unwrap();
        let flow = LaminarFlow::new(geometry, kg_per_m3(1000.0), PowerLaw::new(1.0, 0.5).unwrap())
            .unwrap()
            .with_driver(Driver::PressureDrop(500.0))
            .unwrap();

        let rates = flow.shear_rate_profile(21).unwrap();
        let wall = rates.last().map(|p| p.value).unwrap();
        assert!((wall / flow.shear_rate_wall().unwrap() - 1.0).abs() < 1e-9);
    }
}
