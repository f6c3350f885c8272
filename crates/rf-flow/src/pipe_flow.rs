//! Pipe flow conjugate solver covering laminar and turbulent regimes.
//!
//! Velocity drive solves four coupled equations in
//! `[stress_wall, reynolds, pressure_drop, shear_rate_wall]`:
//!
//! ```text
//! re   - rho D u / mu(gw)          = 0
//! tauw - mu(gw) gw                 = 0
//! f(re, tauw) - dp D / (2 rho u^2 L) = 0
//! tauw - D/4 dp / L                = 0
//! ```
//!
//! Pressure drive fixes `tauw` and `gw` directly and solves two equations in
//! `[reynolds, velocity]`. Both use Newton's method with a finite-difference
//! Jacobian, residuals scaled by their seed magnitudes, and every unknown
//! kept strictly positive.
//!
//! When Newton fails, each system is reduced to one scalar equation (in the
//! wall shear rate for velocity drive, in the velocity for pressure drive).
//! A log-spaced scan brackets its sign changes and Brent's method refines the
//! bracket nearest the seed. A root is accepted only if its residual is within
//! `scan_tolerance`, so brackets that straddle the regime switch are rejected.

use crate::common::{check_positive, viscosity_at};
use crate::error::{FlowError, FlowResult};
use crate::friction::{DodgeMetzner, FlowRegime, FrictionCorrelation};
use crate::shear::invert_shear_rate;
use crate::state::{Driver, FlowState};
use crate::traits::{ConjugateFlow, FlowSolution};
use nalgebra::DVector;
use rf_core::Real;
use rf_core::units::{Density, Length, Pressure, Velocity, VolumeRate};
use rf_rheology::ViscosityModel;
use rf_solver::{BracketConfig, NewtonConfig, brent, finite_difference_jacobian, newton_solve};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Pipe solver configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeFlowConfig {
    pub newton: NewtonConfig,
    /// Seed Reynolds number below which the laminar seed is used
    pub laminar_seed_reynolds: Real,
    /// Wall shear-rate search bound [1/s]
    pub rate_upper: Real,
    pub bracket: BracketConfig,
    /// Samples per decade of the fallback scan
    pub scan_points_per_decade: usize,
    /// Largest scaled residual accepted from the fallback scan
    pub scan_tolerance: Real,
}

impl Default for PipeFlowConfig {
    fn default() -> Self {
        Self {
            newton: NewtonConfig::default(),
            laminar_seed_reynolds: 2000.0,
            rate_upper: 1e9,
            bracket: BracketConfig::default(),
            scan_points_per_decade: 10,
            scan_tolerance: 1e-6,
        }
    }
}

impl PipeFlowConfig {
    pub fn validated(self) -> FlowResult<Self> {
        check_positive(self.laminar_seed_reynolds, "seed Reynolds threshold must be positive")?;
        check_positive(self.rate_upper, "shear-rate search bound must be positive")?;
        check_positive(self.newton.fd_epsilon, "finite difference epsilon must be positive")?;
        check_positive(self.scan_tolerance, "scan tolerance must be positive")?;
        if self.newton.max_iterations == 0 {
            return Err(FlowError::InvalidArg {
                what: "Newton iteration budget must be non-zero",
            });
        }
        if self.scan_points_per_decade == 0 {
            return Err(FlowError::InvalidArg {
                what: "scan density must be non-zero",
            });
        }
        Ok(self)
    }
}

/// Pipe dimensions and fluid density. SI units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipeProperties {
    pub diameter: Real,
    pub length: Real,
    pub density: Real,
}

impl PipeProperties {
    pub fn new(diameter: Length, length: Length, density: Density) -> FlowResult<Self> {
        Self {
            diameter: diameter.value,
            length: length.value,
            density: density.value,
        }
        .validated()
    }

    pub fn validated(self) -> FlowResult<Self> {
        check_positive(self.diameter, "pipe diameter must be positive")?;
        check_positive(self.length, "pipe length must be positive")?;
        check_positive(self.density, "density must be positive")?;
        Ok(self)
    }

    pub fn area(&self) -> Real {
        PI * self.diameter * self.diameter / 4.0
    }

    /// Wall stress balancing pressure drop `dp`.
    pub fn stress_wall(&self, dp: Real) -> Real {
        self.diameter / 4.0 * dp / self.length
    }
}

/// Initial guess for velocity drive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VelocitySeed {
    /// Branch chosen from the apparent Reynolds number
    pub regime: FlowRegime,
    /// `[stress_wall, reynolds, pressure_drop, shear_rate_wall]`
    pub guess: [Real; 4],
    /// Wall stress at the apparent shear rate `8u/D`
    pub apparent_stress: Real,
    pub apparent_reynolds: Real,
}

/// Seed velocity drive from the apparent wall shear rate `8u/D`.
///
/// The turbulent guess scales stress and pressure drop by 0.1 and shear rate
/// by 0.5; the apparent values overestimate all three once the profile
/// flattens.
pub fn velocity_seed<V: ViscosityModel + ?Sized>(
    pipe: &PipeProperties,
    viscosity: &V,
    velocity: Real,
    laminar_below: Real,
) -> FlowResult<VelocitySeed> {
    let rate = 8.0 * velocity / pipe.diameter;
    let mu = viscosity_at(viscosity, rate, "apparent viscosity")?;
    let stress = mu * rate;
    let reynolds = pipe.density * pipe.diameter * velocity / mu;
    let dp = stress * 4.0 * pipe.length / pipe.diameter;

    let (regime, guess) = if reynolds < laminar_below {
        (FlowRegime::Laminar, [stress, reynolds, dp, rate])
    } else {
        (
            FlowRegime::Turbulent,
            [0.1 * stress, reynolds, 0.1 * dp, 0.5 * rate],
        )
    };
    Ok(VelocitySeed {
        regime,
        guess,
        apparent_stress: stress,
        apparent_reynolds: reynolds,
    })
}

/// Initial guess for pressure drive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PressureSeed {
    pub regime: FlowRegime,
    /// `[reynolds, velocity]`
    pub guess: [Real; 2],
    /// Laminar estimate `D/8 * gw`
    pub apparent_velocity: Real,
    pub apparent_reynolds: Real,
}

/// Seed pressure drive from the true wall shear rate.
pub fn pressure_seed<V: ViscosityModel + ?Sized>(
    pipe: &PipeProperties,
    viscosity: &V,
    shear_rate_wall: Real,
    laminar_below: Real,
) -> FlowResult<PressureSeed> {
    let mu = viscosity_at(viscosity, shear_rate_wall, "wall viscosity")?;
    let velocity = pipe.diameter / 8.0 * shear_rate_wall;
    let reynolds = pipe.density * pipe.diameter * velocity / mu;

    let (regime, guess) = if reynolds < laminar_below {
        (FlowRegime::Laminar, [reynolds, velocity])
    } else {
        (FlowRegime::Turbulent, [0.1 * reynolds, 0.01 * velocity])
    };
    Ok(PressureSeed {
        regime,
        guess,
        apparent_velocity: velocity,
        apparent_reynolds: reynolds,
    })
}

/// How a pipe solution was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipeSolveMethod {
    Newton,
    /// Scalar scan and Brent refinement after Newton failed
    Scan,
}

/// Consistent pipe flow snapshot. SI units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipeSolution {
    pub driver: Driver,
    pub velocity: Real,
    pub flow_rate: Real,
    pub pressure_drop: Real,
    /// Fanning friction factor
    pub friction_factor: Real,
    pub reynolds: Real,
    pub stress_wall: Real,
    pub shear_rate_wall: Real,
    pub regime: FlowRegime,
    pub method: PipeSolveMethod,
    /// Newton iterations taken; zero for a scanned solution
    pub iterations: usize,
}

impl FlowSolution for PipeSolution {
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

/// Laminar or turbulent flow of a generalized Newtonian fluid in a pipe.
#[derive(Clone, Debug)]
pub struct PipeFlow<V, F = DodgeMetzner> {
    pipe: PipeProperties,
    viscosity: V,
    friction: F,
    config: PipeFlowConfig,
    state: FlowState<PipeSolution>,
}

impl<V: ViscosityModel> PipeFlow<V> {
    /// Create an unsolved pipe using the Dodge-Metzner correlation.
    pub fn new(
        diameter: Length,
        length: Length,
        density: Density,
        viscosity: V,
    ) -> FlowResult<Self> {
        Ok(Self {
            pipe: PipeProperties::new(diameter, length, density)?,
            viscosity,
            friction: DodgeMetzner::default(),
            config: PipeFlowConfig::default(),
            state: FlowState::new(),
        })
    }
}

impl<V: ViscosityModel, F: FrictionCorrelation> PipeFlow<V, F> {
    /// Swap the friction correlation, re-solving any committed driver.
    pub fn with_friction<G: FrictionCorrelation>(
        self,
        friction: G,
    ) -> FlowResult<PipeFlow<V, G>> {
        let mut flow = PipeFlow {
            pipe: self.pipe,
            viscosity: self.viscosity,
            friction,
            config: self.config,
            state: self.state,
        };
        flow.resolve()?;
        Ok(flow)
    }

    /// Replace the configuration, re-solving any committed driver.
    pub fn with_config(mut self, config: PipeFlowConfig) -> FlowResult<Self> {
        self.config = config.validated()?;
        self.resolve()?;
        Ok(self)
    }

    /// Drive the pipe right away.
    pub fn with_driver(mut self, driver: Driver) -> FlowResult<Self> {
        self.drive(driver)?;
        Ok(self)
    }

    pub fn properties(&self) -> &PipeProperties {
        &self.pipe
    }

    pub fn diameter(&self) -> Real {
        self.pipe.diameter
    }

    pub fn length(&self) -> Real {
        self.pipe.length
    }

    pub fn density(&self) -> Real {
        self.pipe.density
    }

    pub fn viscosity(&self) -> &V {
        &self.viscosity
    }

    pub fn friction(&self) -> &F {
        &self.friction
    }

    pub fn config(&self) -> &PipeFlowConfig {
        &self.config
    }

    pub fn set_velocity(&mut self, u: Velocity) -> FlowResult<()> {
        self.drive(Driver::Velocity(u.value))
    }

    /// Drive by flow rate; converted to velocity through `pi D^2 / 4`.
    pub fn set_flow_rate(&mut self, q: VolumeRate) -> FlowResult<()> {
        self.drive(Driver::FlowRate(q.value))
    }

    pub fn set_pressure_drop(&mut self, dp: Pressure) -> FlowResult<()> {
        self.drive(Driver::PressureDrop(dp.value))
    }

    /// Change the diameter and re-solve from the last driver.
    pub fn set_diameter(&mut self, diameter: Length) -> FlowResult<()> {
        self.update_properties(PipeProperties {
            diameter: diameter.value,
            ..self.pipe
        })
    }

    /// Change the length and re-solve from the last driver.
    pub fn set_length(&mut self, length: Length) -> FlowResult<()> {
        self.update_properties(PipeProperties {
            length: length.value,
            ..self.pipe
        })
    }

    /// Change the density and re-solve from the last driver.
    pub fn set_density(&mut self, density: Density) -> FlowResult<()> {
        self.update_properties(PipeProperties {
            density: density.value,
            ..self.pipe
        })
    }

    fn update_properties(&mut self, pipe: PipeProperties) -> FlowResult<()> {
        self.pipe = pipe.validated()?;
        self.resolve()
    }

    pub fn pressure_drop(&self) -> FlowResult<Real> {
        Ok(self.state.require("pressure drop")?.pressure_drop)
    }

    pub fn velocity(&self) -> FlowResult<Real> {
        Ok(self.state.require("velocity")?.velocity)
    }

    pub fn flow_rate(&self) -> FlowResult<Real> {
        Ok(self.state.require("flow rate")?.flow_rate)
    }

    pub fn friction_factor(&self) -> FlowResult<Real> {
        Ok(self.state.require("friction factor")?.friction_factor)
    }

    pub fn reynolds(&self) -> FlowResult<Real> {
        Ok(self.state.require("Reynolds number")?.reynolds)
    }

    pub fn stress_wall(&self) -> FlowResult<Real> {
        Ok(self.state.require("wall stress")?.stress_wall)
    }

    pub fn shear_rate_wall(&self) -> FlowResult<Real> {
        Ok(self.state.require("wall shear rate")?.shear_rate_wall)
    }

    pub fn regime(&self) -> FlowResult<FlowRegime> {
        Ok(self.state.require("flow regime")?.regime)
    }

    /// Solve for mean velocity `u` without touching state.
    pub fn solve_velocity(&self, driver: Driver, u: Real) -> FlowResult<PipeSolution> {
        let p = self.pipe;
        let seed = velocity_seed(&p, &self.viscosity, u, self.config.laminar_seed_reynolds)?;
        let scale = [
            seed.apparent_reynolds,
            seed.apparent_stress,
            16.0 / seed.apparent_reynolds.max(1.0),
            seed.apparent_stress,
        ];
        let kinetic = 2.0 * p.density * u * u * p.length;

        let residual = |x: &DVector<Real>| -> FlowResult<DVector<Real>> {
            let (tauw, re, dp, gw) = (x[0], x[1], x[2], x[3]);
            let mu = viscosity_at(&self.viscosity, gw, "wall viscosity")?;
            let f = self.friction.fanning(re, tauw, &self.viscosity)?;
            Ok(DVector::from_vec(vec![
                (re - p.density * p.diameter * u / mu) / scale[0],
                (tauw - mu * gw) / scale[1],
                (f - dp * p.diameter / kinetic) / scale[2],
                (tauw - p.stress_wall(dp)) / scale[3],
            ]))
        };
        let eps = self.config.newton.fd_epsilon;
        let result = match newton_solve(
            DVector::from_row_slice(&seed.guess),
            &residual,
            |x: &DVector<Real>| finite_difference_jacobian(x, &residual, eps),
            &self.config.newton,
        ) {
            Ok(result) => result,
            Err(FlowError::Solver(e)) => {
                tracing::debug!(velocity = u, error = %e, "Newton failed, scanning wall rate");
                return self
                    .scan_velocity(driver, u, seed.guess[3])?
                    .ok_or_else(|| FlowError::Solver(e).convergence_context("velocity", u));
            }
            Err(e) => return Err(e),
        };

        let (stress_wall, reynolds, pressure_drop, shear_rate_wall) =
            (result.x[0], result.x[1], result.x[2], result.x[3]);
        tracing::debug!(
            velocity = u,
            pressure_drop,
            reynolds,
            seed = ?seed.regime,
            iterations = result.iterations,
            "velocity drive solved"
        );

        Ok(PipeSolution {
            driver,
            velocity: u,
            flow_rate: u * p.area(),
            pressure_drop,
            friction_factor: self.friction.fanning(reynolds, stress_wall, &self.viscosity)?,
            reynolds,
            stress_wall,
            shear_rate_wall,
            regime: self.friction.regime(reynolds),
            method: PipeSolveMethod::Newton,
            iterations: result.iterations,
        })
    }

    /// Velocity drive reduced to `f(re, mu gw) = 2 mu gw / (rho u^2)` in `gw`.
    fn scan_velocity(
        &self,
        driver: Driver,
        u: Real,
        near: Real,
    ) -> FlowResult<Option<PipeSolution>> {
        let p = self.pipe;
        let dynamic = 0.5 * p.density * u * u;
        let state = |gw: Real| -> FlowResult<(Real, Real, Real)> {
            let mu = viscosity_at(&self.viscosity, gw, "wall viscosity")?;
            let tauw = mu * gw;
            let re = p.density * p.diameter * u / mu;
            Ok((tauw, re, self.friction.fanning(re, tauw, &self.viscosity)?))
        };
        let residual = |gw: Real| -> FlowResult<Real> {
            let (tauw, _, f) = state(gw)?;
            Ok(f * dynamic / tauw - 1.0)
        };

        let (lo, hi) = (1e-3 * 8.0 * u / p.diameter, self.config.rate_upper);
        let Some(shear_rate_wall) = scan_root(residual, lo, hi, near, &self.config) else {
            return Ok(None);
        };
        let (stress_wall, reynolds, friction_factor) = state(shear_rate_wall)?;
        let pressure_drop = 4.0 * p.length * stress_wall / p.diameter;
        tracing::debug!(velocity = u, pressure_drop, reynolds, "velocity drive solved by scan");

        Ok(Some(PipeSolution {
            driver,
            velocity: u,
            flow_rate: u * p.area(),
            pressure_drop,
            friction_factor,
            reynolds,
            stress_wall,
            shear_rate_wall,
            regime: self.friction.regime(reynolds),
            method: PipeSolveMethod::Scan,
            iterations: 0,
        }))
    }

    /// Solve for pressure drop `dp` without touching state.
    pub fn solve_pressure_drop(&self, dp: Real) -> FlowResult<PipeSolution> {
        let p = self.pipe;
        let stress_wall = p.stress_wall(dp);
        let shear_rate_wall = invert_shear_rate(
            stress_wall,
            &self.viscosity,
            self.config.rate_upper,
            &self.config.bracket,
        )?;
        let mu = viscosity_at(&self.viscosity, shear_rate_wall, "wall viscosity")?;
        let seed = pressure_seed(
            &p,
            &self.viscosity,
            shear_rate_wall,
            self.config.laminar_seed_reynolds,
        )?;
        let scale = [
            p.density * p.diameter * seed.apparent_velocity,
            dp * p.diameter,
        ];

        let residual = |x: &DVector<Real>| -> FlowResult<DVector<Real>> {
            let (re, u) = (x[0], x[1]);
            let f = self.friction.fanning(re, stress_wall, &self.viscosity)?;
            Ok(DVector::from_vec(vec![
                (re * mu - p.density * p.diameter * u) / scale[0],
                (f * 2.0 * p.density * u * u * p.length - dp * p.diameter) / scale[1],
            ]))
        };
        let eps = self.config.newton.fd_epsilon;
        let result = match newton_solve(
            DVector::from_row_slice(&seed.guess),
            &residual,
            |x: &DVector<Real>| finite_difference_jacobian(x, &residual, eps),
            &self.config.newton,
        ) {
            Ok(result) => result,
            Err(FlowError::Solver(e)) => {
                tracing::debug!(pressure_drop = dp, error = %e, "Newton failed, scanning velocity");
                let wall = (stress_wall, shear_rate_wall, mu);
                return self
                    .scan_pressure_drop(dp, wall, seed.apparent_velocity, seed.guess[1])?
                    .ok_or_else(|| FlowError::Solver(e).convergence_context("pressure drop", dp));
            }
            Err(e) => return Err(e),
        };

        let (reynolds, velocity) = (result.x[0], result.x[1]);
        tracing::debug!(
            pressure_drop = dp,
            velocity,
            reynolds,
            seed = ?seed.regime,
            iterations = result.iterations,
            "pressure drive solved"
        );

        Ok(PipeSolution {
            driver: Driver::PressureDrop(dp),
            velocity,
            flow_rate: velocity * p.area(),
            pressure_drop: dp,
            friction_factor: self.friction.fanning(reynolds, stress_wall, &self.viscosity)?,
            reynolds,
            stress_wall,
            shear_rate_wall,
            regime: self.friction.regime(reynolds),
            method: PipeSolveMethod::Newton,
            iterations: result.iterations,
        })
    }

    /// Pressure drive reduced to `2 f rho u^2 L = dp D` in `u`, with the wall
    /// state `(tauw, gw, mu)` fixed by `dp`.
    fn scan_pressure_drop(
        &self,
        dp: Real,
        wall: (Real, Real, Real),
        apparent_velocity: Real,
        near: Real,
    ) -> FlowResult<Option<PipeSolution>> {
        let p = self.pipe;
        let (stress_wall, shear_rate_wall, mu) = wall;
        let reynolds_at = |u: Real| p.density * p.diameter * u / mu;
        let residual = |u: Real| -> FlowResult<Real> {
            let f = self.friction.fanning(reynolds_at(u), stress_wall, &self.viscosity)?;
            Ok(f * 2.0 * p.density * u * u * p.length / (dp * p.diameter) - 1.0)
        };

        let (lo, hi) = (1e-6 * apparent_velocity, 1e2 * apparent_velocity);
        let Some(velocity) = scan_root(residual, lo, hi, near, &self.config) else {
            return Ok(None);
        };
        let reynolds = reynolds_at(velocity);
        tracing::debug!(pressure_drop = dp, velocity, reynolds, "pressure drive solved by scan");

        Ok(Some(PipeSolution {
            driver: Driver::PressureDrop(dp),
            velocity,
            flow_rate: velocity * p.area(),
            pressure_drop: dp,
            friction_factor: self.friction.fanning(reynolds, stress_wall, &self.viscosity)?,
            reynolds,
            stress_wall,
            shear_rate_wall,
            regime: self.friction.regime(reynolds),
            method: PipeSolveMethod::Scan,
            iterations: 0,
        }))
    }
}

/// Root of `h` on `[lo, hi]` from a log-spaced sign-change scan.
///
/// Brackets are refined nearest-to-`near` first. Samples where `h` fails are
/// skipped, and a refined root whose `|h|` exceeds the scan tolerance (a jump
/// rather than a zero) is discarded.
fn scan_root<H>(h: H, lo: Real, hi: Real, near: Real, config: &PipeFlowConfig) -> Option<Real>
where
    H: Fn(Real) -> FlowResult<Real>,
{
    if !(lo > 0.0 && hi > lo && near > 0.0) {
        return None;
    }
    let span = hi / lo;
    let n = ((span.log10() * config.scan_points_per_decade as Real).ceil() as usize).max(1);
    let samples: Vec<(Real, Option<Real>)> = (0..=n)
        .map(|i| {
            let x = lo * span.powf(i as Real / n as Real);
            (x, h(x).ok().filter(|v| v.is_finite()))
        })
        .collect();

    let mut brackets: Vec<(Real, Real)> = samples
        .windows(2)
        .filter_map(|w| match (w[0].1, w[1].1) {
            (Some(a), Some(b)) if a * b <= 0.0 => Some((w[0].0, w[1].0)),
            _ => None,
        })
        .collect();
    let distance = |&(a, b): &(Real, Real)| ((a * b).sqrt() / near).ln().abs();
    brackets.sort_by(|x, y| distance(x).total_cmp(&distance(y)));

    brackets.into_iter().find_map(|(a, b)| {
        let x = brent(&h, a, b, &config.bracket).ok()?;
        let r = h(x).ok()?;
        if r.abs() <= config.scan_tolerance {
            Some(x)
        } else {
            tracing::debug!(x, residual = r, "scan bracket holds a jump, not a root");
            None
        }
    })
}

impl<V: ViscosityModel, F: FrictionCorrelation> ConjugateFlow for PipeFlow<V, F> {
    type Solution = PipeSolution;

    fn solve(&self, driver: Driver) -> FlowResult<PipeSolution> {
        match driver {
            Driver::Velocity(u) => self.solve_velocity(driver, u),
            Driver::FlowRate(q) => self.solve_velocity(driver, q / self.pipe.area()),
            Driver::PressureDrop(dp) => self.solve_pressure_drop(dp),
        }
    }

    fn state(&self) -> &FlowState<PipeSolution> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FlowState<PipeSolution> {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::friction::laminar_fanning;
    use rf_core::units::{kg_per_m3, m, m3ps, mps, pa, pa_s};
    use rf_rheology::Newtonian;

    fn water_like(mu: Real) -> PipeFlow<Newtonian> {
        PipeFlow::new(
            m(0.02),
            m(1.0),
            kg_per_m3(1000.0),
            Newtonian::new(pa_s(mu)).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn laminar_end_to_end() {
        let mut flow = water_like(0.01);
        flow.set_velocity(mps(0.5)).unwrap();

        let re = flow.reynolds().unwrap();
        assert!((re - 1000.0).abs() < 1e-6);
        assert_eq!(flow.regime().unwrap(), FlowRegime::Laminar);
        assert!((flow.friction_factor().unwrap() - 16.0 / re).abs() < 1e-9);
        // 32 mu L u / D^2
        let hagen_poiseuille = 32.0 * 0.01 * 1.0 * 0.5 / 0.02_f64.powi(2);
        assert!((flow.pressure_drop().unwrap() / hagen_poiseuille - 1.0).abs() < 0.01);
        assert!((flow.stress_wall().unwrap() - 2.0).abs() < 1e-6);
        assert!((flow.shear_rate_wall().unwrap() - 200.0).abs() < 1e-4);
        assert_eq!(flow.solution().unwrap().iterations, 0);
    }

    #[test]
    fn turbulent_velocity_drive() {
        let mut flow = water_like(1e-3);
        flow.set_velocity(mps(2.0)).unwrap();

        assert_eq!(flow.regime().unwrap(), FlowRegime::Turbulent);
        assert!((flow.reynolds().unwrap() - 40_000.0).abs() < 1e-3);
        assert!((flow.pressure_drop().unwrap() / 2198.56 - 1.0).abs() < 1e-4);
        let f = flow.friction_factor().unwrap();
        // Newtonian von Karman form
        let re = flow.reynolds().unwrap();
        assert!((1.0 / f.sqrt() - (4.0 * (re * f.sqrt()).log10() - 0.4)).abs() < 1e-5);
    }

    #[test]
    fn pressure_drive_inverts_velocity_drive() {
        let mut by_velocity = water_like(1e-3);
        by_velocity.set_velocity(mps(0.5)).unwrap();
        let dp = by_velocity.pressure_drop().unwrap();

        let mut by_pressure = water_like(1e-3);
        by_pressure.set_pressure_drop(pa(dp)).unwrap();
        assert!((by_pressure.velocity().unwrap() / 0.5 - 1.0).abs() < 1e-6);
        assert_eq!(by_pressure.regime().unwrap(), FlowRegime::Turbulent);
    }

    #[test]
    fn flow_rate_converts_through_area() {
        let mut flow = water_like(0.01);
        let area = PI * 0.02 * 0.02 / 4.0;
        flow.set_flow_rate(m3ps(0.5 * area)).unwrap();
        assert!((flow.velocity().unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(flow.solution().unwrap().driver, Driver::FlowRate(0.5 * area));
    }

    #[test]
    fn seeds_report_their_branch() {
        let pipe = PipeProperties::new(m(0.02), m(1.0), kg_per_m3(1000.0)).unwrap();
        let model = Newtonian::new(pa_s(1e-3)).unwrap();

        let slow = velocity_seed(&pipe, &model, 0.05, 2000.0).unwrap();
        assert_eq!(slow.regime, FlowRegime::Laminar);
        assert_eq!(slow.guess[1], slow.apparent_reynolds);
        assert_eq!(slow.guess[0], slow.apparent_stress);

        let fast = velocity_seed(&pipe, &model, 2.0, 2000.0).unwrap();
        assert_eq!(fast.regime, FlowRegime::Turbulent);
        assert!((fast.guess[0] / fast.apparent_stress - 0.1).abs() < 1e-12);
        assert!((fast.guess[3] / (8.0 * 2.0 / 0.02) - 0.5).abs() < 1e-12);

        let p_slow = pressure_seed(&pipe, &model, 10.0, 2000.0).unwrap();
        assert_eq!(p_slow.regime, FlowRegime::Laminar);
        let p_fast = pressure_seed(&pipe, &model, 1e5, 2000.0).unwrap();
        assert_eq!(p_fast.regime, FlowRegime::Turbulent);
        assert!((p_fast.guess[1] / p_fast.apparent_velocity - 0.01).abs() < 1e-12);
    }

    #[test]
    fn zero_velocity_clears_pressure_drop() {
        let mut flow = water_like(0.01);
        flow.set_velocity(mps(0.5)).unwrap();
        flow.set_velocity(mps(0.0)).unwrap();
        assert!(matches!(
            flow.pressure_drop(),
            Err(FlowError::Unsolved { .. })
        ));

        flow.set_pressure_drop(pa(400.0)).unwrap();
        flow.set_pressure_drop(pa(0.0)).unwrap();
        assert!(matches!(flow.velocity(), Err(FlowError::Unsolved { .. })));
    }

    #[test]
    fn density_setter_resolves() {
        let mut flow = water_like(0.01);
        flow.set_velocity(mps(0.5)).unwrap();
        flow.set_density(kg_per_m3(500.0)).unwrap();
        assert!((flow.reynolds().unwrap() - 500.0).abs() < 1e-6);
        // Laminar pressure drop does not depend on density
        assert!((flow.pressure_drop().unwrap() / 400.0 - 1.0).abs() < 1e-6);
        assert!(flow.set_density(kg_per_m3(-1.0)).is_err());
        assert_eq!(flow.density(), 500.0);
    }

    #[test]
    fn negative_drivers_are_rejected() {
        let mut flow = water_like(0.01);
        assert!(matches!(
            flow.set_velocity(mps(-0.5)),
            Err(FlowError::InvalidArg { .. })
        ));
        assert!(!flow.state().is_solved());
    }

    #[test]
    fn scan_prefers_the_root_nearest_the_seed() {
        let config = PipeFlowConfig::default();
        let two_roots = |x: Real| Ok::<_, FlowError>((x - 0.02) * (x - 30.0) / (x * x + 1.0));

        let high = scan_root(two_roots, 1e-3, 1e3, 50.0, &config).unwrap();
        assert!((high - 30.0).abs() < 1e-8);
        let low = scan_root(two_roots, 1e-3, 1e3, 0.01, &config).unwrap();
        assert!((low - 0.02).abs() < 1e-10);
    }

    #[test]
    fn scan_rejects_a_jump() {
        let config = PipeFlowConfig::default();
        let step = |x: Real| Ok::<_, FlowError>(if x < 5.0 { -1.0 } else { 1.0 });
        assert_eq!(scan_root(step, 1e-3, 1e3, 1.0, &config), None);

        let failing = |_: Real| Err::<Real, _>(FlowError::NonPhysical { what: "test" });
        assert_eq!(scan_root(failing, 1e-3, 1e3, 1.0, &config), None);
    }

    #[test]
    fn scan_settings_are_validated() {
        let sparse = PipeFlowConfig {
            scan_points_per_decade: 0,
            ..PipeFlowConfig::default()
        };
        assert!(sparse.validated().is_err());
        let loose = PipeFlowConfig {
            scan_tolerance: -1.0,
            ..PipeFlowConfig::default()
        };
        assert!(loose.validated().is_err());
    }

    #[test]
    fn newton_solutions_are_labelled() {
        let mut flow = water_like(1e-3);
        flow.set_velocity(mps(2.0)).unwrap();
        assert_eq!(flow.solution().unwrap().method, PipeSolveMethod::Newton);
    }

    #[test]
    fn laminar_friction_tracks_reynolds() {
        let flow = water_like(0.01)
            .with_driver(Driver::Velocity(0.2))
            .unwrap();
        let s = flow.solution().unwrap();
        assert!((s.friction_factor - laminar_fanning(s.reynolds)).abs() < 1e-15);
    }
}
