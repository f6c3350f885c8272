//! Laminar velocity and flow-rate integration.
//!
//! The local shear rate comes from inverting the local stress, the axial
//! velocity integrates shear rate from a position out to the no-slip wall,
//! and the flow rate integrates velocity over the cross-section. The two
//! quadratures are nested and nothing is cached, so one flow-rate evaluation
//! costs on the order of (quadrature nodes)^2 stress inversions.

use crate::error::{FlowError, FlowResult};
use crate::geometry::Geometry;
use crate::shear::invert_shear_rate;
use rf_core::Real;
use rf_core::numeric::lin_space;
use rf_rheology::ViscosityModel;
use rf_solver::{BracketConfig, Quadrature, QuadratureConfig, integrate};
use serde::{Deserialize, Serialize};

/// Default number of samples in a profile.
pub const DEFAULT_PROFILE_POINTS: usize = 51;

/// Settings shared by the shear-rate inversion and both quadratures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorConfig {
    /// Shear-rate search bound; `None` uses the geometry's default.
    pub rate_upper: Option<Real>,
    pub bracket: BracketConfig,
    pub quadrature: QuadratureConfig,
    /// Reject quadratures that exhaust their subdivision budget instead of
    /// returning the best estimate.
    pub strict: bool,
}

impl IntegratorConfig {
    pub fn rate_upper(&self, geometry: &Geometry) -> Real {
        self.rate_upper.unwrap_or_else(|| geometry.rate_upper())
    }

    fn accept(&self, q: Quadrature, what: &'static str, dp: Real) -> FlowResult<Real> {
        if self.strict && !q.converged {
            return Err(FlowError::Unconverged {
                what,
                target: dp,
                reason: format!(
                    "quadrature error {:e} after {} subdivisions",
                    q.error, q.subdivisions
                ),
            });
        }
        Ok(q.value)
    }
}

/// One sample of a cross-section profile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    /// Distance from the centerline [m]
    pub position: Real,
    pub value: Real,
}

fn check_pressure_drop(dp: Real) -> FlowResult<Real> {
    if dp.is_finite() && dp >= 0.0 {
        Ok(dp)
    } else {
        Err(FlowError::InvalidArg {
            what: "pressure drop must be finite and non-negative",
        })
    }
}

fn shear_rate_at<V: ViscosityModel + ?Sized>(
    geometry: &Geometry,
    viscosity: &V,
    position: Real,
    dp: Real,
    config: &IntegratorConfig,
) -> FlowResult<Real> {
    let stress = geometry.local_stress(position, dp);
    invert_shear_rate(stress, viscosity, config.rate_upper(geometry), &config.bracket)
}

fn velocity_at<V: ViscosityModel + ?Sized>(
    geometry: &Geometry,
    viscosity: &V,
    position: Real,
    dp: Real,
    config: &IntegratorConfig,
) -> FlowResult<Real> {
    let q = integrate(
        |x| shear_rate_at(geometry, viscosity, x, dp, config),
        position,
        geometry.wall(),
        &config.quadrature,
    )?;
    config.accept(q, "axial velocity", dp)
}

/// Shear rate at `position` for pressure drop `dp`.
pub fn local_shear_rate<V: ViscosityModel + ?Sized>(
    geometry: &Geometry,
    viscosity: &V,
    position: Real,
    dp: Real,
    config: &IntegratorConfig,
) -> FlowResult<Real> {
    let position = geometry.check_position(position)?;
    let dp = check_pressure_drop(dp)?;
    shear_rate_at(geometry, viscosity, position, dp, config)
}

/// Axial velocity at `position` for pressure drop `dp`.
///
/// Integrates the shear rate from `position` to the wall, so the velocity is
/// zero at the wall and non-negative inside for `dp >= 0`.
pub fn axial_velocity<V: ViscosityModel + ?Sized>(
    geometry: &Geometry,
    viscosity: &V,
    position: Real,
    dp: Real,
    config: &IntegratorConfig,
) -> FlowResult<Real> {
    let position = geometry.check_position(position)?;
    let dp = check_pressure_drop(dp)?;
    velocity_at(geometry, viscosity, position, dp, config)
}

/// Volumetric flow rate for pressure drop `dp`.
pub fn flow_rate<V: ViscosityModel + ?Sized>(
    geometry: &Geometry,
    viscosity: &V,
    dp: Real,
    config: &IntegratorConfig,
) -> FlowResult<Real> {
    let dp = check_pressure_drop(dp)?;
    let q = integrate(
        |y| {
            let v = velocity_at(geometry, viscosity, y, dp, config)?;
            Ok::<_, FlowError>(geometry.weight(y) * v)
        },
        0.0,
        geometry.wall(),
        &config.quadrature,
    )?;
    config.accept(q, "flow rate", dp)
}

/// Shear rate sampled uniformly from the centerline to the wall.
pub fn shear_rate_profile<V: ViscosityModel + ?Sized>(
    geometry: &Geometry,
    viscosity: &V,
    dp: Real,
    points: usize,
    config: &IntegratorConfig,
) -> FlowResult<Vec<ProfilePoint>> {
    let dp = check_pressure_drop(dp)?;
    lin_space(0.0, geometry.wall(), points)
        .into_iter()
        .map(|position| {
            Ok(ProfilePoint {
                position,
                value: shear_rate_at(geometry, viscosity, position, dp, config)?,
            })
        })
        .collect()
}

/// Axial velocity sampled uniformly from the centerline to the wall.
pub fn velocity_profile<V: ViscosityModel + ?Sized>(
    geometry: &Geometry,
    viscosity: &V,
    dp: Real,
    points: usize,
    config: &IntegratorConfig,
) -> FlowResult<Vec<ProfilePoint>> {
    let dp = check_pressure_drop(dp)?;
    lin_space(0.0, geometry.wall(), points)
        .into_iter()
        .map(|position| {
            Ok(ProfilePoint {
                position,
                value: velocity_at(geometry, viscosity, position, dp, config)?,
            })
        })
        .collect()
}
