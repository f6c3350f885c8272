//! Conduit geometry for laminar flow.
//!
//! Positions are measured from the centerline: radius `r` for a pipe,
//! distance `y` from the mid-plane for a slit.

use crate::common::check_positive;
use crate::error::{FlowError, FlowResult};
use rf_core::Real;
use rf_core::units::Length;
use std::f64::consts::PI;

/// Upper shear-rate bound used when inverting stress in a pipe [1/s].
pub const PIPE_RATE_UPPER: Real = 1e6;

/// Upper shear-rate bound used when inverting stress in a slit [1/s].
pub const SLIT_RATE_UPPER: Real = 1e9;

/// Circular pipe or rectangular slit. SI units throughout.
#[derive(Clone, Copy, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geometry {
    Pipe {
        radius: Real,
        length: Real,
    },
    /// Parallel plates `2 * half_height` apart, `width` wide.
    Slit {
        half_height: Real,
        width: Real,
        length: Real,
    },
}

impl Geometry {
    /// Pipe from its inner radius.
    pub fn pipe(radius: Length, length: Length) -> FlowResult<Self> {
        Geometry::Pipe {
            radius: radius.value,
            length: length.value,
        }
        .validated()
    }

    /// Slit from its full gap height.
    pub fn slit(gap: Length, width: Length, length: Length) -> FlowResult<Self> {
        Geometry::Slit {
            half_height: 0.5 * gap.value,
            width: width.value,
            length: length.value,
        }
        .validated()
    }

    /// Check every dimension is finite and strictly positive.
    pub fn validated(self) -> FlowResult<Self> {
        match self {
            Geometry::Pipe { radius, length } => {
                check_positive(radius, "pipe radius must be positive")?;
                check_positive(length, "pipe length must be positive")?;
            }
            Geometry::Slit {
                half_height,
                width,
                length,
            } => {
                check_positive(half_height, "slit gap must be positive")?;
                check_positive(width, "slit width must be positive")?;
                check_positive(length, "slit length must be positive")?;
            }
        }
        Ok(self)
    }

    pub fn length(&self) -> Real {
        match *self {
            Geometry::Pipe { length, .. } | Geometry::Slit { length, .. } => length,
        }
    }

    /// Distance from the centerline to the wall.
    pub fn wall(&self) -> Real {
        match *self {
            Geometry::Pipe { radius, .. } => radius,
            Geometry::Slit { half_height, .. } => half_height,
        }
    }

    /// Flow cross-section area.
    pub fn area(&self) -> Real {
        match *self {
            Geometry::Pipe { radius, .. } => PI * radius * radius,
            Geometry::Slit {
                half_height, width, ..
            } => 2.0 * half_height * width,
        }
    }

    /// Length scale used for the wall Reynolds number: diameter or gap.
    pub fn hydraulic_diameter(&self) -> Real {
        2.0 * self.wall()
    }

    /// Default upper bound for stress-to-rate inversion in this conduit.
    pub fn rate_upper(&self) -> Real {
        match self {
            Geometry::Pipe { .. } => PIPE_RATE_UPPER,
            Geometry::Slit { .. } => SLIT_RATE_UPPER,
        }
    }

    /// Shear stress at `position` for pressure drop `dp`.
    pub fn local_stress(&self, position: Real, dp: Real) -> Real {
        let gradient = dp / self.length();
        match self {
            Geometry::Pipe { .. } => gradient * position / 2.0,
            Geometry::Slit { .. } => gradient * position,
        }
    }

    pub fn stress_wall(&self, dp: Real) -> Real {
        self.local_stress(self.wall(), dp)
    }

    /// Flow-rate weight at `position`: circumference for a pipe, both
    /// half-planes of the slit width otherwise.
    pub fn weight(&self, position: Real) -> Real {
        match *self {
            Geometry::Pipe { .. } => 2.0 * PI * position,
            Geometry::Slit { width, .. } => 2.0 * width,
        }
    }

    /// Wall shear rate of a Newtonian fluid carrying flow rate `q`.
    pub fn apparent_shear_rate(&self, q: Real) -> Real {
        match *self {
            Geometry::Pipe { radius, .. } => 4.0 * q / (PI * radius.powi(3)),
            Geometry::Slit {
                half_height, width, ..
            } => 3.0 * q / (2.0 * width * half_height.powi(2)),
        }
    }

    /// Pressure drop of a Newtonian fluid with viscosity `mu` carrying `q`.
    pub fn apparent_pressure_drop(&self, q: Real, mu: Real) -> Real {
        match *self {
            Geometry::Pipe { radius, length } => 8.0 * mu * length * q / (PI * radius.powi(4)),
            Geometry::Slit {
                half_height,
                width,
                length,
            } => 3.0 * mu * q * length / (2.0 * width * half_height.powi(3)),
        }
    }

    /// Reject positions outside `[0, wall]`.
    pub(crate) fn check_position(&self, position: Real) -> FlowResult<Real> {
        if position.is_finite() && (0.0..=self.wall()).contains(&position) {
            Ok(position)
        } else {
            Err(FlowError::InvalidArg {
                what: "position must lie between the centerline and the wall",
            })
        }
    }
}
