//! Driver and committed-solution state shared by the conjugate solvers.

use crate::error::{FlowError, FlowResult};
use rf_core::Real;
use serde::{Deserialize, Serialize};

/// The independent quantity of a solve. SI units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Driver {
    /// Pressure drop over the conduit length [Pa]
    PressureDrop(Real),
    /// Volumetric flow rate [m^3/s]
    FlowRate(Real),
    /// Mean (superficial) velocity [m/s]
    Velocity(Real),
}

impl Driver {
    pub fn value(&self) -> Real {
        match *self {
            Driver::PressureDrop(v) | Driver::FlowRate(v) | Driver::Velocity(v) => v,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.value() == 0.0
    }

    /// Reject negative or non-finite values.
    pub fn validated(self) -> FlowResult<Self> {
        let v = self.value();
        if v.is_finite() && v >= 0.0 {
            Ok(self)
        } else {
            Err(FlowError::InvalidArg {
                what: match self {
                    Driver::PressureDrop(_) => "pressure drop must be finite and non-negative",
                    Driver::FlowRate(_) => "flow rate must be finite and non-negative",
                    Driver::Velocity(_) => "velocity must be finite and non-negative",
                },
            })
        }
    }
}

/// Last driver plus the solution committed for it.
///
/// A solution is only ever present together with the driver it was solved
/// for. The driver may outlive its solution when a parameter change makes the
/// re-solve fail.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowState<S> {
    driver: Option<Driver>,
    solution: Option<S>,
}

impl<S> Default for FlowState<S> {
    fn default() -> Self {
        Self {
            driver: None,
            solution: None,
        }
    }
}

impl<S> FlowState<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn driver(&self) -> Option<Driver> {
        self.driver
    }

    pub fn solution(&self) -> Option<&S> {
        self.solution.as_ref()
    }

    pub fn is_solved(&self) -> bool {
        self.solution.is_some()
    }

    /// The committed solution, or [`FlowError::Unsolved`] naming `what`.
    pub fn require(&self, what: &'static str) -> FlowResult<&S> {
        self.solution.as_ref().ok_or(FlowError::Unsolved { what })
    }

    /// Replace driver and solution together.
    pub fn commit(&mut self, driver: Driver, solution: S) {
        self.driver = Some(driver);
        self.solution = Some(solution);
    }

    pub fn clear(&mut self) {
        self.driver = None;
        self.solution = None;
    }

    /// Drop the solution, keeping the driver for a later re-solve.
    pub fn invalidate(&mut self) {
        self.solution = None;
    }
}
