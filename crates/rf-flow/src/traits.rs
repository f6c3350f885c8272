//! Core traits for conjugate flow solvers.

use crate::error::FlowResult;
use crate::state::{Driver, FlowState};
use rf_core::Real;

/// Immutable snapshot produced by one solve.
pub trait FlowSolution: Clone + Send {
    /// Driver the snapshot was solved for.
    fn driver(&self) -> Driver;

    /// Pressure drop over the conduit [Pa].
    fn pressure_drop(&self) -> Real;

    /// Volumetric flow rate [m^3/s].
    fn flow_rate(&self) -> Real;
}

/// A conduit that maps a driver to a consistent solution snapshot.
///
/// `solve` is a pure function of the driver and the solver's parameters, so
/// independent drivers can be solved concurrently. All state changes go
/// through `drive` and `resolve`, which commit a snapshot only when the solve
/// succeeds.
pub trait ConjugateFlow: Send + Sync {
    type Solution: FlowSolution;

    /// Solve for a positive, validated driver without touching state.
    fn solve(&self, driver: Driver) -> FlowResult<Self::Solution>;

    fn state(&self) -> &FlowState<Self::Solution>;

    fn state_mut(&mut self) -> &mut FlowState<Self::Solution>;

    /// Set a new driver and commit its solution.
    ///
    /// A zero driver clears the state. Invalid drivers and failed solves
    /// leave the previous state untouched.
    fn drive(&mut self, driver: Driver) -> FlowResult<()> {
        let driver = driver.validated()?;
        if driver.is_zero() {
            self.state_mut().clear();
            return Ok(());
        }
        let solution = self.solve(driver)?;
        self.state_mut().commit(driver, solution);
        Ok(())
    }

    /// Re-solve from the last driver after a parameter change.
    ///
    /// Without a driver this is a no-op. On failure the stale solution is
    /// dropped and the driver kept.
    fn resolve(&mut self) -> FlowResult<()> {
        let Some(driver) = self.state().driver() else {
            return Ok(());
        };
        match self.solve(driver) {
            Ok(solution) => {
                self.state_mut().commit(driver, solution);
                Ok(())
            }
            Err(e) => {
                tracing::debug!(?driver, error = %e, "re-solve failed, dropping solution");
                self.state_mut().invalidate();
                Err(e)
            }
        }
    }

    /// Forget driver and solution.
    fn clear(&mut self) {
        self.state_mut().clear();
    }

    /// The committed solution, or `Unsolved`.
    fn solution(&self) -> FlowResult<&Self::Solution> {
        self.state().require("solution")
    }
}
