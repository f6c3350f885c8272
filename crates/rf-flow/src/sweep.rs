//! Parallel driver sweeps.
//!
//! Each sample is an independent solve evaluated on the rayon pool. Samples
//! that fail are logged and counted, never allowed to abort the sweep.

use crate::error::{FlowError, FlowResult};
use crate::state::Driver;
use crate::traits::{ConjugateFlow, FlowSolution};
use rayon::prelude::*;
use rf_core::Real;
use rf_core::numeric::log_space;
use serde::{Deserialize, Serialize};

/// Sweep configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Number of log-spaced samples
    pub points: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self { points: 51 }
    }
}

/// Solutions of a sweep, in driver order, with the count of failed samples.
#[derive(Clone, Debug, PartialEq)]
pub struct Sweep<S> {
    pub solutions: Vec<S>,
    pub skipped: usize,
}

impl<S: FlowSolution> Sweep<S> {
    /// `(flow_rate, pressure_drop)` pairs for a flow curve.
    pub fn curve(&self) -> Vec<(Real, Real)> {
        self.solutions
            .iter()
            .map(|s| (s.flow_rate(), s.pressure_drop()))
            .collect()
    }
}

/// Solve every driver independently and in parallel.
///
/// Zero, negative and non-finite drivers count as skipped.
pub fn sweep<C: ConjugateFlow>(flow: &C, drivers: &[Driver]) -> Sweep<C::Solution> {
    let results: Vec<Option<C::Solution>> = drivers
        .par_iter()
        .map(|&driver| {
            let solved = driver.validated().and_then(|d| {
                if d.is_zero() {
                    Err(FlowError::InvalidArg {
                        what: "sweep drivers must be positive",
                    })
                } else {
                    flow.solve(d)
                }
            });
            match solved {
                Ok(solution) => Some(solution),
                Err(e) => {
                    tracing::debug!(?driver, error = %e, "sweep sample skipped");
                    None
                }
            }
        })
        .collect();

    let total = results.len();
    let solutions: Vec<C::Solution> = results.into_iter().flatten().collect();
    Sweep {
        skipped: total - solutions.len(),
        solutions,
    }
}

/// Sweep pressure drops log-spaced over `[dp_min, dp_max]`.
pub fn pressure_drop_sweep<C: ConjugateFlow>(
    flow: &C,
    dp_min: Real,
    dp_max: Real,
    config: &SweepConfig,
) -> FlowResult<Sweep<C::Solution>> {
    let drivers: Vec<Driver> = log_space(dp_min, dp_max, config.points)
        .map_err(|_| FlowError::InvalidArg {
            what: "sweep bounds must be finite and strictly positive",
        })?
        .into_iter()
        .map(Driver::PressureDrop)
        .collect();
    Ok(sweep(flow, &drivers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::laminar::LaminarFlow;
    use rf_core::units::{kg_per_m3, m, pa_s};
    use rf_rheology::Newtonian;
    use std::f64::consts::PI;

    fn pipe(mu: Real) -> LaminarFlow<Newtonian> {
        let geometry = Geometry::pipe(m(0.01), m(1.0)).unwrap();
        LaminarFlow::new(geometry, kg_per_m3(1000.0), Newtonian::new(pa_s(mu)).unwrap()).unwrap()
    }

    #[test]
    fn newtonian_curve_is_linear() {
        let flow = pipe(1.0);
        let result = pressure_drop_sweep(&flow, 10.0, 1000.0, &SweepConfig { points: 5 }).unwrap();

        assert_eq!(result.skipped, 0);
        assert_eq!(result.solutions.len(), 5);
        for (q, dp) in result.curve() {
            let expected = PI * dp * 1e-8 / 8.0;
            assert!((q / expected - 1.0).abs() < 1e-8);
        }
        // Driver order is preserved
        assert_eq!(result.solutions[0].pressure_drop, 10.0);
        assert_eq!(result.solutions[4].pressure_drop, 1000.0);
    }

    #[test]
    fn failed_samples_are_skipped() {
        // Wall rate 5000 * dp exceeds the 1e6 bound above 200 Pa
        let flow = pipe(1e-6);
        let result = pressure_drop_sweep(&flow, 1.0, 1000.0, &SweepConfig { points: 7 }).unwrap();

        assert_eq!(result.skipped, 2);
        assert_eq!(result.solutions.len(), 5);
        assert!(result.solutions.iter().all(|s| s.pressure_drop < 200.0));
    }

    #[test]
    fn invalid_drivers_are_skipped() {
        let flow = pipe(1.0);
        let result = sweep(
            &flow,
            &[
                Driver::PressureDrop(0.0),
                Driver::PressureDrop(-5.0),
                Driver::PressureDrop(50.0),
            ],
        );
        assert_eq!(result.skipped, 2);
        assert_eq!(result.solutions.len(), 1);
    }

    #[test]
    fn bad_bounds_are_rejected() {
        let flow = pipe(1.0);
        assert!(matches!(
            pressure_drop_sweep(&flow, 0.0, 10.0, &SweepConfig::default()),
            Err(FlowError::InvalidArg { .. })
        ));
    }
}
