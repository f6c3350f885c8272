//! Newton solver with backtracking line search and a lower bound on unknowns.

use crate::error::SolverError;
use nalgebra::{DMatrix, DVector};
use rf_core::Real;

/// Newton solver configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance for residual norm
    pub abs_tol: Real,
    /// Relative tolerance for residual norm (against the initial norm)
    pub rel_tol: Real,
    /// Converged once the full Newton step is this small relative to every unknown
    pub step_tol: Real,
    /// Every unknown must stay strictly above this value (`None` for no bound)
    pub min_value: Option<Real>,
    /// Line search backtracking factor
    pub line_search_beta: Real,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
    /// Step length below which the iteration is declared stagnant
    pub min_step: Real,
    /// Relative perturbation for finite difference Jacobians
    pub fd_epsilon: Real,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            abs_tol: 1e-10,
            rel_tol: 0.0,
            step_tol: 1e-10,
            min_value: Some(0.0),
            line_search_beta: 0.5,
            max_line_search_iters: 20,
            min_step: 1e-10,
            fd_epsilon: 1e-7,
        }
    }
}

/// Newton iteration result.
#[derive(Clone, Debug, PartialEq)]
pub struct NewtonResult {
    /// Solution vector
    pub x: DVector<Real>,
    /// Final residual norm
    pub residual_norm: Real,
    /// Number of iterations
    pub iterations: usize,
    /// Converged flag
    pub converged: bool,
}

impl NewtonConfig {
    fn admissible(&self, x: &DVector<Real>) -> bool {
        x.iter().all(|v| v.is_finite())
            && self
                .min_value
                .is_none_or(|lo| x.iter().all(|&v| v > lo))
    }
}

/// Newton solver with line search.
///
/// A trial point is accepted when it satisfies `min_value`, its residual can
/// be evaluated and is finite, and the residual norm decreases. When the
/// backtracking budget runs out the last trial is taken anyway, provided it is
/// admissible and evaluable; otherwise the solve fails. Residual errors
/// raised inside the line search only reject the trial.
pub fn newton_solve<F, J, E>(
    x0: DVector<Real>,
    residual_fn: F,
    jacobian_fn: J,
    config: &NewtonConfig,
) -> Result<NewtonResult, E>
where
    F: Fn(&DVector<Real>) -> Result<DVector<Real>, E>,
    J: Fn(&DVector<Real>) -> Result<DMatrix<Real>, E>,
    E: From<SolverError>,
{
    if !config.admissible(&x0) {
        return Err(SolverError::InvalidArg {
            what: "initial guess is non-finite or violates the lower bound",
        }
        .into());
    }

    let mut x = x0;
    let mut r = residual_fn(&x)?;
    let mut r_norm = r.norm();
    if !r_norm.is_finite() {
        return Err(SolverError::NonFinite {
            what: "initial residual norm",
            value: r_norm,
        }
        .into());
    }
    let r0_norm = r_norm;

    for iter in 0..config.max_iterations {
        // Check convergence
        if r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm {
            tracing::debug!(iterations = iter, residual = r_norm, "newton converged");
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
                converged: true,
            });
        }

        let jac = jacobian_fn(&x)?;

        // Solve J * dx = -r
        let dx = jac
            .lu()
            .solve(&(-&r))
            .ok_or_else(|| SolverError::Numeric {
                what: format!("singular Jacobian at iteration {iter}"),
            })?;

        let relative_step = dx
            .iter()
            .zip(x.iter())
            .map(|(d, v)| d.abs() / v.abs().max(Real::MIN_POSITIVE))
            .fold(0.0, Real::max);
        if relative_step < config.step_tol {
            tracing::debug!(
                iterations = iter,
                residual = r_norm,
                relative_step,
                "newton converged on step size"
            );
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
                converged: true,
            });
        }

        let mut alpha = 1.0;
        let mut trial = None;
        for _ in 0..config.max_line_search_iters.max(1) {
            let x_new = &x + alpha * &dx;
            trial = if config.admissible(&x_new) {
                residual_fn(&x_new)
                    .ok()
                    .map(|r_new| {
                        let norm = r_new.norm();
                        (x_new, r_new, norm)
                    })
                    .filter(|(_, _, norm)| norm.is_finite())
            } else {
                None
            };

            if matches!(&trial, Some((_, _, norm)) if *norm < r_norm) {
                break;
            }

            // Backtrack
            alpha *= config.line_search_beta;
        }

        let Some((x_new, r_new, r_new_norm)) = trial else {
            return Err(SolverError::ConvergenceFailed {
                what: format!("line search found no admissible point at iteration {iter}"),
            }
            .into());
        };

        tracing::trace!(
            iteration = iter,
            alpha,
            residual = r_new_norm,
            "newton step"
        );

        x = x_new;
        r = r_new;
        r_norm = r_new_norm;

        // Check for stagnation
        if alpha < config.min_step {
            return Err(SolverError::ConvergenceFailed {
                what: format!("line search stagnated at iteration {iter}"),
            }
            .into());
        }
    }

    Err(SolverError::ConvergenceFailed {
        what: format!(
            "maximum iterations {} reached, residual = {}",
            config.max_iterations, r_norm
        ),
    }
    .into())
}
