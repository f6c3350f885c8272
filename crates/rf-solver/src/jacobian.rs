//! Finite difference Jacobian computation.

use crate::error::SolverError;
use nalgebra::{DMatrix, DVector};
use rf_core::Real;

/// Compute the Jacobian using forward finite differences.
///
/// Column j is `(f(x + h e_j) - f(x)) / h` with `h = epsilon * max(|x_j|, 1)`.
pub fn finite_difference_jacobian<F, E>(
    x: &DVector<Real>,
    f: F,
    epsilon: Real,
) -> Result<DMatrix<Real>, E>
where
    F: Fn(&DVector<Real>) -> Result<DVector<Real>, E>,
    E: From<SolverError>,
{
    if !(epsilon > 0.0) {
        return Err(SolverError::InvalidArg {
            what: "finite difference epsilon must be positive",
        }
        .into());
    }

    let n = x.len();
    let f_x = f(x)?;
    let m = f_x.len();

    let mut jac = DMatrix::zeros(m, n);

    for j in 0..n {
        let mut x_perturbed = x.clone();
        let dx = epsilon * x[j].abs().max(1.0);
        x_perturbed[j] += dx;

        let f_perturbed = f(&x_perturbed)?;
        if f_perturbed.len() != m {
            return Err(SolverError::Numeric {
                what: format!(
                    "residual length changed from {m} to {} while differencing",
                    f_perturbed.len()
                ),
            }
            .into());
        }
        jac.set_column(j, &((f_perturbed - &f_x) / dx));
    }

    Ok(jac)
}
