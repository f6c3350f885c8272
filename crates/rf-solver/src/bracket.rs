//! Bracketed scalar root finding (Brent's method).

use crate::error::SolverError;
use rf_core::Real;

/// Brent solver configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BracketConfig {
    /// Absolute tolerance on the root location
    pub x_abs_tol: Real,
    /// Relative tolerance on the root location
    pub x_rel_tol: Real,
    /// Maximum iterations
    pub max_iterations: usize,
}

impl Default for BracketConfig {
    fn default() -> Self {
        Self {
            x_abs_tol: 2e-12,
            x_rel_tol: 4.0 * Real::EPSILON,
            max_iterations: 100,
        }
    }
}

/// Find a root of `f` in `[lo, hi]` with Brent's method.
///
/// Mixes bisection, secant and inverse quadratic interpolation. `f(lo)` and
/// `f(hi)` must differ in sign (or one of them be zero); otherwise the call
/// fails with [`SolverError::RootBracket`] instead of guessing. Errors from
/// `f` propagate unchanged.
pub fn brent<F, E>(mut f: F, lo: Real, hi: Real, config: &BracketConfig) -> Result<Real, E>
where
    F: FnMut(Real) -> Result<Real, E>,
    E: From<SolverError>,
{
    let mut eval = |x: Real| -> Result<Real, E> {
        let v = f(x)?;
        if v.is_finite() {
            Ok(v)
        } else {
            Err(SolverError::NonFinite {
                what: "bracketed function value",
                value: v,
            }
            .into())
        }
    };

    let mut x_pre = lo;
    let mut x_cur = hi;
    let mut f_pre = eval(x_pre)?;
    let mut f_cur = eval(x_cur)?;

    if f_pre * f_cur > 0.0 {
        tracing::debug!(lo, hi, f_lo = f_pre, f_hi = f_cur, "root not bracketed");
        return Err(SolverError::RootBracket {
            lo,
            hi,
            f_lo: f_pre,
            f_hi: f_cur,
        }
        .into());
    }
    if f_pre == 0.0 {
        return Ok(x_pre);
    }
    if f_cur == 0.0 {
        return Ok(x_cur);
    }

    // x_blk is the contrapoint: f(x_blk) always has the opposite sign of f(x_cur)
    let mut x_blk = 0.0;
    let mut f_blk = 0.0;
    let mut s_pre = 0.0;
    let mut s_cur = 0.0;

    for _ in 0..config.max_iterations {
        if f_pre != 0.0 && f_cur != 0.0 && (f_pre < 0.0) != (f_cur < 0.0) {
            x_blk = x_pre;
            f_blk = f_pre;
            s_pre = x_cur - x_pre;
            s_cur = s_pre;
        }
        if f_blk.abs() < f_cur.abs() {
            x_pre = x_cur;
            x_cur = x_blk;
            x_blk = x_pre;
            f_pre = f_cur;
            f_cur = f_blk;
            f_blk = f_pre;
        }

        let delta = 0.5 * (config.x_abs_tol + config.x_rel_tol * x_cur.abs());
        let s_bis = 0.5 * (x_blk - x_cur);
        if f_cur == 0.0 || s_bis.abs() < delta {
            return Ok(x_cur);
        }

        if s_pre.abs() > delta && f_cur.abs() < f_pre.abs() {
            let s_try = if x_pre == x_blk {
                // secant
                -f_cur * (x_cur - x_pre) / (f_cur - f_pre)
            } else {
                // inverse quadratic
                let d_pre = (f_pre - f_cur) / (x_pre - x_cur);
                let d_blk = (f_blk - f_cur) / (x_blk - x_cur);
                -f_cur * (f_blk * d_blk - f_pre * d_pre) / (d_blk * d_pre * (f_blk - f_pre))
            };
            if 2.0 * s_try.abs() < s_pre.abs().min(3.0 * s_bis.abs() - delta) {
                s_pre = s_cur;
                s_cur = s_try;
            } else {
                s_pre = s_bis;
                s_cur = s_bis;
            }
        } else {
            s_pre = s_bis;
            s_cur = s_bis;
        }

        x_pre = x_cur;
        f_pre = f_cur;
        if s_cur.abs() > delta {
            x_cur += s_cur;
        } else {
            x_cur += if s_bis > 0.0 { delta } else { -delta };
        }
        f_cur = eval(x_cur)?;
    }

    Err(SolverError::ConvergenceFailed {
        what: format!(
            "Brent reached {} iterations in [{lo}, {hi}], last x = {x_cur}",
            config.max_iterations
        ),
    }
    .into())
}
