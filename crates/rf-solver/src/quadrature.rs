//! Adaptive Gauss-Kronrod quadrature.
//!
//! Globally adaptive: the segment with the largest error estimate is bisected
//! until the summed estimate meets the tolerance or the subdivision budget is
//! spent. Each segment is integrated with the 15-point Kronrod rule and its
//! embedded 7-point Gauss rule; their difference is the error estimate.

use crate::error::SolverError;
use rf_core::Real;

/// Kronrod abscissae on [-1, 1] (non-negative half, descending).
const XGK: [Real; 8] = [
    0.991_455_371_120_812_6,
    0.949_107_912_342_758_5,
    0.864_864_423_359_769_1,
    0.741_531_185_599_394_4,
    0.586_087_235_467_691_1,
    0.405_845_151_377_397_2,
    0.207_784_955_007_898_5,
    0.0,
];

/// Kronrod weights matching `XGK`.
const WGK: [Real; 8] = [
    0.022_935_322_010_529_22,
    0.063_092_092_629_978_55,
    0.104_790_010_322_250_18,
    0.140_653_259_715_525_92,
    0.169_004_726_639_267_9,
    0.190_350_578_064_785_4,
    0.204_432_940_075_298_9,
    0.209_482_141_084_727_83,
];

/// Gauss weights for the odd-indexed Kronrod nodes (`XGK[1]`, `XGK[3]`, ...).
const WG: [Real; 4] = [
    0.129_484_966_168_869_7,
    0.279_705_391_489_276_7,
    0.381_830_050_505_118_9,
    0.417_959_183_673_469_4,
];

/// Quadrature configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QuadratureConfig {
    /// Absolute tolerance on the integral
    pub abs_tol: Real,
    /// Relative tolerance on the integral
    pub rel_tol: Real,
    /// Maximum number of segments
    pub max_subdivisions: usize,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            abs_tol: 1e-15,
            rel_tol: 1.49e-8,
            max_subdivisions: 50,
        }
    }
}

/// Integral value with its error estimate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quadrature {
    pub value: Real,
    pub error: Real,
    pub subdivisions: usize,
    /// False when the subdivision budget ran out before the tolerance was met
    pub converged: bool,
}

#[derive(Clone, Copy, Debug)]
struct Segment {
    lo: Real,
    hi: Real,
    value: Real,
    error: Real,
}

fn kronrod<F, E>(f: &mut F, lo: Real, hi: Real) -> Result<Segment, E>
where
    F: FnMut(Real) -> Result<Real, E>,
    E: From<SolverError>,
{
    let center = 0.5 * (lo + hi);
    let half = 0.5 * (hi - lo);

    let mut sample = |x: Real| -> Result<Real, E> {
        let v = f(x)?;
        if v.is_finite() {
            Ok(v)
        } else {
            Err(SolverError::NonFinite {
                what: "integrand",
                value: v,
            }
            .into())
        }
    };

    let f_center = sample(center)?;
    let mut k = WGK[7] * f_center;
    let mut g = WG[3] * f_center;
    for j in 0..7 {
        let dx = half * XGK[j];
        let pair = sample(center - dx)? + sample(center + dx)?;
        k += WGK[j] * pair;
        if j % 2 == 1 {
            g += WG[j / 2] * pair;
        }
    }

    Ok(Segment {
        lo,
        hi,
        value: k * half,
        error: ((k - g) * half).abs(),
    })
}

/// Integrate `f` over `[lo, hi]`.
///
/// Reversed bounds negate the result. Non-finite integrand values are errors;
/// exhausting the subdivision budget is not, it logs a warning and returns
/// the best estimate with `converged = false`.
pub fn integrate<F, E>(
    mut f: F,
    lo: Real,
    hi: Real,
    config: &QuadratureConfig,
) -> Result<Quadrature, E>
where
    F: FnMut(Real) -> Result<Real, E>,
    E: From<SolverError>,
{
    if !lo.is_finite() || !hi.is_finite() {
        return Err(SolverError::InvalidArg {
            what: "integration bounds must be finite",
        }
        .into());
    }
    if lo == hi {
        return Ok(Quadrature {
            value: 0.0,
            error: 0.0,
            subdivisions: 0,
            converged: true,
        });
    }
    if lo > hi {
        let q = integrate(f, hi, lo, config)?;
        return Ok(Quadrature {
            value: -q.value,
            ..q
        });
    }

    let mut segments = vec![kronrod(&mut f, lo, hi)?];
    loop {
        let value: Real = segments.iter().map(|s| s.value).sum();
        let error: Real = segments.iter().map(|s| s.error).sum();

        if error <= config.abs_tol.max(config.rel_tol * value.abs()) {
            return Ok(Quadrature {
                value,
                error,
                subdivisions: segments.len(),
                converged: true,
            });
        }
        if segments.len() >= config.max_subdivisions.max(1) {
            tracing::warn!(
                lo,
                hi,
                value,
                error,
                subdivisions = segments.len(),
                "quadrature subdivision limit reached"
            );
            return Ok(Quadrature {
                value,
                error,
                subdivisions: segments.len(),
                converged: false,
            });
        }

        let worst = segments
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.error.total_cmp(&b.1.error))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let seg = segments.swap_remove(worst);
        let mid = 0.5 * (seg.lo + seg.hi);
        segments.push(kronrod(&mut f, seg.lo, mid)?);
        segments.push(kronrod(&mut f, mid, seg.hi)?);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverResult;

    fn quad<F: FnMut(Real) -> Real>(mut f: F, lo: Real, hi: Real) -> SolverResult<Quadrature> {
        integrate(|x| Ok::<_, SolverError>(f(x)), lo, hi, &QuadratureConfig::default())
    }

    #[test]
    fn polynomials_are_exact() {
        let q = quad(|x| 3.0 * x * x * x - x + 2.0, 0.0, 2.0).unwrap();
        // 3/4*16 - 2 + 4
        assert!((q.value - 14.0).abs() < 1e-12);
        assert!(q.converged);
        assert_eq!(q.subdivisions, 1);
    }

    #[test]
    fn smooth_transcendental() {
        let q = quad(Real::sin, 0.0, std::f64::consts::PI).unwrap();
        assert!((q.value - 2.0).abs() < 1e-12);
    }

    #[test]
    fn kinked_integrand_subdivides() {
        // |x - 1/3| over [0, 1]: (1/3)^2/2 + (2/3)^2/2 = 5/18
        let q = quad(|x| (x - 1.0 / 3.0).abs(), 0.0, 1.0).unwrap();
        assert!((q.value - 5.0 / 18.0).abs() < 1e-8);
        assert!(q.subdivisions > 1);
    }

    #[test]
    fn reversed_bounds_negate() {
        let fwd = quad(|x| x * x, 0.0, 1.0).unwrap();
        let rev = quad(|x| x * x, 1.0, 0.0).unwrap();
        assert!((fwd.value + rev.value).abs() < 1e-15);
    }

    #[test]
    fn empty_interval_is_zero() {
        let q = quad(|_| panic!("integrand must not be sampled"), 0.3, 0.3).unwrap();
        assert_eq!(q.value, 0.0);
    }

    #[test]
    fn budget_exhaustion_is_reported() {
        let config = QuadratureConfig {
            max_subdivisions: 2,
            ..QuadratureConfig::default()
        };
        let q = integrate(
            |x: Real| Ok::<_, SolverError>((x - 1.0 / 3.0).abs()),
            0.0,
            1.0,
            &config,
        )
        .unwrap();
        assert!(!q.converged);
        assert_eq!(q.subdivisions, 2);
    }

    #[test]
    fn non_finite_integrand_is_an_error() {
        let err = quad(|x| 1.0 / (x - 0.5), 0.0, 1.0);
        // 0.5 is the center node of the first rule
        assert!(matches!(err, Err(SolverError::NonFinite { .. })));
    }
}
