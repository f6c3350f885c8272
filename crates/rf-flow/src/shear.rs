//! Shear-rate inversion: the rate at which a model carries a given stress.

use crate::error::{FlowError, FlowResult};
use rf_core::Real;
use rf_rheology::ViscosityModel;
use rf_solver::{BracketConfig, SolverError, brent};

/// Solve `rate * viscosity(rate) = target_stress` for `rate` in `[0, upper]`.
///
/// The result is never clamped: a target the model cannot reach inside the
/// interval is a [`FlowError::RootBracket`].
pub fn invert_shear_rate<V: ViscosityModel + ?Sized>(
    target_stress: Real,
    viscosity: &V,
    upper: Real,
    config: &BracketConfig,
) -> FlowResult<Real> {
    if !target_stress.is_finite() {
        return Err(FlowError::InvalidArg {
            what: "target stress must be finite",
        });
    }
    if !(upper.is_finite() && upper > 0.0) {
        return Err(FlowError::InvalidArg {
            what: "shear-rate search bound must be positive",
        });
    }

    brent(
        |rate| Ok::<_, SolverError>(viscosity.stress(rate) - target_stress),
        0.0,
        upper,
        config,
    )
    .map_err(|e| FlowError::from(e).bracket_context("shear rate", target_stress))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_core::units::pa_s;
    use rf_rheology::{HerschelBulkley, Newtonian, PowerLaw};

    fn invert<V: ViscosityModel>(tau: Real, model: &V) -> FlowResult<Real> {
        invert_shear_rate(tau, model, 1e6, &BracketConfig::default())
    }

    #[test]
    fn newtonian_inverts_exactly() {
        let model = Newtonian::new(pa_s(0.5)).unwrap();
        let rate = invert(10.0, &model).unwrap();
        assert!((rate - 20.0).abs() < 1e-9);
    }

    #[test]
    fn power_law_inverts() {
        let model = PowerLaw::new(2.0, 0.5).unwrap();
        let rate = invert(20.0, &model).unwrap();
        // 2 * sqrt(rate) = 20
        assert!((rate - 100.0).abs() < 1e-6);
        assert!((model.stress(rate) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn zero_stress_is_zero_rate() {
        let model = PowerLaw::new(1.0, 0.5).unwrap();
        assert_eq!(invert(0.0, &model).unwrap(), 0.0);
    }

    #[test]
    fn unreachable_stress_is_a_bracket_error() {
        // Newtonian 1e-3 Pa.s tops out at 1e3 Pa for rates up to 1e6
        let model = Newtonian::new(pa_s(1e-3)).unwrap();
        let err = invert(5e3, &model).unwrap_err();
        assert_eq!(
            err,
            FlowError::RootBracket {
                what: "shear rate",
                target: 5e3,
                lo: 0.0,
                hi: 1e6,
            }
        );
    }

    #[test]
    fn negative_stress_is_never_clamped() {
        let model = Newtonian::new(pa_s(1.0)).unwrap();
        assert!(matches!(
            invert(-1.0, &model),
            Err(FlowError::RootBracket { .. })
        ));
    }

    #[test]
    fn regularized_yield_stress_model_inverts() {
        let model = HerschelBulkley::default();
        let tau = model.stress(37.0);
        let rate = invert(tau, &model).unwrap();
        assert!((rate - 37.0).abs() < 1e-6);
    }

    #[test]
    fn closures_invert() {
        let model = |rate: Real| 1.0 + rate;
        // rate + rate^2 = 6
        let rate = invert(6.0, &model).unwrap();
        assert!((rate - 2.0).abs() < 1e-9);
    }
}
