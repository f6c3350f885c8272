//! Flow curve sampling.
//!
//! Produces log-spaced `(rate, viscosity, stress)` samples for external
//! plotting layers; nothing here renders anything.

use crate::error::{RheologyError, RheologyResult};
use crate::model::ViscosityModel;
use rf_core::{Real, log_space};

/// Default lower shear rate [1/s] of a sampled flow curve.
pub const DEFAULT_RATE_MIN: Real = 1e-3;

/// Default upper shear rate [1/s] of a sampled flow curve.
pub const DEFAULT_RATE_MAX: Real = 1e4;

/// Default number of samples per flow curve.
pub const DEFAULT_POINTS: usize = 51;

/// One point on a flow curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowCurvePoint {
    pub rate: Real,
    pub viscosity: Real,
    pub stress: Real,
}

/// Sample `model` at `points` log-spaced shear rates over `[rate_min, rate_max]`.
///
/// Fails if the model yields a non-positive or non-finite viscosity anywhere
/// on the grid.
pub fn flow_curve<V>(
    model: &V,
    rate_min: Real,
    rate_max: Real,
    points: usize,
) -> RheologyResult<Vec<FlowCurvePoint>>
where
    V: ViscosityModel + ?Sized,
{
    if rate_max <= rate_min {
        return Err(RheologyError::InvalidArg {
            what: "rate_max must exceed rate_min",
        });
    }
    let rates = log_space(rate_min, rate_max, points).map_err(|_| RheologyError::InvalidArg {
        what: "flow curve rates must be positive and finite",
    })?;

    rates
        .into_iter()
        .map(|rate| {
            let viscosity = model.viscosity(rate);
            if !viscosity.is_finite() || viscosity <= 0.0 {
                return Err(RheologyError::NonPhysical {
                    rate,
                    value: viscosity,
                });
            }
            Ok(FlowCurvePoint {
                rate,
                viscosity,
                stress: rate * viscosity,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PowerLaw;

    #[test]
    fn default_grid_spans_seven_decades() {
        let model = PowerLaw::default();
        let curve = flow_curve(&model, DEFAULT_RATE_MIN, DEFAULT_RATE_MAX, DEFAULT_POINTS).unwrap();
        assert_eq!(curve.len(), 51);
        assert_eq!(curve[0].rate, 1e-3);
        assert_eq!(curve[50].rate, 1e4);
        for p in &curve {
            assert!((p.stress - p.rate * p.viscosity).abs() <= 1e-12 * p.stress.abs());
        }
    }

    #[test]
    fn non_physical_model_is_reported() {
        let bad = |rate: Real| 1.0 - rate;
        let err = flow_curve(&bad, 0.1, 10.0, 5).unwrap_err();
        assert!(matches!(err, RheologyError::NonPhysical { .. }));
    }

    #[test]
    fn inverted_range_rejected() {
        let model = PowerLaw::default();
        assert!(flow_curve(&model, 10.0, 1.0, 5).is_err());
    }
}
