use crate::RfError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, RfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(RfError::NonFinite { what, value: v })
    }
}

/// `n` evenly spaced samples over `[lo, hi]`, endpoints included.
pub fn lin_space(lo: Real, hi: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as Real;
            (0..n)
                .map(|i| if i == n - 1 { hi } else { lo + step * i as Real })
                .collect()
        }
    }
}

/// `n` samples evenly spaced in log10 over `[lo, hi]`.
///
/// Both bounds must be strictly positive.
pub fn log_space(lo: Real, hi: Real, n: usize) -> Result<Vec<Real>, RfError> {
    if !(lo > 0.0 && hi > 0.0) {
        return Err(RfError::InvalidArg {
            what: "log_space bounds must be strictly positive",
        });
    }
    ensure_finite(lo, "log_space lower bound")?;
    ensure_finite(hi, "log_space upper bound")?;

    let mut samples: Vec<Real> = lin_space(lo.log10(), hi.log10(), n)
        .into_iter()
        .map(|e| 10.0_f64.powf(e))
        .collect();
    // Pin endpoints exactly; powf round-trips are off by an ulp or two.
    if let Some(first) = samples.first_mut() {
        *first = lo;
    }
    if n > 1 {
        if let Some(last) = samples.last_mut() {
            *last = hi;
        }
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn lin_space_endpoints() {
        let xs = lin_space(0.0, 0.01, 51);
        assert_eq!(xs.len(), 51);
        assert_eq!(xs[0], 0.0);
        assert_eq!(xs[50], 0.01);
        assert!(lin_space(0.0, 1.0, 0).is_empty());
        assert_eq!(lin_space(2.0, 5.0, 1), vec![2.0]);
    }

    #[test]
    fn log_space_decades() {
        let xs = log_space(1e-3, 1e4, 8).unwrap();
        assert_eq!(xs.len(), 8);
        assert_eq!(xs[0], 1e-3);
        assert_eq!(xs[7], 1e4);
        assert!((xs[3] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn log_space_rejects_non_positive() {
        assert!(log_space(0.0, 10.0, 5).is_err());
        assert!(log_space(-1.0, 10.0, 5).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn log_space_is_increasing(
            lo_exp in -6.0_f64..3.0,
            span in 0.1_f64..6.0,
            n in 2_usize..80,
        ) {
            let lo = 10.0_f64.powf(lo_exp);
            let hi = 10.0_f64.powf(lo_exp + span);
            let xs = log_space(lo, hi, n).unwrap();
            prop_assert_eq!(xs.len(), n);
            prop_assert!(xs.windows(2).all(|w| w[1] > w[0]));
        }
    }
}
