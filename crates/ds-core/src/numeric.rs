use crate::error::{DsError, DsResult};

/// Plant quantities: kg/s, °C, kJ, kJ/s, m and m².
pub type Real = f64;

/// Reject NaN and infinities coming in from configuration or operators.
pub fn ensure_finite(v: Real, what: &'static str) -> DsResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(DsError::NonFinite { what, value: v })
    }
}

/// Divide `num` by `den`, returning `fallback` when the denominator is zero
/// or the quotient is not finite.
///
/// Mixer and reservoir temperatures are derived through this so an empty
/// stream or an empty tank never feeds NaN into the next integration step.
pub fn guarded_div(num: Real, den: Real, fallback: Real) -> Real {
    if den == 0.0 {
        return fallback;
    }
    let q = num / den;
    if q.is_finite() { q } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_rejects_nan_and_infinity() {
        assert_eq!(ensure_finite(12.5, "level"), Ok(12.5));
        let err = ensure_finite(Real::NAN, "level").unwrap_err();
        assert!(matches!(err, DsError::NonFinite { what: "level", .. }));
        assert!(ensure_finite(Real::NEG_INFINITY, "energy").is_err());
    }

    #[test]
    fn guarded_div_zero_denominator() {
        assert_eq!(guarded_div(5.0, 0.0, 0.0), 0.0);
        assert_eq!(guarded_div(5.0, 0.0, 42.0), 42.0);
        assert_eq!(guarded_div(6.0, 3.0, 0.0), 2.0);
    }

    #[test]
    fn guarded_div_overflowing_quotient() {
        assert_eq!(guarded_div(Real::MAX, 1e-300, -1.0), -1.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn guarded_div_is_always_finite(num in -1e12_f64..1e12, den in -1e3_f64..1e3) {
            prop_assert!(guarded_div(num, den, 0.0).is_finite());
        }
    }
}
