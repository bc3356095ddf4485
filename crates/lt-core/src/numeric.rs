use crate::CoreError;

/// Floating point type carried by loop signals.
pub type Real = f64;

/// Absolute/relative comparison tolerance.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// Tolerance matching a value printed with `decimals` fixed digits.
    ///
    /// A printed value is off by at most half a unit in the last place.
    pub fn fixed_decimals(decimals: u32) -> Self {
        Self {
            abs: 0.5 * 10f64.powi(-(decimals as i32)) + 1e-9,
            rel: 0.0,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Fail with `InvalidArg` unless `v > 0` and finite.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(CoreError::InvalidArg { what })
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn printed_value_is_within_fixed_tolerance(v in -1.0e6_f64..1.0e6_f64) {
            let printed: f64 = format!("{v:.3}").parse().unwrap();
            prop_assert!(nearly_equal(printed, v, Tolerances::fixed_decimals(3)));
        }
    }
}
