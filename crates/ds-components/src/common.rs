//! Common utilities for component calculations.

use crate::error::{ComponentError, ComponentResult};
use ds_core::numeric::ensure_finite;

/// Inflow below this is treated as "no flow" when carrying a temperature.
pub const EPSILON_MDOT: f64 = 0.00005;

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })?;
    Ok(())
}

/// Ensure a value is finite and not negative.
pub fn check_non_negative(value: f64, what: &'static str) -> ComponentResult<f64> {
    check_finite(value, what)?;
    if value < 0.0 {
        return Err(ComponentError::InvalidArg { what });
    }
    Ok(value)
}

/// Clamp into `[min, max]`. Unlike `f64::clamp` this never panics; with
/// `min > max` the upper bound wins.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}
