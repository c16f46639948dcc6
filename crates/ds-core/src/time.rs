//! Scaled simulation time.
//!
//! Time is an integer count of scaled milliseconds: one unit is 1/1000 of a
//! plant second. Rates in the plant (mass flow, heat flow) are per second,
//! so every integration multiplies by `dt / 1000`.

use std::time::Duration;

/// Scaled simulation time (milliseconds of plant time).
pub type SimTime = i64;

/// Sentinel marking a scheduled event as disabled.
pub const NEVER: SimTime = -60_000;

/// Scaled time units per plant second.
pub const TIME_SCALE: SimTime = 1000;

/// True once a scheduled time has been reached. `NEVER` is never due.
#[inline]
pub fn is_due(scheduled: SimTime, t: SimTime) -> bool {
    scheduled != NEVER && scheduled <= t
}

/// Convert a step `dt` into plant seconds.
#[inline]
pub fn seconds(dt: SimTime) -> f64 {
    dt as f64 / TIME_SCALE as f64
}

/// Wall-clock duration to wait for one step, stretched by `scale`.
///
/// A `scale` of 1.0 paces one scaled millisecond per wall millisecond;
/// non-positive or non-finite scales and negative steps yield zero, and a
/// stretch beyond what `Duration` can hold saturates at `Duration::MAX`.
pub fn wall_duration(dt: SimTime, scale: f64) -> Duration {
    if dt <= 0 || !scale.is_finite() || scale <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(seconds(dt) * scale).unwrap_or(Duration::MAX)
}
