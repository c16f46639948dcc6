//! Simulation clock and steady-state detection.

use ds_core::{NEVER, SimTime};
use serde::Serialize;

/// Elapsed time plus the run of consecutive in-band time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationClock {
    pub t: SimTime,
    pub dt: SimTime,
    pub steady_time: SimTime,
    pub steady_limit: SimTime,
    /// Steady-state termination is enabled only when this is set.
    pub steady_min_time: Option<SimTime>,
    signalled: bool,
}

impl SimulationClock {
    pub fn new(dt: SimTime, steady_limit: SimTime, steady_min_time: Option<SimTime>) -> Self {
        Self {
            t: 0,
            dt,
            steady_time: 0,
            steady_limit,
            steady_min_time: steady_min_time.filter(|&m| m != NEVER),
            signalled: false,
        }
    }

    pub fn termination_enabled(&self) -> bool {
        self.steady_min_time.is_some()
    }

    /// Update the steady counter for this tick.
    ///
    /// Returns `true` exactly once: on the first tick the counter reaches the
    /// limit with termination enabled.
    pub fn update(&mut self, in_band: bool) -> bool {
        if in_band {
            self.steady_time += self.dt;
        } else {
            self.steady_time = 0;
        }
        tracing::debug!(t = self.t, steady_time = self.steady_time, "steady state");

        if self.termination_enabled() && !self.signalled && self.steady_time >= self.steady_limit {
            self.signalled = true;
            return true;
        }
        false
    }

    pub fn advance(&mut self) {
        self.t += self.dt;
    }
}
