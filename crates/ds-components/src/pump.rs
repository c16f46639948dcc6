//! Pump whose delivery is capped by downstream resistance.

use crate::common::{check_finite, check_non_negative, clamp};
use crate::error::ComponentResult;
use crate::lag::FirstOrderLag;
use crate::traits::{FlowComponent, Stream};
use ds_core::{NEVER, Real, SimTime, is_due};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PumpConfig {
    pub name: String,
    /// Pump switched on at scenario start.
    pub running: bool,
    /// Initial delivered flow.
    #[serde(default)]
    pub mass_flow_out: Real,
    pub time_constant: SimTime,
    /// Time at which the pump trips off for the rest of the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_time: Option<SimTime>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PumpState {
    Running,
    Stopped,
    /// Switched off by its trip schedule; operator commands are ignored.
    Tripped,
}

/// Feed pump.
///
/// ## Model
///
/// Each tick the capacity is set from outside as the smaller of the
/// upstream valve opening and the splitter's allowable flow. Delivered flow
/// then lags toward the capacity (running) or zero (stopped) and is never
/// above the capacity:
///
/// ```text
/// q += (target - q) * dt / time_constant
/// q  = clamp(q, 0, capacity)
/// ```
///
/// A capacity of exactly zero means every downstream path is shut, which
/// the plant treats as a pump breakdown.
#[derive(Clone, Debug)]
pub struct Pump {
    name: String,
    state: PumpState,
    mass_flow_out: Real,
    temperature_out: Real,
    maximum_mass_flow_out: Real,
    lag: FirstOrderLag,
    trip_time: SimTime,
}

impl Pump {
    pub fn new(
        name: impl Into<String>,
        running: bool,
        mass_flow_out: Real,
        time_constant: SimTime,
    ) -> ComponentResult<Self> {
        let mass_flow_out = check_non_negative(mass_flow_out, "pump mass flow must be non-negative")?;
        Ok(Self {
            name: name.into(),
            state: if running {
                PumpState::Running
            } else {
                PumpState::Stopped
            },
            mass_flow_out,
            temperature_out: 0.0,
            maximum_mass_flow_out: 0.0,
            lag: FirstOrderLag::new(time_constant)?,
            trip_time: NEVER,
        })
    }

    pub fn from_config(config: &PumpConfig) -> ComponentResult<Self> {
        let pump = Self::new(
            config.name.clone(),
            config.running,
            config.mass_flow_out,
            config.time_constant,
        )?;
        Ok(match config.trip_time {
            Some(t) => pump.with_trip_time(t),
            None => pump,
        })
    }

    pub fn with_trip_time(mut self, trip_time: SimTime) -> Self {
        self.trip_time = trip_time;
        self
    }

    /// Cap capacity to the smaller of the outlet valve and downstream splitter.
    pub fn set_maximum_pipe_flow(&mut self, valve_opening: Real, splitter_maximum: Real) {
        let capacity = valve_opening.min(splitter_maximum);
        self.maximum_mass_flow_out = if capacity.is_finite() {
            capacity.max(0.0)
        } else {
            0.0
        };
    }

    /// Move delivered flow one step toward the state's target.
    pub fn set_mass_flow_out(&mut self, t: SimTime, dt: SimTime) {
        if self.state != PumpState::Tripped && is_due(self.trip_time, t) {
            tracing::info!(pump = %self.name, t, "pump tripped by schedule");
            self.state = PumpState::Tripped;
        }

        let target = match self.state {
            PumpState::Running => self.maximum_mass_flow_out,
            PumpState::Stopped | PumpState::Tripped => 0.0,
        };
        let q = self.lag.advance(self.mass_flow_out, target, dt);
        self.mass_flow_out = clamp(q, 0.0, self.maximum_mass_flow_out);
    }

    pub fn set_temperature_out(&mut self, temperature: Real) {
        if check_finite(temperature, "pump temperature").is_ok() {
            self.temperature_out = temperature;
        }
    }

    /// Operator on/off. Has no effect once the pump has tripped.
    pub fn set_running(&mut self, running: bool) {
        self.state = match (self.state, running) {
            (PumpState::Tripped, _) => PumpState::Tripped,
            (_, true) => PumpState::Running,
            (_, false) => PumpState::Stopped,
        };
    }

    pub fn state(&self) -> PumpState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PumpState::Running
    }

    /// True when every downstream path is fully closed.
    pub fn is_broken(&self) -> bool {
        self.maximum_mass_flow_out == 0.0
    }

    pub fn maximum_mass_flow_out(&self) -> Real {
        self.maximum_mass_flow_out
    }

    pub fn mass_flow_out(&self) -> Real {
        self.mass_flow_out
    }

    pub fn temperature_out(&self) -> Real {
        self.temperature_out
    }
}

impl FlowComponent for Pump {
    fn name(&self) -> &str {
        &self.name
    }

    fn outflow(&self) -> Stream {
        Stream::new(self.mass_flow_out, self.temperature_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pump_creation() {
        assert!(Pump::new("PA", true, 0.0, 1000).is_ok());
        assert!(Pump::new("PA", true, -1.0, 1000).is_err());
        assert!(Pump::new("PA", true, 0.0, 0).is_err());
    }

    #[test]
    fn capacity_is_min_of_valve_and_splitter() {
        let mut pump = Pump::new("PA", true, 0.0, 1000).unwrap();
        pump.set_maximum_pipe_flow(8.0, 5.0);
        assert_eq!(pump.maximum_mass_flow_out(), 5.0);
        pump.set_maximum_pipe_flow(3.0, 5.0);
        assert_eq!(pump.maximum_mass_flow_out(), 3.0);
    }

    #[test]
    fn running_pump_approaches_capacity() {
        let mut pump = Pump::new("PA", true, 0.0, 1000).unwrap();
        let mut t = 0;
        for _ in 0..50 {
            pump.set_maximum_pipe_flow(10.0, 6.0);
            pump.set_mass_flow_out(t, 200);
            assert!(pump.mass_flow_out() <= 6.0);
            t += 200;
        }
        assert!((pump.mass_flow_out() - 6.0).abs() < 1e-3);
    }

    #[test]
    fn flow_drops_with_capacity() {
        let mut pump = Pump::new("PA", true, 6.0, 1000).unwrap();
        pump.set_maximum_pipe_flow(2.0, 10.0);
        pump.set_mass_flow_out(0, 100);
        assert_eq!(pump.mass_flow_out(), 2.0);
    }

    #[test]
    fn stopped_pump_spins_down() {
        let mut pump = Pump::new("PA", false, 4.0, 1000).unwrap();
        pump.set_maximum_pipe_flow(10.0, 10.0);
        pump.set_mass_flow_out(0, 1000);
        assert_eq!(pump.mass_flow_out(), 0.0);
    }

    #[test]
    fn broken_when_blocked() {
        let mut pump = Pump::new("PA", true, 0.0, 1000).unwrap();
        pump.set_maximum_pipe_flow(5.0, 0.0);
        assert!(pump.is_broken());
        pump.set_maximum_pipe_flow(5.0, 0.1);
        assert!(!pump.is_broken());
    }

    #[test]
    fn trip_is_sticky() {
        let mut pump = Pump::new("PA", true, 5.0, 1000).unwrap().with_trip_time(2000);
        pump.set_maximum_pipe_flow(10.0, 10.0);
        pump.set_mass_flow_out(1000, 1000);
        assert!(pump.is_running());
        pump.set_mass_flow_out(2000, 1000);
        assert_eq!(pump.state(), PumpState::Tripped);
        assert_eq!(pump.mass_flow_out(), 0.0);
        pump.set_running(true);
        assert_eq!(pump.state(), PumpState::Tripped);
    }

    #[test]
    fn non_finite_temperature_ignored() {
        let mut pump = Pump::new("PA", true, 0.0, 1000).unwrap();
        pump.set_temperature_out(12.0);
        pump.set_temperature_out(f64::NAN);
        assert_eq!(pump.temperature_out(), 12.0);
    }
}
