//! Scheduled faults.
//!
//! A fault is a `(setpoint, time)` pair. Once the simulation clock reaches
//! `time` the component's setting is forced to `setpoint` on every tick for
//! the rest of the run. Each component carries up to two faults; when both
//! are due the second one wins.

use ds_core::{NEVER, Real, SimTime, is_due};
use serde::{Deserialize, Serialize};

/// A single scheduled override.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fault {
    pub setpoint: Real,
    /// Scaled time at which the fault takes over. `NEVER` disables it.
    pub time: SimTime,
}

impl Fault {
    pub fn new(setpoint: Real, time: SimTime) -> Self {
        Self { setpoint, time }
    }

    pub fn is_due(&self, t: SimTime) -> bool {
        self.is_enabled() && is_due(self.time, t)
    }

    pub fn is_enabled(&self) -> bool {
        self.time != NEVER
    }
}

/// Which schedule entry is in control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FaultSlot {
    First,
    Second,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveFault {
    pub slot: FaultSlot,
    pub setpoint: Real,
}

/// Up to two scheduled faults for one component.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FaultSchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<Fault>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<Fault>,
}

impl FaultSchedule {
    pub fn none() -> Self {
        Self::default()
    }

    /// Schedule with a single fault in the first slot.
    pub fn single(setpoint: Real, time: SimTime) -> Self {
        Self {
            first: Some(Fault::new(setpoint, time)),
            second: None,
        }
    }

    pub fn pair(first: Fault, second: Fault) -> Self {
        Self {
            first: Some(first),
            second: Some(second),
        }
    }

    /// The fault in control at time `t`, if any.
    pub fn active(&self, t: SimTime) -> Option<ActiveFault> {
        // Second entry is checked first: when both are due it overrides.
        if let Some(f) = self.second.filter(|f| f.is_due(t)) {
            return Some(ActiveFault {
                slot: FaultSlot::Second,
                setpoint: f.setpoint,
            });
        }
        self.first.filter(|f| f.is_due(t)).map(|f| ActiveFault {
            slot: FaultSlot::First,
            setpoint: f.setpoint,
        })
    }
}
