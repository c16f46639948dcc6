//! Valve with a lagged opening and scheduled faults.

use crate::error::ComponentResult;
use crate::fault::{FaultSchedule, FaultSlot};
use crate::lag::LaggedSetpoint;
use crate::traits::{Controllable, FlowComponent, Stream};
use ds_core::{Real, SimTime};
use serde::{Deserialize, Serialize};

/// Configuration values for a [`Valve`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValveConfig {
    pub name: String,
    pub maximum_mass_flow_out: Real,
    pub setting: Real,
    pub opening: Real,
    pub time_constant: SimTime,
    #[serde(default)]
    pub faults: FaultSchedule,
}

/// Variable-capacity valve.
///
/// The opening is the flow capacity the valve currently allows. It lags the
/// commanded setting with a first-order response and is bounded by
/// `[0, maximum_mass_flow_out]`. Mass flow and temperature are pass-through
/// values written by the orchestrator once the upstream flow is known.
#[derive(Clone, Debug)]
pub struct Valve {
    name: String,
    opening: LaggedSetpoint,
    mass_flow_out: Real,
    temperature_out: Real,
}

impl Valve {
    /// Create a new valve without faults.
    ///
    /// # Errors
    /// Returns error if the maximum is negative, a value is not finite, or the
    /// time constant is not positive.
    pub fn new(
        name: impl Into<String>,
        maximum_mass_flow_out: Real,
        setting: Real,
        opening: Real,
        time_constant: SimTime,
    ) -> ComponentResult<Self> {
        Ok(Self {
            name: name.into(),
            opening: LaggedSetpoint::new(maximum_mass_flow_out, setting, opening, time_constant)?,
            mass_flow_out: 0.0,
            temperature_out: 0.0,
        })
    }

    pub fn from_config(config: &ValveConfig) -> ComponentResult<Self> {
        Ok(Self::new(
            config.name.clone(),
            config.maximum_mass_flow_out,
            config.setting,
            config.opening,
            config.time_constant,
        )?
        .with_faults(config.faults.clone()))
    }

    pub fn with_faults(mut self, faults: FaultSchedule) -> Self {
        self.opening = self.opening.with_faults(faults);
        self
    }

    /// Apply due faults and move the opening one step toward the setting.
    pub fn calculate_resistance(&mut self, t: SimTime, dt: SimTime) {
        self.opening.advance(&self.name, t, dt);
    }

    /// Current flow capacity.
    pub fn opening(&self) -> Real {
        self.opening.value()
    }

    pub fn maximum_mass_flow_out(&self) -> Real {
        self.opening.maximum()
    }

    pub fn active_fault(&self) -> Option<FaultSlot> {
        self.opening.active_fault()
    }

    pub fn set_mass_flow_out(&mut self, mass_flow: Real) {
        self.mass_flow_out = mass_flow;
    }

    pub fn set_temperature_out(&mut self, temperature: Real) {
        self.temperature_out = temperature;
    }

    pub fn mass_flow_out(&self) -> Real {
        self.mass_flow_out
    }

    pub fn temperature_out(&self) -> Real {
        self.temperature_out
    }
}

impl FlowComponent for Valve {
    fn name(&self) -> &str {
        &self.name
    }

    fn outflow(&self) -> Stream {
        Stream::new(self.mass_flow_out, self.temperature_out)
    }
}

impl Controllable for Valve {
    fn set_setting(&mut self, value: Real) {
        self.opening.set_setting(value);
    }

    fn setting(&self) -> Real {
        self.opening.setting()
    }
}
