//! One supply branch: pump, upstream valve, splitter, two downstream valves.

use crate::error::SimResult;
use ds_components::{
    FlowComponent, Pump, PumpConfig, Splitter, SplitterConfig, Stream, Valve, ValveConfig,
};
use ds_core::{Real, SimTime};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BranchConfig {
    pub pump: PumpConfig,
    pub valve: ValveConfig,
    pub splitter: SplitterConfig,
    /// Feeds reservoir 1.
    pub valve_1: ValveConfig,
    /// Feeds reservoir 2.
    pub valve_2: ValveConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValveSlot {
    Upstream,
    First,
    Second,
}

#[derive(Clone, Debug)]
pub struct Branch {
    pump: Pump,
    valve: Valve,
    splitter: Splitter,
    valve_1: Valve,
    valve_2: Valve,
}

impl Branch {
    pub fn from_config(config: &BranchConfig) -> SimResult<Self> {
        Ok(Self {
            pump: Pump::from_config(&config.pump)?,
            valve: Valve::from_config(&config.valve)?,
            splitter: Splitter::from_config(&config.splitter)?,
            valve_1: Valve::from_config(&config.valve_1)?,
            valve_2: Valve::from_config(&config.valve_2)?,
        })
    }

    /// Downstream valves, then the splitter, then the upstream valve.
    pub(crate) fn calculate_resistances(&mut self, t: SimTime, dt: SimTime) {
        self.valve_1.calculate_resistance(t, dt);
        self.valve_2.calculate_resistance(t, dt);
        self.splitter
            .calculate_resistance(self.valve_1.opening(), self.valve_2.opening());
        self.valve.calculate_resistance(t, dt);
    }

    pub(crate) fn drive_pump(&mut self, t: SimTime, dt: SimTime, supply_temperature: Real) {
        self.pump
            .set_maximum_pipe_flow(self.valve.opening(), self.splitter.maximum_allowable_mass_flow());
        self.pump.set_mass_flow_out(t, dt);
        self.pump.set_temperature_out(supply_temperature);
    }

    pub(crate) fn propagate(&mut self) {
        let Stream {
            mass_flow,
            temperature,
        } = self.pump.outflow();
        self.valve.set_mass_flow_out(mass_flow);
        self.valve.set_temperature_out(temperature);

        self.splitter.set_mass_flow_out(
            self.valve.mass_flow_out(),
            self.valve_1.opening(),
            self.valve_2.opening(),
        );
        self.splitter.set_temperature_out(self.valve.temperature_out());

        for (valve, stream) in [
            (&mut self.valve_1, self.splitter.outflow()),
            (&mut self.valve_2, self.splitter.outflow2()),
        ] {
            valve.set_mass_flow_out(stream.mass_flow);
            valve.set_temperature_out(stream.temperature);
        }
    }

    pub fn pump(&self) -> &Pump {
        &self.pump
    }

    pub(crate) fn pump_mut(&mut self) -> &mut Pump {
        &mut self.pump
    }

    pub fn splitter(&self) -> &Splitter {
        &self.splitter
    }

    pub fn valve(&self, slot: ValveSlot) -> &Valve {
        match slot {
            ValveSlot::Upstream => &self.valve,
            ValveSlot::First => &self.valve_1,
            ValveSlot::Second => &self.valve_2,
        }
    }

    pub(crate) fn valve_mut(&mut self, slot: ValveSlot) -> &mut Valve {
        match slot {
            ValveSlot::Upstream => &mut self.valve,
            ValveSlot::First => &mut self.valve_1,
            ValveSlot::Second => &mut self.valve_2,
        }
    }
}
