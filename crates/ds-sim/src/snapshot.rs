//! Read-only plant state taken between ticks.

use crate::branch::{Branch, ValveSlot};
use crate::reservoir::{Reservoir, ReservoirFault};
use crate::score::Score;
use ds_components::{
    Controllable, Demand, FlowComponent, Heater, HiddenHeater, Mixer, PumpState, Valve,
};
use ds_core::{Real, SimTime};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValveSnapshot {
    pub name: String,
    pub setting: Real,
    pub opening: Real,
    pub maximum_mass_flow_out: Real,
    pub mass_flow_out: Real,
    pub temperature_out: Real,
}

impl From<&Valve> for ValveSnapshot {
    fn from(v: &Valve) -> Self {
        Self {
            name: v.name().to_string(),
            setting: v.setting(),
            opening: v.opening(),
            maximum_mass_flow_out: v.maximum_mass_flow_out(),
            mass_flow_out: v.mass_flow_out(),
            temperature_out: v.temperature_out(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PumpSnapshot {
    pub name: String,
    pub state: PumpState,
    pub mass_flow_out: Real,
    pub maximum_mass_flow_out: Real,
    pub temperature_out: Real,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SplitterSnapshot {
    pub name: String,
    pub maximum_allowable_mass_flow: Real,
    pub mass_flow_out: Real,
    pub mass_flow_out2: Real,
    pub temperature_out: Real,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BranchSnapshot {
    pub pump: PumpSnapshot,
    pub valve: ValveSnapshot,
    pub splitter: SplitterSnapshot,
    pub valve_1: ValveSnapshot,
    pub valve_2: ValveSnapshot,
}

impl From<&Branch> for BranchSnapshot {
    fn from(b: &Branch) -> Self {
        let pump = b.pump();
        let splitter = b.splitter();
        Self {
            pump: PumpSnapshot {
                name: pump.name().to_string(),
                state: pump.state(),
                mass_flow_out: pump.mass_flow_out(),
                maximum_mass_flow_out: pump.maximum_mass_flow_out(),
                temperature_out: pump.temperature_out(),
            },
            valve: b.valve(ValveSlot::Upstream).into(),
            splitter: SplitterSnapshot {
                name: splitter.name().to_string(),
                maximum_allowable_mass_flow: splitter.maximum_allowable_mass_flow(),
                mass_flow_out: splitter.mass_flow_out(),
                mass_flow_out2: splitter.mass_flow_out2(),
                temperature_out: splitter.temperature_out(),
            },
            valve_1: b.valve(ValveSlot::First).into(),
            valve_2: b.valve(ValveSlot::Second).into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MixerSnapshot {
    pub name: String,
    pub mass_flow_out: Real,
    pub temperature_out: Real,
}

impl From<&Mixer> for MixerSnapshot {
    fn from(m: &Mixer) -> Self {
        Self {
            name: m.name().to_string(),
            mass_flow_out: m.mass_flow_out(),
            temperature_out: m.temperature_out(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeaterSnapshot {
    pub name: String,
    pub setting: Real,
    pub heat_flow_out: Real,
    pub maximum_heat_flow_out: Real,
}

impl From<&Heater> for HeaterSnapshot {
    fn from(h: &Heater) -> Self {
        Self {
            name: h.name().to_string(),
            setting: h.setting(),
            heat_flow_out: h.heat_flow_out(),
            maximum_heat_flow_out: h.maximum_heat_flow_out(),
        }
    }
}

impl From<&HiddenHeater> for HeaterSnapshot {
    fn from(h: &HiddenHeater) -> Self {
        Self {
            name: h.name().to_string(),
            setting: h.setting(),
            heat_flow_out: h.heat_flow_out(),
            maximum_heat_flow_out: h.maximum_heat_flow_out(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DemandSnapshot {
    pub name: String,
    pub setting: Real,
    pub flow: Real,
    pub maximum: Real,
}

impl From<&Demand> for DemandSnapshot {
    fn from(d: &Demand) -> Self {
        Self {
            name: d.name().to_string(),
            setting: d.setting(),
            flow: d.flow(),
            maximum: d.maximum(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReservoirSnapshot {
    pub name: String,
    pub water_level: Real,
    pub minimum_water_level: Real,
    pub maximum_water_level: Real,
    /// Stored water volume (`level * area`).
    pub volume: Real,
    pub temperature: Real,
    pub demand_temperature: Real,
    pub maximum_temperature: Real,
    pub energy: Real,
    pub maximum_energy: Real,
    pub mass_flow_in: Real,
    pub maximum_mass_flow_in: Real,
    pub temperature_in: Real,
    pub mass_flow_out: Real,
    pub energy_in: Real,
    pub maximum_energy_in: Real,
    pub heater_energy_in: Real,
    pub hidden_heater_energy_in: Real,
    pub energy_out: Real,
    pub maximum_energy_out: Real,
    pub error: Option<ReservoirFault>,
    pub outlet: ValveSnapshot,
    pub demand: DemandSnapshot,
}

impl From<&Reservoir> for ReservoirSnapshot {
    fn from(r: &Reservoir) -> Self {
        Self {
            name: r.name().to_string(),
            water_level: r.water_level(),
            minimum_water_level: r.minimum_water_level(),
            maximum_water_level: r.maximum_water_level(),
            volume: r.water_level() * r.tank_area(),
            temperature: r.temperature(),
            demand_temperature: r.demand_temperature(),
            maximum_temperature: r.maximum_temperature(),
            energy: r.energy(),
            maximum_energy: r.maximum_energy(),
            mass_flow_in: r.mass_flow_in(),
            maximum_mass_flow_in: r.maximum_mass_flow_in(),
            temperature_in: r.temperature_in(),
            mass_flow_out: r.mass_flow_out(),
            energy_in: r.energy_in(),
            maximum_energy_in: r.maximum_energy_in(),
            heater_energy_in: r.heater_energy_in(),
            hidden_heater_energy_in: r.hidden_heater_energy_in(),
            energy_out: r.energy_out(),
            maximum_energy_out: r.maximum_energy_out(),
            error: r.error(),
            outlet: r.outlet().into(),
            demand: r.demand().into(),
        }
    }
}

/// Every observable plant quantity after a completed tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlantSnapshot {
    pub t: SimTime,
    pub steady_time: SimTime,
    pub supply_heater: HeaterSnapshot,
    pub branch_a: BranchSnapshot,
    pub branch_b: BranchSnapshot,
    pub mixer_1: MixerSnapshot,
    pub mixer_2: MixerSnapshot,
    pub heater_1: HeaterSnapshot,
    pub heater_2: HeaterSnapshot,
    pub hidden_heater_1: HeaterSnapshot,
    pub hidden_heater_2: HeaterSnapshot,
    pub reservoir_1: ReservoirSnapshot,
    pub reservoir_2: ReservoirSnapshot,
    pub score: Score,
}
