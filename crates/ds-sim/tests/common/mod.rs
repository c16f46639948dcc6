//! Shared plant configuration for integration tests.
//!
//! The plant is balanced: each reservoir receives exactly what its outlet
//! draws, and heater power holds the tank at its demand temperature, so
//! levels and temperatures stay put until a test disturbs them.

#![allow(dead_code)]

use ds_components::{
    DemandConfig, FaultSchedule, HeaterConfig, HiddenHeaterConfig, PumpConfig, SplitterConfig,
    ValveConfig,
};
use ds_sim::{BranchConfig, OverheatTimerPolicy, PlantConfig, ReservoirConfig};

pub const DT: i64 = 500;

pub fn valve(name: &str, opening: f64) -> ValveConfig {
    ValveConfig {
        name: name.to_string(),
        maximum_mass_flow_out: 10.0,
        setting: opening,
        opening,
        time_constant: 1000,
        faults: FaultSchedule::none(),
    }
}

fn hidden_heater(name: &str, heat: f64) -> HiddenHeaterConfig {
    HiddenHeaterConfig {
        name: name.to_string(),
        maximum_heat_flow_out: 100.0,
        setting: heat,
        heat_flow_out: heat,
        time_constant: 1000,
        faults: FaultSchedule::none(),
    }
}

fn heater(name: &str, heat: f64) -> HeaterConfig {
    HeaterConfig {
        name: name.to_string(),
        maximum_heat_flow_out: 200.0,
        setting: heat,
        heat_flow_out: heat,
        time_constant: 1000,
        faults: FaultSchedule::none(),
    }
}

fn branch(suffix: &str) -> BranchConfig {
    BranchConfig {
        pump: PumpConfig {
            name: format!("Pump {suffix}"),
            running: true,
            mass_flow_out: 5.0,
            time_constant: 1000,
            trip_time: None,
        },
        valve: valve(&format!("V{suffix}"), 10.0),
        splitter: SplitterConfig {
            name: format!("S{suffix}"),
            maximum_mass_flow: 20.0,
        },
        valve_1: valve(&format!("V{suffix}1"), 3.0),
        valve_2: valve(&format!("V{suffix}2"), 2.0),
    }
}

fn reservoir(index: u8, outflow: f64) -> ReservoirConfig {
    ReservoirConfig {
        name: format!("Reservoir {index}"),
        maximum_mass_flow_in: 20.0,
        water_level: 50.0,
        minimum_water_level: 5.0,
        maximum_water_level: 100.0,
        demand_temperature: 30.0,
        maximum_temperature: 100.0,
        minimum_energy_in: 10.0,
        maximum_energy_in: 200.0,
        maximum_energy_out: 500.0,
        energy: 50.0 * 30.0,
        maximum_energy: 1.0e6,
        tank_area: 1.0,
        water_density: 1.0,
        water_heat_capacity: 1.0,
        water_boiling_temperature: 100.0,
        leak: None,
        break_time: 10_000,
        overheat_policy: OverheatTimerPolicy::Restart,
        outlet: valve(&format!("VO{index}"), outflow),
        demand: DemandConfig {
            name: format!("D{index}"),
            maximum: 10.0,
            setting: outflow,
            flow: outflow,
            time_constant: 1000,
            faults: FaultSchedule::none(),
        },
    }
}

/// Balanced plant: supply at 10 degrees, R1 draws 6 and R2 draws 4, both at 30.
pub fn balanced() -> PlantConfig {
    PlantConfig {
        dt: DT,
        steady_limit: 5000,
        steady_min_time: Some(0),
        demand_margin: 0.5,
        temperature_margin: 2.0,
        supply_heater: hidden_heater("HH0", 10.0),
        branch_a: branch("A"),
        branch_b: branch("B"),
        heater_1: heater("H1", 120.0),
        heater_2: heater("H2", 80.0),
        hidden_heater_1: hidden_heater("HH1", 0.0),
        hidden_heater_2: hidden_heater("HH2", 0.0),
        reservoir_1: reservoir(1, 6.0),
        reservoir_2: reservoir(2, 4.0),
    }
}

/// Balanced plant without steady-state termination.
pub fn endless() -> PlantConfig {
    PlantConfig {
        steady_min_time: None,
        ..balanced()
    }
}
