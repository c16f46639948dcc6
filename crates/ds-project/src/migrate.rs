//! Scenario version migration.
//!
//! Version 0 files mark disabled faults with the `-60000` time sentinel.
//! From version 1 on, a disabled fault is simply absent.

use crate::ProjectError;
use crate::schema::Scenario;
use ds_components::{FaultSchedule, HeaterConfig, HiddenHeaterConfig, ValveConfig};
use ds_core::NEVER;
use ds_sim::BranchConfig;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut scenario: Scenario) -> Result<Scenario, ProjectError> {
    while scenario.version < LATEST_VERSION {
        scenario = migrate_one_version(scenario)?;
    }
    Ok(scenario)
}

fn migrate_one_version(scenario: Scenario) -> Result<Scenario, ProjectError> {
    match scenario.version {
        0 => migrate_v0_to_v1(scenario),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

fn clear_never(faults: &mut FaultSchedule) {
    for slot in [&mut faults.first, &mut faults.second] {
        if slot.is_some_and(|f| !f.is_enabled()) {
            *slot = None;
        }
    }
}

fn clear_valve(valve: &mut ValveConfig) {
    clear_never(&mut valve.faults);
}

fn clear_branch(branch: &mut BranchConfig) {
    if branch.pump.trip_time == Some(NEVER) {
        branch.pump.trip_time = None;
    }
    clear_valve(&mut branch.valve);
    clear_valve(&mut branch.valve_1);
    clear_valve(&mut branch.valve_2);
}

fn clear_heater(heater: &mut HeaterConfig) {
    clear_never(&mut heater.faults);
}

fn clear_hidden_heater(heater: &mut HiddenHeaterConfig) {
    clear_never(&mut heater.faults);
}

fn migrate_v0_to_v1(mut scenario: Scenario) -> Result<Scenario, ProjectError> {
    let plant = &mut scenario.plant;
    if plant.steady_min_time == Some(NEVER) {
        plant.steady_min_time = None;
    }
    clear_hidden_heater(&mut plant.supply_heater);
    clear_hidden_heater(&mut plant.hidden_heater_1);
    clear_hidden_heater(&mut plant.hidden_heater_2);
    clear_heater(&mut plant.heater_1);
    clear_heater(&mut plant.heater_2);
    clear_branch(&mut plant.branch_a);
    clear_branch(&mut plant.branch_b);
    for reservoir in [&mut plant.reservoir_1, &mut plant.reservoir_2] {
        clear_valve(&mut reservoir.outlet);
        clear_never(&mut reservoir.demand.faults);
        if reservoir.leak.is_some_and(|leak| leak.time == NEVER) {
            reservoir.leak = None;
        }
    }

    scenario.version = 1;
    Ok(scenario)
}
