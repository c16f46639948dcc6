//! Scenario validation logic.

use crate::schema::Scenario;
use ds_components::{
    DemandConfig, FaultSchedule, HeaterConfig, HiddenHeaterConfig, PumpConfig, SplitterConfig,
    ValveConfig,
};
use ds_core::{NEVER, SimTime};
use ds_sim::{BranchConfig, PlantConfig, ReservoirConfig};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(invalid(field, value, "must be finite"));
    }
    Ok(())
}

fn non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(invalid(field, value, "must be non-negative"));
    }
    Ok(())
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(invalid(field, value, "must be positive"));
    }
    Ok(())
}

fn time_constant(field: &str, value: SimTime) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(invalid(field, value, "time constant must be positive"));
    }
    Ok(())
}

fn schedule_time(field: &str, value: SimTime) -> Result<(), ValidationError> {
    if value < 0 && value != NEVER {
        return Err(invalid(field, value, "must be non-negative or the disabled marker"));
    }
    Ok(())
}

fn validate_faults(ctx: &str, faults: &FaultSchedule) -> Result<(), ValidationError> {
    for (slot, fault) in [("first", &faults.first), ("second", &faults.second)] {
        if let Some(fault) = fault {
            finite(&format!("{ctx}.faults.{slot}.setpoint"), fault.setpoint)?;
            schedule_time(&format!("{ctx}.faults.{slot}.time"), fault.time)?;
        }
    }
    Ok(())
}

/// Shared checks for every first-order lagged setpoint.
fn validate_lagged(
    ctx: &str,
    maximum: f64,
    setting: f64,
    value: f64,
    tc: SimTime,
    faults: &FaultSchedule,
) -> Result<(), ValidationError> {
    non_negative(&format!("{ctx}.maximum"), maximum)?;
    finite(&format!("{ctx}.setting"), setting)?;
    finite(&format!("{ctx}.initial"), value)?;
    time_constant(&format!("{ctx}.time_constant"), tc)?;
    validate_faults(ctx, faults)
}

fn validate_valve(ctx: &str, v: &ValveConfig) -> Result<(), ValidationError> {
    validate_lagged(ctx, v.maximum_mass_flow_out, v.setting, v.opening, v.time_constant, &v.faults)
}

fn validate_demand(ctx: &str, d: &DemandConfig) -> Result<(), ValidationError> {
    validate_lagged(ctx, d.maximum, d.setting, d.flow, d.time_constant, &d.faults)
}

fn validate_heater(ctx: &str, h: &HeaterConfig) -> Result<(), ValidationError> {
    validate_lagged(ctx, h.maximum_heat_flow_out, h.setting, h.heat_flow_out, h.time_constant, &h.faults)
}

fn validate_hidden_heater(ctx: &str, h: &HiddenHeaterConfig) -> Result<(), ValidationError> {
    validate_lagged(ctx, h.maximum_heat_flow_out, h.setting, h.heat_flow_out, h.time_constant, &h.faults)
}

fn validate_pump(ctx: &str, p: &PumpConfig) -> Result<(), ValidationError> {
    non_negative(&format!("{ctx}.mass_flow_out"), p.mass_flow_out)?;
    time_constant(&format!("{ctx}.time_constant"), p.time_constant)?;
    if let Some(t) = p.trip_time {
        schedule_time(&format!("{ctx}.trip_time"), t)?;
    }
    Ok(())
}

fn validate_splitter(ctx: &str, s: &SplitterConfig) -> Result<(), ValidationError> {
    non_negative(&format!("{ctx}.maximum_mass_flow"), s.maximum_mass_flow)
}

fn validate_branch(ctx: &str, b: &BranchConfig) -> Result<(), ValidationError> {
    validate_pump(&format!("{ctx}.pump"), &b.pump)?;
    validate_valve(&format!("{ctx}.valve"), &b.valve)?;
    validate_splitter(&format!("{ctx}.splitter"), &b.splitter)?;
    validate_valve(&format!("{ctx}.valve_1"), &b.valve_1)?;
    validate_valve(&format!("{ctx}.valve_2"), &b.valve_2)
}

fn validate_reservoir(ctx: &str, r: &ReservoirConfig) -> Result<(), ValidationError> {
    positive(&format!("{ctx}.tank_area"), r.tank_area)?;
    positive(&format!("{ctx}.water_density"), r.water_density)?;
    positive(&format!("{ctx}.water_heat_capacity"), r.water_heat_capacity)?;
    finite(&format!("{ctx}.water_boiling_temperature"), r.water_boiling_temperature)?;
    finite(&format!("{ctx}.demand_temperature"), r.demand_temperature)?;
    non_negative(&format!("{ctx}.minimum_water_level"), r.minimum_water_level)?;
    non_negative(&format!("{ctx}.maximum_water_level"), r.maximum_water_level)?;
    if r.minimum_water_level > r.maximum_water_level {
        return Err(invalid(
            &format!("{ctx}.minimum_water_level"),
            r.minimum_water_level,
            "exceeds maximum_water_level",
        ));
    }
    non_negative(&format!("{ctx}.water_level"), r.water_level)?;
    if r.water_level > r.maximum_water_level {
        return Err(invalid(
            &format!("{ctx}.water_level"),
            r.water_level,
            "exceeds maximum_water_level",
        ));
    }
    non_negative(&format!("{ctx}.maximum_energy"), r.maximum_energy)?;
    non_negative(&format!("{ctx}.energy"), r.energy)?;
    finite(&format!("{ctx}.minimum_energy_in"), r.minimum_energy_in)?;
    if r.break_time < 0 {
        return Err(invalid(&format!("{ctx}.break_time"), r.break_time, "must be non-negative"));
    }
    if let Some(leak) = &r.leak {
        finite(&format!("{ctx}.leak.mass_flow"), leak.mass_flow)?;
        finite(&format!("{ctx}.leak.temperature"), leak.temperature)?;
        schedule_time(&format!("{ctx}.leak.time"), leak.time)?;
    }
    validate_valve(&format!("{ctx}.outlet"), &r.outlet)?;
    validate_demand(&format!("{ctx}.demand"), &r.demand)
}

fn validate_plant(plant: &PlantConfig) -> Result<(), ValidationError> {
    if plant.dt <= 0 {
        return Err(invalid("plant.dt", plant.dt, "must be positive"));
    }
    if plant.steady_limit < 0 {
        return Err(invalid("plant.steady_limit", plant.steady_limit, "must be non-negative"));
    }
    if let Some(t) = plant.steady_min_time {
        schedule_time("plant.steady_min_time", t)?;
    }
    non_negative("plant.demand_margin", plant.demand_margin)?;
    non_negative("plant.temperature_margin", plant.temperature_margin)?;

    validate_hidden_heater("plant.supply_heater", &plant.supply_heater)?;
    validate_branch("plant.branch_a", &plant.branch_a)?;
    validate_branch("plant.branch_b", &plant.branch_b)?;
    validate_heater("plant.heater_1", &plant.heater_1)?;
    validate_heater("plant.heater_2", &plant.heater_2)?;
    validate_hidden_heater("plant.hidden_heater_1", &plant.hidden_heater_1)?;
    validate_hidden_heater("plant.hidden_heater_2", &plant.hidden_heater_2)?;
    validate_reservoir("plant.reservoir_1", &plant.reservoir_1)?;
    validate_reservoir("plant.reservoir_2", &plant.reservoir_2)?;

    // Termination messages name components, so names must be unambiguous.
    let names = [
        &plant.branch_a.pump.name,
        &plant.branch_b.pump.name,
        &plant.reservoir_1.name,
        &plant.reservoir_2.name,
    ];
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(invalid("plant name", "\"\"", "component names must not be empty"));
        }
        if !seen.insert(name) {
            return Err(ValidationError::DuplicateName {
                name: name.clone(),
                context: "pumps and reservoirs".to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }
    if scenario.name.trim().is_empty() {
        return Err(invalid("name", "\"\"", "must not be empty"));
    }
    validate_plant(&scenario.plant)
}
