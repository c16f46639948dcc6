//! Lumped reservoir with mass and energy balance.

use crate::error::{SimError, SimResult};
use ds_components::common::EPSILON_MDOT;
use ds_components::{
    Controllable, Demand, DemandConfig, FlowComponent, Stream, Valve, ValveConfig,
};
use ds_core::{Real, SimTime, guarded_div, is_due, seconds};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sticky reservoir failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservoirFault {
    Boil,
    Overheat,
    Overflow,
}

impl fmt::Display for ReservoirFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservoirFault::Boil => write!(f, "boil"),
            ReservoirFault::Overheat => write!(f, "overheat"),
            ReservoirFault::Overflow => write!(f, "overflow"),
        }
    }
}

/// What happens to the overheat countdown when the tank recovers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverheatTimerPolicy {
    /// Disarm on recovery; a new episode starts a full `break_time`.
    #[default]
    Restart,
    /// Keep the remaining time across episodes.
    Resume,
}

/// Extra inflow (positive) or leak (negative) starting at `time`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeakFault {
    pub mass_flow: Real,
    /// Temperature of injected water. Unused for leaks.
    #[serde(default)]
    pub temperature: Real,
    pub time: SimTime,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReservoirConfig {
    pub name: String,
    /// Display range for inflow.
    pub maximum_mass_flow_in: Real,
    #[serde(default)]
    pub water_level: Real,
    pub minimum_water_level: Real,
    pub maximum_water_level: Real,
    pub demand_temperature: Real,
    /// Display range for temperature.
    pub maximum_temperature: Real,
    /// Heater power above which an emptying tank counts as heated empty.
    pub minimum_energy_in: Real,
    pub maximum_energy_in: Real,
    pub maximum_energy_out: Real,
    #[serde(default)]
    pub energy: Real,
    pub maximum_energy: Real,
    pub tank_area: Real,
    pub water_density: Real,
    pub water_heat_capacity: Real,
    pub water_boiling_temperature: Real,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leak: Option<LeakFault>,
    /// Grace period before a heated, near-empty tank fails.
    pub break_time: SimTime,
    #[serde(default)]
    pub overheat_policy: OverheatTimerPolicy,
    pub outlet: ValveConfig,
    pub demand: DemandConfig,
}

/// Water tank fed by a mixer, heated, and drained through its outlet valve.
///
/// ## Model
///
/// Per step of `dt` scaled milliseconds (`s = dt / 1000`):
///
/// ```text
/// level  += (q_in + q_add - q_out - q_leak) * s / (area * rho)
/// E      += (q_in*cp*T_in + P_heater + P_hidden - q_out*cp*T + E_add - E_leak) * s
/// T       = E / (level * area * rho * cp)
/// ```
///
/// `T` on the right-hand side of the energy balance is the previous step's
/// temperature. Level is bounded by `[0, maximum_water_level]` and energy by
/// `[0, maximum_energy]`; an empty tank holds no energy.
///
/// The first of boil, overheat or overflow to occur is latched in
/// [`Reservoir::error`] and never cleared.
#[derive(Clone, Debug)]
pub struct Reservoir {
    name: String,
    outlet: Valve,
    demand: Demand,

    maximum_mass_flow_in: Real,
    minimum_water_level: Real,
    maximum_water_level: Real,
    demand_temperature: Real,
    maximum_temperature: Real,
    minimum_energy_in: Real,
    maximum_energy_in: Real,
    maximum_energy_out: Real,
    maximum_energy: Real,
    tank_area: Real,
    water_density: Real,
    water_heat_capacity: Real,
    water_boiling_temperature: Real,
    leak: Option<LeakFault>,
    break_time: SimTime,
    overheat_policy: OverheatTimerPolicy,

    water_level: Real,
    energy: Real,
    temperature: Real,
    mass_flow_in: Real,
    temperature_in: Real,
    heater_energy_in: Real,
    hidden_heater_energy_in: Real,
    energy_in: Real,
    energy_out: Real,
    overheat_time_left: Option<SimTime>,
    error: Option<ReservoirFault>,
}

fn positive(value: Real, what: &'static str) -> SimResult<Real> {
    if !value.is_finite() {
        return Err(SimError::NonPhysical { what });
    }
    if value <= 0.0 {
        return Err(SimError::InvalidArg { what });
    }
    Ok(value)
}

fn non_negative(value: Real, what: &'static str) -> SimResult<Real> {
    if !value.is_finite() {
        return Err(SimError::NonPhysical { what });
    }
    if value < 0.0 {
        return Err(SimError::InvalidArg { what });
    }
    Ok(value)
}

impl Reservoir {
    pub fn from_config(config: &ReservoirConfig) -> SimResult<Self> {
        let tank_area = positive(config.tank_area, "tank_area must be positive")?;
        let water_density = positive(config.water_density, "water_density must be positive")?;
        let water_heat_capacity =
            positive(config.water_heat_capacity, "water_heat_capacity must be positive")?;
        let maximum_water_level =
            non_negative(config.maximum_water_level, "maximum_water_level must be non-negative")?;
        let maximum_energy =
            non_negative(config.maximum_energy, "maximum_energy must be non-negative")?;
        let water_level = non_negative(config.water_level, "water_level must be non-negative")?
            .min(maximum_water_level);
        let energy = if water_level > 0.0 {
            non_negative(config.energy, "energy must be non-negative")?.min(maximum_energy)
        } else {
            0.0
        };
        if config.break_time < 0 {
            return Err(SimError::InvalidArg {
                what: "break_time must be non-negative",
            });
        }
        if let Some(leak) = &config.leak {
            if !leak.mass_flow.is_finite() || !leak.temperature.is_finite() {
                return Err(SimError::NonPhysical {
                    what: "leak fault values must be finite",
                });
            }
        }

        let temperature = guarded_div(
            energy,
            water_level * tank_area * water_density * water_heat_capacity,
            0.0,
        );

        Ok(Self {
            name: config.name.clone(),
            outlet: Valve::from_config(&config.outlet)?,
            demand: Demand::from_config(&config.demand)?,
            maximum_mass_flow_in: config.maximum_mass_flow_in,
            minimum_water_level: config.minimum_water_level,
            maximum_water_level,
            demand_temperature: config.demand_temperature,
            maximum_temperature: config.maximum_temperature,
            minimum_energy_in: config.minimum_energy_in,
            maximum_energy_in: config.maximum_energy_in,
            maximum_energy_out: config.maximum_energy_out,
            maximum_energy,
            tank_area,
            water_density,
            water_heat_capacity,
            water_boiling_temperature: config.water_boiling_temperature,
            leak: config.leak,
            break_time: config.break_time,
            overheat_policy: config.overheat_policy,
            water_level,
            energy,
            temperature,
            mass_flow_in: 0.0,
            temperature_in: 0.0,
            heater_energy_in: 0.0,
            hidden_heater_energy_in: 0.0,
            energy_in: 0.0,
            energy_out: 0.0,
            overheat_time_left: None,
            error: None,
        })
    }

    pub fn calculate_demand(&mut self, t: SimTime, dt: SimTime) {
        self.demand.calculate_demand(t, dt);
    }

    /// Advance the outlet valve opening.
    pub fn calculate_resistance(&mut self, t: SimTime, dt: SimTime) {
        self.outlet.calculate_resistance(t, dt);
    }

    /// Load the inputs for the next integration step.
    ///
    /// The requested outflow is the outlet opening. Inlet temperature is only
    /// recorded while there is measurable inflow.
    pub fn feed(&mut self, inflow: Stream, heater_energy_in: Real, hidden_heater_energy_in: Real) {
        self.mass_flow_in = inflow.mass_flow;
        self.temperature_in = if self.mass_flow_in > EPSILON_MDOT {
            inflow.temperature
        } else {
            0.0
        };
        let opening = self.outlet.opening();
        self.outlet.set_mass_flow_out(opening);
        self.heater_energy_in = heater_energy_in;
        self.hidden_heater_energy_in = hidden_heater_energy_in;
    }

    /// One integration step: leak, mass, energy, temperature, overheat.
    pub fn calculate_reservoir(&mut self, t: SimTime, dt: SimTime) {
        let cp = self.water_heat_capacity;
        let s = seconds(dt);

        let (add_in_flow, add_out_flow, add_in_energy, add_out_energy) = match self.leak {
            Some(leak) if is_due(leak.time, t) => {
                if leak.mass_flow > 0.0 {
                    (leak.mass_flow, 0.0, leak.mass_flow * cp * leak.temperature, 0.0)
                } else {
                    let q = -leak.mass_flow;
                    (0.0, q, 0.0, q * cp * self.temperature)
                }
            }
            _ => (0.0, 0.0, 0.0, 0.0),
        };

        // An empty tank can only pass on what flows in.
        let mut mass_flow_out = self.outlet.mass_flow_out();
        if self.water_level == 0.0 && self.mass_flow_in + add_in_flow < mass_flow_out + add_out_flow
        {
            mass_flow_out = (self.mass_flow_in + add_in_flow - add_out_flow).max(0.0);
            self.outlet.set_mass_flow_out(mass_flow_out);
        }

        self.water_level += (self.mass_flow_in + add_in_flow - mass_flow_out - add_out_flow) * s
            / self.tank_area
            / self.water_density;
        if self.water_level > self.maximum_water_level {
            self.set_error(t, ReservoirFault::Overflow);
        }
        self.water_level = self.water_level.clamp(0.0, self.maximum_water_level);

        self.energy_in = self.mass_flow_in * cp * self.temperature_in;
        self.energy_out = mass_flow_out * cp * self.temperature;
        self.energy += (self.energy_in + self.heater_energy_in + self.hidden_heater_energy_in
            - self.energy_out
            + add_in_energy
            - add_out_energy)
            * s;
        self.energy = self.energy.clamp(0.0, self.maximum_energy);
        if self.water_level == 0.0 {
            self.energy = 0.0;
        }

        let heat_mass = self.water_level * self.tank_area * self.water_density * cp;
        self.temperature = if heat_mass != 0.0 {
            self.energy / heat_mass
        } else {
            self.temperature_in
        };
        if self.temperature > self.water_boiling_temperature
            && self.water_level > self.minimum_water_level
        {
            self.set_error(t, ReservoirFault::Boil);
        }
        self.temperature = self.temperature.max(0.0);
        self.outlet.set_temperature_out(self.temperature);

        self.update_overheat_timer(t, dt);
    }

    fn update_overheat_timer(&mut self, t: SimTime, dt: SimTime) {
        let heating_empty = self.heater_energy_in > self.minimum_energy_in
            && self.water_level < self.minimum_water_level;
        if heating_empty {
            match self.overheat_time_left {
                None => self.overheat_time_left = Some(self.break_time),
                Some(left) if left <= 0 => self.set_error(t, ReservoirFault::Overheat),
                Some(left) => self.overheat_time_left = Some(left - dt),
            }
        } else if self.overheat_policy == OverheatTimerPolicy::Restart {
            self.overheat_time_left = None;
        }
    }

    fn set_error(&mut self, t: SimTime, fault: ReservoirFault) {
        if self.error.is_none() {
            tracing::warn!(reservoir = %self.name, t, %fault, "reservoir fault");
            self.error = Some(fault);
        }
    }

    pub fn error(&self) -> Option<ReservoirFault> {
        self.error
    }

    pub fn outlet(&self) -> &Valve {
        &self.outlet
    }

    pub fn demand(&self) -> &Demand {
        &self.demand
    }

    pub fn water_level(&self) -> Real {
        self.water_level
    }

    pub fn energy(&self) -> Real {
        self.energy
    }

    pub fn temperature(&self) -> Real {
        self.temperature
    }

    pub fn mass_flow_in(&self) -> Real {
        self.mass_flow_in
    }

    pub fn temperature_in(&self) -> Real {
        self.temperature_in
    }

    pub fn mass_flow_out(&self) -> Real {
        self.outlet.mass_flow_out()
    }

    pub fn heater_energy_in(&self) -> Real {
        self.heater_energy_in
    }

    pub fn hidden_heater_energy_in(&self) -> Real {
        self.hidden_heater_energy_in
    }

    pub fn energy_in(&self) -> Real {
        self.energy_in
    }

    pub fn energy_out(&self) -> Real {
        self.energy_out
    }

    pub fn demand_temperature(&self) -> Real {
        self.demand_temperature
    }

    pub fn minimum_water_level(&self) -> Real {
        self.minimum_water_level
    }

    pub fn maximum_water_level(&self) -> Real {
        self.maximum_water_level
    }

    pub fn maximum_mass_flow_in(&self) -> Real {
        self.maximum_mass_flow_in
    }

    pub fn maximum_temperature(&self) -> Real {
        self.maximum_temperature
    }

    pub fn maximum_energy_in(&self) -> Real {
        self.maximum_energy_in
    }

    pub fn maximum_energy_out(&self) -> Real {
        self.maximum_energy_out
    }

    pub fn maximum_energy(&self) -> Real {
        self.maximum_energy
    }

    pub fn tank_area(&self) -> Real {
        self.tank_area
    }

    pub fn overheat_time_left(&self) -> Option<SimTime> {
        self.overheat_time_left
    }
}

impl FlowComponent for Reservoir {
    fn name(&self) -> &str {
        &self.name
    }

    fn outflow(&self) -> Stream {
        Stream::new(self.outlet.mass_flow_out(), self.temperature)
    }
}

/// Operator control of the outlet valve.
impl Controllable for Reservoir {
    fn set_setting(&mut self, value: Real) {
        self.outlet.set_setting(value);
    }

    fn setting(&self) -> Real {
        self.outlet.setting()
    }
}
