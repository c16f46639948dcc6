//! Operator heaters and hidden fault-only heaters.

use crate::error::ComponentResult;
use crate::fault::{FaultSchedule, FaultSlot};
use crate::lag::LaggedSetpoint;
use crate::traits::Controllable;
use ds_core::{Real, SimTime};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeaterConfig {
    pub name: String,
    pub maximum_heat_flow_out: Real,
    pub setting: Real,
    #[serde(default)]
    pub heat_flow_out: Real,
    pub time_constant: SimTime,
    #[serde(default)]
    pub faults: FaultSchedule,
}

/// Heater under operator control.
///
/// Heat output lags the setting exactly like a valve opening lags its
/// setting, bounded by `[0, maximum_heat_flow_out]`.
#[derive(Clone, Debug)]
pub struct Heater {
    name: String,
    heat: LaggedSetpoint,
}

impl Heater {
    pub fn new(
        name: impl Into<String>,
        maximum_heat_flow_out: Real,
        setting: Real,
        heat_flow_out: Real,
        time_constant: SimTime,
    ) -> ComponentResult<Self> {
        Ok(Self {
            name: name.into(),
            heat: LaggedSetpoint::new(maximum_heat_flow_out, setting, heat_flow_out, time_constant)?,
        })
    }

    pub fn from_config(config: &HeaterConfig) -> ComponentResult<Self> {
        Ok(Self::new(
            config.name.clone(),
            config.maximum_heat_flow_out,
            config.setting,
            config.heat_flow_out,
            config.time_constant,
        )?
        .with_faults(config.faults.clone()))
    }

    pub fn with_faults(mut self, faults: FaultSchedule) -> Self {
        self.heat = self.heat.with_faults(faults);
        self
    }

    pub fn set_heat_flow_out(&mut self, t: SimTime, dt: SimTime) {
        self.heat.advance(&self.name, t, dt);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn heat_flow_out(&self) -> Real {
        self.heat.value()
    }

    pub fn maximum_heat_flow_out(&self) -> Real {
        self.heat.maximum()
    }

    pub fn active_fault(&self) -> Option<FaultSlot> {
        self.heat.active_fault()
    }
}

impl Controllable for Heater {
    fn set_setting(&mut self, value: Real) {
        self.heat.set_setting(value);
    }

    fn setting(&self) -> Real {
        self.heat.setting()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HiddenHeaterConfig {
    pub name: String,
    pub maximum_heat_flow_out: Real,
    pub setting: Real,
    #[serde(default)]
    pub heat_flow_out: Real,
    pub time_constant: SimTime,
    #[serde(default)]
    pub faults: FaultSchedule,
}

/// Heat source outside operator reach.
///
/// Only the fault schedule can move its setting. The supply heater's
/// output is read as the pump outlet temperature; the reservoir heaters
/// add energy without counting toward the overheat check.
#[derive(Clone, Debug)]
pub struct HiddenHeater {
    name: String,
    heat: LaggedSetpoint,
}

impl HiddenHeater {
    pub fn new(
        name: impl Into<String>,
        maximum_heat_flow_out: Real,
        setting: Real,
        heat_flow_out: Real,
        time_constant: SimTime,
    ) -> ComponentResult<Self> {
        Ok(Self {
            name: name.into(),
            heat: LaggedSetpoint::new(maximum_heat_flow_out, setting, heat_flow_out, time_constant)?,
        })
    }

    pub fn from_config(config: &HiddenHeaterConfig) -> ComponentResult<Self> {
        Ok(Self::new(
            config.name.clone(),
            config.maximum_heat_flow_out,
            config.setting,
            config.heat_flow_out,
            config.time_constant,
        )?
        .with_faults(config.faults.clone()))
    }

    pub fn with_faults(mut self, faults: FaultSchedule) -> Self {
        self.heat = self.heat.with_faults(faults);
        self
    }

    pub fn check_for_fault(&mut self, t: SimTime, dt: SimTime) {
        self.heat.advance(&self.name, t, dt);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn setting(&self) -> Real {
        self.heat.setting()
    }

    pub fn heat_flow_out(&self) -> Real {
        self.heat.value()
    }

    pub fn maximum_heat_flow_out(&self) -> Real {
        self.heat.maximum()
    }

    pub fn active_fault(&self) -> Option<FaultSlot> {
        self.heat.active_fault()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heater_tracks_operator_setting() {
        let mut h = Heater::new("H1", 100.0, 0.0, 0.0, 1000).unwrap();
        h.set_setting(40.0);
        h.set_heat_flow_out(0, 500);
        assert!((h.heat_flow_out() - 20.0).abs() < 1e-12);
        h.set_setting(500.0);
        assert_eq!(h.setting(), 100.0);
    }

    #[test]
    fn hidden_heater_idle_without_faults() {
        let mut hh = HiddenHeater::new("HH1", 50.0, 0.0, 0.0, 1000).unwrap();
        for t in (0..10_000).step_by(500) {
            hh.check_for_fault(t, 500);
        }
        assert_eq!(hh.heat_flow_out(), 0.0);
    }

    #[test]
    fn hidden_heater_fault_raises_output() {
        let mut hh = HiddenHeater::new("HH1", 50.0, 0.0, 0.0, 500)
            .unwrap()
            .with_faults(FaultSchedule::single(30.0, 1000));
        hh.check_for_fault(0, 500);
        assert_eq!(hh.heat_flow_out(), 0.0);
        hh.check_for_fault(1000, 500);
        assert_eq!(hh.heat_flow_out(), 30.0);
        assert_eq!(hh.active_fault(), Some(FaultSlot::First));
    }

    #[test]
    fn supply_heater_holds_constant_temperature() {
        let mut hh0 = HiddenHeater::new("HH0", 100.0, 10.0, 10.0, 1000).unwrap();
        hh0.check_for_fault(0, 1000);
        assert_eq!(hh0.heat_flow_out(), 10.0);
    }
}
