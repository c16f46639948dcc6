//! Consumer-side demand setpoint.

use crate::error::ComponentResult;
use crate::fault::{FaultSchedule, FaultSlot};
use crate::lag::LaggedSetpoint;
use ds_core::{Real, SimTime};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DemandConfig {
    pub name: String,
    pub maximum: Real,
    pub setting: Real,
    /// Initial demanded flow.
    pub flow: Real,
    pub time_constant: SimTime,
    #[serde(default)]
    pub faults: FaultSchedule,
}

/// Target offtake rate a reservoir outflow is judged against.
///
/// Shaped like a valve but moves no mass: only the lagged flow target
/// matters. Demand changes are scripted through the fault schedule.
#[derive(Clone, Debug)]
pub struct Demand {
    name: String,
    flow: LaggedSetpoint,
}

impl Demand {
    pub fn new(
        name: impl Into<String>,
        maximum: Real,
        setting: Real,
        flow: Real,
        time_constant: SimTime,
    ) -> ComponentResult<Self> {
        Ok(Self {
            name: name.into(),
            flow: LaggedSetpoint::new(maximum, setting, flow, time_constant)?,
        })
    }

    pub fn from_config(config: &DemandConfig) -> ComponentResult<Self> {
        Ok(Self::new(
            config.name.clone(),
            config.maximum,
            config.setting,
            config.flow,
            config.time_constant,
        )?
        .with_faults(config.faults.clone()))
    }

    pub fn with_faults(mut self, faults: FaultSchedule) -> Self {
        self.flow = self.flow.with_faults(faults);
        self
    }

    pub fn calculate_demand(&mut self, t: SimTime, dt: SimTime) {
        self.flow.advance(&self.name, t, dt);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flow(&self) -> Real {
        self.flow.value()
    }

    pub fn setting(&self) -> Real {
        self.flow.setting()
    }

    pub fn maximum(&self) -> Real {
        self.flow.maximum()
    }

    pub fn active_fault(&self) -> Option<FaultSlot> {
        self.flow.active_fault()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::Fault;

    #[test]
    fn demand_follows_scripted_changes() {
        let mut demand = Demand::new("D1", 20.0, 5.0, 5.0, 1000)
            .unwrap()
            .with_faults(FaultSchedule::pair(Fault::new(8.0, 2000), Fault::new(3.0, 6000)));

        let mut t = 0;
        while t < 2000 {
            demand.calculate_demand(t, 500);
            assert_eq!(demand.flow(), 5.0);
            t += 500;
        }
        for _ in 0..40 {
            demand.calculate_demand(t, 500);
            t += 500;
        }
        assert!((demand.flow() - 3.0).abs() < 1e-6);
        assert_eq!(demand.active_fault(), Some(FaultSlot::Second));
    }

    #[test]
    fn flow_bounded_to_maximum() {
        let mut demand = Demand::new("D", 4.0, 100.0, 0.0, 10).unwrap();
        demand.calculate_demand(0, 1000);
        assert_eq!(demand.flow(), 4.0);
    }
}
