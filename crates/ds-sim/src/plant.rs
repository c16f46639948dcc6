//! The dual-reservoir plant and its per-tick orchestration.

use crate::branch::{Branch, BranchConfig, ValveSlot};
use crate::error::{SimError, SimResult};
use crate::events::{FatalReason, Termination, TickOutcome};
use crate::pipeline::{TickPipeline, TickStage};
use crate::reservoir::{Reservoir, ReservoirConfig};
use crate::score::{Margins, Outflow, Score};
use crate::snapshot::PlantSnapshot;
use crate::steady::SimulationClock;
use ds_components::{
    Controllable, FlowComponent, Heater, HeaterConfig, HiddenHeater, HiddenHeaterConfig, Mixer,
};
use ds_core::{Real, SimTime};
use serde::{Deserialize, Serialize};

/// Full plant parameter set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlantConfig {
    /// Step size in scaled milliseconds.
    pub dt: SimTime,
    /// In-band time needed to end the run successfully.
    pub steady_limit: SimTime,
    /// Enables steady-state termination when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steady_min_time: Option<SimTime>,
    pub demand_margin: Real,
    pub temperature_margin: Real,
    /// Hidden heater whose output is the feed water temperature.
    pub supply_heater: HiddenHeaterConfig,
    pub branch_a: BranchConfig,
    pub branch_b: BranchConfig,
    pub heater_1: HeaterConfig,
    pub heater_2: HeaterConfig,
    pub hidden_heater_1: HiddenHeaterConfig,
    pub hidden_heater_2: HiddenHeaterConfig,
    pub reservoir_1: ReservoirConfig,
    pub reservoir_2: ReservoirConfig,
}

impl PlantConfig {
    pub fn clock(&self) -> SimulationClock {
        SimulationClock::new(self.dt, self.steady_limit, self.steady_min_time)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchId {
    A,
    B,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservoirId {
    One,
    Two,
}

/// An operator control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlTarget {
    Valve { branch: BranchId, slot: ValveSlot },
    ReservoirOutlet(ReservoirId),
    Heater(ReservoirId),
    /// Any positive value switches the pump on.
    Pump(BranchId),
}

/// Two supply branches feeding two mixers, two heated reservoirs.
///
/// ```text
///   HH0 (supply temperature)
///    |                                   H1, HH1
///   PA - VA - SA -+- VA1 --+               |
///                 +- VA2 --|--+        M1 -> R1 -> outlet 1
///   PB - VB - SB -+- VB1 --+  |
///                 +- VB2 -----+-- M2 -> R2 -> outlet 2
///                                          |
///                                        H2, HH2
/// ```
///
/// Each tick runs the stages of a [`TickPipeline`] in order. A pump
/// breakdown or reservoir fault stops the tick at its check stage.
#[derive(Clone, Debug)]
pub struct Plant {
    pipeline: TickPipeline,
    margins: Margins,
    supply_heater: HiddenHeater,
    branch_a: Branch,
    branch_b: Branch,
    mixer_1: Mixer,
    mixer_2: Mixer,
    heater_1: Heater,
    heater_2: Heater,
    hidden_heater_1: HiddenHeater,
    hidden_heater_2: HiddenHeater,
    reservoir_1: Reservoir,
    reservoir_2: Reservoir,
    score: Score,
}

impl Plant {
    pub fn from_config(config: &PlantConfig) -> SimResult<Self> {
        if config.dt <= 0 {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !(config.demand_margin >= 0.0 && config.temperature_margin >= 0.0) {
            return Err(SimError::InvalidArg {
                what: "margins must be non-negative",
            });
        }
        let pipeline = TickPipeline::standard();
        pipeline.validate()?;

        Ok(Self {
            pipeline,
            margins: Margins {
                demand: config.demand_margin,
                temperature: config.temperature_margin,
            },
            supply_heater: HiddenHeater::from_config(&config.supply_heater)?,
            branch_a: Branch::from_config(&config.branch_a)?,
            branch_b: Branch::from_config(&config.branch_b)?,
            mixer_1: Mixer::new("M1"),
            mixer_2: Mixer::new("M2"),
            heater_1: Heater::from_config(&config.heater_1)?,
            heater_2: Heater::from_config(&config.heater_2)?,
            hidden_heater_1: HiddenHeater::from_config(&config.hidden_heater_1)?,
            hidden_heater_2: HiddenHeater::from_config(&config.hidden_heater_2)?,
            reservoir_1: Reservoir::from_config(&config.reservoir_1)?,
            reservoir_2: Reservoir::from_config(&config.reservoir_2)?,
            score: Score::new(),
        })
    }

    /// Run one full tick at `clock.t`. Does not advance the clock.
    pub fn tick(&mut self, clock: &mut SimulationClock) -> TickOutcome {
        tracing::debug!(t = clock.t, dt = clock.dt, "tick");
        for i in 0..self.pipeline.len() {
            let stage = self.pipeline.stages()[i];
            if let Some(termination) = self.run_stage(stage, clock) {
                return TickOutcome::Terminated(termination);
            }
        }
        TickOutcome::Continue
    }

    fn run_stage(&mut self, stage: TickStage, clock: &mut SimulationClock) -> Option<Termination> {
        let (t, dt) = (clock.t, clock.dt);
        match stage {
            TickStage::HiddenHeaters => {
                self.supply_heater.check_for_fault(t, dt);
                self.hidden_heater_1.check_for_fault(t, dt);
                self.hidden_heater_2.check_for_fault(t, dt);
            }
            TickStage::Demands => {
                self.reservoir_1.calculate_demand(t, dt);
                self.reservoir_2.calculate_demand(t, dt);
            }
            TickStage::Resistances => {
                self.branch_a.calculate_resistances(t, dt);
                self.branch_b.calculate_resistances(t, dt);
            }
            TickStage::PumpCapacity => {
                let supply_temperature = self.supply_heater.heat_flow_out();
                self.branch_a.drive_pump(t, dt, supply_temperature);
                self.branch_b.drive_pump(t, dt, supply_temperature);
            }
            TickStage::Propagation => {
                self.branch_a.propagate();
                self.branch_b.propagate();
            }
            TickStage::PumpCheck => {
                for branch in [&self.branch_a, &self.branch_b] {
                    let pump = branch.pump();
                    if pump.is_broken() {
                        tracing::warn!(pump = %pump.name(), t, "pump broke down");
                        return Some(Termination::Fatal(FatalReason::PumpBreakdown {
                            pump: pump.name().to_string(),
                        }));
                    }
                }
            }
            TickStage::Mixing => {
                self.mixer_1.mix(
                    self.branch_a.valve(ValveSlot::First).outflow(),
                    self.branch_b.valve(ValveSlot::First).outflow(),
                );
                self.mixer_2.mix(
                    self.branch_a.valve(ValveSlot::Second).outflow(),
                    self.branch_b.valve(ValveSlot::Second).outflow(),
                );
            }
            TickStage::Heaters => {
                self.heater_1.set_heat_flow_out(t, dt);
                self.heater_2.set_heat_flow_out(t, dt);
            }
            TickStage::OutletResistance => {
                self.reservoir_1.calculate_resistance(t, dt);
                self.reservoir_2.calculate_resistance(t, dt);
            }
            TickStage::Integration => {
                self.reservoir_1.feed(
                    self.mixer_1.outflow(),
                    self.heater_1.heat_flow_out(),
                    self.hidden_heater_1.heat_flow_out(),
                );
                self.reservoir_1.calculate_reservoir(t, dt);
                self.reservoir_2.feed(
                    self.mixer_2.outflow(),
                    self.heater_2.heat_flow_out(),
                    self.hidden_heater_2.heat_flow_out(),
                );
                self.reservoir_2.calculate_reservoir(t, dt);
            }
            TickStage::ReservoirCheck => {
                for reservoir in [&self.reservoir_1, &self.reservoir_2] {
                    if let Some(fault) = reservoir.error() {
                        return Some(Termination::Fatal(FatalReason::Reservoir {
                            reservoir: reservoir.name().to_string(),
                            fault,
                        }));
                    }
                }
            }
            TickStage::Scoring => {
                self.score
                    .record(outflow(&self.reservoir_1), self.margins, dt);
                self.score
                    .record(outflow(&self.reservoir_2), self.margins, dt);
            }
            TickStage::SteadyState => {
                let in_band = outflow(&self.reservoir_1).in_band(self.margins)
                    && outflow(&self.reservoir_2).in_band(self.margins);
                if clock.update(in_band) {
                    tracing::info!(t, steady_time = clock.steady_time, "steady state reached");
                    return Some(Termination::SteadyStateReached);
                }
            }
        }
        None
    }

    /// Apply an operator control. Values are clamped by the component.
    pub fn apply(&mut self, target: ControlTarget, value: Real) -> SimResult<()> {
        if !value.is_finite() {
            return Err(SimError::NonPhysical {
                what: "control value must be finite",
            });
        }
        match target {
            ControlTarget::Valve { branch, slot } => {
                self.branch_mut(branch).valve_mut(slot).set_setting(value)
            }
            ControlTarget::ReservoirOutlet(id) => self.reservoir_mut(id).set_setting(value),
            ControlTarget::Heater(ReservoirId::One) => self.heater_1.set_setting(value),
            ControlTarget::Heater(ReservoirId::Two) => self.heater_2.set_setting(value),
            ControlTarget::Pump(branch) => self.branch_mut(branch).pump_mut().set_running(value > 0.0),
        }
        Ok(())
    }

    pub fn snapshot(&self, clock: &SimulationClock) -> PlantSnapshot {
        PlantSnapshot {
            t: clock.t,
            steady_time: clock.steady_time,
            supply_heater: (&self.supply_heater).into(),
            branch_a: (&self.branch_a).into(),
            branch_b: (&self.branch_b).into(),
            mixer_1: (&self.mixer_1).into(),
            mixer_2: (&self.mixer_2).into(),
            heater_1: (&self.heater_1).into(),
            heater_2: (&self.heater_2).into(),
            hidden_heater_1: (&self.hidden_heater_1).into(),
            hidden_heater_2: (&self.hidden_heater_2).into(),
            reservoir_1: (&self.reservoir_1).into(),
            reservoir_2: (&self.reservoir_2).into(),
            score: self.score.clone(),
        }
    }

    pub fn pipeline(&self) -> &TickPipeline {
        &self.pipeline
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn branch(&self, id: BranchId) -> &Branch {
        match id {
            BranchId::A => &self.branch_a,
            BranchId::B => &self.branch_b,
        }
    }

    fn branch_mut(&mut self, id: BranchId) -> &mut Branch {
        match id {
            BranchId::A => &mut self.branch_a,
            BranchId::B => &mut self.branch_b,
        }
    }

    pub fn reservoir(&self, id: ReservoirId) -> &Reservoir {
        match id {
            ReservoirId::One => &self.reservoir_1,
            ReservoirId::Two => &self.reservoir_2,
        }
    }

    fn reservoir_mut(&mut self, id: ReservoirId) -> &mut Reservoir {
        match id {
            ReservoirId::One => &mut self.reservoir_1,
            ReservoirId::Two => &mut self.reservoir_2,
        }
    }

    pub fn heater(&self, id: ReservoirId) -> &Heater {
        match id {
            ReservoirId::One => &self.heater_1,
            ReservoirId::Two => &self.heater_2,
        }
    }

    pub fn supply_temperature(&self) -> Real {
        self.supply_heater.heat_flow_out()
    }
}

fn outflow(reservoir: &Reservoir) -> Outflow {
    Outflow {
        mass_flow: reservoir.mass_flow_out(),
        temperature: reservoir.temperature(),
        demand: reservoir.demand().flow(),
        demand_temperature: reservoir.demand_temperature(),
    }
}
