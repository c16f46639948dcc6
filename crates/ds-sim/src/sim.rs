//! Run lifecycle and the unpaced run loop.

use crate::error::{SimError, SimResult};
use crate::events::{Termination, TickOutcome};
use crate::plant::{ControlTarget, Plant, PlantConfig};
use crate::score::Score;
use crate::snapshot::PlantSnapshot;
use crate::steady::SimulationClock;
use ds_core::Real;

#[derive(Clone, Debug, PartialEq)]
pub enum RunState {
    Ready,
    Running,
    Paused,
    Finished(Termination),
    Stopped,
}

impl RunState {
    /// No further ticks are possible.
    pub fn is_halted(&self) -> bool {
        matches!(self, RunState::Finished(_) | RunState::Stopped)
    }
}

/// A plant, its clock and the state of the run driving them.
#[derive(Clone, Debug)]
pub struct Simulation {
    plant: Plant,
    clock: SimulationClock,
    state: RunState,
}

impl Simulation {
    pub fn new(plant: Plant, clock: SimulationClock) -> Self {
        Self {
            plant,
            clock,
            state: RunState::Ready,
        }
    }

    pub fn from_config(config: &PlantConfig) -> SimResult<Self> {
        Ok(Self::new(Plant::from_config(config)?, config.clock()))
    }

    fn halted_error(&self) -> SimError {
        SimError::Halted {
            reason: match &self.state {
                RunState::Finished(termination) => termination.to_string(),
                _ => "run was stopped".to_string(),
            },
        }
    }

    pub fn start(&mut self) -> SimResult<()> {
        match self.state {
            RunState::Ready => {
                tracing::info!(dt = self.clock.dt, "simulation started");
                self.state = RunState::Running;
                Ok(())
            }
            RunState::Running | RunState::Paused => Ok(()),
            RunState::Finished(_) | RunState::Stopped => Err(self.halted_error()),
        }
    }

    pub fn pause(&mut self) -> SimResult<()> {
        match self.state {
            RunState::Running => {
                tracing::info!(t = self.clock.t, "simulation paused");
                self.state = RunState::Paused;
                Ok(())
            }
            RunState::Ready | RunState::Paused => Ok(()),
            RunState::Finished(_) | RunState::Stopped => Err(self.halted_error()),
        }
    }

    pub fn resume(&mut self) -> SimResult<()> {
        match self.state {
            RunState::Paused => {
                tracing::info!(t = self.clock.t, "simulation resumed");
                self.state = RunState::Running;
                Ok(())
            }
            RunState::Ready | RunState::Running => Ok(()),
            RunState::Finished(_) | RunState::Stopped => Err(self.halted_error()),
        }
    }

    /// Stop the run for good. Stopping a finished run keeps its termination.
    pub fn stop(&mut self) {
        if !self.state.is_halted() {
            tracing::info!(t = self.clock.t, "simulation stopped");
            self.state = RunState::Stopped;
        }
    }

    /// Run one tick and advance the clock.
    ///
    /// A `Ready` run is started. A paused run may still be single-stepped.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Halted`] once the run has finished or was stopped.
    pub fn step(&mut self) -> SimResult<TickOutcome> {
        match self.state {
            RunState::Ready => self.start()?,
            RunState::Running | RunState::Paused => {}
            RunState::Finished(_) | RunState::Stopped => return Err(self.halted_error()),
        }

        let outcome = self.plant.tick(&mut self.clock);
        self.clock.advance();
        if let TickOutcome::Terminated(termination) = &outcome {
            tracing::info!(t = self.clock.t, %termination, "simulation finished");
            self.state = RunState::Finished(termination.clone());
        }
        Ok(outcome)
    }

    pub fn apply(&mut self, target: ControlTarget, value: Real) -> SimResult<()> {
        self.plant.apply(target, value)
    }

    pub fn snapshot(&self) -> PlantSnapshot {
        self.plant.snapshot(&self.clock)
    }

    pub fn plant(&self) -> &Plant {
        &self.plant
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn score(&self) -> &Score {
        self.plant.score()
    }

    pub fn termination(&self) -> Option<&Termination> {
        match &self.state {
            RunState::Finished(termination) => Some(termination),
            _ => None,
        }
    }
}

/// Options for unpaced runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Maximum number of ticks (safety limit)
    pub max_steps: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self { max_steps: 100_000 }
    }
}

/// How an unpaced run ended.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub steps: usize,
    /// `None` when the step limit was hit first.
    pub termination: Option<Termination>,
}

/// Tick `simulation` as fast as possible until it terminates or hits
/// `opts.max_steps`. `observer` sees the simulation after every tick.
pub fn run_sim<F>(
    simulation: &mut Simulation,
    opts: &SimOptions,
    mut observer: F,
) -> SimResult<RunSummary>
where
    F: FnMut(&Simulation),
{
    if opts.max_steps == 0 {
        return Err(SimError::InvalidArg {
            what: "max_steps must be positive",
        });
    }
    simulation.start()?;

    let mut steps = 0;
    while steps < opts.max_steps {
        let outcome = simulation.step()?;
        steps += 1;
        observer(simulation);
        if let TickOutcome::Terminated(termination) = outcome {
            return Ok(RunSummary {
                steps,
                termination: Some(termination),
            });
        }
    }

    Ok(RunSummary {
        steps,
        termination: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.max_steps, 100_000);
    }

    #[test]
    fn halted_states() {
        assert!(RunState::Stopped.is_halted());
        assert!(RunState::Finished(Termination::SteadyStateReached).is_halted());
        assert!(!RunState::Paused.is_halted());
    }
}
