//! Paced run loop on a worker thread.

use crate::error::{SimError, SimResult};
use crate::events::{Termination, TickOutcome};
use crate::plant::ControlTarget;
use crate::sim::{RunState, Simulation};
use crate::snapshot::PlantSnapshot;
use ds_core::{Real, wall_duration};
use std::sync::mpsc::{Receiver, Sender, SyncSender, TryRecvError, channel, sync_channel};
use std::thread::{self, JoinHandle};

/// Wall-clock pacing of ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pacing {
    /// Sleep `dt * scale` scaled milliseconds between ticks; 1.0 is real time.
    Scaled(f64),
    Unpaced,
}

impl Pacing {
    pub fn real_time() -> Self {
        Pacing::Scaled(1.0)
    }
}

/// Tick events buffered ahead of a slow host before the worker blocks.
pub const EVENT_BUFFER: usize = 64;

/// Commands from the host, applied between ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RunControl {
    Pause,
    Resume,
    Stop,
    Set(ControlTarget, Real),
}

#[derive(Clone, Debug)]
pub enum RunnerEvent {
    Tick(Box<PlantSnapshot>),
    Finished(Termination),
    Stopped,
    Error { message: String },
}

/// Handle to a simulation running on its own thread.
///
/// Events go through a bounded channel of [`EVENT_BUFFER`] entries, so a
/// host that stops reading holds the worker at the next tick. Drain
/// `events` before calling [`Runner::join`].
pub struct Runner {
    control_tx: Sender<RunControl>,
    pub events: Receiver<RunnerEvent>,
    handle: JoinHandle<Simulation>,
}

impl Runner {
    /// Run until the simulation terminates or the host stops it.
    pub fn spawn(simulation: Simulation, pacing: Pacing) -> Self {
        Self::start(simulation, pacing, None)
    }

    /// Like [`Runner::spawn`], but the worker itself stops after exactly
    /// `max_steps` ticks and reports `Stopped`. Zero is rejected, as in
    /// [`crate::run_sim`].
    pub fn spawn_with_limit(
        simulation: Simulation,
        pacing: Pacing,
        max_steps: usize,
    ) -> SimResult<Self> {
        if max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        Ok(Self::start(simulation, pacing, Some(max_steps)))
    }

    fn start(simulation: Simulation, pacing: Pacing, max_steps: Option<usize>) -> Self {
        let (control_tx, control_rx) = channel();
        let (event_tx, events) = sync_channel(EVENT_BUFFER);

        let handle = thread::spawn(move || {
            let mut simulation = simulation;
            let looped = Self::run_loop(&mut simulation, pacing, max_steps, &control_rx, &event_tx);
            if let Err(e) = looped {
                let _ = event_tx.send(RunnerEvent::Error {
                    message: e.to_string(),
                });
            }
            simulation
        });

        Self {
            control_tx,
            events,
            handle,
        }
    }

    pub fn send(&self, control: RunControl) -> SimResult<()> {
        self.control_tx
            .send(control)
            .map_err(|_| SimError::Backend {
                message: "runner thread has exited".to_string(),
            })
    }

    pub fn pause(&self) -> SimResult<()> {
        self.send(RunControl::Pause)
    }

    pub fn resume(&self) -> SimResult<()> {
        self.send(RunControl::Resume)
    }

    pub fn stop(&self) -> SimResult<()> {
        self.send(RunControl::Stop)
    }

    pub fn set(&self, target: ControlTarget, value: Real) -> SimResult<()> {
        self.send(RunControl::Set(target, value))
    }

    /// Wait for the worker and take the simulation back.
    pub fn join(self) -> SimResult<Simulation> {
        self.handle.join().map_err(|_| SimError::Backend {
            message: "runner thread panicked".to_string(),
        })
    }

    fn handle_control(simulation: &mut Simulation, control: RunControl) -> SimResult<()> {
        match control {
            RunControl::Pause => simulation.pause(),
            RunControl::Resume => simulation.resume(),
            RunControl::Stop => {
                simulation.stop();
                Ok(())
            }
            RunControl::Set(target, value) => {
                if let Err(e) = simulation.apply(target, value) {
                    tracing::warn!(?target, value, error = %e, "rejected operator control");
                }
                Ok(())
            }
        }
    }

    fn run_loop(
        simulation: &mut Simulation,
        pacing: Pacing,
        max_steps: Option<usize>,
        control_rx: &Receiver<RunControl>,
        event_tx: &SyncSender<RunnerEvent>,
    ) -> SimResult<()> {
        simulation.start()?;

        let mut steps = 0;
        loop {
            // Controls only land between ticks.
            while !simulation.state().is_halted() {
                match control_rx.try_recv() {
                    Ok(control) => Self::handle_control(simulation, control)?,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        simulation.stop();
                        break;
                    }
                }
            }
            while *simulation.state() == RunState::Paused {
                match control_rx.recv() {
                    Ok(control) => Self::handle_control(simulation, control)?,
                    Err(_) => simulation.stop(),
                }
            }
            if *simulation.state() == RunState::Stopped {
                let _ = event_tx.send(RunnerEvent::Stopped);
                return Ok(());
            }

            let outcome = simulation.step()?;
            steps += 1;
            if event_tx
                .send(RunnerEvent::Tick(Box::new(simulation.snapshot())))
                .is_err()
            {
                // Nobody is listening any more.
                simulation.stop();
                return Ok(());
            }
            if let TickOutcome::Terminated(termination) = outcome {
                let _ = event_tx.send(RunnerEvent::Finished(termination));
                return Ok(());
            }
            if max_steps == Some(steps) {
                simulation.stop();
                let _ = event_tx.send(RunnerEvent::Stopped);
                return Ok(());
            }

            if let Pacing::Scaled(scale) = pacing {
                thread::sleep(wall_duration(simulation.clock().dt, scale));
            }
        }
    }
}
