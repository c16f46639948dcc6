//! Dual-reservoir plant simulation.
//!
//! Provides:
//! - Reservoir mass/energy integration with sticky boil, overheat and overflow faults
//! - The two-branch plant driven by an explicit tick pipeline
//! - Score matrix and steady-state detection
//! - Run lifecycle, unpaced run loop and a paced worker-thread runner
//! - Serializable plant snapshots

pub mod branch;
pub mod error;
pub mod events;
pub mod pipeline;
pub mod plant;
pub mod reservoir;
pub mod runner;
pub mod score;
pub mod sim;
pub mod snapshot;
pub mod steady;

pub use branch::{Branch, BranchConfig, ValveSlot};
pub use error::{SimError, SimResult};
pub use events::{FatalReason, Termination, TickOutcome};
pub use pipeline::{PipelineError, TickPipeline, TickStage};
pub use plant::{BranchId, ControlTarget, Plant, PlantConfig, ReservoirId};
pub use reservoir::{LeakFault, OverheatTimerPolicy, Reservoir, ReservoirConfig, ReservoirFault};
pub use runner::{EVENT_BUFFER, Pacing, RunControl, Runner, RunnerEvent};
pub use score::{FlowBand, Margins, Outflow, Score, TemperatureBand};
pub use sim::{RunState, RunSummary, SimOptions, Simulation, run_sim};
pub use snapshot::PlantSnapshot;
pub use steady::SimulationClock;
