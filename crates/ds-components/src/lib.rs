//! ds-components: leaf components of the dual-reservoir plant.
//!
//! Provides lumped, forward-Euler models for:
//! - Valves and demand setpoints with first-order lag and scheduled faults
//! - Pumps whose capacity is limited by downstream resistance
//! - Splitters and mixers that move mass and energy between branches
//! - Operator heaters and hidden (fault-only) heaters
//!
//! Components never fail at runtime. Abnormal conditions are exposed as
//! state (for example [`Pump::is_broken`]) for the orchestration layer to act on.
//!
//! # Example
//!
//! ```
//! use ds_components::{Controllable, FaultSchedule, Valve};
//!
//! let mut valve = Valve::new("VA", 10.0, 5.0, 0.0, 1000)
//!     .unwrap()
//!     .with_faults(FaultSchedule::single(0.0, 5000));
//!
//! valve.calculate_resistance(0, 500);
//! assert!(valve.opening() > 0.0);
//!
//! valve.calculate_resistance(5000, 500);
//! assert_eq!(valve.setting(), 0.0);
//! ```

pub mod common;
pub mod demand;
pub mod error;
pub mod fault;
pub mod heater;
pub mod lag;
pub mod mixer;
pub mod pump;
pub mod splitter;
pub mod traits;
pub mod valve;

// Re-exports
pub use demand::{Demand, DemandConfig};
pub use error::{ComponentError, ComponentResult};
pub use fault::{ActiveFault, Fault, FaultSchedule, FaultSlot};
pub use heater::{Heater, HeaterConfig, HiddenHeater, HiddenHeaterConfig};
pub use lag::{FirstOrderLag, LaggedSetpoint};
pub use mixer::Mixer;
pub use pump::{Pump, PumpConfig, PumpState};
pub use splitter::{Splitter, SplitterConfig};
pub use traits::{Controllable, FlowComponent, Stream};
pub use valve::{Valve, ValveConfig};
