//! Core traits for plant components.

use ds_core::Real;
use serde::Serialize;

/// Mass flow and temperature leaving a component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Stream {
    pub mass_flow: Real,
    pub temperature: Real,
}

impl Stream {
    pub fn new(mass_flow: Real, temperature: Real) -> Self {
        Self {
            mass_flow,
            temperature,
        }
    }

    /// Energy carried per unit heat capacity (`mass_flow * temperature`).
    pub fn enthalpy_flow(&self) -> Real {
        self.mass_flow * self.temperature
    }
}

/// A component that delivers a stream downstream.
pub trait FlowComponent {
    /// Component name for logging and display.
    fn name(&self) -> &str;

    /// Stream currently leaving the component.
    fn outflow(&self) -> Stream;
}

/// A component with an operator control.
///
/// Implementations clamp `value` to their own valid range; callers never
/// need to pre-validate.
pub trait Controllable {
    fn set_setting(&mut self, value: Real);

    fn setting(&self) -> Real;
}
