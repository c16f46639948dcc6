//! Two-input mixer.

use crate::traits::{FlowComponent, Stream};
use ds_core::guarded_div;

/// Combines two streams into one.
///
/// Mass adds. Outlet temperature is the flow-weighted mean of the inlet
/// temperatures, with zero total flow yielding zero temperature.
#[derive(Clone, Debug)]
pub struct Mixer {
    name: String,
    out: Stream,
}

impl Mixer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            out: Stream::default(),
        }
    }

    pub fn mix(&mut self, a: Stream, b: Stream) -> Stream {
        let mass_flow = a.mass_flow + b.mass_flow;
        let temperature = guarded_div(a.enthalpy_flow() + b.enthalpy_flow(), mass_flow, 0.0);
        self.out = Stream::new(mass_flow, temperature);
        self.out
    }

    pub fn mass_flow_out(&self) -> f64 {
        self.out.mass_flow
    }

    pub fn temperature_out(&self) -> f64 {
        self.out.temperature
    }
}

impl FlowComponent for Mixer {
    fn name(&self) -> &str {
        &self.name
    }

    fn outflow(&self) -> Stream {
        self.out
    }
}
