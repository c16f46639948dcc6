//! Flow splitter distributing one stream over two downstream valves.

use crate::common::{check_non_negative, clamp};
use crate::error::ComponentResult;
use crate::traits::{FlowComponent, Stream};
use ds_core::Real;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitterConfig {
    pub name: String,
    pub maximum_mass_flow: Real,
}

/// Two-way splitter.
///
/// The allowable throughput is the sum of the two downstream openings,
/// bounded by the splitter's own maximum. Incoming flow is divided in
/// proportion to those openings, so a fully closed outlet receives nothing.
#[derive(Clone, Debug)]
pub struct Splitter {
    name: String,
    maximum_mass_flow: Real,
    maximum_allowable_mass_flow: Real,
    mass_flow_out: Real,
    mass_flow_out2: Real,
    temperature_out: Real,
}

impl Splitter {
    pub fn new(name: impl Into<String>, maximum_mass_flow: Real) -> ComponentResult<Self> {
        let maximum_mass_flow =
            check_non_negative(maximum_mass_flow, "splitter maximum must be non-negative")?;
        Ok(Self {
            name: name.into(),
            maximum_mass_flow,
            maximum_allowable_mass_flow: 0.0,
            mass_flow_out: 0.0,
            mass_flow_out2: 0.0,
            temperature_out: 0.0,
        })
    }

    pub fn from_config(config: &SplitterConfig) -> ComponentResult<Self> {
        Self::new(config.name.clone(), config.maximum_mass_flow)
    }

    /// Recompute the allowable throughput from the downstream openings.
    pub fn calculate_resistance(&mut self, opening_1: Real, opening_2: Real) {
        self.maximum_allowable_mass_flow = clamp(opening_1 + opening_2, 0.0, self.maximum_mass_flow);
    }

    /// Split `mass_flow` across both outlets in proportion to their openings.
    pub fn set_mass_flow_out(&mut self, mass_flow: Real, opening_1: Real, opening_2: Real) {
        let total = opening_1 + opening_2;
        if total > 0.0 && mass_flow > 0.0 {
            self.mass_flow_out = mass_flow * opening_1 / total;
            self.mass_flow_out2 = mass_flow * opening_2 / total;
        } else {
            self.mass_flow_out = 0.0;
            self.mass_flow_out2 = 0.0;
        }
    }

    /// Both outlets carry the inlet temperature.
    pub fn set_temperature_out(&mut self, temperature: Real) {
        self.temperature_out = temperature;
    }

    pub fn maximum_mass_flow(&self) -> Real {
        self.maximum_mass_flow
    }

    pub fn maximum_allowable_mass_flow(&self) -> Real {
        self.maximum_allowable_mass_flow
    }

    pub fn mass_flow_out(&self) -> Real {
        self.mass_flow_out
    }

    pub fn mass_flow_out2(&self) -> Real {
        self.mass_flow_out2
    }

    pub fn temperature_out(&self) -> Real {
        self.temperature_out
    }

    /// Second outlet as a stream; the first is [`FlowComponent::outflow`].
    pub fn outflow2(&self) -> Stream {
        Stream::new(self.mass_flow_out2, self.temperature_out)
    }
}

impl FlowComponent for Splitter {
    fn name(&self) -> &str {
        &self.name
    }

    fn outflow(&self) -> Stream {
        Stream::new(self.mass_flow_out, self.temperature_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn allowable_flow_is_bounded() {
        let mut s = Splitter::new("SA", 10.0).unwrap();
        s.calculate_resistance(3.0, 4.0);
        assert_eq!(s.maximum_allowable_mass_flow(), 7.0);
        s.calculate_resistance(8.0, 9.0);
        assert_eq!(s.maximum_allowable_mass_flow(), 10.0);
        s.calculate_resistance(0.0, 0.0);
        assert_eq!(s.maximum_allowable_mass_flow(), 0.0);
    }

    #[test]
    fn proportional_split() {
        let mut s = Splitter::new("SA", 10.0).unwrap();
        s.set_mass_flow_out(6.0, 1.0, 2.0);
        assert!((s.mass_flow_out() - 2.0).abs() < 1e-12);
        assert!((s.mass_flow_out2() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn closed_outlets_receive_nothing() {
        let mut s = Splitter::new("SA", 10.0).unwrap();
        s.set_mass_flow_out(6.0, 0.0, 0.0);
        assert_eq!(s.mass_flow_out(), 0.0);
        assert_eq!(s.mass_flow_out2(), 0.0);

        s.set_mass_flow_out(6.0, 0.0, 3.0);
        assert_eq!(s.mass_flow_out(), 0.0);
        assert_eq!(s.mass_flow_out2(), 6.0);
    }

    #[test]
    fn temperature_copied_to_both_outlets() {
        let mut s = Splitter::new("SA", 10.0).unwrap();
        s.set_temperature_out(35.0);
        assert_eq!(s.temperature_out(), 35.0);
        assert_eq!(s.outflow2().temperature, 35.0);
    }

    proptest! {
        #[test]
        fn split_conserves_mass(
            flow in 0.0f64..100.0,
            o1 in 0.0f64..50.0,
            o2 in 0.0f64..50.0,
        ) {
            let mut s = Splitter::new("S", 100.0).unwrap();
            s.set_mass_flow_out(flow, o1, o2);
            let out = s.mass_flow_out() + s.mass_flow_out2();
            if o1 + o2 > 0.0 {
                prop_assert!((out - flow).abs() <= 1e-9 * flow.max(1.0));
            } else {
                prop_assert_eq!(out, 0.0);
            }
        }
    }
}
