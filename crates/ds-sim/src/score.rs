//! Operator performance score.

use ds_core::{Real, SimTime, seconds};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TemperatureBand {
    Low = 0,
    Normal = 1,
    High = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FlowBand {
    Under = 0,
    OnTarget = 1,
    Over = 2,
}

/// Tolerance bands shared by scoring and steady-state detection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    pub demand: Real,
    pub temperature: Real,
}

/// One reservoir's outflow as seen by the scorer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Outflow {
    pub mass_flow: Real,
    pub temperature: Real,
    pub demand: Real,
    pub demand_temperature: Real,
}

impl Outflow {
    /// True when flow and temperature are both inside their bands, edges included.
    pub fn in_band(&self, margins: Margins) -> bool {
        self.mass_flow >= self.demand - margins.demand
            && self.mass_flow <= self.demand + margins.demand
            && self.temperature >= self.demand_temperature - margins.temperature
            && self.temperature <= self.demand_temperature + margins.temperature
    }
}

/// Delivered mass accumulated per (temperature band, flow band) cell.
///
/// Out-of-band temperature always books into the underflow column, whatever
/// the flow. Flow above the band is split: the in-band part counts as on
/// target and only the excess as overflow.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Score {
    cells: [[Real; 3]; 3],
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, temperature: TemperatureBand, flow: FlowBand) -> Real {
        self.cells[temperature as usize][flow as usize]
    }

    pub fn cells(&self) -> &[[Real; 3]; 3] {
        &self.cells
    }

    pub fn total(&self) -> Real {
        self.cells.iter().flatten().sum()
    }

    fn add(&mut self, temperature: TemperatureBand, flow: FlowBand, amount: Real) {
        // Negative or NaN contributions would break monotonicity.
        if amount > 0.0 {
            self.cells[temperature as usize][flow as usize] += amount;
        }
    }

    /// Classify one reservoir's step and book `mass_flow * dt / 1000`.
    pub fn record(&mut self, outflow: Outflow, margins: Margins, dt: SimTime) {
        let s = seconds(dt);
        let amount = outflow.mass_flow * s;
        if outflow.temperature < outflow.demand_temperature - margins.temperature {
            self.add(TemperatureBand::Low, FlowBand::Under, amount);
        } else if outflow.temperature > outflow.demand_temperature + margins.temperature {
            self.add(TemperatureBand::High, FlowBand::Under, amount);
        } else if outflow.mass_flow < outflow.demand - margins.demand {
            self.add(TemperatureBand::Normal, FlowBand::Under, amount);
        } else if outflow.mass_flow > outflow.demand + margins.demand {
            let ceiling = outflow.demand + margins.demand;
            self.add(TemperatureBand::Normal, FlowBand::OnTarget, ceiling * s);
            self.add(
                TemperatureBand::Normal,
                FlowBand::Over,
                (outflow.mass_flow - ceiling) * s,
            );
        } else {
            self.add(TemperatureBand::Normal, FlowBand::OnTarget, amount);
        }
    }
}
