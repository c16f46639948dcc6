//! Tick pipeline: the fixed update order as an explicit, checkable DAG.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// One update step of a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TickStage {
    /// Supply and reservoir hidden heaters.
    HiddenHeaters,
    Demands,
    /// Branch valves and splitters, downstream first.
    Resistances,
    /// Pump capacity from the resistances, then pump output.
    PumpCapacity,
    /// Valve to splitter to downstream valves.
    Propagation,
    PumpCheck,
    Mixing,
    Heaters,
    OutletResistance,
    Integration,
    ReservoirCheck,
    Scoring,
    SteadyState,
}

impl TickStage {
    /// Stages whose results this stage reads.
    pub fn dependencies(self) -> &'static [TickStage] {
        use TickStage::*;
        match self {
            HiddenHeaters | Demands | Resistances | Heaters | OutletResistance => &[],
            PumpCapacity => &[Resistances, HiddenHeaters],
            Propagation => &[PumpCapacity],
            PumpCheck => &[PumpCapacity],
            Mixing => &[Propagation, PumpCheck],
            Integration => &[Mixing, Heaters, OutletResistance, HiddenHeaters],
            ReservoirCheck => &[Integration],
            Scoring => &[ReservoirCheck, Demands],
            SteadyState => &[Integration, Demands],
        }
    }
}

impl fmt::Display for TickStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Stage {stage} appears more than once")]
    DuplicateStage { stage: TickStage },

    #[error("Stage {stage} runs before its dependency {dependency}")]
    DependencyOrder {
        stage: TickStage,
        dependency: TickStage,
    },
}

impl From<PipelineError> for crate::error::SimError {
    fn from(e: PipelineError) -> Self {
        crate::error::SimError::Backend {
            message: e.to_string(),
        }
    }
}

/// Ordered list of stages executed once per tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickPipeline {
    stages: Vec<TickStage>,
}

impl TickPipeline {
    pub fn new(stages: Vec<TickStage>) -> Self {
        Self { stages }
    }

    /// The plant's update order.
    pub fn standard() -> Self {
        use TickStage::*;
        Self::new(vec![
            HiddenHeaters,
            Demands,
            Resistances,
            PumpCapacity,
            Propagation,
            PumpCheck,
            Mixing,
            Heaters,
            OutletResistance,
            Integration,
            ReservoirCheck,
            Scoring,
            SteadyState,
        ])
    }

    pub fn stages(&self) -> &[TickStage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Check that no stage repeats and every dependency runs earlier.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let mut done = HashSet::new();
        for &stage in &self.stages {
            for &dependency in stage.dependencies() {
                if !done.contains(&dependency) {
                    return Err(PipelineError::DependencyOrder { stage, dependency });
                }
            }
            if !done.insert(stage) {
                return Err(PipelineError::DuplicateStage { stage });
            }
        }
        Ok(())
    }
}
