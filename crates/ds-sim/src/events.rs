//! Terminal events raised by a tick.

use crate::reservoir::ReservoirFault;
use serde::Serialize;
use std::fmt;

/// Why a run ended in failure.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FatalReason {
    PumpBreakdown {
        pump: String,
    },
    Reservoir {
        reservoir: String,
        fault: ReservoirFault,
    },
}

impl fmt::Display for FatalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalReason::PumpBreakdown { pump } => {
                write!(f, "{pump} blew up because valves were closed.")
            }
            FatalReason::Reservoir { reservoir, fault } => match fault {
                ReservoirFault::Boil => write!(f, "The water in {reservoir} reached boiling point."),
                ReservoirFault::Overheat => write!(f, "{reservoir} was heated empty."),
                ReservoirFault::Overflow => write!(f, "{reservoir} overflowed."),
            },
        }
    }
}

/// How a run ended.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Termination {
    Fatal(FatalReason),
    SteadyStateReached,
}

impl Termination {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Termination::Fatal(_))
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Fatal(reason) => reason.fmt(f),
            Termination::SteadyStateReached => write!(f, "Steady state reached."),
        }
    }
}

/// Result of one plant tick.
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    Continue,
    Terminated(Termination),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_messages() {
        let pump = Termination::Fatal(FatalReason::PumpBreakdown {
            pump: "Pump A".into(),
        });
        assert_eq!(pump.to_string(), "Pump A blew up because valves were closed.");

        let cases = [
            (ReservoirFault::Boil, "The water in Reservoir 1 reached boiling point."),
            (ReservoirFault::Overheat, "Reservoir 1 was heated empty."),
            (ReservoirFault::Overflow, "Reservoir 1 overflowed."),
        ];
        for (fault, msg) in cases {
            let reason = FatalReason::Reservoir {
                reservoir: "Reservoir 1".into(),
                fault,
            };
            assert_eq!(reason.to_string(), msg);
        }
    }

    #[test]
    fn steady_state_is_not_fatal() {
        assert!(!Termination::SteadyStateReached.is_fatal());
    }
}
