//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while building or driving a plant simulation.
///
/// Plant faults (boiling, overflow, pump breakdown) are not errors; they end
/// a run through [`crate::Termination`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Simulation halted: {reason}")]
    Halted { reason: String },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<ds_components::ComponentError> for SimError {
    fn from(e: ds_components::ComponentError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}

impl From<ds_core::DsError> for SimError {
    fn from(e: ds_core::DsError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_error_becomes_backend() {
        let e: SimError = ds_components::ComponentError::InvalidArg { what: "x" }.into();
        assert!(matches!(e, SimError::Backend { .. }));
        assert!(e.to_string().contains("x"));
    }
}
