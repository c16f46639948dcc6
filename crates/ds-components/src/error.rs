//! Error types for component construction.

use ds_core::error::DsError;
use thiserror::Error;

/// Errors raised while building or configuring a component.
///
/// Ticking a component never produces one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<DsError> for ComponentError {
    fn from(e: DsError) -> Self {
        match e {
            DsError::NonFinite { what, .. } => ComponentError::NonPhysical { what },
            DsError::InvalidArg { what } => ComponentError::InvalidArg { what },
        }
    }
}

impl From<ComponentError> for DsError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::NonPhysical { what } => DsError::InvalidArg { what },
            ComponentError::InvalidArg { what } => DsError::InvalidArg { what },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ComponentError::NonPhysical { what: "opening" };
        assert!(err.to_string().contains("opening"));
    }

    #[test]
    fn error_conversion() {
        let comp_err = ComponentError::InvalidArg { what: "test" };
        let ds_err: DsError = comp_err.into();
        assert!(matches!(ds_err, DsError::InvalidArg { .. }));

        let back: ComponentError = DsError::NonFinite {
            what: "setting",
            value: f64::NAN,
        }
        .into();
        assert_eq!(back, ComponentError::NonPhysical { what: "setting" });
    }
}
