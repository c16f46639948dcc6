//! First-order lag dynamics shared by valves, demands and heaters.
//!
//! Dynamics: `dx/dt = (setting - x) / time_constant`, advanced with explicit
//! Euler over one scaled step. The setting itself may be taken over by a
//! [`FaultSchedule`].

use crate::common::{check_finite, check_non_negative, clamp};
use crate::error::{ComponentError, ComponentResult};
use crate::fault::{FaultSchedule, FaultSlot};
use ds_core::{Real, SimTime};
use serde::{Deserialize, Serialize};

/// First-order lag with a time constant in scaled time units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FirstOrderLag {
    pub time_constant: SimTime,
}

impl FirstOrderLag {
    /// Create a new lag.
    ///
    /// # Errors
    ///
    /// Returns error if `time_constant` is not positive.
    pub fn new(time_constant: SimTime) -> ComponentResult<Self> {
        if time_constant <= 0 {
            return Err(ComponentError::InvalidArg {
                what: "time_constant must be positive",
            });
        }
        Ok(Self { time_constant })
    }

    /// Advance `value` toward `target` by one step of length `dt`.
    pub fn advance(&self, value: Real, target: Real, dt: SimTime) -> Real {
        value + (target - value) * dt as Real / self.time_constant as Real
    }
}

/// A bounded quantity lagged toward a setting, with a fault schedule that can
/// take the setting over.
///
/// `value` and `setting` always stay inside `[0, maximum]`.
#[derive(Clone, Debug)]
pub struct LaggedSetpoint {
    maximum: Real,
    setting: Real,
    value: Real,
    lag: FirstOrderLag,
    faults: FaultSchedule,
    active_fault: Option<FaultSlot>,
}

impl LaggedSetpoint {
    pub fn new(
        maximum: Real,
        setting: Real,
        value: Real,
        time_constant: SimTime,
    ) -> ComponentResult<Self> {
        check_non_negative(maximum, "maximum must be non-negative")?;
        check_finite(setting, "setting")?;
        check_finite(value, "initial value")?;
        Ok(Self {
            maximum,
            setting: clamp(setting, 0.0, maximum),
            value: clamp(value, 0.0, maximum),
            lag: FirstOrderLag::new(time_constant)?,
            faults: FaultSchedule::none(),
            active_fault: None,
        })
    }

    pub fn with_faults(mut self, faults: FaultSchedule) -> Self {
        self.faults = faults;
        self
    }

    pub fn maximum(&self) -> Real {
        self.maximum
    }

    pub fn setting(&self) -> Real {
        self.setting
    }

    pub fn value(&self) -> Real {
        self.value
    }

    pub fn faults(&self) -> &FaultSchedule {
        &self.faults
    }

    pub fn active_fault(&self) -> Option<FaultSlot> {
        self.active_fault
    }

    /// Operator setting, clamped to `[0, maximum]`. Non-finite input is ignored.
    pub fn set_setting(&mut self, setting: Real) {
        if setting.is_finite() {
            self.setting = clamp(setting, 0.0, self.maximum);
        }
    }

    /// Apply any due fault, then integrate one step. `name` is only used for logging.
    pub fn advance(&mut self, name: &str, t: SimTime, dt: SimTime) {
        let active = self.faults.active(t);
        let slot = active.map(|f| f.slot);
        if slot != self.active_fault {
            if let Some(f) = active {
                tracing::info!(component = name, t, slot = ?f.slot, setpoint = f.setpoint, "scheduled fault active");
            }
            self.active_fault = slot;
        }
        if let Some(f) = active {
            self.setting = clamp(f.setpoint, 0.0, self.maximum);
        }

        self.value = clamp(self.value, 0.0, self.maximum);
        self.value = self.lag.advance(self.value, self.setting, dt);
        // Steps longer than the time constant overshoot; keep the bound.
        self.value = clamp(self.value, 0.0, self.maximum);
    }
}
