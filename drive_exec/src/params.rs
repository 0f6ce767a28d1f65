//! # Drive Executable Parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use crate::eqpt::{ActuatorConfig, EqptError, SimParams};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Longest accepted cycle period.
///
/// Units: seconds
pub const MAX_CYCLE_PERIOD_S: f64 = 1.0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DriveExecParams {

    /// Target period of one cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Input axis driving the left side.
    pub left_axis_id: u32,

    /// Input axis driving the right side.
    pub right_axis_id: u32,

    /// Input button which zeroes the encoders while held.
    pub reset_button_id: u32,

    /// Configuration of the left motor controller.
    pub left_actuator: ActuatorConfig,

    /// Configuration of the right motor controller.
    pub right_actuator: ActuatorConfig,

    /// Simulated motor parameters, used when running off-robot.
    #[serde(default)]
    pub sim: SimParams,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl DriveExecParams {
    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<(), EqptError> {
        if !(self.cycle_period_s > 0.0 && self.cycle_period_s <= MAX_CYCLE_PERIOD_S) {
            return Err(EqptError::InvalidConfig(format!(
                "cycle period must be in (0, {}] s, got {}",
                MAX_CYCLE_PERIOD_S, self.cycle_period_s
            )));
        }

        self.left_actuator.validate()?;
        self.right_actuator.validate()
    }
}

impl Default for DriveExecParams {
    fn default() -> Self {
        DriveExecParams {
            cycle_period_s: 0.02,
            left_axis_id: 1,
            right_axis_id: 2,
            reset_button_id: 6,
            left_actuator: ActuatorConfig::default(),
            right_actuator: ActuatorConfig::default(),
            sim: SimParams::default(),
        }
    }
}
