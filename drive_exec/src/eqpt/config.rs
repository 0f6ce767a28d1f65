//! Actuator configuration

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use super::EqptError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Configuration applied to a motor controller during robot initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ActuatorConfig {
    /// Invert the direction of the motor output.
    pub inverted: bool,

    /// Behaviour when the commanded output is zero.
    pub neutral_mode: NeutralMode,

    /// Voltage treated as full output when compensation is enabled.
    ///
    /// Units: volts
    pub voltage_comp_saturation_v: f64,

    /// Scale output against `voltage_comp_saturation_v` rather than the
    /// battery voltage.
    pub voltage_comp_enabled: bool,

    /// Flip the sign of the encoder so that positive output reads as
    /// positive velocity.
    pub sensor_phase: bool,

    /// Smallest forward output applied for any non-zero forward command.
    pub nominal_output_fwd: f64,

    /// Smallest reverse output applied for any non-zero reverse command.
    pub nominal_output_rev: f64,

    /// Largest forward output.
    pub peak_output_fwd: f64,

    /// Largest reverse output (most negative).
    pub peak_output_rev: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Actuator behaviour at zero output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeutralMode {
    /// Let the wheel spin freely.
    Coast,
    /// Short the motor to stop the wheel.
    Brake,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ActuatorConfig {
    fn default() -> Self {
        ActuatorConfig {
            inverted: false,
            neutral_mode: NeutralMode::Coast,
            voltage_comp_saturation_v: 12.0,
            voltage_comp_enabled: false,
            sensor_phase: false,
            nominal_output_fwd: 0.0,
            nominal_output_rev: 0.0,
            peak_output_fwd: 1.0,
            peak_output_rev: -1.0,
        }
    }
}

impl ActuatorConfig {
    /// Check the output limits are ordered and within [-1, 1].
    pub fn validate(&self) -> Result<(), EqptError> {
        let fwd_ok = 0.0 <= self.nominal_output_fwd
            && self.nominal_output_fwd <= self.peak_output_fwd
            && self.peak_output_fwd <= 1.0;
        if !fwd_ok {
            return Err(EqptError::InvalidConfig(format!(
                "forward outputs must satisfy 0 <= nominal ({}) <= peak ({}) <= 1",
                self.nominal_output_fwd, self.peak_output_fwd
            )));
        }

        let rev_ok = -1.0 <= self.peak_output_rev
            && self.peak_output_rev <= self.nominal_output_rev
            && self.nominal_output_rev <= 0.0;
        if !rev_ok {
            return Err(EqptError::InvalidConfig(format!(
                "reverse outputs must satisfy -1 <= peak ({}) <= nominal ({}) <= 0",
                self.peak_output_rev, self.nominal_output_rev
            )));
        }

        if !(self.voltage_comp_saturation_v > 0.0 && self.voltage_comp_saturation_v.is_finite()) {
            return Err(EqptError::InvalidConfig(format!(
                "voltage compensation saturation must be positive, got {}",
                self.voltage_comp_saturation_v
            )));
        }

        Ok(())
    }

    /// Apply the nominal and peak output limits to a percent command.
    ///
    /// Zero stays zero so that the neutral mode applies.
    pub fn limit_output(&self, percent: f64) -> f64 {
        if percent > 0.0 {
            percent.max(self.nominal_output_fwd).min(self.peak_output_fwd)
        }
        else if percent < 0.0 {
            percent.min(self.nominal_output_rev).max(self.peak_output_rev)
        }
        else {
            0.0
        }
    }
}
