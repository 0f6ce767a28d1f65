//! Simulated equipment
//!
//! Lets the executable and tests run without robot hardware. The simulated
//! actuator models a motor with a relative encoder on the motor shaft whose
//! speed follows the commanded output instantly.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Deserialize;
use std::collections::HashMap;

// Internal
use super::{Actuator, ActuatorConfig, EqptError, InputSource, NeutralMode};
use crate::drive_tm::VELOCITY_WINDOW_S;
use util::maths;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of a simulated actuator.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SimParams {
    /// Motor shaft speed at full output and nominal bus voltage.
    ///
    /// Units: revolutions/minute
    pub free_speed_rpm: f64,

    /// Encoder edges per motor shaft revolution.
    pub encoder_edges_per_rev: f64,

    /// Supply voltage of the simulated robot.
    ///
    /// Units: volts
    pub bus_voltage_v: f64,

    /// Fraction of the free speed lost per second while coasting.
    ///
    /// Units: 1/second
    pub coast_decel_per_s: f64,
}

/// A simulated motor controller and encoder.
#[derive(Debug)]
pub struct SimActuator {
    name: String,
    params: SimParams,
    config: Option<ActuatorConfig>,

    /// Output demand after limits, in the motor shaft frame.
    shaft_output: f64,

    /// Shaft position since the last reset.
    ///
    /// Units: encoder edges
    shaft_pos_edges: f64,

    /// Units: encoder edges/second
    shaft_vel_edges_s: f64,
}

/// An input source returning fixed axis and button values.
///
/// Axes and buttons which have not been set read as centred and released.
#[derive(Debug, Default, Clone)]
pub struct FixedInput {
    axes: HashMap<u32, f64>,
    buttons: HashMap<u32, bool>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SimParams {
    fn default() -> Self {
        SimParams {
            free_speed_rpm: 5330.0,
            encoder_edges_per_rev: 4096.0,
            bus_voltage_v: 12.0,
            coast_decel_per_s: 0.5,
        }
    }
}

impl SimActuator {
    /// Create an unconfigured actuator.
    pub fn new(name: &str, params: SimParams) -> Self {
        Self {
            name: name.to_string(),
            params,
            config: None,
            shaft_output: 0.0,
            shaft_pos_edges: 0.0,
            shaft_vel_edges_s: 0.0,
        }
    }

    /// Advance the simulation by `dt_s` seconds.
    pub fn step(&mut self, dt_s: f64) {
        let config = match self.config {
            Some(c) => c,
            None => return
        };

        let max_vel_edges_s = self.params.free_speed_rpm / 60.0 
            * self.params.encoder_edges_per_rev;

        if self.shaft_output == 0.0 {
            self.shaft_vel_edges_s = match config.neutral_mode {
                NeutralMode::Brake => 0.0,
                NeutralMode::Coast => maths::decay_to_zero(
                    self.shaft_vel_edges_s,
                    self.params.coast_decel_per_s * max_vel_edges_s * dt_s
                )
            };
        }
        else {
            // With compensation the output is a fraction of the saturation
            // voltage, otherwise of the bus voltage
            let applied = match config.voltage_comp_enabled {
                true => self.shaft_output 
                    * (config.voltage_comp_saturation_v / self.params.bus_voltage_v).min(1.0),
                false => self.shaft_output
            };

            self.shaft_vel_edges_s = maths::lin_map(
                (-1.0, 1.0), 
                (-max_vel_edges_s, max_vel_edges_s), 
                applied
            );
        }

        self.shaft_pos_edges += self.shaft_vel_edges_s * dt_s;

        trace!(
            "{} sim: output {:.3}, pos {:.0} edges, vel {:.0} edges/s", 
            self.name, self.shaft_output, self.shaft_pos_edges, self.shaft_vel_edges_s
        );
    }

    fn config(&self) -> Result<ActuatorConfig, EqptError> {
        self.config.ok_or_else(|| EqptError::NotConfigured(self.name.clone()))
    }

    /// Sign converting the shaft frame to the sensor frame.
    fn sensor_sign(config: &ActuatorConfig) -> f64 {
        let mut sign = 1.0;
        if config.inverted {
            sign = -sign;
        }
        if config.sensor_phase {
            sign = -sign;
        }
        sign
    }
}

impl Actuator for SimActuator {
    fn configure(&mut self, config: &ActuatorConfig) -> Result<(), EqptError> {
        config.validate()?;
        self.config = Some(*config);
        self.shaft_output = 0.0;
        Ok(())
    }

    fn set_output(&mut self, percent: f64) -> Result<(), EqptError> {
        let config = self.config()?;

        let limited = config.limit_output(percent);
        self.shaft_output = match config.inverted {
            true => -limited,
            false => limited
        };

        Ok(())
    }

    fn position(&mut self) -> Result<i32, EqptError> {
        let config = self.config()?;
        Ok((Self::sensor_sign(&config) * self.shaft_pos_edges).round() as i32)
    }

    fn velocity(&mut self) -> Result<i32, EqptError> {
        let config = self.config()?;
        let edges_per_window = self.shaft_vel_edges_s * VELOCITY_WINDOW_S;
        Ok((Self::sensor_sign(&config) * edges_per_window).round() as i32)
    }

    fn reset_position(&mut self) -> Result<(), EqptError> {
        self.config()?;
        self.shaft_pos_edges = 0.0;
        Ok(())
    }
}

impl FixedInput {
    /// Create an input with every axis centred and every button released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value of an axis.
    pub fn with_axis(mut self, id: u32, value: f64) -> Self {
        self.set_axis(id, value);
        self
    }

    /// Set the state of a button.
    pub fn with_button(mut self, id: u32, pressed: bool) -> Self {
        self.set_button(id, pressed);
        self
    }

    pub fn set_axis(&mut self, id: u32, value: f64) {
        self.axes.insert(id, value);
    }

    pub fn set_button(&mut self, id: u32, pressed: bool) {
        self.buttons.insert(id, pressed);
    }
}

impl InputSource for FixedInput {
    fn axis(&mut self, id: u32) -> Result<f64, EqptError> {
        Ok(self.axes.get(&id).copied().unwrap_or(0.0))
    }

    fn button(&mut self, id: u32) -> Result<bool, EqptError> {
        Ok(self.buttons.get(&id).copied().unwrap_or(false))
    }
}
