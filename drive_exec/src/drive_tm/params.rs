//! Parameters structure for DriveTm

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use super::DriveTmError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for drivetrain telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Params {
    /// Geometry of the left wheel
    pub left: WheelGeometry,

    /// Geometry of the right wheel
    pub right: WheelGeometry,
}

/// Geometry of a single drive wheel and its encoder.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WheelGeometry {
    /// Wheel diameter. Distance and velocity telemetry are reported in the
    /// same length unit.
    ///
    /// Units: feet in the shipped parameters
    pub diameter: f64,

    /// Encoder shaft revolutions per wheel revolution.
    pub gear_ratio: f64,

    /// Encoder edges counted per encoder shaft revolution.
    pub encoder_edges_per_rev: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Check both wheel geometries.
    pub fn validate(&self) -> Result<(), DriveTmError> {
        self.left.validate("left")?;
        self.right.validate("right")
    }
}

impl WheelGeometry {
    /// Check that every quantity is finite and strictly positive, so that no
    /// conversion can divide by zero.
    pub fn validate(&self, side: &'static str) -> Result<(), DriveTmError> {
        let fields = [
            ("diameter", self.diameter),
            ("gear_ratio", self.gear_ratio),
            ("encoder_edges_per_rev", self.encoder_edges_per_rev),
        ];

        for &(field, value) in fields.iter() {
            if !(value.is_finite() && value > 0.0) {
                return Err(DriveTmError::InvalidGeometry { side, field, value });
            }
        }

        Ok(())
    }

    /// Encoder edges counted per wheel revolution.
    pub fn edges_per_wheel_rev(&self) -> f64 {
        self.gear_ratio * self.encoder_edges_per_rev
    }

    /// Distance travelled per wheel revolution.
    pub fn circumference(&self) -> f64 {
        std::f64::consts::PI * self.diameter
    }
}
