//! Encoder to physical unit conversions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use super::{WheelGeometry, SECONDS_PER_MIN, VELOCITY_WINDOWS_PER_MIN};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Physical telemetry for one wheel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct WheelTm {
    /// Distance travelled since the encoder was last reset.
    ///
    /// Units: wheel diameter units
    pub distance: f64,

    /// Linear velocity of the wheel rim.
    ///
    /// Units: wheel diameter units per second
    pub velocity: f64,

    /// Wheel revolutions per minute.
    pub rpm: f64,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert raw encoder readings into wheel telemetry.
///
/// `pos_raw` is the number of encoder edges since the last reset and
/// `vel_raw` the number of edges counted in the last velocity window (100 ms).
///
/// The geometry must have been validated, otherwise the result may be NaN or
/// infinite.
pub fn calc_wheel_tm(geom: &WheelGeometry, pos_raw: i32, vel_raw: i32) -> WheelTm {
    let edges_per_wheel_rev = geom.edges_per_wheel_rev();

    let distance = geom.circumference() * f64::from(pos_raw) / edges_per_wheel_rev;
    let rpm = f64::from(vel_raw) * (VELOCITY_WINDOWS_PER_MIN / edges_per_wheel_rev);
    let velocity = geom.circumference() * rpm / SECONDS_PER_MIN;

    WheelTm {
        distance,
        velocity,
        rpm,
    }
}
