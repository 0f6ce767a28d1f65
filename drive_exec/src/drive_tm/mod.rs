//! Drivetrain telemetry module
//!
//! Converts the raw encoder position and velocity of each drive wheel into
//! distance travelled, linear velocity and wheel RPM.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calc;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use calc::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Length of the window over which the actuators measure encoder velocity.
///
/// Units: seconds
pub const VELOCITY_WINDOW_S: f64 = 0.1;

/// Number of velocity windows in one minute.
pub const VELOCITY_WINDOWS_PER_MIN: f64 = 60.0 / VELOCITY_WINDOW_S;

/// Seconds per minute, used to convert per-minute rates to per-second.
pub const SECONDS_PER_MIN: f64 = 60.0;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during DriveTm operation.
#[derive(Debug, thiserror::Error)]
pub enum DriveTmError {
    #[error("Could not load the DriveTm parameters: {0}")]
    ParamLoadError(#[from] util::params::LoadError),

    #[error("DriveTm has not been initialised with any wheel geometry")]
    NotInitialised,

    #[error("Invalid {side} wheel geometry: {field} = {value} (must be finite and greater than 0)")]
    InvalidGeometry {
        side: &'static str,
        field: &'static str,
        value: f64,
    },
}
