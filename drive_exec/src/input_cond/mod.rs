//! Input conditioning module
//!
//! Converts raw joystick axis readings into calibrated percent-output drive
//! commands by removing the stick bias, applying the axis sense and scaling
//! by the global speed limit:
//!
//! ```text
//! command = invert * scale * (raw - bias)
//! ```
//!
//! The module also decides when the driver is requesting that the wheel
//! encoder positions be zeroed.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The number of conditioned input axes (left then right).
pub const NUM_AXES: usize = 2;

/// Index of the left drive axis in per-axis arrays.
pub const LEFT: usize = 0;

/// Index of the right drive axis in per-axis arrays.
pub const RIGHT: usize = 1;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during InputCond operation.
#[derive(Debug, thiserror::Error)]
pub enum InputCondError {
    #[error("Could not load the InputCond parameters: {0}")]
    ParamLoadError(#[from] util::params::LoadError),

    #[error("Invalid bias for axis {axis}: {bias} (must be finite)")]
    InvalidBias { axis: usize, bias: f64 },

    #[error("Invalid scale: {0} (must be greater than 0 and at most 1)")]
    InvalidScale(f64),
}
