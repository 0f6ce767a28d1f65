//! Equipment interfaces
//!
//! The drive software talks to the outside world through three kinds of
//! equipment: an [`InputSource`] (the driver's joystick), one [`Actuator`]
//! per drive side (motor controller with an attached encoder) and a
//! [`DashboardSink`] for telemetry.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod config;
mod dashboard;
#[cfg(feature = "gamepad")]
mod gamepad;
mod sim;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use config::*;
pub use dashboard::*;
#[cfg(feature = "gamepad")]
pub use gamepad::*;
pub use sim::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised by equipment.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EqptError {
    #[error("{0} is disconnected")]
    Disconnected(String),

    #[error("{0} has not been configured")]
    NotConfigured(String),

    #[error("Invalid actuator configuration: {0}")]
    InvalidConfig(String),

    #[error("{device} does not have an axis with id {id}")]
    NoSuchAxis { device: String, id: u32 },

    #[error("{device} does not have a button with id {id}")]
    NoSuchButton { device: String, id: u32 },
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A source of driver input.
pub trait InputSource {
    /// Update the cached device state. Called once at the start of each cycle
    /// before any axis or button is read.
    fn refresh(&mut self) {}

    /// Read an axis, nominally in [-1, 1].
    fn axis(&mut self, id: u32) -> Result<f64, EqptError>;

    /// Read a button, `true` while held.
    fn button(&mut self, id: u32) -> Result<bool, EqptError>;
}

/// A motor controller with an attached relative encoder.
pub trait Actuator {
    /// Apply the controller configuration. Must be called before any other
    /// method.
    fn configure(&mut self, config: &ActuatorConfig) -> Result<(), EqptError>;

    /// Command a percent output in [-1, 1].
    fn set_output(&mut self, percent: f64) -> Result<(), EqptError>;

    /// Encoder edges counted since the last reset.
    fn position(&mut self) -> Result<i32, EqptError>;

    /// Encoder edges counted over the last 100 ms.
    fn velocity(&mut self) -> Result<i32, EqptError>;

    /// Zero the encoder position counter.
    fn reset_position(&mut self) -> Result<(), EqptError>;
}

/// A telemetry sink. Publishing never fails from the caller's point of view.
pub trait DashboardSink {
    /// Publish a named value.
    fn publish(&mut self, key: &str, value: f64);
}

impl<T: InputSource + ?Sized> InputSource for Box<T> {
    fn refresh(&mut self) {
        (**self).refresh()
    }

    fn axis(&mut self, id: u32) -> Result<f64, EqptError> {
        (**self).axis(id)
    }

    fn button(&mut self, id: u32) -> Result<bool, EqptError> {
        (**self).button(id)
    }
}
