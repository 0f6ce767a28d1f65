//! # Drive library.
//!
//! Conditions driver input into drive commands and converts wheel encoder
//! readings into physical telemetry for a two-wheel drivetrain. The
//! `drive_exec` binary runs these modules on a fixed-period scheduler.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Drivetrain telemetry - converts encoder readings into distance, velocity and RPM
pub mod drive_tm;

/// Equipment - joystick, motor controller and dashboard interfaces and implementations
pub mod eqpt;

/// Input conditioning - converts raw joystick axes into calibrated drive commands
pub mod input_cond;

/// Executable parameters
pub mod params;

/// Robot - runs one control cycle in the current mode
pub mod robot;
