//! Implementations for the DriveTm state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use serde::Serialize;

// Internal
use super::{calc_wheel_tm, DriveTmError, Params, WheelTm};
use util::{module::State, params};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drivetrain telemetry module state
///
/// A default instance holds no geometry and refuses to process until
/// [`State::init`] succeeds.
#[derive(Debug, Default)]
pub struct DriveTm {
    pub(crate) params: Option<Params>,
}

/// Raw readings from one wheel's encoder.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct EncoderReading {
    /// Edges since the last reset.
    pub pos_raw: i32,

    /// Edges counted in the last 100 ms window.
    pub vel_raw: i32,
}

/// Input data to DriveTm.
///
/// A side is `None` if its encoder could not be read this cycle.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputData {
    pub left: Option<EncoderReading>,
    pub right: Option<EncoderReading>,
}

/// Telemetry for both wheels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct OutputData {
    pub left: WheelTm,
    pub right: WheelTm,
}

/// Status report for DriveTm processing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct StatusReport {
    /// Left encoder reading was missing, left telemetry is zero.
    pub left_missing: bool,

    /// Right encoder reading was missing, right telemetry is zero.
    pub right_missing: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for DriveTm {
    type InitData = &'static str;
    type InitError = DriveTmError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = DriveTmError;

    const NAME: &'static str = "DriveTm";

    /// Initialise the DriveTm module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData) -> Result<(), Self::InitError> {
        let params: Params = params::load(init_data)?;
        params.validate()?;

        debug!("DriveTm params: {:?}", params);

        self.params = Some(params);

        Ok(())
    }

    /// Perform cyclic processing of drivetrain telemetry.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> 
    {
        let params = self.params.as_ref().ok_or(DriveTmError::NotInitialised)?;

        let report = StatusReport {
            left_missing: input_data.left.is_none(),
            right_missing: input_data.right.is_none(),
        };

        let left = input_data.left.unwrap_or_default();
        let right = input_data.right.unwrap_or_default();

        let output = OutputData {
            left: calc_wheel_tm(&params.left, left.pos_raw, left.vel_raw),
            right: calc_wheel_tm(&params.right, right.pos_raw, right.vel_raw),
        };

        trace!("DriveTm output: {:?}", output);

        Ok((output, report))
    }
}

impl DriveTm {
    /// Create a new instance from already loaded parameters.
    pub fn new(params: Params) -> Result<Self, DriveTmError> {
        params.validate()?;

        Ok(Self { params: Some(params) })
    }

    /// The wheel geometry in use, `None` before initialisation.
    pub fn params(&self) -> Option<&Params> {
        self.params.as_ref()
    }
}
