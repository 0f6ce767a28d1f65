//! Implementations for the InputCond state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use serde::Serialize;

// Internal
use super::{InputCondError, Params, ResetTrigger, Sense, LEFT, NUM_AXES, RIGHT};
use util::{maths, module::State, params};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Lowest command the actuators accept.
pub const MIN_CMD: f64 = -1.0;

/// Highest command the actuators accept.
pub const MAX_CMD: f64 = 1.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Input conditioning module state
#[derive(Debug, Default)]
pub struct InputCond {
    pub(crate) params: Params,

    /// Level of the reset button on the previous cycle, used for edge
    /// triggering.
    prev_reset_pressed: bool,
}

/// Input data to InputCond.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputData {
    /// Raw axis readings (left, right).
    ///
    /// Units: axis units, nominally [-1, 1]
    pub raw: [f64; NUM_AXES],

    /// True if the encoder reset button is currently held.
    pub reset_pressed: bool,
}

/// Calibrated drive commands.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct DriveCmd {
    /// Left side percent output, [-1, 1]
    pub left: f64,

    /// Right side percent output, [-1, 1]
    pub right: f64,
}

/// Status report for InputCond processing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct StatusReport {
    /// Set for each axis whose command had to be limited to [-1, 1].
    pub cmd_limited: [bool; NUM_AXES],

    /// True if the encoder positions should be zeroed this cycle.
    pub reset_requested: bool,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Condition a single raw axis reading.
///
/// No limiting is applied, any raw value is accepted.
pub fn condition_axis(raw: f64, bias: f64, sense: Sense, scale: f64) -> f64 {
    sense.sign() * scale * (raw - bias)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for InputCond {
    type InitData = &'static str;
    type InitError = InputCondError;

    type InputData = InputData;
    type OutputData = DriveCmd;
    type StatusReport = StatusReport;
    type ProcError = InputCondError;

    const NAME: &'static str = "InputCond";

    /// Initialise the InputCond module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData) -> Result<(), Self::InitError> {
        let params: Params = params::load(init_data)?;
        params.validate()?;

        debug!("InputCond params: {:?}", params);

        self.params = params;
        self.prev_reset_pressed = false;

        Ok(())
    }

    /// Perform cyclic processing of input conditioning.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> 
    {
        let mut report = StatusReport::default();
        let mut cmd = [0f64; NUM_AXES];

        for i in 0..NUM_AXES {
            let unlimited = condition_axis(
                input_data.raw[i], 
                self.params.bias[i], 
                self.params.invert[i], 
                self.params.scale
            );

            let (limited, was_limited) = maths::clamp(unlimited, MIN_CMD, MAX_CMD);
            cmd[i] = limited;
            report.cmd_limited[i] = was_limited;
        }

        report.reset_requested = match self.params.reset_trigger {
            ResetTrigger::Level => input_data.reset_pressed,
            ResetTrigger::Edge => input_data.reset_pressed && !self.prev_reset_pressed,
        };
        self.prev_reset_pressed = input_data.reset_pressed;

        let output = DriveCmd {
            left: cmd[LEFT],
            right: cmd[RIGHT],
        };

        trace!("InputCond output: {:?}, report: {:?}", output, report);

        Ok((output, report))
    }
}

impl InputCond {
    /// Create a new instance from already loaded parameters.
    pub fn new(params: Params) -> Result<Self, InputCondError> {
        params.validate()?;

        Ok(Self {
            params,
            prev_reset_pressed: false,
        })
    }

    /// Record the reset button state without conditioning any input, for
    /// cycles where nothing is commanded.
    pub fn follow_reset_button(&mut self, pressed: bool) {
        self.prev_reset_pressed = pressed;
    }

    /// The calibration in use.
    pub fn params(&self) -> &Params {
        &self.params
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn shipped_params() -> Params {
        Params {
            bias: [-0.007813, -0.007813],
            invert: [Sense::Inverted, Sense::Inverted],
            scale: 0.3,
            reset_trigger: ResetTrigger::Level,
        }
    }

    fn input(left: f64, right: f64, reset_pressed: bool) -> InputData {
        InputData {
            raw: [left, right],
            reset_pressed,
        }
    }

    #[test]
    fn test_condition_axis_at_rest() {
        let cmd = condition_axis(0.0, -0.007813, Sense::Inverted, 0.3);
        assert!(approx_eq(cmd, -0.0023439));
    }

    #[test]
    fn test_condition_axis_formula() {
        let biases = [-0.2, -0.007813, 0.0, 0.15];
        let senses = [Sense::Normal, Sense::Inverted];
        let scales = [0.1, 0.3, 1.0];

        let mut raw = -1.0;
        while raw <= 1.0 {
            for &bias in biases.iter() {
                for &sense in senses.iter() {
                    for &scale in scales.iter() {
                        let cmd = condition_axis(raw, bias, sense, scale);
                        assert!(approx_eq(cmd, sense.sign() * scale * (raw - bias)));
                        assert!(cmd.abs() <= scale * (1.0 + bias.abs()) + 1e-12);
                    }
                }
            }
            raw += 0.125;
        }
    }

    #[test]
    fn test_proc() {
        let mut ic = InputCond::new(shipped_params()).unwrap();

        let (cmd, report) = ic.proc(&input(0.0, 1.0, false)).unwrap();
        assert!(approx_eq(cmd.left, -0.0023439));
        assert!(approx_eq(cmd.right, -0.3 * 1.007813));
        assert_eq!(report, StatusReport::default());

        // Same inputs give the same outputs
        let (cmd_again, report_again) = ic.proc(&input(0.0, 1.0, false)).unwrap();
        assert_eq!(cmd, cmd_again);
        assert_eq!(report, report_again);
    }

    #[test]
    fn test_proc_limits() {
        let mut ic = InputCond::new(Params {
            bias: [0.5, -0.5],
            invert: [Sense::Normal, Sense::Normal],
            scale: 1.0,
            reset_trigger: ResetTrigger::Level,
        }).unwrap();

        let (cmd, report) = ic.proc(&input(-1.0, 1.0, false)).unwrap();
        assert_eq!(cmd, DriveCmd { left: -1.0, right: 1.0 });
        assert_eq!(report.cmd_limited, [true, true]);

        let (cmd, report) = ic.proc(&input(0.5, -0.5, false)).unwrap();
        assert_eq!(cmd, DriveCmd { left: 0.0, right: 0.0 });
        assert_eq!(report.cmd_limited, [false, false]);
    }

    #[test]
    fn test_level_reset() {
        let mut ic = InputCond::new(shipped_params()).unwrap();

        let held: Vec<bool> = [false, true, true, true, false, true]
            .iter()
            .map(|&p| ic.proc(&input(0.0, 0.0, p)).unwrap().1.reset_requested)
            .collect();

        assert_eq!(held, vec![false, true, true, true, false, true]);
    }

    #[test]
    fn test_edge_reset() {
        let mut params = shipped_params();
        params.reset_trigger = ResetTrigger::Edge;
        let mut ic = InputCond::new(params).unwrap();

        let held: Vec<bool> = [false, true, true, true, false, true]
            .iter()
            .map(|&p| ic.proc(&input(0.0, 0.0, p)).unwrap().1.reset_requested)
            .collect();

        assert_eq!(held, vec![false, true, false, false, false, true]);
    }

    #[test]
    fn test_follow_reset_button() {
        let mut params = shipped_params();
        params.reset_trigger = ResetTrigger::Edge;
        let mut ic = InputCond::new(params).unwrap();

        ic.follow_reset_button(true);
        assert!(!ic.proc(&input(0.0, 0.0, true)).unwrap().1.reset_requested);

        ic.follow_reset_button(false);
        assert!(ic.proc(&input(0.0, 0.0, true)).unwrap().1.reset_requested);
    }

    #[test]
    fn test_new_rejects_bad_scale() {
        let mut params = shipped_params();
        params.scale = 0.0;
        assert!(InputCond::new(params).is_err());
    }
}
