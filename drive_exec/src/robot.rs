//! # Robot
//!
//! Runs one control cycle (tick) of the drivetrain:
//!
//! - Read the drive axes and reset button
//! - Input conditioning
//! - Command the actuators (teleoperated only)
//! - Zero the encoders if requested
//! - Read the encoders
//! - Drivetrain telemetry
//! - Publish commands and telemetry to the dashboard
//!
//! Faults in the equipment never stop a tick. A failed read is replaced by a
//! centred axis, a released button or a zero telemetry reading. A failed
//! write is skipped.
//!
//! Autonomous and test ticks do nothing except follow the reset button, so
//! an edge triggered reset needs a fresh press once teleop starts.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::{info, trace, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

// Internal
use crate::{
    drive_tm::{self, DriveTm, DriveTmError, EncoderReading},
    eqpt::{Actuator, DashboardSink, EqptError, InputSource},
    input_cond::{self, DriveCmd, InputCond, InputCondError, LEFT, RIGHT},
    params::DriveExecParams,
};
use util::{module::State, session};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Dashboard key for the left drive command.
pub const KEY_LEFT_CMD: &str = "left stick:";
/// Dashboard key for the right drive command.
pub const KEY_RIGHT_CMD: &str = "right stick:";
/// Dashboard key for the left wheel distance.
pub const KEY_LEFT_DISTANCE: &str = "left distance (ft):";
/// Dashboard key for the left wheel velocity.
pub const KEY_LEFT_VELOCITY: &str = "left velocity (ft/sec):";
/// Dashboard key for the left wheel RPM.
pub const KEY_LEFT_RPM: &str = "left RPM:";
/// Dashboard key for the right wheel distance.
pub const KEY_RIGHT_DISTANCE: &str = "right distance (ft):";
/// Dashboard key for the right wheel velocity.
pub const KEY_RIGHT_VELOCITY: &str = "right velocity (ft/sec):";
/// Dashboard key for the right wheel RPM.
pub const KEY_RIGHT_RPM: &str = "right RPM:";

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Operating mode selected by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotMode {
    /// Outputs disabled, inputs and telemetry still processed.
    Disabled,
    /// No autonomous behaviour exists, nothing is done.
    Autonomous,
    /// Driver control.
    Teleop,
    /// No test behaviour exists, nothing is done.
    Test,
}

/// Errors which can occur in the robot.
#[derive(Debug, thiserror::Error)]
pub enum RobotError {
    #[error("Could not {action} the {side} actuator: {source}")]
    ActuatorError {
        action: &'static str,
        side: &'static str,
        source: EqptError,
    },

    #[error("InputCond error: {0}")]
    InputCondError(#[from] InputCondError),

    #[error("DriveTm error: {0}")]
    DriveTmError(#[from] DriveTmError),
}

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// The robot's drivetrain and its equipment.
pub struct Robot<I, A, D> {
    params: DriveExecParams,

    input_cond: InputCond,
    drive_tm: DriveTm,

    input: I,
    left: A,
    right: A,
    dashboard: D,

    /// Mode of the last tick, `None` before the first tick.
    mode: Option<RobotMode>,

    /// Equipment reads and writes which failed on the last attempt.
    faults: HashSet<&'static str>,
}

/// Everything that happened during one tick, flattened so it can be archived
/// as a CSV row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickReport {
    pub time_s: f64,
    pub mode: RobotMode,

    pub raw_left: f64,
    pub raw_right: f64,
    pub reset_pressed: bool,

    pub left_cmd: f64,
    pub right_cmd: f64,
    pub left_cmd_limited: bool,
    pub right_cmd_limited: bool,
    pub reset_requested: bool,

    pub left_distance: f64,
    pub left_velocity: f64,
    pub left_rpm: f64,
    pub right_distance: f64,
    pub right_velocity: f64,
    pub right_rpm: f64,
    pub left_encoder_missing: bool,
    pub right_encoder_missing: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl fmt::Display for RobotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RobotMode::Disabled => "disabled",
            RobotMode::Autonomous => "autonomous",
            RobotMode::Teleop => "teleop",
            RobotMode::Test => "test",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for RobotMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "disabled" => Ok(RobotMode::Disabled),
            "autonomous" | "auto" => Ok(RobotMode::Autonomous),
            "teleop" | "teleoperated" => Ok(RobotMode::Teleop),
            "test" => Ok(RobotMode::Test),
            _ => Err(format!(
                "Unknown mode \"{}\", expected one of disabled, autonomous, teleop or test", s
            ))
        }
    }
}

impl<I, A, D> Robot<I, A, D>
where
    I: InputSource,
    A: Actuator,
    D: DashboardSink,
{
    /// Assemble a robot from its initialised modules and equipment.
    pub fn new(
        params: DriveExecParams,
        input_cond: InputCond,
        drive_tm: DriveTm,
        input: I,
        left: A,
        right: A,
        dashboard: D,
    ) -> Self {
        Self {
            params,
            input_cond,
            drive_tm,
            input,
            left,
            right,
            dashboard,
            mode: None,
            faults: HashSet::new(),
        }
    }

    /// Robot initialisation, run once before the first tick.
    ///
    /// Configures both actuators and zeroes their encoders.
    pub fn init(&mut self) -> Result<(), RobotError> {
        self.left.configure(&self.params.left_actuator)
            .map_err(actuator_err("configure", "left"))?;
        self.right.configure(&self.params.right_actuator)
            .map_err(actuator_err("configure", "right"))?;

        self.left.reset_position().map_err(actuator_err("reset", "left"))?;
        self.right.reset_position().map_err(actuator_err("reset", "right"))?;

        info!("Actuators configured and encoders zeroed");

        Ok(())
    }

    /// Run one cycle in the given mode.
    ///
    /// Returns `None` for modes which do nothing.
    pub fn tick(&mut self, mode: RobotMode) -> Result<Option<TickReport>, RobotError> {
        if self.mode != Some(mode) {
            info!("Entering {} mode", mode);
            self.mode = Some(mode);
        }

        // ---- INPUT ----

        self.input.refresh();

        match mode {
            RobotMode::Autonomous | RobotMode::Test => {
                let reset_pressed = self.read_reset_button();
                self.input_cond.follow_reset_button(reset_pressed);
                return Ok(None);
            },
            RobotMode::Disabled | RobotMode::Teleop => ()
        }

        let raw_left = track_fault(
            &mut self.faults, "left axis", self.input.axis(self.params.left_axis_id)
        ).unwrap_or(0.0);
        let raw_right = track_fault(
            &mut self.faults, "right axis", self.input.axis(self.params.right_axis_id)
        ).unwrap_or(0.0);
        let reset_pressed = self.read_reset_button();

        // ---- INPUT CONDITIONING ----

        let mut ic_input = input_cond::InputData::default();
        ic_input.raw[LEFT] = raw_left;
        ic_input.raw[RIGHT] = raw_right;
        ic_input.reset_pressed = reset_pressed;

        let (cmd, ic_report) = self.input_cond.proc(&ic_input)?;

        // ---- ACTUATION ----

        if mode == RobotMode::Teleop {
            self.command(&cmd);
        }

        if ic_report.reset_requested {
            trace!("Zeroing encoders");
            track_fault(&mut self.faults, "left reset", self.left.reset_position());
            track_fault(&mut self.faults, "right reset", self.right.reset_position());
        }

        // ---- TELEMETRY ----

        let tm_input = drive_tm::InputData {
            left: read_encoder(&mut self.faults, "left encoder", &mut self.left),
            right: read_encoder(&mut self.faults, "right encoder", &mut self.right),
        };

        let (tm, tm_report) = self.drive_tm.proc(&tm_input)?;

        self.dashboard.publish(KEY_LEFT_CMD, cmd.left);
        self.dashboard.publish(KEY_RIGHT_CMD, cmd.right);
        self.dashboard.publish(KEY_LEFT_DISTANCE, tm.left.distance);
        self.dashboard.publish(KEY_LEFT_VELOCITY, tm.left.velocity);
        self.dashboard.publish(KEY_LEFT_RPM, tm.left.rpm);
        self.dashboard.publish(KEY_RIGHT_DISTANCE, tm.right.distance);
        self.dashboard.publish(KEY_RIGHT_VELOCITY, tm.right.velocity);
        self.dashboard.publish(KEY_RIGHT_RPM, tm.right.rpm);

        Ok(Some(TickReport {
            time_s: session::get_elapsed_seconds(),
            mode,
            raw_left,
            raw_right,
            reset_pressed,
            left_cmd: cmd.left,
            right_cmd: cmd.right,
            left_cmd_limited: ic_report.cmd_limited[LEFT],
            right_cmd_limited: ic_report.cmd_limited[RIGHT],
            reset_requested: ic_report.reset_requested,
            left_distance: tm.left.distance,
            left_velocity: tm.left.velocity,
            left_rpm: tm.left.rpm,
            right_distance: tm.right.distance,
            right_velocity: tm.right.velocity,
            right_rpm: tm.right.rpm,
            left_encoder_missing: tm_report.left_missing,
            right_encoder_missing: tm_report.right_missing,
        }))
    }

    /// The executable parameters in use.
    pub fn params(&self) -> &DriveExecParams {
        &self.params
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Both actuators, left then right.
    pub fn actuators_mut(&mut self) -> (&mut A, &mut A) {
        (&mut self.left, &mut self.right)
    }

    pub fn dashboard(&self) -> &D {
        &self.dashboard
    }

    fn command(&mut self, cmd: &DriveCmd) {
        track_fault(&mut self.faults, "left output", self.left.set_output(cmd.left));
        track_fault(&mut self.faults, "right output", self.right.set_output(cmd.right));
    }

    fn read_reset_button(&mut self) -> bool {
        track_fault(
            &mut self.faults, "reset button", self.input.button(self.params.reset_button_id)
        ).unwrap_or(false)
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Convert an equipment result into an option, keeping track of which
/// devices are failing.
///
/// `None` means the caller substitutes a neutral value or skips the write.
///
/// Warns once when a device starts failing and once when it recovers.
fn track_fault<T>(
    faults: &mut HashSet<&'static str>,
    device: &'static str,
    result: Result<T, EqptError>,
) -> Option<T> {
    match result {
        Ok(v) => {
            if faults.remove(device) {
                info!("The {} has recovered", device);
            }
            Some(v)
        },
        Err(e) => {
            if faults.insert(device) {
                warn!("The {} has failed: {}", device, e);
            }
            None
        }
    }
}

/// Read an actuator's encoder, `None` if either reading failed.
fn read_encoder<A: Actuator>(
    faults: &mut HashSet<&'static str>,
    device: &'static str,
    actuator: &mut A
) -> Option<EncoderReading> {
    let reading = actuator.position().and_then(|pos_raw| {
        actuator.velocity().map(|vel_raw| EncoderReading { pos_raw, vel_raw })
    });

    track_fault(faults, device, reading)
}

fn actuator_err(
    action: &'static str, 
    side: &'static str
) -> impl FnOnce(EqptError) -> RobotError {
    move |source| RobotError::ActuatorError { action, side, source }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        drive_tm::{self, WheelGeometry},
        eqpt::{ActuatorConfig, FixedInput, LogDashboard},
        input_cond::{ResetTrigger, Sense},
    };
    use std::f64::consts::PI;

    /// An actuator with directly settable encoder readings that records the
    /// calls made to it.
    #[derive(Debug, Default)]
    struct MockActuator {
        config: Option<ActuatorConfig>,
        outputs: Vec<f64>,
        num_resets: u32,
        pos_raw: i32,
        vel_raw: i32,
        faulty: bool,
        faulty_write: bool,
    }

    impl Actuator for MockActuator {
        fn configure(&mut self, config: &ActuatorConfig) -> Result<(), EqptError> {
            self.config = Some(*config);
            Ok(())
        }

        fn set_output(&mut self, percent: f64) -> Result<(), EqptError> {
            if self.faulty_write {
                return Err(EqptError::Disconnected("mock".into()));
            }
            self.outputs.push(percent);
            Ok(())
        }

        fn position(&mut self) -> Result<i32, EqptError> {
            match self.faulty {
                true => Err(EqptError::Disconnected("mock".into())),
                false => Ok(self.pos_raw)
            }
        }

        fn velocity(&mut self) -> Result<i32, EqptError> {
            match self.faulty {
                true => Err(EqptError::Disconnected("mock".into())),
                false => Ok(self.vel_raw)
            }
        }

        fn reset_position(&mut self) -> Result<(), EqptError> {
            if self.faulty_write {
                return Err(EqptError::Disconnected("mock".into()));
            }
            self.num_resets += 1;
            self.pos_raw = 0;
            Ok(())
        }
    }

    /// An input source which is always disconnected.
    struct DeadInput;

    impl InputSource for DeadInput {
        fn axis(&mut self, _id: u32) -> Result<f64, EqptError> {
            Err(EqptError::Disconnected("dead".into()))
        }

        fn button(&mut self, _id: u32) -> Result<bool, EqptError> {
            Err(EqptError::Disconnected("dead".into()))
        }
    }

    fn input_cond() -> InputCond {
        InputCond::new(input_cond::Params {
            bias: [-0.007813, -0.007813],
            invert: [Sense::Inverted, Sense::Inverted],
            scale: 0.3,
            reset_trigger: ResetTrigger::Level,
        }).unwrap()
    }

    fn drive_tm() -> DriveTm {
        let geom = |gear_ratio| WheelGeometry {
            diameter: 0.3229,
            gear_ratio,
            encoder_edges_per_rev: 4096.0,
        };

        DriveTm::new(drive_tm::Params {
            left: geom(3.0),
            right: geom(5.0),
        }).unwrap()
    }

    fn robot<I: InputSource>(input: I) -> Robot<I, MockActuator, LogDashboard> {
        robot_with(input, input_cond())
    }

    fn robot_with<I: InputSource>(
        input: I,
        input_cond: InputCond
    ) -> Robot<I, MockActuator, LogDashboard> {
        let mut robot = Robot::new(
            DriveExecParams::default(),
            input_cond,
            drive_tm(),
            input,
            MockActuator::default(),
            MockActuator::default(),
            LogDashboard::new(),
        );
        robot.init().unwrap();
        robot
    }

    #[test]
    fn test_init_configures_and_zeroes() {
        let mut robot = robot(FixedInput::new());
        let (left, right) = robot.actuators_mut();

        assert!(left.config.is_some());
        assert!(right.config.is_some());
        assert_eq!(left.num_resets, 1);
        assert_eq!(right.num_resets, 1);
    }

    #[test]
    fn test_teleop_tick() {
        let input = FixedInput::new()
            .with_axis(1, 0.0)
            .with_axis(2, -1.0);
        let mut robot = robot(input);

        {
            let (left, right) = robot.actuators_mut();
            left.pos_raw = 4096 * 3;
            left.vel_raw = 4096 * 3;
            right.pos_raw = 4096 * 5;
            right.vel_raw = 0;
        }

        let report = robot.tick(RobotMode::Teleop).unwrap().unwrap();

        assert!((report.left_cmd - -0.0023439).abs() < 1e-9);
        assert!((report.right_cmd - 0.3 * 0.992187).abs() < 1e-9);
        assert!(!report.reset_requested);

        {
            let (left, right) = robot.actuators_mut();
            assert_eq!(left.outputs, vec![report.left_cmd]);
            assert_eq!(right.outputs, vec![report.right_cmd]);
        }

        let dash = robot.dashboard();
        assert_eq!(dash.values().len(), 8);
        assert_eq!(dash.num_published(), 8);
        assert_eq!(dash.get(KEY_LEFT_CMD), Some(report.left_cmd));
        assert!((dash.get(KEY_LEFT_DISTANCE).unwrap() - PI * 0.3229).abs() < 1e-9);
        assert!((dash.get(KEY_LEFT_RPM).unwrap() - 600.0).abs() < 1e-9);
        assert!((dash.get(KEY_LEFT_VELOCITY).unwrap() - PI * 0.3229 * 10.0).abs() < 1e-9);
        assert!((dash.get(KEY_RIGHT_DISTANCE).unwrap() - PI * 0.3229).abs() < 1e-9);
        assert_eq!(dash.get(KEY_RIGHT_RPM), Some(0.0));
        assert_eq!(dash.get(KEY_RIGHT_VELOCITY), Some(0.0));
    }

    #[test]
    fn test_disabled_tick_does_not_command() {
        let mut robot = robot(FixedInput::new().with_axis(1, 0.5));

        let report = robot.tick(RobotMode::Disabled).unwrap().unwrap();
        assert_eq!(report.mode, RobotMode::Disabled);
        assert!(report.left_cmd != 0.0);

        let (left, right) = robot.actuators_mut();
        assert!(left.outputs.is_empty());
        assert!(right.outputs.is_empty());
        assert_eq!(robot.dashboard().num_published(), 8);
    }

    #[test]
    fn test_auto_and_test_are_noops() {
        let mut robot = robot(FixedInput::new().with_axis(1, 0.5).with_button(6, true));

        assert_eq!(robot.tick(RobotMode::Autonomous).unwrap(), None);
        assert_eq!(robot.tick(RobotMode::Test).unwrap(), None);

        let (left, _) = robot.actuators_mut();
        assert!(left.outputs.is_empty());
        assert_eq!(left.num_resets, 1);
        assert_eq!(robot.dashboard().num_published(), 0);
    }

    #[test]
    fn test_reset_while_held() {
        let mut robot = robot(FixedInput::new().with_button(6, true));
        robot.actuators_mut().0.pos_raw = 1234;

        for _ in 0..3 {
            let report = robot.tick(RobotMode::Teleop).unwrap().unwrap();
            assert!(report.reset_requested);
            assert_eq!(report.left_distance, 0.0);
        }

        robot.input_mut().set_button(6, false);
        robot.actuators_mut().0.pos_raw = 1234;
        let report = robot.tick(RobotMode::Disabled).unwrap().unwrap();
        assert!(!report.reset_requested);
        assert!(report.left_distance > 0.0);

        let (left, right) = robot.actuators_mut();
        assert_eq!(left.num_resets, 4);
        assert_eq!(right.num_resets, 4);
    }

    #[test]
    fn test_dead_input_gives_neutral_inputs() {
        let mut robot = robot(DeadInput);

        let report = robot.tick(RobotMode::Teleop).unwrap().unwrap();
        assert_eq!(report.raw_left, 0.0);
        assert_eq!(report.raw_right, 0.0);
        assert!(!report.reset_pressed);
        assert_eq!(robot.dashboard().num_published(), 8);
    }

    #[test]
    fn test_faulty_encoder_gives_zero_tm() {
        let mut robot = robot(FixedInput::new());
        {
            let (left, right) = robot.actuators_mut();
            left.faulty = true;
            left.pos_raw = 5000;
            right.pos_raw = 5000;
        }

        let report = robot.tick(RobotMode::Teleop).unwrap().unwrap();
        assert!(report.left_encoder_missing);
        assert_eq!(report.left_distance, 0.0);
        assert!(!report.right_encoder_missing);
        assert!(report.right_distance > 0.0);

        robot.actuators_mut().0.faulty = false;
        let report = robot.tick(RobotMode::Teleop).unwrap().unwrap();
        assert!(!report.left_encoder_missing);
        assert!(report.left_distance > 0.0);
    }

    #[test]
    fn test_faulty_write_still_publishes() {
        let input = FixedInput::new()
            .with_axis(1, 0.5)
            .with_button(6, true);
        let mut robot = robot(input);
        {
            let (left, right) = robot.actuators_mut();
            left.faulty_write = true;
            right.pos_raw = 4096 * 5;
        }

        for _ in 0..3 {
            let report = robot.tick(RobotMode::Teleop).unwrap();
            assert!(report.is_some());
            assert_eq!(robot.dashboard().values().len(), 8);
        }
        assert_eq!(robot.dashboard().num_published(), 24);

        assert!(robot.faults.contains("left output"));
        assert!(robot.faults.contains("left reset"));
        assert!(!robot.faults.contains("right output"));

        {
            let (left, right) = robot.actuators_mut();
            assert!(left.outputs.is_empty());
            assert_eq!(left.num_resets, 1);
            assert_eq!(right.outputs.len(), 3);
            assert_eq!(right.num_resets, 4);
        }

        // Recovery clears the fault
        robot.actuators_mut().0.faulty_write = false;
        robot.tick(RobotMode::Teleop).unwrap().unwrap();
        assert!(robot.faults.is_empty());
        assert_eq!(robot.actuators_mut().0.outputs.len(), 1);
    }

    #[test]
    fn test_edge_reset_needs_press_after_auto() {
        let mut params = *input_cond().params();
        params.reset_trigger = ResetTrigger::Edge;
        let ic = InputCond::new(params).unwrap();

        let mut robot = robot_with(FixedInput::new().with_button(6, true), ic);

        // Held through autonomous, no new press once teleop starts
        assert_eq!(robot.tick(RobotMode::Autonomous).unwrap(), None);
        let report = robot.tick(RobotMode::Teleop).unwrap().unwrap();
        assert!(report.reset_pressed);
        assert!(!report.reset_requested);
        assert_eq!(robot.actuators_mut().0.num_resets, 1);

        // Release and press again
        robot.input_mut().set_button(6, false);
        robot.tick(RobotMode::Teleop).unwrap().unwrap();
        robot.input_mut().set_button(6, true);
        let report = robot.tick(RobotMode::Teleop).unwrap().unwrap();
        assert!(report.reset_requested);
        assert_eq!(robot.actuators_mut().0.num_resets, 2);
    }

    #[test]
    fn test_uninitialised_drive_tm_fails_tick() {
        let mut robot = Robot::new(
            DriveExecParams::default(),
            input_cond(),
            DriveTm::default(),
            FixedInput::new(),
            MockActuator::default(),
            MockActuator::default(),
            LogDashboard::new(),
        );
        robot.init().unwrap();

        let result = robot.tick(RobotMode::Teleop);
        assert!(matches!(
            result,
            Err(RobotError::DriveTmError(DriveTmError::NotInitialised))
        ));
        assert!(robot.dashboard().get(KEY_LEFT_DISTANCE).is_none());
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("teleop".parse::<RobotMode>(), Ok(RobotMode::Teleop));
        assert_eq!("Disabled".parse::<RobotMode>(), Ok(RobotMode::Disabled));
        assert_eq!("auto".parse::<RobotMode>(), Ok(RobotMode::Autonomous));
        assert!("drive".parse::<RobotMode>().is_err());
        assert_eq!(RobotMode::Test.to_string(), "test");
    }
}
