//! Drive control executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logging and parameters
//!     - Initialise modules (InputCond, DriveTm)
//!     - Initialise equipment and the robot
//!     - Main loop, once per cycle period:
//!         - Equipment simulation step
//!         - Robot tick in the selected mode
//!         - Tick report archiving
//!
//! The executable runs off-robot: the motors are simulated and the driver
//! input comes either from fixed command line values or, with the `gamepad`
//! feature, from a connected gamepad.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{Report, eyre::WrapErr};
use log::{debug, info, warn};
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use drive_lib::{
    drive_tm::DriveTm,
    eqpt::{FixedInput, InputSource, LogDashboard, SimActuator},
    input_cond::InputCond,
    params::DriveExecParams,
    robot::{Robot, RobotMode},
};
use util::{
    archive::Archiver,
    host,
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Two-wheel drive control executable.
#[derive(Debug, StructOpt)]
#[structopt(name = "drive_exec")]
struct Opt {
    /// Robot mode to run in (disabled, autonomous, teleop or test)
    #[structopt(short, long, default_value = "teleop")]
    mode: RobotMode,

    /// Stop after this many cycles, run forever if not given
    #[structopt(short, long)]
    cycles: Option<u64>,

    /// Simulated left drive axis value
    #[structopt(long, default_value = "0.0", allow_hyphen_values = true)]
    left_axis: f64,

    /// Simulated right drive axis value
    #[structopt(long, default_value = "0.0", allow_hyphen_values = true)]
    right_axis: f64,

    /// Hold the simulated encoder reset button
    #[structopt(long)]
    reset: bool,

    /// Read driver input from a connected gamepad instead of the simulated values
    #[cfg(feature = "gamepad")]
    #[structopt(long)]
    gamepad: bool,

    /// Minimum log level, must be info or more verbose
    #[structopt(long, default_value = "debug")]
    log_level: LevelFilter,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "drive_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(opt.log_level, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Drive Control Executable\n");
    info!("Running on: {}", host::get_host_desc());
    info!("Session directory: {:?}\n", session.session_root);

    debug!("CLI options: {:?}", opt);

    // ---- LOAD PARAMETERS ----

    let params: DriveExecParams = util::params::load("drive_exec.toml")
        .wrap_err("Could not load drive_exec params")?;
    params.validate()
        .wrap_err("Invalid drive_exec params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut input_cond = InputCond::default();
    input_cond.init("input_cond.toml")
        .wrap_err("Failed to initialise InputCond")?;
    info!("{} init complete", InputCond::NAME);

    let mut drive_tm = DriveTm::default();
    drive_tm.init("drive_tm.toml")
        .wrap_err("Failed to initialise DriveTm")?;
    info!("{} init complete", DriveTm::NAME);

    info!("Module initialisation complete\n");

    // ---- INITIALISE EQUIPMENT ----

    let input = make_input(&opt, &params)?;

    let mut robot = Robot::new(
        params,
        input_cond,
        drive_tm,
        input,
        SimActuator::new("Left actuator", params.sim),
        SimActuator::new("Right actuator", params.sim),
        LogDashboard::new(),
    );

    robot.init().wrap_err("Failed to initialise the robot")?;

    let mut tick_archive = Archiver::from_path(&session, "drive/tick_report.csv")
        .wrap_err("Failed to create the tick report archive")?;

    info!("Equipment initialisation complete");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let cycle_period = Duration::from_secs_f64(params.cycle_period_s);
    let mut num_cycles: u64 = 0;

    loop {
        if let Some(max_cycles) = opt.cycles {
            if num_cycles >= max_cycles {
                info!("Cycle limit of {} reached, stopping", max_cycles);
                break;
            }
        }

        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // ---- SIMULATION ----

        {
            let (left, right) = robot.actuators_mut();
            left.step(params.cycle_period_s);
            right.step(params.cycle_period_s);
        }

        // ---- ROBOT PROCESSING ----

        let report = robot.tick(opt.mode)
            .wrap_err("Error during robot processing")?;

        // ---- WRITE ARCHIVES ----

        if let Some(report) = report {
            if let Err(e) = tick_archive.serialise(report) {
                warn!("Could not archive the tick report: {}", e);
            }
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
            )
        }

        num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    for (key, value) in robot.dashboard().values() {
        info!("    {} {:.4}", key, value);
    }

    info!("End of execution");

    Ok(())
}

/// Build the driver input source selected on the command line.
fn make_input(opt: &Opt, params: &DriveExecParams) -> Result<Box<dyn InputSource>, Report> {
    #[cfg(feature = "gamepad")]
    {
        if opt.gamepad {
            let gamepad = drive_lib::eqpt::GamepadInput::new()
                .wrap_err("Failed to initialise the gamepad")?;
            info!("Driver input from gamepad");
            return Ok(Box::new(gamepad));
        }
    }

    info!(
        "Driver input simulated: left {:.3}, right {:.3}, reset {}",
        opt.left_axis, opt.right_axis, opt.reset
    );

    Ok(Box::new(
        FixedInput::new()
            .with_axis(params.left_axis_id, opt.left_axis)
            .with_axis(params.right_axis_id, opt.right_axis)
            .with_button(params.reset_button_id, opt.reset)
    ))
}
