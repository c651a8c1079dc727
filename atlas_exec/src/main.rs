//! Main ATLAS bench executable entry point.
//!
//! # Architecture
//!
//! The executable runs the robot program against simulated equipment:
//!
//!     - Initialise the session, logger and parameters
//!     - Initialise the robot, showing the selection screen
//!     - Main loop, while the robot is disabled before the match:
//!         - Replay due taps from the tap script onto the simulated touchscreen
//!         - Handle the taps queued by the touchscreen
//!     - Start autonomous once the script is over, running the locked in routine
//!
//! Without a tap script autonomous starts as soon as the robot is initialised, so the default
//! action is taken.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use atlas_lib::{
    hw::{params::RobotParams, sim::SimDisplay, Hardware},
    params::AtlasExecParams,
    robot::Robot,
};
use util::{
    host,
    logger::{logger_init, LevelFilter},
    script_interpreter::{PendingTaps, ScriptInterpreter},
    session::{self, Session},
};

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

/// ATLAS bench executable, runs the autonomous selector against simulated equipment.
#[derive(Debug, StructOpt)]
#[structopt(name = "atlas_exec")]
struct Args {
    /// Tap script to replay on the touchscreen
    #[structopt(parse(from_os_str))]
    script: Option<PathBuf>,

    /// Minimum level of log messages, `info` or more verbose
    #[structopt(short, long, default_value = "trace")]
    log_level: LevelFilter,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let args = Args::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("atlas_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(args.log_level, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("ATLAS Bench Executable\n");
    info!(
        "Running on: {:#?}",
        host::get_uname().wrap_err("Failed to get host information")?
    );
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", args);

    // ---- LOAD PARAMETERS ----

    let exec_params: AtlasExecParams =
        util::params::load("atlas_exec.toml").wrap_err("Could not load exec params")?;

    let robot_params: RobotParams =
        util::params::load("robot.toml").wrap_err("Could not load robot params")?;

    info!("Exec parameters loaded");

    // ---- LOAD TAP SCRIPT ----

    let mut script = match args.script {
        Some(ref path) => {
            info!("Loading script from {:?}", path);

            let si = ScriptInterpreter::new(path).wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} taps\n",
                si.get_duration(),
                si.get_num_taps()
            );

            Some(si)
        }
        None => {
            info!("No script provided, autonomous will start without a selection\n");
            None
        }
    };

    // ---- INITIALISE ROBOT ----

    info!("Initialising robot...");

    let hw = Hardware::sim(&robot_params);
    let mut robot = Robot::on_init(robot_params, &exec_params.dispatch, hw, SimDisplay::new())
        .wrap_err("Failed to initialise the robot")?;

    info!("Robot initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let script_start_s = session::get_elapsed_seconds();
    let mut auton_start_s: Option<f64> = None;

    if script.is_none() {
        auton_start_s = Some(script_start_s);
    }

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();
        let now_s = session::get_elapsed_seconds();

        // ---- TAP PROCESSING ----

        if let Some(ref mut si) = script {
            match si.get_pending_taps(now_s - script_start_s) {
                PendingTaps::None => (),
                PendingTaps::Some(taps) => {
                    robot.replay_taps(taps);
                }
                PendingTaps::EndOfScript => {
                    if auton_start_s.is_none() {
                        info!(
                            "End of tap script reached, autonomous starts in {:.02} s",
                            exec_params.auton_delay_s
                        );
                        auton_start_s = Some(now_s + exec_params.auton_delay_s);
                    }
                }
            }
        }

        // Taps raised by the display itself
        robot.poll_display();

        // ---- AUTONOMOUS ----

        if let Some(t) = auton_start_s {
            if now_s >= t {
                info!("Autonomous started\n");
                let report = robot.on_autonomous_start();

                info!("Dispatch report: {:?}", report);
                info!(
                    "Simulated drive time {:.02} s, final pose {:?}",
                    robot.hardware().drive.elapsed_s(),
                    robot.hardware().drive.pose()
                );
                break;
            }
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(exec_params.cycle_period_s).checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64() - exec_params.cycle_period_s
            ),
        }
    }

    // ---- SHUTDOWN ----

    robot.shutdown();

    info!("End of execution");

    Ok(())
}
