//! # Recording equipment
//!
//! Test doubles which record every call they receive as the [`Command`] that would have produced
//! it, so a test can compare what the dispatcher did against a routine's command list.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{cell::RefCell, rc::Rc};

use robot_if::{
    auton::{ActuatorId, Command, IntakeStage, PathAsset},
    eqpt::{Actuator, DriveError, DriveSystem, Intake, MotionOutcome},
};

use crate::hw::{ActuatorBank, Hardware};

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// Calls shared between every recorder of one [`Hardware`].
pub type CallLog = Rc<RefCell<Vec<Command>>>;

pub type RecordingHardware = Hardware<RecordingDrive, RecordingIntake, RecordingActuator>;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct RecordingDrive {
    log: CallLog,

    /// Outcome reported for every motion.
    pub outcome: MotionOutcome,

    /// Fail calibration if set.
    pub calibration_error: Option<String>,

    pub num_calibrations: usize,
}

pub struct RecordingIntake {
    log: CallLog,
}

pub struct RecordingActuator {
    log: CallLog,
    id: ActuatorId,
    extended: bool,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Build recording hardware and the log it writes to.
pub fn hardware() -> (RecordingHardware, CallLog) {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let actuator = |id| RecordingActuator {
        log: log.clone(),
        id,
        extended: false,
    };

    let hw = Hardware {
        drive: RecordingDrive {
            log: log.clone(),
            outcome: MotionOutcome::Settled,
            calibration_error: None,
            num_calibrations: 0,
        },
        intake: RecordingIntake { log: log.clone() },
        actuators: ActuatorBank {
            descore: actuator(ActuatorId::Descore),
            park: actuator(ActuatorId::Park),
            scraper: actuator(ActuatorId::Scraper),
            redirect: actuator(ActuatorId::Redirect),
        },
    };

    (hw, log)
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl RecordingDrive {
    fn motion(&mut self, cmd: Command) -> MotionOutcome {
        self.log.borrow_mut().push(cmd);
        self.outcome
    }
}

impl DriveSystem for RecordingDrive {
    fn calibrate(&mut self) -> Result<(), DriveError> {
        self.num_calibrations += 1;
        match &self.calibration_error {
            Some(e) => Err(DriveError::CalibrationFailed(e.clone())),
            None => Ok(()),
        }
    }

    fn set_pose(&mut self, x_in: f64, y_in: f64, heading_deg: f64) {
        self.log.borrow_mut().push(Command::SetPose {
            x_in,
            y_in,
            heading_deg,
        });
    }

    fn follow_path(&mut self, path: PathAsset, lookahead_in: f64, timeout_ms: u32) -> MotionOutcome {
        self.motion(Command::FollowPath {
            path,
            lookahead_in,
            timeout_ms,
        })
    }

    fn move_to_pose(
        &mut self,
        x_in: f64,
        y_in: f64,
        heading_deg: f64,
        timeout_ms: u32,
        forwards: bool,
    ) -> MotionOutcome {
        self.motion(Command::MoveToPose {
            x_in,
            y_in,
            heading_deg,
            timeout_ms,
            forwards,
        })
    }

    fn wait_until_traveled(&mut self, dist_in: f64) -> MotionOutcome {
        self.motion(Command::WaitUntilTraveled { dist_in })
    }
}

impl Intake for RecordingIntake {
    fn run_stage(&mut self, stage: IntakeStage, power: i8) {
        self.log
            .borrow_mut()
            .push(Command::RunIntakeStage { stage, power });
    }
}

impl Actuator for RecordingActuator {
    fn set(&mut self, extended: bool) {
        self.extended = extended;
        self.log.borrow_mut().push(Command::SetActuator {
            act: self.id,
            extended,
        });
    }

    fn toggle(&mut self) {
        self.set(!self.extended);
    }

    fn is_extended(&self) -> bool {
        self.extended
    }
}
