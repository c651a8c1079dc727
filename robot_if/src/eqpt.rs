//! # Equipment capabilities
//!
//! The robot software never talks to motors, solenoids or the screen directly. Instead it issues
//! commands to implementors of the traits in this module: the motion library on the robot, or the
//! simulated equipment on the bench.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use thiserror::Error;

use crate::{
    auton::{IntakeStage, PathAsset},
    ui::{Palette, Position, UiEvent},
};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Chassis motion: odometry plus PID path following.
///
/// Motion functions block until the motion settles or its timeout elapses.
pub trait DriveSystem {
    /// Calibrate the inertial and tracking sensors. Must be called before any motion.
    fn calibrate(&mut self) -> Result<(), DriveError>;

    /// Reset the odometry pose.
    fn set_pose(&mut self, x_in: f64, y_in: f64, heading_deg: f64);

    /// Follow a path asset using pure pursuit.
    fn follow_path(&mut self, path: PathAsset, lookahead_in: f64, timeout_ms: u32) -> MotionOutcome;

    /// Drive to the given pose.
    fn move_to_pose(
        &mut self,
        x_in: f64,
        y_in: f64,
        heading_deg: f64,
        timeout_ms: u32,
        forwards: bool,
    ) -> MotionOutcome;

    /// Wait until the current motion has travelled the given distance.
    fn wait_until_traveled(&mut self, dist_in: f64) -> MotionOutcome;
}

/// A binary (pneumatic) actuator.
pub trait Actuator {
    /// Extend (`true`) or retract (`false`) the actuator.
    fn set(&mut self, extended: bool);

    /// Flip the actuator to the opposite state.
    fn toggle(&mut self);

    fn is_extended(&self) -> bool;
}

/// The staged intake.
pub trait Intake {
    /// Run the given stage at a power between -127 and +127.
    fn run_stage(&mut self, stage: IntakeStage, power: i8);
}

/// The touchscreen.
///
/// Taps on a button bound with [`DisplaySurface::on_tap`] are queued by the surface and collected
/// with [`DisplaySurface::poll_tap`].
pub trait DisplaySurface {
    /// Create a new, visible, empty screen.
    fn create_screen(&mut self) -> ScreenHandle;

    /// Destroy a screen and every widget on it.
    fn destroy_screen(&mut self, screen: ScreenHandle);

    /// Create a button on the given screen.
    fn create_button(
        &mut self,
        parent: &ScreenHandle,
        label: &str,
        pos: Position,
        colour: Palette,
    ) -> ButtonHandle;

    /// Create a text label on the given screen.
    fn create_label(&mut self, parent: &ScreenHandle, text: &str, pos: Position);

    /// Bind an event to be raised when the button is tapped.
    fn on_tap(&mut self, button: ButtonHandle, event: UiEvent);

    fn set_visible(&mut self, screen: &ScreenHandle, visible: bool);

    /// Take the oldest pending tap event, if any.
    fn poll_tap(&mut self) -> Option<UiEvent>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Handle to a screen owned by a [`DisplaySurface`].
///
/// Handles cannot be copied or cloned, and destroying a screen consumes its handle, so a screen
/// can only be released once.
#[derive(Debug, Eq, PartialEq)]
pub struct ScreenHandle(u32);

/// Handle to a button. Buttons live as long as the screen they were created on.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ButtonHandle(u32);

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Result of a blocking drive motion.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MotionOutcome {
    /// The motion reached its target.
    Settled,

    /// The motion's timeout elapsed before it reached its target.
    TimedOut,
}

/// Errors reported by a [`DriveSystem`].
#[derive(Debug, Error)]
pub enum DriveError {
    #[error("Sensor calibration failed: {0}")]
    CalibrationFailed(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ScreenHandle {
    /// Create a handle. Only display surface implementations should call this.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

impl ButtonHandle {
    /// Create a handle. Only display surface implementations should call this.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}
