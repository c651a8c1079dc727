//! # Robot interface crate.
//!
//! Provides the interfaces shared by the whole workspace: the autonomous routine identifiers and
//! commands, the operator UI events, and the equipment capabilities the robot software drives.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Autonomous routine identifiers and the commands routines are built from
pub mod auton;

/// Equipment capabilities (drive system, actuators, intake, display surface)
pub mod eqpt;

/// Operator interface events and screen layout primitives
pub mod ui;
