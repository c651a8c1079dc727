//! # Autonomous routine interface
//!
//! Identifiers for the autonomous routines and the commands they are built from. Commands map
//! one-to-one onto the operations of the equipment capabilities in [`crate::eqpt`].

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;
use std::fmt::Display;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Identifier of an autonomous routine.
///
/// The set is closed and fixed at build time, every identifier must have exactly one descriptor in
/// the routine registry.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Deserialize)]
pub enum RoutineId {
    /// Start on the left side of the field.
    Left,

    /// Start on the right side of the field.
    Right,

    /// Programming skills run.
    Skills,
}

/// A pneumatic actuator on the robot.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum ActuatorId {
    Descore,
    Park,
    Scraper,
    Redirect,
}

/// A stage of the intake.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum IntakeStage {
    Stage1,
    Stage2,
}

/// A single step of an autonomous routine.
///
/// Commands are executed strictly in sequence. Drive motions (`FollowPath`, `MoveToPose` and
/// `WaitUntilTraveled`) block until the drive system reports that they settled or timed out, all
/// other commands return immediately.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Command {
    /// Reset the odometry pose of the drive system.
    SetPose {
        /// Units: inches, Frame: field
        x_in: f64,
        /// Units: inches, Frame: field
        y_in: f64,
        /// Units: degrees, clockwise from field +Y
        heading_deg: f64,
    },

    /// Follow a pre-generated path asset with pure pursuit.
    FollowPath {
        /// The path asset to follow.
        path: PathAsset,
        /// Pure pursuit lookahead distance.
        ///
        /// Units: inches
        lookahead_in: f64,
        /// Time after which the motion is abandoned.
        timeout_ms: u32,
    },

    /// Drive to a target pose using the boomerang controller.
    MoveToPose {
        /// Units: inches, Frame: field
        x_in: f64,
        /// Units: inches, Frame: field
        y_in: f64,
        /// Units: degrees, clockwise from field +Y
        heading_deg: f64,
        /// Time after which the motion is abandoned.
        timeout_ms: u32,
        /// If false the robot drives the motion in reverse.
        forwards: bool,
    },

    /// Wait until the current motion has travelled the given distance.
    WaitUntilTraveled {
        /// Units: inches
        dist_in: f64,
    },

    /// Extend (`true`) or retract (`false`) a pneumatic actuator.
    SetActuator { act: ActuatorId, extended: bool },

    /// Run an intake stage at the given power, -127 to +127.
    RunIntakeStage { stage: IntakeStage, power: i8 },
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Reference to a path asset bundled with the robot program.
///
/// Path assets are generated offline and resolved by the drive system, the core only carries the
/// name around.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub struct PathAsset(pub &'static str);

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl RoutineId {
    /// Every routine identifier, in menu order.
    pub const ALL: [RoutineId; 3] = [RoutineId::Left, RoutineId::Right, RoutineId::Skills];

    /// Position of this identifier in [`RoutineId::ALL`].
    pub fn index(self) -> usize {
        match self {
            RoutineId::Left => 0,
            RoutineId::Right => 1,
            RoutineId::Skills => 2,
        }
    }
}

impl Display for RoutineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutineId::Left => write!(f, "Left"),
            RoutineId::Right => write!(f, "Right"),
            RoutineId::Skills => write!(f, "Skills"),
        }
    }
}

impl Command {
    /// Returns true if the command suspends the routine until the drive system reports completion.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            Command::FollowPath { .. }
                | Command::MoveToPose { .. }
                | Command::WaitUntilTraveled { .. }
        )
    }
}

impl Display for PathAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_routine_index_matches_all() {
        for (i, id) in RoutineId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn test_blocking_commands() {
        assert!(Command::FollowPath {
            path: PathAsset("left_first.txt"),
            lookahead_in: 15.0,
            timeout_ms: 3000
        }
        .is_blocking());
        assert!(Command::WaitUntilTraveled { dist_in: 27.0 }.is_blocking());
        assert!(!Command::SetActuator {
            act: ActuatorId::Scraper,
            extended: true
        }
        .is_blocking());
        assert!(!Command::RunIntakeStage {
            stage: IntakeStage::Stage1,
            power: 127
        }
        .is_blocking());
        assert!(!Command::SetPose {
            x_in: 0.0,
            y_in: 0.0,
            heading_deg: 0.0
        }
        .is_blocking());
    }
}
