//! # Right side autonomous routine

use robot_if::auton::{ActuatorId::*, Command, Command::*, IntakeStage::*, PathAsset};

/// Right side routine, the left side routine mirrored across the field's X axis.
pub const CMDS: &[Command] = &[
    SetPose { x_in: -62.168, y_in: -16.055, heading_deg: 180.0 },
    RunIntakeStage { stage: Stage1, power: 127 },
    FollowPath { path: PathAsset("right_first.txt"), lookahead_in: 15.0, timeout_ms: 3000 },
    MoveToPose { x_in: -7.864, y_in: -9.0, heading_deg: 224.0, timeout_ms: 3000, forwards: false },
    SetActuator { act: Redirect, extended: false },
    WaitUntilTraveled { dist_in: 27.0 },
    RunIntakeStage { stage: Stage2, power: 127 },
    WaitUntilTraveled { dist_in: 1.0 },
    SetActuator { act: Scraper, extended: true },
    SetActuator { act: Redirect, extended: true },
    FollowPath { path: PathAsset("right_second.txt"), lookahead_in: 15.0, timeout_ms: 5000 },
    RunIntakeStage { stage: Stage2, power: 0 },
    RunIntakeStage { stage: Stage1, power: 127 },
    MoveToPose { x_in: -26.882, y_in: -47.101, heading_deg: 270.0, timeout_ms: 2000, forwards: false },
    RunIntakeStage { stage: Stage2, power: 127 },
    MoveToPose { x_in: -62.503, y_in: -46.818, heading_deg: 270.0, timeout_ms: 2000, forwards: true },
];
