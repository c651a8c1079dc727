//! # Programming skills routine

use robot_if::auton::{ActuatorId::*, Command, Command::*, IntakeStage::*, PathAsset};

/// Skills routine.
///
/// Clears both matchloaders on the left half of the field then reverses into the park zone.
pub const CMDS: &[Command] = &[
    SetPose { x_in: -64.0, y_in: 0.0, heading_deg: 90.0 },
    RunIntakeStage { stage: Stage1, power: 127 },
    FollowPath { path: PathAsset("skills_first.txt"), lookahead_in: 15.0, timeout_ms: 6000 },
    SetActuator { act: Scraper, extended: true },
    MoveToPose { x_in: -58.0, y_in: 47.0, heading_deg: 270.0, timeout_ms: 3000, forwards: true },
    RunIntakeStage { stage: Stage2, power: 127 },
    WaitUntilTraveled { dist_in: 6.0 },
    SetActuator { act: Scraper, extended: false },
    FollowPath { path: PathAsset("skills_second.txt"), lookahead_in: 15.0, timeout_ms: 8000 },
    SetActuator { act: Scraper, extended: true },
    MoveToPose { x_in: -58.0, y_in: -47.0, heading_deg: 270.0, timeout_ms: 3000, forwards: true },
    SetActuator { act: Scraper, extended: false },
    RunIntakeStage { stage: Stage1, power: 0 },
    RunIntakeStage { stage: Stage2, power: 0 },
    MoveToPose { x_in: -64.0, y_in: 0.0, heading_deg: 90.0, timeout_ms: 4000, forwards: false },
    SetActuator { act: Park, extended: true },
];
