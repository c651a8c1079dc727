//! # Robot wiring and tuning parameters
//!
//! Describes how the robot is wired (smart ports, ADI ports) and how the motion library is tuned.
//! Loaded from `robot.toml` and validated once at startup.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;
use std::collections::HashMap;
use std::f64::consts::PI;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Highest smart port number on the brain.
const MAX_SMART_PORT: u8 = 21;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RobotParams {
    pub drivetrain: DrivetrainParams,

    pub odom: OdomParams,

    /// Lateral (distance) PID controller.
    pub lateral: ControllerParams,

    /// Angular (heading) PID controller.
    pub angular: ControllerParams,

    pub pneumatics: PneumaticsParams,

    pub intake: IntakeParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DrivetrainParams {
    /// Left motor group ports. Negative ports are reversed.
    pub left_ports: Vec<i8>,

    /// Right motor group ports. Negative ports are reversed.
    pub right_ports: Vec<i8>,

    pub gearset: Gearset,

    /// Units: inches
    pub track_width_in: f64,

    /// Units: inches
    pub wheel_diameter_in: f64,

    /// Wheel speed after external gearing.
    ///
    /// Units: revolutions/minute
    pub rpm: f64,

    /// How much the chassis drifts sideways in turns, 2 for omni-wheel drives, 8 with traction
    /// wheels.
    pub horizontal_drift: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OdomParams {
    pub imu_port: u8,

    pub horizontal: TrackingWheelParams,

    pub vertical: TrackingWheelParams,

    /// Optical sensor, not used by odometry but wired on the same side of the brain.
    pub optical_port: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackingWheelParams {
    /// Rotation sensor port. Negative ports are reversed.
    pub port: i8,

    /// Units: inches
    pub wheel_diameter_in: f64,

    /// Distance from the tracking centre.
    ///
    /// Units: inches
    pub offset_in: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ControllerParams {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,

    /// Error below which the integral accumulates.
    pub windup_range: f64,

    pub small_error: f64,
    pub small_error_timeout_ms: u32,

    pub large_error: f64,
    pub large_error_timeout_ms: u32,

    /// Maximum acceleration, 0 for no limit.
    pub slew: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PneumaticsParams {
    /// Smart port of the ADI expander the solenoids are plugged into.
    pub expander_port: u8,

    pub descore: PistonParams,
    pub park: PistonParams,
    pub scraper: PistonParams,
    pub redirect: PistonParams,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PistonParams {
    /// ADI port letter, `a` to `h`.
    pub adi_port: char,

    pub initially_extended: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntakeParams {
    pub stage1_ports: Vec<i8>,
    pub stage2_ports: Vec<i8>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Motor cartridge.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gearset {
    Red,
    Green,
    Blue,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RobotParamsError {
    #[error("{0} is wired to smart port {1}, which doesn't exist")]
    InvalidSmartPort(&'static str, i8),

    #[error("Smart port {0} is used by both {1} and {2}")]
    SmartPortInUse(u8, &'static str, &'static str),

    #[error("{0} is wired to ADI port {1:?}, expected a to h")]
    InvalidAdiPort(&'static str, char),

    #[error("ADI port {0:?} is used by both {1} and {2}")]
    AdiPortInUse(char, &'static str, &'static str),

    #[error("{0} motor group has no motors")]
    EmptyMotorGroup(&'static str),

    #[error("Invalid drivetrain geometry: {0}")]
    InvalidGeometry(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl RobotParams {
    /// Check the wiring is physically possible.
    pub fn validate(&self) -> Result<(), RobotParamsError> {
        let dt = &self.drivetrain;

        for &(name, group) in [
            ("Left drive", &dt.left_ports),
            ("Right drive", &dt.right_ports),
            ("Intake stage 1", &self.intake.stage1_ports),
            ("Intake stage 2", &self.intake.stage2_ports),
        ]
        .iter()
        {
            if group.is_empty() {
                return Err(RobotParamsError::EmptyMotorGroup(name));
            }
        }

        // ---- SMART PORTS ----

        let mut smart: Vec<(&'static str, i8)> = Vec::new();
        smart.extend(dt.left_ports.iter().map(|p| ("Left drive", *p)));
        smart.extend(dt.right_ports.iter().map(|p| ("Right drive", *p)));
        smart.extend(self.intake.stage1_ports.iter().map(|p| ("Intake stage 1", *p)));
        smart.extend(self.intake.stage2_ports.iter().map(|p| ("Intake stage 2", *p)));
        smart.push(("Horizontal tracking wheel", self.odom.horizontal.port));
        smart.push(("Vertical tracking wheel", self.odom.vertical.port));
        smart.push(("IMU", to_signed(self.odom.imu_port)));
        smart.push(("Optical sensor", to_signed(self.odom.optical_port)));
        smart.push(("ADI expander", to_signed(self.pneumatics.expander_port)));

        let mut used: HashMap<u8, &'static str> = HashMap::new();
        for (name, port) in smart {
            let abs = port.unsigned_abs();
            if abs == 0 || abs > MAX_SMART_PORT {
                return Err(RobotParamsError::InvalidSmartPort(name, port));
            }
            if let Some(other) = used.insert(abs, name) {
                return Err(RobotParamsError::SmartPortInUse(abs, other, name));
            }
        }

        // ---- ADI PORTS ----

        let mut used: HashMap<char, &'static str> = HashMap::new();
        for &(name, piston) in self.pneumatics.pistons().iter() {
            if !('a'..='h').contains(&piston.adi_port) {
                return Err(RobotParamsError::InvalidAdiPort(name, piston.adi_port));
            }
            if let Some(other) = used.insert(piston.adi_port, name) {
                return Err(RobotParamsError::AdiPortInUse(piston.adi_port, other, name));
            }
        }

        // ---- GEOMETRY ----

        if dt.wheel_diameter_in <= 0.0 || dt.track_width_in <= 0.0 {
            return Err(RobotParamsError::InvalidGeometry(format!(
                "wheel diameter ({} in) and track width ({} in) must be positive",
                dt.wheel_diameter_in, dt.track_width_in
            )));
        }
        if dt.rpm <= 0.0 || dt.rpm > dt.gearset.rpm() {
            return Err(RobotParamsError::InvalidGeometry(format!(
                "wheel speed of {} rpm is not possible with {:?} cartridges",
                dt.rpm, dt.gearset
            )));
        }

        Ok(())
    }

    /// Top linear speed of the drivetrain.
    ///
    /// Units: inches/second
    pub fn max_speed_ips(&self) -> f64 {
        self.drivetrain.rpm / 60.0 * PI * self.drivetrain.wheel_diameter_in
    }

    /// Short description of the configuration for the diagnostics screen.
    pub fn summary_lines(&self) -> Vec<String> {
        let dt = &self.drivetrain;
        vec![
            format!(
                "Drive L{:?} R{:?} {:?} {} rpm",
                dt.left_ports, dt.right_ports, dt.gearset, dt.rpm
            ),
            format!(
                "Lateral PID {}/{}/{}  Angular PID {}/{}/{}",
                self.lateral.kp,
                self.lateral.ki,
                self.lateral.kd,
                self.angular.kp,
                self.angular.ki,
                self.angular.kd
            ),
        ]
    }
}

impl PneumaticsParams {
    fn pistons(&self) -> [(&'static str, PistonParams); 4] {
        [
            ("Descore", self.descore),
            ("Park", self.park),
            ("Scraper", self.scraper),
            ("Redirect", self.redirect),
        ]
    }
}

impl Gearset {
    /// Free speed of the cartridge.
    pub fn rpm(self) -> f64 {
        match self {
            Gearset::Red => 100.0,
            Gearset::Green => 200.0,
            Gearset::Blue => 600.0,
        }
    }
}

/// Unsigned port numbers above `i8::MAX` are clamped so they still fail validation.
fn to_signed(port: u8) -> i8 {
    if port > i8::MAX as u8 {
        i8::MAX
    } else {
        port as i8
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
