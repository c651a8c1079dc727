//! # Simulated equipment
//!
//! Host implementations of the equipment traits, used by the bench executable and by tests. The
//! simulation is deliberately simple: motions complete instantly, with their duration estimated
//! from the drivetrain's top speed so that timeouts still behave like they do on the field.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, trace, warn};
use std::collections::{BTreeMap, VecDeque};

use robot_if::{
    auton::{IntakeStage, PathAsset},
    eqpt::{
        Actuator, ButtonHandle, DisplaySurface, DriveError, DriveSystem, Intake, MotionOutcome,
        ScreenHandle,
    },
    ui::{Palette, Position, UiEvent},
};

use super::{params::RobotParams, ActuatorBank, Hardware};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Simulated pose of the robot on the field.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct SimPose {
    /// Units: inches
    pub x_in: f64,

    /// Units: inches
    pub y_in: f64,

    /// Units: degrees
    pub heading_deg: f64,
}

/// Simulated drivetrain.
#[derive(Debug)]
pub struct SimDrive {
    pose: SimPose,

    /// Units: inches/second
    max_speed_ips: f64,

    /// Units: inches
    track_width_in: f64,

    calibrated: bool,

    /// Length of the most recent motion.
    ///
    /// Units: inches
    last_motion_in: f64,

    /// Simulated time spent in motions.
    ///
    /// Units: milliseconds
    elapsed_ms: u64,
}

/// Simulated staged intake.
#[derive(Debug, Default)]
pub struct SimIntake {
    stage1_power: i8,
    stage2_power: i8,
}

/// Simulated pneumatic piston.
#[derive(Debug)]
pub struct SimPneumatic {
    name: &'static str,
    extended: bool,
}

/// In-memory touchscreen.
///
/// Taps are accepted only on buttons which are on a visible screen and have an event bound to them.
#[derive(Debug, Default)]
pub struct SimDisplay {
    next_id: u32,
    num_created_screens: usize,
    screens: BTreeMap<u32, SimScreen>,
    buttons: BTreeMap<u32, SimButton>,
    taps: VecDeque<UiEvent>,
}

#[derive(Debug)]
struct SimScreen {
    visible: bool,
    labels: Vec<String>,
}

#[derive(Debug)]
struct SimButton {
    screen_id: u32,
    label: String,
    pos: Position,
    event: Option<UiEvent>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Hardware<SimDrive, SimIntake, SimPneumatic> {
    /// Build the simulated robot described by the parameters.
    pub fn sim(params: &RobotParams) -> Self {
        let p = &params.pneumatics;
        Self {
            drive: SimDrive::new(params),
            intake: SimIntake::default(),
            actuators: ActuatorBank {
                descore: SimPneumatic::new("descore", p.descore.initially_extended),
                park: SimPneumatic::new("park", p.park.initially_extended),
                scraper: SimPneumatic::new("scraper", p.scraper.initially_extended),
                redirect: SimPneumatic::new("redirect", p.redirect.initially_extended),
            },
        }
    }
}

impl SimDrive {
    pub fn new(params: &RobotParams) -> Self {
        Self {
            pose: SimPose::default(),
            max_speed_ips: params.max_speed_ips(),
            track_width_in: params.drivetrain.track_width_in,
            calibrated: false,
            last_motion_in: 0.0,
            elapsed_ms: 0,
        }
    }

    pub fn pose(&self) -> SimPose {
        self.pose
    }

    /// Simulated time spent driving.
    ///
    /// Units: seconds
    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_ms as f64 / 1000.0
    }

    fn check_calibrated(&self) {
        if !self.calibrated {
            warn!("Motion commanded before the drive was calibrated");
        }
    }

    /// Estimated time to drive to the target, turning on the spot for the heading change.
    ///
    /// Units: milliseconds
    fn estimate_ms(&self, dist_in: f64, turn_deg: f64) -> f64 {
        let turn_in = turn_deg.to_radians().abs() * self.track_width_in / 2.0;
        (dist_in + turn_in) / self.max_speed_ips * 1000.0
    }
}

impl DriveSystem for SimDrive {
    fn calibrate(&mut self) -> Result<(), DriveError> {
        if self.max_speed_ips <= 0.0 {
            return Err(DriveError::CalibrationFailed(format!(
                "drivetrain top speed is {} in/s",
                self.max_speed_ips
            )));
        }

        self.calibrated = true;
        debug!("SimDrive calibrated");
        Ok(())
    }

    fn set_pose(&mut self, x_in: f64, y_in: f64, heading_deg: f64) {
        self.pose = SimPose {
            x_in,
            y_in,
            heading_deg,
        };
        trace!("SimDrive pose set to {:?}", self.pose);
    }

    fn follow_path(&mut self, path: PathAsset, lookahead_in: f64, timeout_ms: u32) -> MotionOutcome {
        self.check_calibrated();

        // Path files aren't loaded on the bench, so the end pose is unknown
        debug!(
            "SimDrive following {} (lookahead {} in, timeout {} ms)",
            path, lookahead_in, timeout_ms
        );
        self.last_motion_in = 0.0;
        MotionOutcome::Settled
    }

    fn move_to_pose(
        &mut self,
        x_in: f64,
        y_in: f64,
        heading_deg: f64,
        timeout_ms: u32,
        forwards: bool,
    ) -> MotionOutcome {
        self.check_calibrated();

        let dist_in = (x_in - self.pose.x_in).hypot(y_in - self.pose.y_in);
        let turn_deg = wrap_deg(heading_deg - self.pose.heading_deg);
        let time_ms = self.estimate_ms(dist_in, turn_deg);

        debug!(
            "SimDrive moving {:.1} in {} to ({}, {}, {}), estimated {:.0} ms",
            dist_in,
            if forwards { "forwards" } else { "backwards" },
            x_in,
            y_in,
            heading_deg,
            time_ms
        );

        if time_ms > timeout_ms as f64 {
            // Stopped part way along
            let frac = timeout_ms as f64 / time_ms;
            self.pose = SimPose {
                x_in: self.pose.x_in + (x_in - self.pose.x_in) * frac,
                y_in: self.pose.y_in + (y_in - self.pose.y_in) * frac,
                heading_deg: self.pose.heading_deg + turn_deg * frac,
            };
            self.last_motion_in = dist_in * frac;
            self.elapsed_ms += timeout_ms as u64;
            MotionOutcome::TimedOut
        } else {
            self.pose = SimPose {
                x_in,
                y_in,
                heading_deg,
            };
            self.last_motion_in = dist_in;
            self.elapsed_ms += time_ms.round() as u64;
            MotionOutcome::Settled
        }
    }

    fn wait_until_traveled(&mut self, dist_in: f64) -> MotionOutcome {
        // The motion has already finished, so the wait ends straight away, as it does on the
        // robot when a motion ends early.
        if self.last_motion_in < dist_in {
            debug!(
                "Last motion covered {:.1} in, less than the {} in waited for",
                self.last_motion_in, dist_in
            );
        }
        MotionOutcome::Settled
    }
}

impl SimIntake {
    pub fn power(&self, stage: IntakeStage) -> i8 {
        match stage {
            IntakeStage::Stage1 => self.stage1_power,
            IntakeStage::Stage2 => self.stage2_power,
        }
    }
}

impl Intake for SimIntake {
    fn run_stage(&mut self, stage: IntakeStage, power: i8) {
        debug!("SimIntake {:?} power set to {}", stage, power);
        match stage {
            IntakeStage::Stage1 => self.stage1_power = power,
            IntakeStage::Stage2 => self.stage2_power = power,
        }
    }
}

impl SimPneumatic {
    pub fn new(name: &'static str, initially_extended: bool) -> Self {
        Self {
            name,
            extended: initially_extended,
        }
    }
}

impl Actuator for SimPneumatic {
    fn set(&mut self, extended: bool) {
        debug!(
            "SimPneumatic {} {}",
            self.name,
            if extended { "extended" } else { "retracted" }
        );
        self.extended = extended;
    }

    fn toggle(&mut self) {
        self.set(!self.extended);
    }

    fn is_extended(&self) -> bool {
        self.extended
    }
}

impl SimDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tap the visible button with the given label, queueing its event.
    ///
    /// Returns `false` if there is no such button.
    pub fn tap_label(&mut self, label: &str) -> bool {
        let event = self
            .tappable()
            .find(|(l, _)| *l == label)
            .map(|(_, e)| e);

        self.queue(event)
    }

    /// Tap whichever visible button raises the given event.
    ///
    /// Returns `false` if no visible button raises it, in which case the event is dropped.
    pub fn inject(&mut self, event: UiEvent) -> bool {
        let event = self.tappable().map(|(_, e)| e).find(|e| *e == event);

        self.queue(event)
    }

    /// Number of screens which have not been destroyed.
    pub fn num_live_screens(&self) -> usize {
        self.screens.len()
    }

    pub fn num_visible_screens(&self) -> usize {
        self.screens.values().filter(|s| s.visible).count()
    }

    /// Number of screens created since the display was built.
    pub fn num_created_screens(&self) -> usize {
        self.num_created_screens
    }

    /// Labels of every button on a visible screen.
    pub fn visible_buttons(&self) -> Vec<String> {
        self.buttons
            .values()
            .filter(|b| self.is_visible(b.screen_id))
            .map(|b| b.label.clone())
            .collect()
    }

    /// Position of the visible button with the given label.
    pub fn button_position(&self, label: &str) -> Option<Position> {
        self.buttons
            .values()
            .filter(|b| self.is_visible(b.screen_id))
            .find(|b| b.label == label)
            .map(|b| b.pos)
    }

    /// Text of every label on a visible screen.
    pub fn visible_labels(&self) -> Vec<String> {
        self.screens
            .values()
            .filter(|s| s.visible)
            .flat_map(|s| s.labels.iter().cloned())
            .collect()
    }

    fn is_visible(&self, screen_id: u32) -> bool {
        self.screens
            .get(&screen_id)
            .map(|s| s.visible)
            .unwrap_or(false)
    }

    /// Label and event of every button which can currently be tapped.
    fn tappable(&self) -> impl Iterator<Item = (&str, UiEvent)> + '_ {
        self.buttons
            .values()
            .filter(move |b| self.is_visible(b.screen_id))
            .filter_map(|b| b.event.map(|e| (b.label.as_str(), e)))
    }

    fn queue(&mut self, event: Option<UiEvent>) -> bool {
        match event {
            Some(e) => {
                trace!("SimDisplay tap {:?}", e);
                self.taps.push_back(e);
                true
            }
            None => false,
        }
    }

    fn alloc_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl DisplaySurface for SimDisplay {
    fn create_screen(&mut self) -> ScreenHandle {
        let id = self.alloc_id();
        self.screens.insert(
            id,
            SimScreen {
                visible: true,
                labels: Vec::new(),
            },
        );
        self.num_created_screens += 1;

        // Showing a new screen hides the others
        for (other, s) in self.screens.iter_mut() {
            if *other != id {
                s.visible = false;
            }
        }

        ScreenHandle::new(id)
    }

    fn destroy_screen(&mut self, screen: ScreenHandle) {
        let id = screen.id();
        if self.screens.remove(&id).is_none() {
            warn!("Screen {} destroyed twice", id);
        }
        self.buttons.retain(|_, b| b.screen_id != id);
    }

    fn create_button(
        &mut self,
        parent: &ScreenHandle,
        label: &str,
        pos: Position,
        colour: Palette,
    ) -> ButtonHandle {
        let id = self.alloc_id();
        trace!(
            "SimDisplay button {} {:?} at {:?} ({:?}) on screen {}",
            id,
            label,
            pos,
            colour,
            parent.id()
        );
        self.buttons.insert(
            id,
            SimButton {
                screen_id: parent.id(),
                label: label.to_string(),
                pos,
                event: None,
            },
        );
        ButtonHandle::new(id)
    }

    fn create_label(&mut self, parent: &ScreenHandle, text: &str, pos: Position) {
        trace!("SimDisplay label {:?} at {:?} on screen {}", text, pos, parent.id());
        match self.screens.get_mut(&parent.id()) {
            Some(s) => s.labels.push(text.to_string()),
            None => warn!("Label {:?} created on missing screen {}", text, parent.id()),
        }
    }

    fn on_tap(&mut self, button: ButtonHandle, event: UiEvent) {
        match self.buttons.get_mut(&button.id()) {
            Some(b) => b.event = Some(event),
            None => warn!("Tap bound on missing button {}", button.id()),
        }
    }

    fn set_visible(&mut self, screen: &ScreenHandle, visible: bool) {
        if let Some(s) = self.screens.get_mut(&screen.id()) {
            s.visible = visible;
        }
    }

    fn poll_tap(&mut self) -> Option<UiEvent> {
        self.taps.pop_front()
    }
}

/// Wrap an angle into the range -180 to +180 degrees.
fn wrap_deg(angle_deg: f64) -> f64 {
    let a = (angle_deg + 180.0).rem_euclid(360.0) - 180.0;
    if a == -180.0 {
        180.0
    } else {
        a
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::hw::params::test::robot_params;
    use robot_if::auton::RoutineId;

    #[test]
    fn test_wrap_deg() {
        assert_eq!(wrap_deg(0.0), 0.0);
        assert_eq!(wrap_deg(270.0), -90.0);
        assert_eq!(wrap_deg(-270.0), 90.0);
        assert_eq!(wrap_deg(180.0), 180.0);
        assert_eq!(wrap_deg(-180.0), 180.0);
    }

    #[test]
    fn test_drive_timeout() {
        let mut drive = SimDrive::new(&robot_params());
        drive.calibrate().unwrap();
        drive.set_pose(0.0, 0.0, 0.0);

        // 24 in at ~65 in/s is well under a second
        assert_eq!(drive.move_to_pose(0.0, 24.0, 0.0, 1000, true), MotionOutcome::Settled);
        assert_eq!(drive.pose().y_in, 24.0);

        // 120 in can't be covered in 500 ms
        assert_eq!(
            drive.move_to_pose(0.0, 144.0, 0.0, 500, true),
            MotionOutcome::TimedOut
        );
        let y = drive.pose().y_in;
        assert!(y > 24.0 && y < 144.0);
    }

    #[test]
    fn test_pneumatic() {
        let mut p = SimPneumatic::new("park", false);
        p.toggle();
        assert!(p.is_extended());
        p.set(false);
        assert!(!p.is_extended());
    }

    #[test]
    fn test_display_taps() {
        let mut d = SimDisplay::new();
        let a = d.create_screen();
        let btn = d.create_button(&a, "Left", Position::new(0, 0), Palette::Red);
        d.create_button(&a, "Unbound", Position::new(0, 0), Palette::Red);
        d.on_tap(btn, UiEvent::Select(RoutineId::Left));

        assert!(!d.tap_label("Unbound"));
        assert!(d.tap_label("Left"));
        assert!(d.inject(UiEvent::Select(RoutineId::Left)));
        assert!(!d.inject(UiEvent::Confirm));

        // A newer screen covers the older one
        let b = d.create_screen();
        assert!(!d.tap_label("Left"));
        assert_eq!(d.num_visible_screens(), 1);

        d.destroy_screen(b);
        d.set_visible(&a, true);
        assert!(d.tap_label("Left"));

        d.destroy_screen(a);
        assert!(!d.tap_label("Left"));
        assert_eq!(d.num_live_screens(), 0);
        assert_eq!(d.num_created_screens(), 2);

        assert_eq!(d.poll_tap(), Some(UiEvent::Select(RoutineId::Left)));
        assert_eq!(d.poll_tap(), Some(UiEvent::Select(RoutineId::Left)));
        assert_eq!(d.poll_tap(), Some(UiEvent::Select(RoutineId::Left)));
        assert_eq!(d.poll_tap(), None);
    }
}
