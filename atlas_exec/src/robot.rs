//! # Robot lifecycle
//!
//! Ties the registry, the selector and the dispatcher to the robot's lifecycle hooks:
//!
//! - `on_init` when the program starts,
//! - taps while the robot is disabled before the match,
//! - `on_autonomous_start` when the field enables autonomous.
//!
//! Driver control is handled elsewhere.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{info, warn};

use robot_if::{
    eqpt::{Actuator, DisplaySurface, DriveError, DriveSystem, Intake},
    ui::UiEvent,
};

use crate::{
    dispatch::{DefaultAction, DispatchParams, DispatchReport, Dispatcher},
    hw::{
        params::{RobotParams, RobotParamsError},
        sim::SimDisplay,
        Hardware,
    },
    routines::{Registry, RegistryError},
    selector::{ScreenAction, SelectionState, SelectorUi},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The robot program.
pub struct Robot<D, I, A, S>
where
    D: DriveSystem,
    I: Intake,
    A: Actuator,
    S: DisplaySurface,
{
    registry: Registry,
    state: SelectionState,
    ui: SelectorUi,
    dispatcher: Dispatcher,
    hw: Hardware<D, I, A>,
    display: S,

    /// Text of the diagnostics overlay, fixed once initialised.
    diag_lines: Vec<String>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Configuration errors found during initialisation. None of these can be recovered from.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Invalid routine registry: {0}")]
    Registry(RegistryError),

    #[error("Invalid robot wiring: {0}")]
    Wiring(RobotParamsError),

    #[error("Drive calibration failed: {0}")]
    Calibration(DriveError),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<D, I, A, S> Robot<D, I, A, S>
where
    D: DriveSystem,
    I: Intake,
    A: Actuator,
    S: DisplaySurface,
{
    /// Initialise the robot and show the selection screen.
    pub fn on_init(
        params: RobotParams,
        dispatch_params: &DispatchParams,
        hw: Hardware<D, I, A>,
        display: S,
    ) -> Result<Self, InitError> {
        Self::with_registry(Registry::builtin(), params, dispatch_params, hw, display)
    }

    /// Initialise the robot with the given registry.
    fn with_registry(
        registry: Result<Registry, RegistryError>,
        params: RobotParams,
        dispatch_params: &DispatchParams,
        mut hw: Hardware<D, I, A>,
        mut display: S,
    ) -> Result<Self, InitError> {
        let registry = registry.map_err(InitError::Registry)?;
        info!("Routine registry built");

        params.validate().map_err(InitError::Wiring)?;
        info!("Robot wiring validated");

        hw.drive.calibrate().map_err(InitError::Calibration)?;
        info!("Drive calibrated");

        let dispatcher = Dispatcher::new(dispatch_params);
        let diag_lines = diagnostics_lines(&registry, dispatcher.default_action(), &params);

        let mut ui = SelectorUi::new();
        ui.show_initial(&registry, &mut display);

        Ok(Self {
            registry,
            state: SelectionState::new(),
            ui,
            dispatcher,
            hw,
            display,
            diag_lines,
        })
    }

    /// Handle a single tap event.
    pub fn handle_tap(&mut self, event: UiEvent) -> ScreenAction {
        if self.dispatcher.is_dispatched() {
            warn!("Autonomous has started, {:?} ignored", event);
            return ScreenAction::None;
        }

        self.ui.handle(
            event,
            &mut self.state,
            &self.registry,
            &self.diag_lines,
            &mut self.display,
        )
    }

    /// Handle every tap queued by the display, returning the number handled.
    pub fn poll_display(&mut self) -> usize {
        let mut num_taps = 0;
        while let Some(event) = self.display.poll_tap() {
            self.handle_tap(event);
            num_taps += 1;
        }
        num_taps
    }

    /// Run the autonomous routine. Taps are ignored from this point on.
    pub fn on_autonomous_start(&mut self) -> DispatchReport {
        self.dispatcher
            .dispatch(self.state.phase(), &self.registry, &mut self.hw)
    }

    /// Text of the diagnostics overlay.
    pub fn diagnostics_lines(&self) -> &[String] {
        &self.diag_lines
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn hardware(&self) -> &Hardware<D, I, A> {
        &self.hw
    }

    pub fn display(&self) -> &S {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut S {
        &mut self.display
    }

    /// Destroy the selector's screens and hand back the equipment.
    pub fn shutdown(mut self) -> (Hardware<D, I, A>, S) {
        self.ui.release_all(&mut self.display);
        (self.hw, self.display)
    }
}

impl<D, I, A> Robot<D, I, A, SimDisplay>
where
    D: DriveSystem,
    I: Intake,
    A: Actuator,
{
    /// Tap each event on the simulated touchscreen in order, handling it before the next one so
    /// that a tap can land on the screen opened by the previous one.
    ///
    /// Returns the number of taps which hit a visible button.
    pub fn replay_taps<T>(&mut self, taps: T) -> usize
    where
        T: IntoIterator<Item = UiEvent>,
    {
        let mut num_hit = 0;
        for tap in taps {
            if self.display.inject(tap) {
                self.poll_display();
                num_hit += 1;
            } else {
                warn!("Nothing on screen raises {:?}, tap ignored", tap);
            }
        }
        num_hit
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn diagnostics_lines(
    registry: &Registry,
    default_action: DefaultAction,
    params: &RobotParams,
) -> Vec<String> {
    let mut lines: Vec<String> = registry
        .iter()
        .map(|d| format!("{}: {} commands", d.display_name, d.cmds.len()))
        .collect();

    lines.push(match default_action {
        DefaultAction::Stationary => "Default: stay stationary".to_string(),
        DefaultAction::Routine(id) => format!("Default: {}", registry.describe(id).display_name),
    });

    lines.extend(params.summary_lines());

    lines
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        dispatch::DispatchSource,
        hw::params::test::robot_params,
        mock::{self, RecordingHardware},
        routines::RoutineDescriptor,
        selector::Phase,
    };
    use robot_if::auton::RoutineId;
    use util::script_interpreter::{PendingTaps, ScriptInterpreter};

    type TestRobot = Robot<
        mock::RecordingDrive,
        mock::RecordingIntake,
        mock::RecordingActuator,
        SimDisplay,
    >;

    fn init_robot(default_action: DefaultAction) -> (TestRobot, mock::CallLog) {
        let (hw, log) = mock::hardware();
        let robot = Robot::on_init(
            robot_params(),
            &DispatchParams { default_action },
            hw,
            SimDisplay::new(),
        )
        .unwrap();
        (robot, log)
    }

    fn tap(robot: &mut TestRobot, label: &str) {
        assert!(robot.display_mut().tap_label(label), "No button {:?}", label);
        assert_eq!(robot.poll_display(), 1);
    }

    /// Replay every tap in a script at once.
    fn replay(robot: &mut TestRobot, script: &str) {
        let mut si = ScriptInterpreter::from_str(script).unwrap();
        let num_taps = si.get_num_taps();
        if let PendingTaps::Some(taps) = si.get_pending_taps(f64::MAX) {
            assert_eq!(robot.replay_taps(taps), num_taps);
        }
    }

    /// Feed a script cycle by cycle the way the bench executable does, returning the number of
    /// taps which hit a button.
    fn run_cycles(robot: &mut TestRobot, script: &str, cycle_period_s: f64) -> usize {
        let mut si = ScriptInterpreter::from_str(script).unwrap();
        let mut num_hit = 0;
        let mut now_s = 0.0;
        loop {
            match si.get_pending_taps(now_s) {
                PendingTaps::None => (),
                PendingTaps::Some(taps) => num_hit += robot.replay_taps(taps),
                PendingTaps::EndOfScript => break,
            }
            robot.poll_display();
            now_s += cycle_period_s;
        }
        num_hit
    }

    #[test]
    fn test_init_shows_selection() {
        let (robot, log) = init_robot(DefaultAction::Stationary);

        assert_eq!(robot.state().phase(), Phase::Browsing);
        assert_eq!(robot.hardware().drive.num_calibrations, 1);
        assert_eq!(robot.display().num_live_screens(), 1);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_select_left_and_run() {
        let (mut robot, log) = init_robot(DefaultAction::Stationary);

        tap(&mut robot, "Left Side");
        tap(&mut robot, "Confirm");
        assert_eq!(robot.state().phase(), Phase::Confirmed(RoutineId::Left));

        let report = robot.on_autonomous_start();
        assert_eq!(report.source, DispatchSource::Selected(RoutineId::Left));

        let log = log.borrow();
        assert_eq!(log.len(), 16);
        assert_eq!(
            log.first(),
            Some(&robot_if::auton::Command::SetPose {
                x_in: -62.168,
                y_in: 16.055,
                heading_deg: 0.0
            })
        );
        assert_eq!(
            log.last(),
            Some(&robot_if::auton::Command::MoveToPose {
                x_in: -62.503,
                y_in: 46.818,
                heading_deg: 270.0,
                timeout_ms: 2000,
                forwards: true
            })
        );
    }

    #[test]
    fn test_change_of_mind() {
        let (mut robot, log) = init_robot(DefaultAction::Stationary);

        tap(&mut robot, "Left Side");
        tap(&mut robot, "Back");
        tap(&mut robot, "Right Side");
        tap(&mut robot, "Confirm");

        let report = robot.on_autonomous_start();
        assert_eq!(report.source, DispatchSource::Selected(RoutineId::Right));

        let reg = Registry::builtin().unwrap();
        assert_eq!(*log.borrow(), reg.describe(RoutineId::Right).cmds.to_vec());
    }

    #[test]
    fn test_shipped_scripts() {
        let (mut robot, _) = init_robot(DefaultAction::Stationary);
        replay(&mut robot, include_str!("../../scripts/change_of_mind.tap"));
        assert_eq!(robot.state().phase(), Phase::Confirmed(RoutineId::Right));

        let (mut robot, _) = init_robot(DefaultAction::Stationary);
        replay(&mut robot, include_str!("../../scripts/select_left.tap"));
        assert_eq!(robot.state().phase(), Phase::Confirmed(RoutineId::Left));

        let (mut robot, log) = init_robot(DefaultAction::Stationary);
        replay(&mut robot, include_str!("../../scripts/no_selection.tap"));
        assert_eq!(robot.state().phase(), Phase::Browsing);
        assert_eq!(robot.on_autonomous_start().source, DispatchSource::Stationary);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_taps_due_in_the_same_cycle() {
        const SCRIPT: &str = r#"
1.0: {"Select": "Left"};
2.0: "Back";
2.0: {"Select": "Right"};
3.0: "Confirm";
"#;

        // Coarse cycles put several taps in one cycle
        for &period in [0.02, 0.5, 1.5, 10.0].iter() {
            let (mut robot, log) = init_robot(DefaultAction::Stationary);
            assert_eq!(run_cycles(&mut robot, SCRIPT, period), 4, "period {}", period);
            assert_eq!(robot.state().phase(), Phase::Confirmed(RoutineId::Right));

            robot.on_autonomous_start();
            let reg = Registry::builtin().unwrap();
            assert_eq!(*log.borrow(), reg.describe(RoutineId::Right).cmds.to_vec());
        }
    }

    #[test]
    fn test_missed_tap_is_skipped() {
        let (mut robot, _) = init_robot(DefaultAction::Stationary);

        // Confirm has no button on the selection screen
        let n = robot.replay_taps(vec![UiEvent::Confirm, UiEvent::Select(RoutineId::Skills)]);
        assert_eq!(n, 1);
        assert_eq!(robot.state().phase(), Phase::ConfirmPending(RoutineId::Skills));
    }

    #[test]
    fn test_no_taps_runs_default() {
        let (mut robot, log) = init_robot(DefaultAction::Stationary);
        let report = robot.on_autonomous_start();
        assert_eq!(report.source, DispatchSource::Stationary);
        assert!(log.borrow().is_empty());

        let (mut robot, log) = init_robot(DefaultAction::Routine(RoutineId::Skills));
        let report = robot.on_autonomous_start();
        assert_eq!(report.source, DispatchSource::Default(RoutineId::Skills));

        let reg = Registry::builtin().unwrap();
        assert_ne!(*log.borrow(), reg.describe(RoutineId::Left).cmds.to_vec());
    }

    #[test]
    fn test_taps_after_autonomous_start_are_ignored() {
        let (mut robot, log) = init_robot(DefaultAction::Stationary);
        robot.on_autonomous_start();

        tap(&mut robot, "Left Side");
        assert_eq!(robot.state().phase(), Phase::Browsing);

        // A second start does nothing
        let report = robot.on_autonomous_start();
        assert_eq!(report.source, DispatchSource::AlreadyDispatched);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_diagnostics_content() {
        let (mut robot, _) = init_robot(DefaultAction::Routine(RoutineId::Right));

        let lines = robot.diagnostics_lines();
        assert!(lines.contains(&"Left Side: 16 commands".to_string()));
        assert!(lines.contains(&"Default: Right Side".to_string()));
        assert!(lines.iter().any(|l| l.starts_with("Lateral PID 11/0/3")));

        let num_lines = lines.len();
        tap(&mut robot, "Diagnostics");
        tap(&mut robot, "Close");
        tap(&mut robot, "Diagnostics");
        assert_eq!(robot.diagnostics_lines().len(), num_lines);
        assert!(robot
            .display()
            .visible_labels()
            .contains(&"Default: Right Side".to_string()));
        tap(&mut robot, "Close");
        assert_eq!(robot.state().phase(), Phase::Browsing);
    }

    #[test]
    fn test_init_errors() {
        let (hw, _) = mock::hardware();
        let mut params = robot_params();
        params.odom.imu_port = 30;
        let r = Robot::on_init(params, &DispatchParams::default(), hw, SimDisplay::new());
        assert!(matches!(r, Err(InitError::Wiring(_))));

        let (mut hw, _) = mock::hardware();
        hw.drive.calibration_error = Some("IMU not responding".into());
        let r = Robot::on_init(robot_params(), &DispatchParams::default(), hw, SimDisplay::new());
        assert!(matches!(r, Err(InitError::Calibration(_))));

        let (hw, _) = mock::hardware();
        let registry = Registry::new(vec![RoutineDescriptor {
            id: RoutineId::Left,
            display_name: "Left Side",
            cmds: &[],
        }]);
        let r: Result<Robot<_, _, _, SimDisplay>, _> = Robot::with_registry(
            registry,
            robot_params(),
            &DispatchParams::default(),
            hw,
            SimDisplay::new(),
        );
        assert!(matches!(
            r,
            Err(InitError::Registry(RegistryError::Missing(RoutineId::Right)))
        ));
    }

    #[test]
    fn test_shutdown_releases_screens() {
        let (mut robot, _) = init_robot(DefaultAction::Stationary);
        tap(&mut robot, "Skills");

        let (_, display): (RecordingHardware, SimDisplay) = robot.shutdown();
        assert_eq!(display.num_live_screens(), 0);
    }
}
