//! # Routine dispatcher
//!
//! Runs the locked in routine once at the start of the autonomous period. Commands are executed
//! strictly in order, each drive motion blocking until the drive reports that it settled or timed
//! out. A timed out motion is logged and the routine carries on with the next command.
//!
//! If no routine was locked in the configured [`DefaultAction`] is taken instead.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, info, warn};
use serde::Deserialize;

use robot_if::{
    auton::{Command, RoutineId},
    eqpt::{Actuator, DriveSystem, Intake, MotionOutcome},
};

use crate::{hw::Hardware, routines::Registry, selector::Phase};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters of the dispatcher.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DispatchParams {
    /// What to do when autonomous starts without a routine locked in.
    #[serde(default)]
    pub default_action: DefaultAction,
}

/// Runs a routine at the start of autonomous.
#[derive(Debug)]
pub struct Dispatcher {
    default_action: DefaultAction,
    dispatched: bool,
}

/// Summary of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchReport {
    pub source: DispatchSource,

    /// Number of commands sent to the hardware.
    pub cmds_issued: usize,

    /// Number of drive motions which timed out.
    pub timeouts: usize,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Action taken when autonomous starts without a locked in routine.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
pub enum DefaultAction {
    /// Issue no commands.
    Stationary,

    /// Run the given routine.
    Routine(RoutineId),
}

/// Where the dispatched routine came from.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DispatchSource {
    /// The operator locked in this routine.
    Selected(RoutineId),

    /// No routine was locked in, the default routine was run.
    Default(RoutineId),

    /// No routine was locked in and the robot was left stationary.
    Stationary,

    /// Autonomous had already been dispatched, nothing was done.
    AlreadyDispatched,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for DefaultAction {
    fn default() -> Self {
        DefaultAction::Stationary
    }
}

impl Default for DispatchParams {
    fn default() -> Self {
        Self {
            default_action: DefaultAction::default(),
        }
    }
}

impl DispatchReport {
    fn empty(source: DispatchSource) -> Self {
        Self {
            source,
            cmds_issued: 0,
            timeouts: 0,
        }
    }
}

impl Dispatcher {
    pub fn new(params: &DispatchParams) -> Self {
        Self {
            default_action: params.default_action,
            dispatched: false,
        }
    }

    pub fn default_action(&self) -> DefaultAction {
        self.default_action
    }

    /// Returns true once [`Dispatcher::dispatch`] has been called.
    pub fn is_dispatched(&self) -> bool {
        self.dispatched
    }

    /// Run the routine selected by `phase`, or the default action.
    ///
    /// Only the first call does anything, later calls are reported as
    /// [`DispatchSource::AlreadyDispatched`].
    pub fn dispatch<D, I, A>(
        &mut self,
        phase: Phase,
        registry: &Registry,
        hw: &mut Hardware<D, I, A>,
    ) -> DispatchReport
    where
        D: DriveSystem,
        I: Intake,
        A: Actuator,
    {
        if self.dispatched {
            warn!("Autonomous already dispatched, ignored");
            return DispatchReport::empty(DispatchSource::AlreadyDispatched);
        }
        self.dispatched = true;

        let (source, id) = match (phase, self.default_action) {
            (Phase::Confirmed(id), _) => (DispatchSource::Selected(id), id),
            (p, DefaultAction::Routine(id)) => {
                warn!("No routine locked in ({:?}), running default {}", p, id);
                (DispatchSource::Default(id), id)
            }
            (p, DefaultAction::Stationary) => {
                warn!("No routine locked in ({:?}), staying stationary", p);
                return DispatchReport::empty(DispatchSource::Stationary);
            }
        };

        let desc = registry.describe(id);
        info!(
            "Running {} routine ({} commands)",
            desc.display_name,
            desc.cmds.len()
        );

        let mut report = DispatchReport::empty(source);
        for (i, cmd) in desc.cmds.iter().enumerate() {
            debug!("[{:02}] {:?}", i, cmd);

            if let Some(MotionOutcome::TimedOut) = exec(cmd, hw) {
                warn!("[{:02}] Motion timed out, continuing", i);
                report.timeouts += 1;
            }
            report.cmds_issued += 1;
        }

        info!(
            "{} routine complete, {} timeouts",
            desc.display_name, report.timeouts
        );

        report
    }
}

/// Execute a single command, returning the outcome of drive motions.
fn exec<D, I, A>(cmd: &Command, hw: &mut Hardware<D, I, A>) -> Option<MotionOutcome>
where
    D: DriveSystem,
    I: Intake,
    A: Actuator,
{
    match *cmd {
        Command::SetPose {
            x_in,
            y_in,
            heading_deg,
        } => {
            hw.drive.set_pose(x_in, y_in, heading_deg);
            None
        }
        Command::FollowPath {
            path,
            lookahead_in,
            timeout_ms,
        } => Some(hw.drive.follow_path(path, lookahead_in, timeout_ms)),
        Command::MoveToPose {
            x_in,
            y_in,
            heading_deg,
            timeout_ms,
            forwards,
        } => Some(
            hw.drive
                .move_to_pose(x_in, y_in, heading_deg, timeout_ms, forwards),
        ),
        Command::WaitUntilTraveled { dist_in } => Some(hw.drive.wait_until_traveled(dist_in)),
        Command::SetActuator { act, extended } => {
            hw.actuators.get_mut(act).set(extended);
            None
        }
        Command::RunIntakeStage { stage, power } => {
            hw.intake.run_stage(stage, power);
            None
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::mock;

    fn dispatcher(default_action: DefaultAction) -> Dispatcher {
        Dispatcher::new(&DispatchParams { default_action })
    }

    #[test]
    fn test_confirmed_routine_runs_in_order() {
        let registry = Registry::builtin().unwrap();
        let (mut hw, log) = mock::hardware();
        let mut d = dispatcher(DefaultAction::Stationary);

        let report = d.dispatch(Phase::Confirmed(RoutineId::Left), &registry, &mut hw);

        let left = registry.describe(RoutineId::Left).cmds;
        assert_eq!(*log.borrow(), left.to_vec());
        assert_eq!(
            report,
            DispatchReport {
                source: DispatchSource::Selected(RoutineId::Left),
                cmds_issued: left.len(),
                timeouts: 0,
            }
        );
    }

    #[test]
    fn test_timeouts_do_not_stop_the_routine() {
        let registry = Registry::builtin().unwrap();
        let (mut hw, log) = mock::hardware();
        hw.drive.outcome = MotionOutcome::TimedOut;
        let mut d = dispatcher(DefaultAction::Stationary);

        let report = d.dispatch(Phase::Confirmed(RoutineId::Left), &registry, &mut hw);

        let left = registry.describe(RoutineId::Left).cmds;
        let num_blocking = left.iter().filter(|c| c.is_blocking()).count();
        assert_eq!(report.timeouts, num_blocking);
        assert_eq!(report.cmds_issued, left.len());
        assert_eq!(log.borrow().len(), left.len());
    }

    #[test]
    fn test_no_selection_stationary() {
        let registry = Registry::builtin().unwrap();

        for phase in [Phase::Browsing, Phase::ConfirmPending(RoutineId::Left)].iter() {
            let (mut hw, log) = mock::hardware();
            let mut d = dispatcher(DefaultAction::Stationary);
            let report = d.dispatch(*phase, &registry, &mut hw);

            assert_eq!(report.source, DispatchSource::Stationary);
            assert_eq!(report.cmds_issued, 0);
            assert!(log.borrow().is_empty());

            // Still counts as the one dispatch of the match
            assert!(d.is_dispatched());
        }
    }

    #[test]
    fn test_no_selection_default_routine() {
        let registry = Registry::builtin().unwrap();
        let (mut hw, log) = mock::hardware();
        let mut d = dispatcher(DefaultAction::Routine(RoutineId::Skills));

        let report = d.dispatch(Phase::Browsing, &registry, &mut hw);

        assert_eq!(report.source, DispatchSource::Default(RoutineId::Skills));
        assert_eq!(
            *log.borrow(),
            registry.describe(RoutineId::Skills).cmds.to_vec()
        );
        assert_ne!(
            *log.borrow(),
            registry.describe(RoutineId::Left).cmds.to_vec()
        );
    }

    #[test]
    fn test_second_dispatch_is_ignored() {
        let registry = Registry::builtin().unwrap();
        let (mut hw, log) = mock::hardware();
        let mut d = dispatcher(DefaultAction::Stationary);

        d.dispatch(Phase::Confirmed(RoutineId::Right), &registry, &mut hw);
        let num_cmds = log.borrow().len();

        let report = d.dispatch(Phase::Confirmed(RoutineId::Right), &registry, &mut hw);
        assert_eq!(report.source, DispatchSource::AlreadyDispatched);
        assert_eq!(report.cmds_issued, 0);
        assert_eq!(log.borrow().len(), num_cmds);
    }

    #[test]
    fn test_params_from_toml() {
        let p: DispatchParams = util::params::parse("").unwrap();
        assert_eq!(p.default_action, DefaultAction::Stationary);

        let p: DispatchParams = util::params::parse("default_action = \"Stationary\"").unwrap();
        assert_eq!(p.default_action, DefaultAction::Stationary);

        let p: DispatchParams =
            util::params::parse("default_action = { Routine = \"Right\" }").unwrap();
        assert_eq!(p.default_action, DefaultAction::Routine(RoutineId::Right));
    }
}
