//! # Selection state machine
//!
//! Tracks which routine the operator has highlighted, which one has been locked in, and which
//! screen should be showing. Possible transitions:
//!
//! - `Browsing --Select(id)--> ConfirmPending(id)`
//! - `ConfirmPending(id) --Back--> Browsing`
//! - `ConfirmPending(id) --Confirm--> Confirmed(id)`
//! - `Browsing --OpenDiagnostics/CloseDiagnostics--> Browsing`, toggling the diagnostics overlay
//!
//! `Confirmed` is terminal. Every other event is ignored.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{info, warn};
use robot_if::{auton::RoutineId, ui::UiEvent};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Selection phase.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Phase {
    /// No routine highlighted, the operator is looking at the menu.
    Browsing,

    /// A routine has been highlighted and is waiting for confirmation.
    ConfirmPending(RoutineId),

    /// A routine has been locked in for the match.
    Confirmed(RoutineId),
}

/// The screen which should be visible.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Screen {
    Selection,
    Confirmation(RoutineId),
    Ready(RoutineId),
    Diagnostics,
}

/// Screen change the UI must render after a transition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ScreenAction {
    /// Nothing changed.
    None,
    ShowSelection,
    ShowConfirmation(RoutineId),
    ShowReady(RoutineId),
    ShowDiagnostics,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The selection state.
///
/// One instance is owned by the robot for the whole run. Only [`SelectionState::step`] mutates it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SelectionState {
    phase: Phase,
    screen: Screen,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SelectionState {
    /// Create a new state, browsing the selection screen.
    pub fn new() -> Self {
        Self {
            phase: Phase::Browsing,
            screen: Screen::Selection,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// The locked in routine, if any.
    pub fn confirmed(&self) -> Option<RoutineId> {
        match self.phase {
            Phase::Confirmed(id) => Some(id),
            _ => None,
        }
    }

    /// Apply a tap event, returning the screen change the UI must render.
    pub fn step(&mut self, event: UiEvent) -> ScreenAction {
        let (phase, screen, action) = match (self.phase, self.screen, event) {
            (Phase::Browsing, Screen::Selection, UiEvent::Select(id)) => (
                Phase::ConfirmPending(id),
                Screen::Confirmation(id),
                ScreenAction::ShowConfirmation(id),
            ),
            (Phase::Browsing, Screen::Selection, UiEvent::OpenDiagnostics) => (
                Phase::Browsing,
                Screen::Diagnostics,
                ScreenAction::ShowDiagnostics,
            ),
            (Phase::Browsing, Screen::Diagnostics, UiEvent::CloseDiagnostics) => (
                Phase::Browsing,
                Screen::Selection,
                ScreenAction::ShowSelection,
            ),
            (Phase::ConfirmPending(_), _, UiEvent::Back) => {
                (Phase::Browsing, Screen::Selection, ScreenAction::ShowSelection)
            }
            (Phase::ConfirmPending(id), _, UiEvent::Confirm) => (
                Phase::Confirmed(id),
                Screen::Ready(id),
                ScreenAction::ShowReady(id),
            ),
            (Phase::Confirmed(id), _, e) => {
                warn!("Routine {} is locked in, {:?} ignored", id, e);
                return ScreenAction::None;
            }
            (p, s, e) => {
                warn!("{:?} is not accepted in {:?} on {:?}, ignored", e, p, s);
                return ScreenAction::None;
            }
        };

        info!("Selection state change to: {:?} ({:?})", phase, screen);

        self.phase = phase;
        self.screen = screen;

        action
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const ALL_EVENTS: [UiEvent; 7] = [
        UiEvent::Select(RoutineId::Left),
        UiEvent::Select(RoutineId::Right),
        UiEvent::Select(RoutineId::Skills),
        UiEvent::Back,
        UiEvent::Confirm,
        UiEvent::OpenDiagnostics,
        UiEvent::CloseDiagnostics,
    ];

    fn run(events: &[UiEvent]) -> SelectionState {
        let mut state = SelectionState::new();
        for e in events {
            state.step(*e);
        }
        state
    }

    #[test]
    fn test_select_and_confirm() {
        let mut state = SelectionState::new();

        assert_eq!(
            state.step(UiEvent::Select(RoutineId::Left)),
            ScreenAction::ShowConfirmation(RoutineId::Left)
        );
        assert_eq!(state.phase(), Phase::ConfirmPending(RoutineId::Left));

        assert_eq!(
            state.step(UiEvent::Confirm),
            ScreenAction::ShowReady(RoutineId::Left)
        );
        assert_eq!(state.phase(), Phase::Confirmed(RoutineId::Left));
        assert_eq!(state.screen(), Screen::Ready(RoutineId::Left));
        assert_eq!(state.confirmed(), Some(RoutineId::Left));
    }

    #[test]
    fn test_change_of_mind() {
        let state = run(&[
            UiEvent::Select(RoutineId::Left),
            UiEvent::Back,
            UiEvent::Select(RoutineId::Right),
            UiEvent::Confirm,
        ]);
        assert_eq!(state.phase(), Phase::Confirmed(RoutineId::Right));
    }

    #[test]
    fn test_no_direct_confirm() {
        let mut state = SelectionState::new();
        assert_eq!(state.step(UiEvent::Confirm), ScreenAction::None);
        assert_eq!(state, SelectionState::new());
    }

    #[test]
    fn test_no_substitution_while_pending() {
        let state = run(&[
            UiEvent::Select(RoutineId::Left),
            UiEvent::Select(RoutineId::Right),
            UiEvent::Confirm,
        ]);
        assert_eq!(state.phase(), Phase::Confirmed(RoutineId::Left));
    }

    #[test]
    fn test_idempotent_no_ops() {
        let mut state = SelectionState::new();

        assert_eq!(state.step(UiEvent::Back), ScreenAction::None);
        assert_eq!(state.step(UiEvent::CloseDiagnostics), ScreenAction::None);
        assert_eq!(state.step(UiEvent::CloseDiagnostics), ScreenAction::None);
        assert_eq!(state, SelectionState::new());

        assert_eq!(state.step(UiEvent::OpenDiagnostics), ScreenAction::ShowDiagnostics);
        assert_eq!(state.step(UiEvent::OpenDiagnostics), ScreenAction::None);
        assert_eq!(state.step(UiEvent::CloseDiagnostics), ScreenAction::ShowSelection);
        assert_eq!(state.step(UiEvent::CloseDiagnostics), ScreenAction::None);
        assert_eq!(state, SelectionState::new());
    }

    #[test]
    fn test_diagnostics_is_an_overlay() {
        let mut state = SelectionState::new();
        state.step(UiEvent::OpenDiagnostics);

        assert_eq!(state.phase(), Phase::Browsing);
        assert_eq!(state.screen(), Screen::Diagnostics);

        // The selection screen is hidden so routine buttons can't be tapped
        assert_eq!(state.step(UiEvent::Select(RoutineId::Skills)), ScreenAction::None);
        assert_eq!(state.phase(), Phase::Browsing);
    }

    #[test]
    fn test_confirmed_is_terminal() {
        let mut state = run(&[UiEvent::Select(RoutineId::Skills), UiEvent::Confirm]);
        let locked = state.clone();

        for e in ALL_EVENTS.iter() {
            assert_eq!(state.step(*e), ScreenAction::None);
            assert_eq!(state, locked);
        }
    }

    #[test]
    fn test_totality_over_event_sequences() {
        // Walk every sequence of up to four events and check the state stays consistent.
        let mut frontier = vec![SelectionState::new()];

        for _ in 0..4 {
            let mut next = Vec::new();
            for state in frontier.iter() {
                for e in ALL_EVENTS.iter() {
                    let before = state.clone();
                    let mut s = state.clone();
                    s.step(*e);

                    match (s.phase(), s.screen()) {
                        (Phase::Browsing, Screen::Selection) => (),
                        (Phase::Browsing, Screen::Diagnostics) => (),
                        (Phase::ConfirmPending(a), Screen::Confirmation(b)) => assert_eq!(a, b),
                        (Phase::Confirmed(a), Screen::Ready(b)) => {
                            assert_eq!(a, b);
                            // Confirmed only ever follows a pending confirmation of the same id
                            assert!(
                                before.phase() == Phase::ConfirmPending(a)
                                    || before.phase() == Phase::Confirmed(a)
                            );
                        }
                        other => panic!("Inconsistent state {:?}", other),
                    }

                    next.push(s);
                }
            }
            frontier = next;
        }
    }
}
