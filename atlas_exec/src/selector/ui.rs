//! # Selector UI controller
//!
//! Turns taps into [`SelectionState`] transitions and renders the resulting screens on a
//! [`DisplaySurface`].
//!
//! The controller owns two screen slots. The selection slot holds the routine menu, which is hidden
//! rather than destroyed while the operator looks at a confirmation or diagnostics screen. The
//! overlay slot holds whichever of the confirmation, diagnostics or ready screens is showing.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::debug;
use robot_if::{
    auton::RoutineId,
    eqpt::DisplaySurface,
    ui::{Palette, Position, UiEvent},
};

use super::{
    slot::ScreenSlot,
    state::{ScreenAction, SelectionState},
};
use crate::routines::Registry;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Vertical position of the bottom row of buttons.
const BTN_ROW_Y_PX: i16 = 180;

/// Horizontal position of the right hand button of the bottom row.
const BTN_ROW_RIGHT_X_PX: i16 = 318;

/// Vertical spacing between diagnostics lines.
const DIAG_LINE_SPACING_PX: i16 = 20;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The selector UI controller.
#[derive(Debug, Default)]
pub struct SelectorUi {
    selection: ScreenSlot,
    overlay: ScreenSlot,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SelectorUi {
    pub fn new() -> Self {
        Self {
            selection: ScreenSlot::new(),
            overlay: ScreenSlot::new(),
        }
    }

    /// Build the routine menu. Called once at startup.
    pub fn show_initial<D>(&mut self, registry: &Registry, display: &mut D)
    where
        D: DisplaySurface + ?Sized,
    {
        self.overlay.release(display);
        self.build_selection(registry, display);
    }

    /// Apply a tap to the state and render the result.
    ///
    /// `diag_lines` is the text shown if the diagnostics overlay is opened.
    pub fn handle<D>(
        &mut self,
        event: UiEvent,
        state: &mut SelectionState,
        registry: &Registry,
        diag_lines: &[String],
        display: &mut D,
    ) -> ScreenAction
    where
        D: DisplaySurface + ?Sized,
    {
        let action = state.step(event);
        self.render(action, registry, diag_lines, display);
        action
    }

    /// Render a screen action.
    pub fn render<D>(
        &mut self,
        action: ScreenAction,
        registry: &Registry,
        diag_lines: &[String],
        display: &mut D,
    ) where
        D: DisplaySurface + ?Sized,
    {
        match action {
            ScreenAction::None => (),
            ScreenAction::ShowSelection => {
                self.overlay.release(display);
                match self.selection.get() {
                    Some(s) => display.set_visible(s, true),
                    None => self.build_selection(registry, display),
                }
            }
            ScreenAction::ShowConfirmation(id) => {
                self.hide_selection(display);
                self.build_confirmation(id, registry, display);
            }
            ScreenAction::ShowDiagnostics => {
                self.hide_selection(display);
                self.build_diagnostics(diag_lines, display);
            }
            ScreenAction::ShowReady(id) => {
                // The menu can't be returned to once a routine is locked in
                self.selection.release(display);
                self.build_ready(id, registry, display);
            }
        }
    }

    /// Destroy every screen held by the controller.
    pub fn release_all<D>(&mut self, display: &mut D)
    where
        D: DisplaySurface + ?Sized,
    {
        self.overlay.release(display);
        self.selection.release(display);
    }

    fn hide_selection<D>(&mut self, display: &mut D)
    where
        D: DisplaySurface + ?Sized,
    {
        if let Some(s) = self.selection.get() {
            display.set_visible(s, false);
        }
    }

    fn build_selection<D>(&mut self, registry: &Registry, display: &mut D)
    where
        D: DisplaySurface + ?Sized,
    {
        let screen = self.selection.install(display);
        debug!("Building selection screen {}", screen.id());

        display.create_label(screen, "ATLAS - select autonomous", Position::new(10, 10));

        let diag = display.create_button(screen, "Diagnostics", Position::new(360, 10), Palette::Grey);
        display.on_tap(diag, UiEvent::OpenDiagnostics);

        for desc in registry.iter() {
            let btn = display.create_button(
                screen,
                desc.display_name,
                routine_position(desc.id),
                routine_colour(desc.id),
            );
            display.on_tap(btn, UiEvent::Select(desc.id));
        }
    }

    fn build_confirmation<D>(&mut self, id: RoutineId, registry: &Registry, display: &mut D)
    where
        D: DisplaySurface + ?Sized,
    {
        let desc = registry.describe(id);
        let screen = self.overlay.install(display);
        debug!("Building confirmation screen {} for {}", screen.id(), id);

        display.create_label(screen, &format!("Run {}?", desc.display_name), Position::new(10, 60));
        display.create_label(
            screen,
            &format!("{} commands", desc.cmds.len()),
            Position::new(10, 90),
        );

        let back = display.create_button(screen, "Back", Position::new(0, BTN_ROW_Y_PX), Palette::Grey);
        display.on_tap(back, UiEvent::Back);

        let confirm = display.create_button(
            screen,
            "Confirm",
            Position::new(BTN_ROW_RIGHT_X_PX, BTN_ROW_Y_PX),
            Palette::Green,
        );
        display.on_tap(confirm, UiEvent::Confirm);
    }

    fn build_ready<D>(&mut self, id: RoutineId, registry: &Registry, display: &mut D)
    where
        D: DisplaySurface + ?Sized,
    {
        let screen = self.overlay.install(display);
        debug!("Building ready screen {} for {}", screen.id(), id);

        display.create_label(
            screen,
            &format!("{} locked in", registry.describe(id).display_name),
            Position::new(10, 60),
        );
        display.create_label(screen, "Waiting for autonomous", Position::new(10, 100));
    }

    fn build_diagnostics<D>(&mut self, lines: &[String], display: &mut D)
    where
        D: DisplaySurface + ?Sized,
    {
        let screen = self.overlay.install(display);
        debug!("Building diagnostics screen {}", screen.id());

        for (i, line) in lines.iter().enumerate() {
            display.create_label(
                screen,
                line,
                Position::new(10, 10 + i as i16 * DIAG_LINE_SPACING_PX),
            );
        }

        let close = display.create_button(
            screen,
            "Close",
            Position::new(BTN_ROW_RIGHT_X_PX, BTN_ROW_Y_PX),
            Palette::Grey,
        );
        display.on_tap(close, UiEvent::CloseDiagnostics);
    }
}

/// Place of each routine on the menu's bottom row, blue on the left and skills on the right.
fn routine_position(id: RoutineId) -> Position {
    let x = match id {
        RoutineId::Right => 0,
        RoutineId::Left => 158,
        RoutineId::Skills => BTN_ROW_RIGHT_X_PX,
    };
    Position::new(x, BTN_ROW_Y_PX)
}

/// Button colour of each routine.
fn routine_colour(id: RoutineId) -> Palette {
    match id {
        RoutineId::Left => Palette::Red,
        RoutineId::Right => Palette::Blue,
        RoutineId::Skills => Palette::Green,
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
