//! # Operator interface events

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;
use thiserror::Error;

use crate::auton::RoutineId;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// An event raised by the operator tapping a button on the touchscreen.
///
/// Scripts and logs carry events as JSON, for example `{"Select": "Left"}` or `"Confirm"`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize)]
pub enum UiEvent {
    /// A routine button was tapped.
    Select(RoutineId),

    /// The back button on the confirmation screen was tapped.
    Back,

    /// The confirm button on the confirmation screen was tapped.
    Confirm,

    /// The diagnostics button on the selection screen was tapped.
    OpenDiagnostics,

    /// The close button on the diagnostics overlay was tapped.
    CloseDiagnostics,
}

/// Colours available for widgets.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Palette {
    Red,
    Blue,
    Green,
    Grey,
    Yellow,
}

/// Errors raised while parsing a [`UiEvent`].
#[derive(Debug, Error)]
pub enum UiEventParseError {
    #[error("UI event contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Position of a widget on its parent screen, from the top left corner.
///
/// Units: pixels
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl UiEvent {
    /// Parse an event from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self, UiEventParseError> {
        serde_json::from_str(json_str.trim()).map_err(UiEventParseError::InvalidJson)
    }
}

impl Position {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
