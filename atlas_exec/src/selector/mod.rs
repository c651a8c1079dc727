//! # Autonomous selector
//!
//! The touchscreen menu used before a match to pick the autonomous routine. Split into the
//! [`state`] machine, the [`ui`] controller which renders it, and the [`slot`] type which owns the
//! controller's screens.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod slot;
pub mod state;
pub mod ui;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use slot::ScreenSlot;
pub use state::{Phase, Screen, ScreenAction, SelectionState};
pub use ui::SelectorUi;
