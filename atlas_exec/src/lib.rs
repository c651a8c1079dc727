//! # ATLAS library.
//!
//! This library allows the executable, and other crates in the workspace, to access the items
//! defined inside the ATLAS crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Routine dispatcher - runs the locked in routine when autonomous starts
pub mod dispatch;

/// Hardware - equipment groupings, wiring parameters and the simulated equipment
pub mod hw;

/// Executable parameters
pub mod params;

/// Robot lifecycle - initialisation, tap handling and autonomous start
pub mod robot;

/// Routine registry - the catalog of autonomous routines
pub mod routines;

/// Autonomous selector - the touchscreen menu
pub mod selector;

/// Recording equipment for tests
#[cfg(test)]
pub(crate) mod mock;
