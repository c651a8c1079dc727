//! # ATLAS Executable Parameters
//!
//! This module provides parameters for the ATLAS executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use crate::dispatch::DispatchParams;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct AtlasExecParams {
    /// Target period of one cycle of the main loop.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Time between the end of the tap script and the start of autonomous.
    ///
    /// Units: seconds
    pub auton_delay_s: f64,

    #[serde(default)]
    pub dispatch: DispatchParams,
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
