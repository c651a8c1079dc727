//! Utility library for the ATLAS robot software

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod host;
pub mod logger;
pub mod params;
pub mod script_interpreter;
pub mod session;
pub mod time;
