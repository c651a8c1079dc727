//! # Tap script interpreter module
//!
//! This module provides an interpreter for tap scripts, which replay operator touchscreen taps on
//! the bench. Each line of a script has the form
//!
//! ```text
//! <time_s>: <json UiEvent>;
//! ```
//!
//! for example `1.5: {"Select": "Left"};`. Anything not matching this form (such as `#` comments)
//! is ignored.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use regex::{Regex, RegexBuilder};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use thiserror::Error;

// Internal
use robot_if::ui::{UiEvent, UiEventParseError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A tap which is scripted to occur at a specific time.
struct ScriptedTap {
    /// The time the tap is supposed to occur at
    exec_time_s: f64,

    /// The event raised by the tap
    event: UiEvent,
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use `.get_pending_taps` to acquire a list
/// of events that are due.
pub struct ScriptInterpreter {
    taps: VecDeque<ScriptedTap>,
    duration_s: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)"
    )]
    InvalidTimestamp(String),

    #[error("Script timestamps must not decrease, found {1} s after {0} s")]
    OutOfOrder(f64, f64),

    #[error("Script contains an invalid event at {0} s: {1}")]
    InvalidEvent(f64, UiEventParseError),

    #[error("Could not build the script pattern: {0}")]
    PatternError(regex::Error),
}

pub enum PendingTaps {
    None,
    Some(Vec<UiEvent>),
    EndOfScript,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {
    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {
        let path = script_path.as_ref();

        // Check that the script file exists.
        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path.display().to_string()));
        }

        // Load the script into a string
        let script = fs::read_to_string(path).map_err(ScriptError::ScriptLoadError)?;

        Self::from_str(&script)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_str(script: &str) -> Result<Self, ScriptError> {
        let mut taps: VecDeque<ScriptedTap> = VecDeque::new();

        // Go through the script executing __the magic regex__.
        let re: Regex = RegexBuilder::new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .map_err(ScriptError::PatternError)?;

        for cap in re.captures_iter(script) {
            // Groups 1 and 3 always participate in a match
            let (time_str, payload) = match (cap.get(1), cap.get(3)) {
                (Some(t), Some(p)) => (t.as_str(), p.as_str()),
                _ => continue,
            };

            // Parse the exec time
            let exec_time_s: f64 = time_str
                .parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            if let Some(last) = taps.back() {
                if exec_time_s < last.exec_time_s {
                    return Err(ScriptError::OutOfOrder(last.exec_time_s, exec_time_s));
                }
            }

            // Parse the event from the payload. The scripts contain JSON only.
            let event = UiEvent::from_json(payload)
                .map_err(|e| ScriptError::InvalidEvent(exec_time_s, e))?;

            taps.push_back(ScriptedTap { exec_time_s, event });
        }

        let duration_s = match taps.back() {
            Some(t) => t.exec_time_s,
            None => return Err(ScriptError::ScriptEmpty),
        };

        Ok(ScriptInterpreter { taps, duration_s })
    }

    /// Return the taps due at `current_time_s`, or the end of script marker once all taps have been
    /// returned.
    pub fn get_pending_taps(&mut self, current_time_s: f64) -> PendingTaps {
        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.taps.is_empty() {
            return PendingTaps::EndOfScript;
        }

        let mut due: Vec<UiEvent> = vec![];

        // Pop taps from the queue while the head's exec time has passed.
        while let Some(front) = self.taps.front() {
            if front.exec_time_s > current_time_s {
                break;
            }
            if let Some(tap) = self.taps.pop_front() {
                due.push(tap.event);
            }
        }

        if due.is_empty() {
            PendingTaps::None
        } else {
            PendingTaps::Some(due)
        }
    }

    /// Get the number of taps remaining in the script
    pub fn get_num_taps(&self) -> usize {
        self.taps.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        self.duration_s
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
