//! # Routine registry
//!
//! The fixed catalog of autonomous routines. Each [`RoutineId`] maps to exactly one
//! [`RoutineDescriptor`] holding the name shown on the touchscreen and the command sequence run by
//! the dispatcher. The catalog is build-time data, validated once at startup.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod left;
mod right;
mod skills;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::debug;
use robot_if::auton::{Command, RoutineId};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Describes a single autonomous routine.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineDescriptor {
    pub id: RoutineId,

    /// Name shown on the selector buttons and the ready screen.
    pub display_name: &'static str,

    /// Commands run by the dispatcher, in order.
    pub cmds: &'static [Command],
}

/// The routine registry.
///
/// Descriptors are stored in [`RoutineId::ALL`] order, so that looking up an id is an index.
#[derive(Debug)]
pub struct Registry {
    descriptors: Vec<RoutineDescriptor>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RegistryError {
    #[error("Routine {0} has more than one descriptor")]
    Duplicate(RoutineId),

    #[error("Routine {0} has no descriptor")]
    Missing(RoutineId),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Registry {
    /// Build a registry from a set of descriptors.
    ///
    /// Every [`RoutineId`] must be described exactly once.
    pub fn new(descriptors: Vec<RoutineDescriptor>) -> Result<Self, RegistryError> {
        let mut slots: Vec<Option<RoutineDescriptor>> = vec![None; RoutineId::ALL.len()];

        for desc in descriptors {
            let slot = &mut slots[desc.id.index()];
            if slot.is_some() {
                return Err(RegistryError::Duplicate(desc.id));
            }
            *slot = Some(desc);
        }

        let mut ordered = Vec::with_capacity(slots.len());
        for (id, slot) in RoutineId::ALL.iter().zip(slots) {
            match slot {
                Some(d) => ordered.push(d),
                None => return Err(RegistryError::Missing(*id)),
            }
        }

        for d in ordered.iter() {
            debug!("Registered routine {} ({} commands)", d.id, d.cmds.len());
        }

        Ok(Self {
            descriptors: ordered,
        })
    }

    /// The registry of routines authored for this robot.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::new(vec![
            RoutineDescriptor {
                id: RoutineId::Left,
                display_name: "Left Side",
                cmds: left::CMDS,
            },
            RoutineDescriptor {
                id: RoutineId::Right,
                display_name: "Right Side",
                cmds: right::CMDS,
            },
            RoutineDescriptor {
                id: RoutineId::Skills,
                display_name: "Skills",
                cmds: skills::CMDS,
            },
        ])
    }

    /// Get the descriptor of the given routine.
    pub fn describe(&self, id: RoutineId) -> &RoutineDescriptor {
        // Construction guarantees one descriptor per id in index order
        &self.descriptors[id.index()]
    }

    /// Iterate over the descriptors in menu order.
    pub fn iter(&self) -> impl Iterator<Item = &RoutineDescriptor> {
        self.descriptors.iter()
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
