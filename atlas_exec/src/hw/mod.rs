//! # Robot hardware
//!
//! Groups the equipment the dispatcher drives during autonomous.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod params;
pub mod sim;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use robot_if::{
    auton::ActuatorId,
    eqpt::{Actuator, DriveSystem, Intake},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Everything autonomous routines can command.
#[derive(Debug)]
pub struct Hardware<D, I, A>
where
    D: DriveSystem,
    I: Intake,
    A: Actuator,
{
    pub drive: D,
    pub intake: I,
    pub actuators: ActuatorBank<A>,
}

/// One actuator per [`ActuatorId`].
#[derive(Debug)]
pub struct ActuatorBank<A: Actuator> {
    pub descore: A,
    pub park: A,
    pub scraper: A,
    pub redirect: A,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<A: Actuator> ActuatorBank<A> {
    pub fn get(&self, id: ActuatorId) -> &A {
        match id {
            ActuatorId::Descore => &self.descore,
            ActuatorId::Park => &self.park,
            ActuatorId::Scraper => &self.scraper,
            ActuatorId::Redirect => &self.redirect,
        }
    }

    pub fn get_mut(&mut self, id: ActuatorId) -> &mut A {
        match id {
            ActuatorId::Descore => &mut self.descore,
            ActuatorId::Park => &mut self.park,
            ActuatorId::Scraper => &mut self.scraper,
            ActuatorId::Redirect => &mut self.redirect,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
