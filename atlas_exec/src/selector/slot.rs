//! # Owned screen slot

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::warn;
use robot_if::eqpt::{DisplaySurface, ScreenHandle};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Holds at most one screen.
///
/// Installing a new screen always destroys the current occupant before the new one is created, so
/// a slot can never leak screens however many times it is refilled.
#[derive(Debug, Default)]
pub struct ScreenSlot {
    screen: Option<ScreenHandle>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ScreenSlot {
    pub fn new() -> Self {
        Self { screen: None }
    }

    /// Release the current occupant, then create a new screen and return a reference to it.
    pub fn install<D>(&mut self, display: &mut D) -> &ScreenHandle
    where
        D: DisplaySurface + ?Sized,
    {
        self.release(display);
        self.screen.insert(display.create_screen())
    }

    /// Destroy the occupant, if there is one.
    pub fn release<D>(&mut self, display: &mut D)
    where
        D: DisplaySurface + ?Sized,
    {
        if let Some(s) = self.screen.take() {
            display.destroy_screen(s);
        }
    }

    pub fn get(&self) -> Option<&ScreenHandle> {
        self.screen.as_ref()
    }

    pub fn is_occupied(&self) -> bool {
        self.screen.is_some()
    }
}

impl Drop for ScreenSlot {
    fn drop(&mut self) {
        if let Some(s) = &self.screen {
            warn!("Screen slot dropped while still holding screen {}", s.id());
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::hw::sim::SimDisplay;

    #[test]
    fn test_install_releases_previous() {
        let mut display = SimDisplay::new();
        let mut slot = ScreenSlot::new();

        for _ in 0..10 {
            slot.install(&mut display);
            assert_eq!(display.num_live_screens(), 1);
        }

        slot.release(&mut display);
        assert_eq!(display.num_live_screens(), 0);
        assert!(!slot.is_occupied());

        // Releasing an empty slot does nothing
        slot.release(&mut display);
        assert_eq!(display.num_live_screens(), 0);
    }
}
