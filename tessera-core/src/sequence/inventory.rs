//! Cartridge inventory
//!
//! Bricks left in each cartridge slot. Slots without a loaded count are
//! untracked and never run out.

use super::job::JobError;
use crate::config::{ConfigError, MAX_CARTRIDGES};

/// Remaining bricks per cartridge slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Inventory {
    remaining: [Option<u16>; MAX_CARTRIDGES],
}

impl Inventory {
    /// Inventory with no slot tracked
    pub const fn untracked() -> Self {
        Self {
            remaining: [None; MAX_CARTRIDGES],
        }
    }

    /// Track slots `0..capacities.len()`, starting from the given counts
    pub fn with_capacities(capacities: &[u16]) -> Result<Self, ConfigError> {
        if capacities.len() > MAX_CARTRIDGES {
            return Err(ConfigError::TooManySlots);
        }
        let mut inventory = Self::untracked();
        for (slot, &count) in inventory.remaining.iter_mut().zip(capacities) {
            *slot = Some(count);
        }
        Ok(inventory)
    }

    /// Bricks left in `slot`, `None` if untracked
    pub fn remaining(&self, slot: u8) -> Option<u16> {
        self.remaining.get(slot as usize).copied().flatten()
    }

    pub fn is_tracked(&self) -> bool {
        self.remaining.iter().any(Option::is_some)
    }

    /// Fail if `slot` is tracked and empty
    pub fn check(&self, slot: u8) -> Result<(), JobError> {
        match self.remaining(slot) {
            Some(0) => Err(JobError::SlotEmpty { slot }),
            _ => Ok(()),
        }
    }

    /// Record one brick taken from `slot`
    pub fn take(&mut self, slot: u8) {
        if let Some(Some(count)) = self.remaining.get_mut(slot as usize) {
            *count = count.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untracked_never_runs_out() {
        let mut inventory = Inventory::untracked();
        assert!(!inventory.is_tracked());
        inventory.take(3);
        assert_eq!(inventory.remaining(3), None);
        assert_eq!(inventory.check(3), Ok(()));
        assert_eq!(inventory, Inventory::default());
    }

    #[test]
    fn test_take_counts_down_to_empty() {
        let mut inventory = Inventory::with_capacities(&[2, 0]).unwrap();
        assert!(inventory.is_tracked());
        assert_eq!(inventory.check(1), Err(JobError::SlotEmpty { slot: 1 }));

        inventory.take(0);
        assert_eq!(inventory.remaining(0), Some(1));
        inventory.take(0);
        assert_eq!(inventory.check(0), Err(JobError::SlotEmpty { slot: 0 }));
        inventory.take(0);
        assert_eq!(inventory.remaining(0), Some(0));

        // Slots past the loaded counts stay untracked
        assert_eq!(inventory.remaining(2), None);
        assert_eq!(inventory.remaining(200), None);
    }

    #[test]
    fn test_too_many_capacities() {
        let counts = [1u16; MAX_CARTRIDGES + 1];
        assert_eq!(Inventory::with_capacities(&counts), Err(ConfigError::TooManySlots));
    }
}
