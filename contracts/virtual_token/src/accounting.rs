//! Global supply accounting.
//!
//! Every credit or release of virtual token goes through these helpers, which
//! refuse any update that would break conservation:
//!
//! * credited (grants + swap-ins - returned forfeits) never exceeds the cap
//! * released never exceeds what was credited and not forfeited

use crate::error::Error;
use crate::types::{ForfeitPolicy, GlobalAccounting};

fn add(a: i128, b: i128) -> Result<i128, Error> {
    a.checked_add(b).ok_or(Error::SupplyExceeded)
}

impl GlobalAccounting {
    pub fn new(supply_cap: i128) -> Self {
        GlobalAccounting {
            supply_cap,
            ..Default::default()
        }
    }

    /// Virtual token counted against the supply cap.
    pub fn credited(&self) -> i128 {
        self.total_granted - self.total_returned + self.total_swapped
    }

    /// Virtual token still owed to holders in real token.
    pub fn liabilities(&self) -> i128 {
        self.total_granted - self.total_forfeited - self.total_released + self.total_swapped
    }

    pub fn remaining_supply(&self) -> i128 {
        self.supply_cap - self.credited()
    }

    pub fn record_grant(&mut self, amount: i128) -> Result<(), Error> {
        let granted = add(self.total_granted, amount)?;
        self.ensure_headroom(amount)?;
        self.total_granted = granted;
        Ok(())
    }

    pub fn record_swap(&mut self, amount: i128) -> Result<(), Error> {
        let swapped = add(self.total_swapped, amount)?;
        self.ensure_headroom(amount)?;
        self.total_swapped = swapped;
        Ok(())
    }

    pub fn record_release(&mut self, amount: i128) -> Result<(), Error> {
        if amount > self.liabilities() {
            return Err(Error::SupplyExceeded);
        }
        self.total_released += amount;
        Ok(())
    }

    pub fn record_forfeit(&mut self, amount: i128, policy: ForfeitPolicy) {
        self.total_forfeited += amount;
        if policy == ForfeitPolicy::ReturnToPool {
            self.total_returned += amount;
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.total_released >= 0
            && self.total_forfeited >= self.total_returned
            && self.credited() <= self.supply_cap
            && self.liabilities() >= 0
    }

    fn ensure_headroom(&self, amount: i128) -> Result<(), Error> {
        if amount > self.remaining_supply() {
            return Err(Error::SupplyExceeded);
        }
        Ok(())
    }
}
