//! Vesting bookkeeping for claimed allocations.
//!
//! All time-dependent functions take `now` explicitly so they stay pure; the
//! contract feeds them the ledger timestamp.

use soroban_sdk::{Address, Env};

use crate::error::Error;
use crate::storage;
use crate::types::VestingGrant;

/// Linear release of `total` over `[start, start + duration]`, rounded down.
///
/// Split into quotient and remainder so that `total * elapsed` never has to be
/// materialised; the result is exact for every non-negative `i128` total.
pub fn linear_vested(total: i128, start: u64, duration: u64, now: u64) -> i128 {
    if now <= start {
        return 0;
    }

    let elapsed = now - start;
    if elapsed >= duration {
        return total;
    }

    let span = duration as i128;
    let whole = total / span * elapsed as i128;
    let part = (total % span) as u128 * elapsed as u128 / duration as u128;

    whole + part as i128
}

impl VestingGrant {
    pub fn new(full_amount: i128, cancelable: bool, start: u64, duration: u64) -> Self {
        VestingGrant {
            full_amount,
            cancelable,
            start,
            duration,
            withdrawn: 0,
            canceled_at: None,
        }
    }

    /// Amount accrued by `now`, frozen at the cancellation instant if any.
    pub fn vested_amount(&self, now: u64) -> i128 {
        let effective = match self.canceled_at {
            Some(canceled_at) if canceled_at < now => canceled_at,
            _ => now,
        };
        linear_vested(self.full_amount, self.start, self.duration, effective)
    }

    pub fn releasable(&self, now: u64) -> i128 {
        self.vested_amount(now) - self.withdrawn
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled_at.is_some()
    }

    /// Marks everything vested by `now` as withdrawn and returns the delta.
    pub fn withdraw(&mut self, now: u64) -> Result<i128, Error> {
        let delta = self.releasable(now);
        if delta <= 0 {
            return Err(Error::NothingToWithdraw);
        }
        self.withdrawn += delta;
        Ok(delta)
    }

    /// Freezes accrual at `now`. Returns the remainder that can never vest.
    pub fn cancel(&mut self, now: u64) -> Result<i128, Error> {
        if !self.cancelable {
            return Err(Error::NotCancelable);
        }
        if self.is_canceled() {
            return Err(Error::AlreadyCanceled);
        }

        let forfeited = self.full_amount - self.vested_amount(now);
        self.canceled_at = Some(now);
        Ok(forfeited)
    }
}

/// Creates and stores the one grant `claimant` may ever hold.
pub fn create_grant(
    env: &Env,
    claimant: &Address,
    amount: i128,
    cancelable: bool,
    start: u64,
    duration: u64,
) -> Result<VestingGrant, Error> {
    if storage::has_grant(env, claimant) {
        return Err(Error::DuplicateClaim);
    }
    if amount <= 0 {
        return Err(Error::ZeroAmount);
    }

    let grant = VestingGrant::new(amount, cancelable, start, duration);
    storage::set_grant(env, claimant, &grant);
    Ok(grant)
}
