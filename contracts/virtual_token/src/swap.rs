//! Fixed-price conversion of reference asset payments into instantly
//! swappable virtual token, and the balances that result from it.

use soroban_sdk::{Address, Env, U256};

use crate::error::Error;
use crate::storage;
use crate::types::{AssetTotals, Config, ReferenceAsset, PRICE_SCALE};

pub fn find_asset(config: &Config, asset: &Address) -> Result<ReferenceAsset, Error> {
    config
        .reference_assets
        .iter()
        .find(|reference| reference.asset == *asset)
        .ok_or(Error::UnsupportedAsset)
}

/// Virtual token bought by `paid` units at `price`, rounded down.
pub fn quote(env: &Env, price: i128, paid: i128) -> Result<i128, Error> {
    if paid < 0 {
        return Err(Error::ZeroAmount);
    }
    if price <= 0 {
        return Err(Error::UnsupportedAsset);
    }

    let amount = U256::from_u128(env, paid as u128)
        .mul(&U256::from_u128(env, PRICE_SCALE as u128))
        .div(&U256::from_u128(env, price as u128));

    amount
        .to_u128()
        .and_then(|amount| i128::try_from(amount).ok())
        .ok_or(Error::SupplyExceeded)
}

/// A priced swap-in whose balances are computed but not yet stored.
pub struct PendingCredit {
    claimant: Address,
    asset: Address,
    balance: i128,
    totals: AssetTotals,
}

impl PendingCredit {
    pub fn commit(&self, env: &Env) {
        storage::set_instant_balance(env, &self.claimant, self.balance);
        storage::set_asset_totals(env, &self.asset, &self.totals);
    }
}

/// Computes the claimant's balance and the asset's totals after a swap-in.
pub fn stage_credit(
    env: &Env,
    claimant: &Address,
    asset: &Address,
    paid: i128,
    amount: i128,
) -> Result<PendingCredit, Error> {
    let balance = storage::get_instant_balance(env, claimant)
        .checked_add(amount)
        .ok_or(Error::SupplyExceeded)?;

    let mut totals = storage::get_asset_totals(env, asset);
    totals.paid = totals.paid.checked_add(paid).ok_or(Error::SupplyExceeded)?;
    totals.credited = totals
        .credited
        .checked_add(amount)
        .ok_or(Error::SupplyExceeded)?;

    Ok(PendingCredit {
        claimant: claimant.clone(),
        asset: asset.clone(),
        balance,
        totals,
    })
}

/// Balance left after redeeming `amount`.
pub fn debit(balance: i128, amount: i128) -> Result<i128, Error> {
    if amount <= 0 {
        return Err(Error::ZeroAmount);
    }
    if amount > balance {
        return Err(Error::InsufficientBalance);
    }
    Ok(balance - amount)
}
