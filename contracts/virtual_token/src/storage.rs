//! Keyed contract state.
//!
//! Configuration and global totals sit in instance storage. Per-address
//! records are persistent entries and are kept alive on every touch so the
//! audit trail is never archived.

use soroban_sdk::{contracttype, panic_with_error, Address, Env};

use crate::error::Error;
use crate::types::{AssetTotals, Config, GlobalAccounting, VestingGrant};

pub(crate) const DAY_IN_LEDGERS: u32 = 17_280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;
pub(crate) const RECORD_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const RECORD_LIFETIME_THRESHOLD: u32 = RECORD_BUMP_AMOUNT - DAY_IN_LEDGERS;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Config,
    Accounting,
    Grant(Address),
    InstantBalance(Address),
    AssetTotals(Address),
}

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn bump_record(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, RECORD_LIFETIME_THRESHOLD, RECORD_BUMP_AMOUNT);
}

pub fn get_config(env: &Env) -> Config {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .unwrap_or_else(|| panic_with_error!(env, Error::InvalidConfig))
}

pub fn set_config(env: &Env, config: &Config) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn get_accounting(env: &Env) -> GlobalAccounting {
    env.storage()
        .instance()
        .get(&DataKey::Accounting)
        .unwrap_or_default()
}

pub fn set_accounting(env: &Env, accounting: &GlobalAccounting) {
    env.storage().instance().set(&DataKey::Accounting, accounting);
}

pub fn has_grant(env: &Env, claimant: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Grant(claimant.clone()))
}

pub fn get_grant(env: &Env, claimant: &Address) -> Option<VestingGrant> {
    let key = DataKey::Grant(claimant.clone());
    let grant = env.storage().persistent().get(&key);
    if grant.is_some() {
        bump_record(env, &key);
    }
    grant
}

pub fn set_grant(env: &Env, claimant: &Address, grant: &VestingGrant) {
    let key = DataKey::Grant(claimant.clone());
    env.storage().persistent().set(&key, grant);
    bump_record(env, &key);
}

pub fn get_instant_balance(env: &Env, claimant: &Address) -> i128 {
    let key = DataKey::InstantBalance(claimant.clone());
    match env.storage().persistent().get(&key) {
        Some(balance) => {
            bump_record(env, &key);
            balance
        }
        None => 0,
    }
}

pub fn set_instant_balance(env: &Env, claimant: &Address, balance: i128) {
    let key = DataKey::InstantBalance(claimant.clone());
    env.storage().persistent().set(&key, &balance);
    bump_record(env, &key);
}

pub fn get_asset_totals(env: &Env, asset: &Address) -> AssetTotals {
    let key = DataKey::AssetTotals(asset.clone());
    match env.storage().persistent().get(&key) {
        Some(totals) => {
            bump_record(env, &key);
            totals
        }
        None => AssetTotals::default(),
    }
}

pub fn set_asset_totals(env: &Env, asset: &Address, totals: &AssetTotals) {
    let key = DataKey::AssetTotals(asset.clone());
    env.storage().persistent().set(&key, totals);
    bump_record(env, &key);
}
