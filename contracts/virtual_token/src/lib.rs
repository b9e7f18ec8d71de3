#![no_std]

//! Virtual token distribution engine.
//!
//! Eligible addresses claim a vesting grant by proving membership in a
//! committed allocation tree. Vested amounts, and virtual token bought at a
//! fixed price in one of the reference assets, are paid out 1:1 in the real
//! token held by this contract.

use soroban_sdk::{contract, contractimpl, log, panic_with_error, token, Address, Env};

mod accounting;
mod error;
mod events;
pub mod proof;
mod storage;
mod swap;
mod types;
pub mod vesting;

pub use error::Error;
pub use types::*;

#[contract]
pub struct VirtualToken;

fn now(env: &Env) -> u64 {
    env.ledger().timestamp()
}

fn validate_config(config: &Config) -> Result<(), Error> {
    if config.commitment.depth > MAX_TREE_DEPTH
        || config.supply_cap <= 0
        || config.vesting_duration == 0
    {
        return Err(Error::InvalidConfig);
    }

    let assets = &config.reference_assets;
    if assets.is_empty() || assets.len() > MAX_REFERENCE_ASSETS {
        return Err(Error::InvalidConfig);
    }
    for (i, reference) in assets.iter().enumerate() {
        if reference.price <= 0 {
            return Err(Error::InvalidConfig);
        }
        if assets
            .iter()
            .skip(i + 1)
            .any(|other| other.asset == reference.asset)
        {
            return Err(Error::InvalidConfig);
        }
    }

    Ok(())
}

/// Sends `amount` of real token from the engine's custody to `to`.
fn pay_out(env: &Env, config: &Config, to: &Address, amount: i128) -> Result<(), Error> {
    let client = token::Client::new(env, &config.real_token);
    match client.try_transfer(&env.current_contract_address(), to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => {
            log!(env, "real token payout failed", to, amount);
            Err(Error::TransferFailed)
        }
    }
}

/// Moves the payment for a swap-in from the claimant to the asset's funds target.
fn collect_payment(
    env: &Env,
    reference: &ReferenceAsset,
    claimant: &Address,
    paid: i128,
) -> Result<(), Error> {
    let client = token::Client::new(env, &reference.asset);
    match client.try_transfer(claimant, &reference.funds_target, &paid) {
        Ok(Ok(())) => Ok(()),
        _ => {
            log!(env, "reference asset payment failed", claimant, paid);
            Err(Error::TransferFailed)
        }
    }
}

#[contractimpl]
impl VirtualToken {
    pub fn __constructor(env: Env, config: Config) {
        if let Err(err) = validate_config(&config) {
            panic_with_error!(&env, err);
        }

        storage::set_config(&env, &config);
        storage::set_accounting(&env, &GlobalAccounting::new(config.supply_cap));
        storage::bump_instance(&env);
    }

    // -----------------------------------------------------------------------
    // Claims and vesting
    // -----------------------------------------------------------------------

    /// Turns a proven allocation into the claimant's vesting grant.
    pub fn claim(env: Env, claimant: Address, proof: AllocationProof) -> Result<i128, Error> {
        claimant.require_auth();
        storage::bump_instance(&env);

        if storage::has_grant(&env, &claimant) {
            return Err(Error::AlreadyClaimed);
        }

        let config = storage::get_config(&env);
        if !crate::proof::verify(&env, &config.commitment, &claimant, &proof) {
            log!(&env, "allocation proof rejected", claimant);
            return Err(Error::InvalidProof);
        }

        let mut accounting = storage::get_accounting(&env);
        accounting.record_grant(proof.amount)?;

        vesting::create_grant(
            &env,
            &claimant,
            proof.amount,
            proof.cancelable,
            config.vesting_start,
            config.vesting_duration,
        )
        .map_err(|err| match err {
            Error::DuplicateClaim => Error::AlreadyClaimed,
            other => other,
        })?;
        storage::set_accounting(&env, &accounting);

        events::claimed(&env, &claimant, proof.amount, proof.cancelable);
        Ok(proof.amount)
    }

    /// Pays out everything vested since the last withdrawal.
    pub fn withdraw(env: Env, claimant: Address) -> Result<i128, Error> {
        claimant.require_auth();
        storage::bump_instance(&env);

        let config = storage::get_config(&env);
        let mut grant = storage::get_grant(&env, &claimant).ok_or(Error::NothingToWithdraw)?;
        let delta = grant.withdraw(now(&env))?;

        let mut accounting = storage::get_accounting(&env);
        accounting.record_release(delta)?;

        pay_out(&env, &config, &claimant, delta)?;
        storage::set_grant(&env, &claimant, &grant);
        storage::set_accounting(&env, &accounting);

        events::withdrawn(&env, &claimant, delta);
        Ok(delta)
    }

    /// Controller-only. Freezes a cancelable grant; returns the forfeited remainder.
    pub fn cancel(env: Env, claimant: Address) -> Result<i128, Error> {
        let config = storage::get_config(&env);
        config.controller.require_auth();
        storage::bump_instance(&env);

        let mut grant = storage::get_grant(&env, &claimant).ok_or(Error::NotCancelable)?;
        let at = now(&env);
        let forfeited = grant.cancel(at)?;

        let mut accounting = storage::get_accounting(&env);
        accounting.record_forfeit(forfeited, config.forfeit_policy);

        storage::set_grant(&env, &claimant, &grant);
        storage::set_accounting(&env, &accounting);

        events::canceled(&env, &claimant, grant.vested_amount(at), forfeited);
        Ok(forfeited)
    }

    // -----------------------------------------------------------------------
    // Instant swaps
    // -----------------------------------------------------------------------

    /// Buys instantly swappable virtual token with `paid` units of `asset`.
    pub fn swap_in(env: Env, claimant: Address, asset: Address, paid: i128) -> Result<i128, Error> {
        claimant.require_auth();
        storage::bump_instance(&env);

        let config = storage::get_config(&env);
        Self::purchase(&env, &config, &claimant, &asset, paid)
    }

    /// Converts instantly swappable balance into real token.
    pub fn redeem(env: Env, claimant: Address, amount: i128) -> Result<i128, Error> {
        claimant.require_auth();
        storage::bump_instance(&env);

        let config = storage::get_config(&env);
        Self::release_instant(&env, &config, &claimant, amount)
    }

    /// `swap_in` followed by redemption of exactly what it credited.
    pub fn swap_and_redeem(
        env: Env,
        claimant: Address,
        asset: Address,
        paid: i128,
    ) -> Result<i128, Error> {
        claimant.require_auth();
        storage::bump_instance(&env);

        let config = storage::get_config(&env);
        let amount = Self::purchase(&env, &config, &claimant, &asset, paid)?;
        Self::release_instant(&env, &config, &claimant, amount)
    }

    /// Redeems the whole instant balance and the releasable vested amount in one transfer.
    pub fn withdraw_all(env: Env, claimant: Address) -> Result<i128, Error> {
        claimant.require_auth();
        storage::bump_instance(&env);

        let config = storage::get_config(&env);
        let instant = storage::get_instant_balance(&env, &claimant);

        let at = now(&env);
        let mut grant = storage::get_grant(&env, &claimant);
        let vested = match grant.as_mut() {
            Some(grant) if grant.releasable(at) > 0 => grant.withdraw(at)?,
            _ => 0,
        };

        let total = instant.checked_add(vested).ok_or(Error::SupplyExceeded)?;
        if total == 0 {
            return Err(Error::NothingToWithdraw);
        }

        let mut accounting = storage::get_accounting(&env);
        accounting.record_release(total)?;

        pay_out(&env, &config, &claimant, total)?;
        if instant > 0 {
            storage::set_instant_balance(&env, &claimant, 0);
            events::redeemed(&env, &claimant, instant);
        }
        if let Some(grant) = grant.filter(|_| vested > 0) {
            storage::set_grant(&env, &claimant, &grant);
            events::withdrawn(&env, &claimant, vested);
        }
        storage::set_accounting(&env, &accounting);

        Ok(total)
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    pub fn get_config(env: Env) -> Config {
        storage::get_config(&env)
    }

    pub fn get_commitment(env: Env) -> AllocationCommitment {
        storage::get_config(&env).commitment
    }

    pub fn get_grant(env: Env, claimant: Address) -> Option<VestingGrant> {
        storage::get_grant(&env, &claimant)
    }

    pub fn is_claimed(env: Env, claimant: Address) -> bool {
        storage::has_grant(&env, &claimant)
    }

    pub fn vested_amount(env: Env, claimant: Address) -> i128 {
        let at = now(&env);
        Self::vested_amount_at(env, claimant, at)
    }

    pub fn vested_amount_at(env: Env, claimant: Address, at: u64) -> i128 {
        storage::get_grant(&env, &claimant)
            .map(|grant| grant.vested_amount(at))
            .unwrap_or(0)
    }

    pub fn releasable(env: Env, claimant: Address) -> i128 {
        storage::get_grant(&env, &claimant)
            .map(|grant| grant.releasable(now(&env)))
            .unwrap_or(0)
    }

    pub fn get_instant_balance(env: Env, claimant: Address) -> i128 {
        storage::get_instant_balance(&env, &claimant)
    }

    pub fn quote(env: Env, asset: Address, paid: i128) -> Result<i128, Error> {
        let config = storage::get_config(&env);
        let reference = swap::find_asset(&config, &asset)?;
        swap::quote(&env, reference.price, paid)
    }

    pub fn get_accounting(env: Env) -> GlobalAccounting {
        storage::get_accounting(&env)
    }

    pub fn get_asset_totals(env: Env, asset: Address) -> AssetTotals {
        storage::get_asset_totals(&env, &asset)
    }

    pub fn verify_allocation(env: Env, claimant: Address, proof: AllocationProof) -> bool {
        let config = storage::get_config(&env);
        crate::proof::verify(&env, &config.commitment, &claimant, &proof)
    }

    /// Supply bounds hold and custody covers every unit still owed.
    pub fn check_invariants(env: Env) -> bool {
        let config = storage::get_config(&env);
        let accounting = storage::get_accounting(&env);
        let custody = token::Client::new(&env, &config.real_token)
            .balance(&env.current_contract_address());

        accounting.is_consistent() && custody >= accounting.liabilities()
    }
}

impl VirtualToken {
    fn purchase(
        env: &Env,
        config: &Config,
        claimant: &Address,
        asset: &Address,
        paid: i128,
    ) -> Result<i128, Error> {
        let reference = swap::find_asset(config, asset)?;
        if paid <= 0 {
            return Err(Error::ZeroAmount);
        }

        let amount = swap::quote(env, reference.price, paid)?;
        if amount == 0 {
            return Err(Error::ZeroAmount);
        }

        let mut accounting = storage::get_accounting(env);
        accounting.record_swap(amount)?;
        let credit = swap::stage_credit(env, claimant, asset, paid, amount)?;

        collect_payment(env, &reference, claimant, paid)?;
        credit.commit(env);
        storage::set_accounting(env, &accounting);

        events::swapped_in(env, claimant, asset, paid, amount);
        Ok(amount)
    }

    fn release_instant(
        env: &Env,
        config: &Config,
        claimant: &Address,
        amount: i128,
    ) -> Result<i128, Error> {
        let remaining = swap::debit(storage::get_instant_balance(env, claimant), amount)?;

        let mut accounting = storage::get_accounting(env);
        accounting.record_release(amount)?;

        pay_out(env, config, claimant, amount)?;
        storage::set_instant_balance(env, claimant, remaining);
        storage::set_accounting(env, &accounting);

        events::redeemed(env, claimant, amount);
        Ok(amount)
    }
}
