use soroban_sdk::{symbol_short, Address, Env};

pub fn claimed(env: &Env, claimant: &Address, amount: i128, cancelable: bool) {
    env.events()
        .publish((symbol_short!("claim"), claimant.clone()), (amount, cancelable));
}

pub fn withdrawn(env: &Env, claimant: &Address, amount: i128) {
    env.events()
        .publish((symbol_short!("withdraw"), claimant.clone()), amount);
}

pub fn swapped_in(env: &Env, claimant: &Address, asset: &Address, paid: i128, credited: i128) {
    env.events().publish(
        (symbol_short!("swap_in"), claimant.clone(), asset.clone()),
        (paid, credited),
    );
}

pub fn redeemed(env: &Env, claimant: &Address, amount: i128) {
    env.events()
        .publish((symbol_short!("redeem"), claimant.clone()), amount);
}

pub fn canceled(env: &Env, claimant: &Address, frozen: i128, forfeited: i128) {
    env.events()
        .publish((symbol_short!("cancel"), claimant.clone()), (frozen, forfeited));
}
