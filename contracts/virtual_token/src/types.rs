use soroban_sdk::{contracttype, Address, BytesN, Vec};

/// Fixed-point scale of reference asset prices.
pub const PRICE_SCALE: i128 = 1_000_000_000_000_000_000;

/// Upper bound on configured reference assets.
pub const MAX_REFERENCE_ASSETS: u32 = 3;

/// Deepest allocation tree a path bitmask can describe.
pub const MAX_TREE_DEPTH: u32 = 32;

/// Root of the allocation hash tree and the depth every proof must match.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AllocationCommitment {
    pub root: BytesN<32>,
    pub depth: u32,
}

/// Claimant-supplied evidence that `(claimant, amount, cancelable)` is a leaf
/// of the committed allocation tree.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AllocationProof {
    pub amount: i128,
    pub cancelable: bool,
    /// Sibling hashes ordered from the leaf level upwards.
    pub siblings: Vec<BytesN<32>>,
    /// Bit `i` set: the running node is the right child at level `i`.
    pub path: u32,
}

/// An asset accepted as payment for instantly swappable virtual token.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReferenceAsset {
    pub asset: Address,
    /// Units of `asset` per unit of virtual token, scaled by `PRICE_SCALE`.
    pub price: i128,
    /// Receives the payments made in `asset`.
    pub funds_target: Address,
}

/// What happens to the unvested remainder of a canceled grant.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ForfeitPolicy {
    /// Stays counted against the supply cap and can never be released.
    Locked,
    /// Frees supply headroom that later swap-ins may use.
    ReturnToPool,
}

/// Deployment parameters. Immutable once the contract is constructed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub commitment: AllocationCommitment,
    pub real_token: Address,
    pub controller: Address,
    pub supply_cap: i128,
    pub vesting_start: u64,
    pub vesting_duration: u64,
    pub reference_assets: Vec<ReferenceAsset>,
    pub forfeit_policy: ForfeitPolicy,
}

/// Per-address vesting record. Created once by a claim and never deleted.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VestingGrant {
    pub full_amount: i128,
    pub cancelable: bool,
    pub start: u64,
    pub duration: u64,
    /// Cumulative amount already paid out in real token.
    pub withdrawn: i128,
    pub canceled_at: Option<u64>,
}

/// Process-wide running totals.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GlobalAccounting {
    pub supply_cap: i128,
    /// Sum of `full_amount` over every grant ever created.
    pub total_granted: i128,
    /// Virtual token credited by priced swap-ins.
    pub total_swapped: i128,
    /// Real token transferred out of the engine.
    pub total_released: i128,
    /// Unvested remainders of canceled grants.
    pub total_forfeited: i128,
    /// Part of `total_forfeited` handed back to the supply pool.
    pub total_returned: i128,
}

/// Running totals for one reference asset.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AssetTotals {
    pub paid: i128,
    pub credited: i128,
}
