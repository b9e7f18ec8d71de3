use soroban_sdk::contracterror;

/// Failure codes reported by the virtual token contract.
///
/// Codes are part of the public interface and must never be renumbered.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// The supplied proof does not fold up to the allocation commitment.
    InvalidProof = 1,
    /// The claimant already holds a vesting grant.
    AlreadyClaimed = 2,
    /// A grant record already exists for the address.
    DuplicateClaim = 3,
    /// The grant was created non-cancelable (or does not exist).
    NotCancelable = 4,
    AlreadyCanceled = 5,
    NothingToWithdraw = 6,
    /// No price is configured for the reference asset.
    UnsupportedAsset = 7,
    ZeroAmount = 8,
    InsufficientBalance = 9,
    /// Crediting would exceed the supply cap, or an amount overflowed.
    SupplyExceeded = 10,
    /// A token transfer to or from the engine did not complete.
    TransferFailed = 11,
    InvalidConfig = 12,
}
