//! Allocation proof verification.
//!
//! The eligible set is committed to as the root of a binary keccak256 tree.
//! A leaf binds a claimant to its amount and cancelable flag; a proof is the
//! list of siblings from that leaf up to the root.

use soroban_sdk::{xdr::ToXdr, Address, Bytes, BytesN, Env};

use crate::types::{AllocationCommitment, AllocationProof, MAX_TREE_DEPTH};

/// Leaf and inner-node preimages start with distinct tags so neither can
/// stand in for the other.
const LEAF_TAG: u8 = 0x00;
const NODE_TAG: u8 = 0x01;

pub fn leaf_hash(env: &Env, claimant: &Address, amount: i128, cancelable: bool) -> BytesN<32> {
    let mut preimage = Bytes::from_array(env, &[LEAF_TAG]);
    preimage.append(&claimant.clone().to_xdr(env));
    preimage.extend_from_array(&amount.to_be_bytes());
    preimage.push_back(cancelable as u8);
    env.crypto().keccak256(&preimage).to_bytes()
}

pub fn hash_pair(env: &Env, left: &BytesN<32>, right: &BytesN<32>) -> BytesN<32> {
    let mut preimage = Bytes::from_array(env, &[NODE_TAG]);
    preimage.extend_from_array(&left.to_array());
    preimage.extend_from_array(&right.to_array());
    env.crypto().keccak256(&preimage).to_bytes()
}

/// Recomputes the root from `claimant`'s leaf and compares it to the commitment.
pub fn verify(
    env: &Env,
    commitment: &AllocationCommitment,
    claimant: &Address,
    proof: &AllocationProof,
) -> bool {
    if proof.amount <= 0 {
        return false;
    }
    if proof.siblings.len() != commitment.depth {
        return false;
    }
    // Direction bits above the tree depth would be silently ignored otherwise.
    if commitment.depth < MAX_TREE_DEPTH && proof.path >> commitment.depth != 0 {
        return false;
    }

    let mut node = leaf_hash(env, claimant, proof.amount, proof.cancelable);
    for (level, sibling) in proof.siblings.iter().enumerate() {
        node = if proof.path & (1u32 << level) == 0 {
            hash_pair(env, &node, &sibling)
        } else {
            hash_pair(env, &sibling, &node)
        };
    }

    node == commitment.root
}
