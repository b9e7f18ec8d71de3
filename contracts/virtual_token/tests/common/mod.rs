#![allow(dead_code)]

use soroban_sdk::{
    testutils::{Address as _, Events, Ledger},
    token::{Client as TokenClient, StellarAssetClient},
    Address, BytesN, Env, Val, Vec as SorobanVec,
};

use virtual_token::proof::{hash_pair, leaf_hash};
use virtual_token::{
    AllocationCommitment, AllocationProof, Config, ForfeitPolicy, ReferenceAsset, VirtualToken,
    VirtualTokenClient, PRICE_SCALE,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const START: u64 = 1_000_000;
pub const DURATION: u64 = 100;
pub const SUPPLY_CAP: i128 = 1_000_000;
pub const WALLET: i128 = 1_000_000;

/// Reference asset prices: 2, 0.5 and 3 units per virtual token.
pub const PRICES: [i128; 3] = [2 * PRICE_SCALE, PRICE_SCALE / 2, 3 * PRICE_SCALE];

// ---------------------------------------------------------------------------
// Allocation tree
// ---------------------------------------------------------------------------

/// Builds a padded binary tree over `(claimant, amount, cancelable)` leaves
/// and returns its commitment plus one proof per leaf, in input order.
pub fn build_tree(
    env: &Env,
    leaves: &[(Address, i128, bool)],
) -> (AllocationCommitment, std::vec::Vec<AllocationProof>) {
    let mut depth = 0u32;
    while (1usize << depth) < leaves.len() {
        depth += 1;
    }

    let mut level: std::vec::Vec<BytesN<32>> = leaves
        .iter()
        .map(|(claimant, amount, cancelable)| leaf_hash(env, claimant, *amount, *cancelable))
        .collect();
    level.resize(1usize << depth, BytesN::from_array(env, &[0u8; 32]));

    let mut levels = std::vec![level];
    while levels.last().unwrap().len() > 1 {
        let next: std::vec::Vec<BytesN<32>> = levels
            .last()
            .unwrap()
            .chunks(2)
            .map(|pair| hash_pair(env, &pair[0], &pair[1]))
            .collect();
        levels.push(next);
    }
    let root = levels.last().unwrap()[0].clone();

    let proofs = leaves
        .iter()
        .enumerate()
        .map(|(index, (_, amount, cancelable))| {
            let mut siblings = SorobanVec::new(env);
            for (height, nodes) in levels.iter().take(depth as usize).enumerate() {
                siblings.push_back(nodes[(index >> height) ^ 1].clone());
            }
            AllocationProof {
                amount: *amount,
                cancelable: *cancelable,
                siblings,
                path: index as u32,
            }
        })
        .collect();

    (AllocationCommitment { root, depth }, proofs)
}

// ---------------------------------------------------------------------------
// Contract setup
// ---------------------------------------------------------------------------

pub struct Asset {
    pub address: Address,
    pub funds_target: Address,
}

pub struct Member {
    pub address: Address,
    pub amount: i128,
    pub cancelable: bool,
    pub proof: AllocationProof,
}

pub struct Setup {
    pub env: Env,
    pub engine: VirtualTokenClient<'static>,
    pub engine_id: Address,
    pub real_token: Address,
    pub controller: Address,
    pub assets: std::vec::Vec<Asset>,
    pub members: std::vec::Vec<Member>,
}

impl Setup {
    pub fn member(&self, index: usize) -> &Member {
        &self.members[index]
    }

    pub fn at(&self, timestamp: u64) {
        self.env.ledger().set_timestamp(timestamp);
    }

    pub fn real_balance(&self, who: &Address) -> i128 {
        TokenClient::new(&self.env, &self.real_token).balance(who)
    }

    pub fn asset_balance(&self, asset: usize, who: &Address) -> i128 {
        TokenClient::new(&self.env, &self.assets[asset].address).balance(who)
    }

    /// Events the engine published during the last call, token events excluded.
    pub fn engine_events(&self) -> SorobanVec<(Address, SorobanVec<Val>, Val)> {
        let mut events = SorobanVec::new(&self.env);
        for event in self.env.events().all().iter() {
            if event.0 == self.engine_id {
                events.push_back(event);
            }
        }
        events
    }
}

/// Five members: 1000 cancelable, 2000 fixed, 500 cancelable, 4000 fixed,
/// 300 fixed.
pub fn create_setup() -> Setup {
    create_setup_with(SUPPLY_CAP, SUPPLY_CAP, ForfeitPolicy::Locked)
}

pub fn create_setup_with(supply_cap: i128, funding: i128, policy: ForfeitPolicy) -> Setup {
    let env = Env::default();
    let controller = Address::generate(&env);
    create_setup_in(env, controller, supply_cap, funding, policy)
}

/// Deploys into an existing environment with a caller-provided controller.
pub fn create_setup_in(
    env: Env,
    controller: Address,
    supply_cap: i128,
    funding: i128,
    policy: ForfeitPolicy,
) -> Setup {
    env.mock_all_auths();
    env.ledger().set_timestamp(START - 10);

    let token_admin = Address::generate(&env);

    let real_token = env
        .register_stellar_asset_contract_v2(token_admin.clone())
        .address();

    let allocations = [
        (1_000i128, true),
        (2_000, false),
        (500, true),
        (4_000, false),
        (300, false),
    ];
    let leaves: std::vec::Vec<(Address, i128, bool)> = allocations
        .iter()
        .map(|(amount, cancelable)| (Address::generate(&env), *amount, *cancelable))
        .collect();
    let (commitment, proofs) = build_tree(&env, &leaves);

    let mut assets = std::vec::Vec::new();
    let mut reference_assets = SorobanVec::new(&env);
    for price in PRICES {
        let address = env
            .register_stellar_asset_contract_v2(token_admin.clone())
            .address();
        let funds_target = Address::generate(&env);
        for (member, _, _) in &leaves {
            StellarAssetClient::new(&env, &address).mint(member, &WALLET);
        }
        reference_assets.push_back(ReferenceAsset {
            asset: address.clone(),
            price,
            funds_target: funds_target.clone(),
        });
        assets.push(Asset {
            address,
            funds_target,
        });
    }

    let config = Config {
        commitment,
        real_token: real_token.clone(),
        controller: controller.clone(),
        supply_cap,
        vesting_start: START,
        vesting_duration: DURATION,
        reference_assets,
        forfeit_policy: policy,
    };

    let engine_id = env.register(VirtualToken, (config,));
    let engine = VirtualTokenClient::new(&env, &engine_id);
    if funding > 0 {
        StellarAssetClient::new(&env, &real_token).mint(&engine_id, &funding);
    }

    let members = leaves
        .into_iter()
        .zip(proofs)
        .map(|((address, amount, cancelable), proof)| Member {
            address,
            amount,
            cancelable,
            proof,
        })
        .collect();

    Setup {
        env,
        engine,
        engine_id,
        real_token,
        controller,
        assets,
        members,
    }
}
