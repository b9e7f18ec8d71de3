#![no_std]

//! Deterministic deployment of the distribution contracts.
//!
//! Every contract is created from this deployer with a caller-chosen salt, so
//! its address is known before deployment and can be baked into the
//! constructor arguments of the contracts deployed alongside it.

use soroban_sdk::{
    contract, contracterror, contractimpl, contractmeta, contracttype, panic_with_error, Address,
    BytesN, Env, Val, Vec,
};

contractmeta!(
    key = "Description",
    val = "Deterministic deployer for virtual token distribution contracts"
);

const DAY_IN_LEDGERS: u32 = 17_280;
const RECORD_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const RECORD_LIFETIME_THRESHOLD: u32 = RECORD_BUMP_AMOUNT - DAY_IN_LEDGERS;

#[contracttype]
#[derive(Clone)]
enum DataKey {
    Operator,
    DeployedCount,
    /// Address of the n-th deployed contract.
    DeployedAt(u32),
    /// Marker for every address this deployer created.
    Deployed(Address),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum DeployError {
    NotInitialized = 1,
    /// A contract already exists at the salt's address, or the salt repeats
    /// inside one bundle.
    SaltTaken = 2,
}

/// One contract creation inside a bundle.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deployment {
    pub wasm_hash: BytesN<32>,
    pub salt: BytesN<32>,
    pub constructor_args: Vec<Val>,
}

#[contract]
pub struct VirtualTokenDeployer;

#[contractimpl]
impl VirtualTokenDeployer {
    /// `operator` is usually a multisig account; only it can deploy.
    pub fn __constructor(env: Env, operator: Address) {
        env.storage().instance().set(&DataKey::Operator, &operator);
        env.storage().instance().set(&DataKey::DeployedCount, &0u32);
    }

    pub fn get_operator(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&DataKey::Operator)
            .unwrap_or_else(|| panic_with_error!(&env, DeployError::NotInitialized))
    }

    /// Address a deployment with `salt` will land on.
    pub fn predict_address(env: Env, salt: BytesN<32>) -> Address {
        env.deployer()
            .with_current_contract(salt)
            .deployed_address()
    }

    pub fn deploy(env: Env, deployment: Deployment) -> Result<Address, DeployError> {
        let addresses = Self::deploy_bundle(env.clone(), Vec::from_array(&env, [deployment]))?;
        Ok(addresses.get_unchecked(0))
    }

    /// Creates every contract in order. Salts are checked up front, so a taken
    /// or repeated salt deploys nothing.
    pub fn deploy_bundle(
        env: Env,
        deployments: Vec<Deployment>,
    ) -> Result<Vec<Address>, DeployError> {
        Self::get_operator(env.clone()).require_auth();

        let mut predicted = Vec::new(&env);
        for deployment in deployments.iter() {
            let address = Self::predict_address(env.clone(), deployment.salt);
            if Self::is_deployed(env.clone(), address.clone()) || predicted.contains(&address) {
                return Err(DeployError::SaltTaken);
            }
            predicted.push_back(address);
        }

        let mut addresses = Vec::new(&env);
        for deployment in deployments.iter() {
            let address = env
                .deployer()
                .with_current_contract(deployment.salt)
                .deploy_v2(deployment.wasm_hash, deployment.constructor_args);
            Self::record(&env, &address);
            addresses.push_back(address);
        }
        Ok(addresses)
    }

    pub fn deployed_count(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::DeployedCount)
            .unwrap_or(0)
    }

    /// The `index`-th contract created by this deployer, oldest first.
    pub fn get_deployment(env: Env, index: u32) -> Option<Address> {
        let key = DataKey::DeployedAt(index);
        let address = env.storage().persistent().get(&key);
        if address.is_some() {
            Self::bump(&env, &key);
        }
        address
    }

    pub fn is_deployed(env: Env, address: Address) -> bool {
        env.storage().persistent().has(&DataKey::Deployed(address))
    }
}

impl VirtualTokenDeployer {
    fn record(env: &Env, address: &Address) {
        let index = Self::deployed_count(env.clone());

        let at = DataKey::DeployedAt(index);
        env.storage().persistent().set(&at, address);
        Self::bump(env, &at);

        let marker = DataKey::Deployed(address.clone());
        env.storage().persistent().set(&marker, &true);
        Self::bump(env, &marker);

        env.storage()
            .instance()
            .set(&DataKey::DeployedCount, &(index + 1));
    }

    fn bump(env: &Env, key: &DataKey) {
        env.storage()
            .persistent()
            .extend_ttl(key, RECORD_LIFETIME_THRESHOLD, RECORD_BUMP_AMOUNT);
    }
}
