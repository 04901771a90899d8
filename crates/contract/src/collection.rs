use crate::ContractError;
use alloy_primitives::{Address, TxHash, B256, U256};
use async_trait::async_trait;
use mintctl_primitives::{FeatureInfo, MintCategory};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which configured key signs a contract handle's transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignerRole {
    /// Deployer and contract owner; runs admin actions.
    Owner,
    /// Team wallet receiving the reserved mints.
    Team,
}

impl fmt::Display for SignerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => f.write_str("owner"),
            Self::Team => f.write_str("team"),
        }
    }
}

/// Constructor arguments of a new collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorArgs {
    /// Collection name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Metadata URI served before reveal.
    pub hidden_metadata_uri: String,
}

/// A single tier mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintRequest {
    /// Tier to mint from.
    pub category: MintCategory,
    /// Number of items.
    pub quantity: u64,
    /// Allow-list proof, ignored for tiers that are not proof gated.
    pub proof: Vec<B256>,
    /// Payment sent with the transaction.
    pub value: U256,
    /// Fixed gas ceiling, estimated when `None`.
    pub gas_limit: Option<u64>,
}

/// A handle to a deployed collection, bound to one signer.
///
/// Every write waits for the transaction receipt and fails with
/// [`ContractError::Reverted`] when the transaction did not succeed.
#[async_trait]
pub trait CollectionContract: Send + Sync {
    /// Address of the contract.
    fn address(&self) -> Address;

    /// Address of the signer sending this handle's transactions.
    fn signer(&self) -> Address;

    /// Reads a feature's cost, supply, open flag and Merkle root.
    async fn feature(&self, id: u8) -> Result<FeatureInfo, ContractError>;

    /// Opens or closes minting for a feature.
    async fn toggle_mint(&self, id: u8, open: bool) -> Result<TxHash, ContractError>;

    /// Replaces a feature's allow-list root.
    async fn set_merkle_root(&self, id: u8, root: B256) -> Result<TxHash, ContractError>;

    /// Number of items `account` has claimed from a feature.
    async fn claimed(&self, id: u8, account: Address) -> Result<U256, ContractError>;

    /// Mints from a tier, paying `request.value`.
    async fn mint(&self, request: MintRequest) -> Result<TxHash, ContractError>;

    /// Currently registered team address.
    async fn team_address(&self) -> Result<Address, ContractError>;

    /// Registers the team address.
    async fn set_team_address(&self, team: Address) -> Result<TxHash, ContractError>;

    /// Sets the revealed metadata base URI.
    async fn set_base_uri(&self, uri: &str) -> Result<TxHash, ContractError>;
}

/// Connection to a chain that can deploy and attach to collections.
#[async_trait]
pub trait ContractBackend: Send + Sync {
    /// Handle type produced by [`ContractBackend::attach`].
    type Contract: CollectionContract;

    /// Chain id reported by the node.
    async fn chain_id(&self) -> Result<u64, ContractError>;

    /// Address of the signer for `role`, if one is configured.
    fn signer_address(&self, role: SignerRole) -> Option<Address>;

    /// Returns true if there is contract code at `address`.
    async fn has_code(&self, address: Address) -> Result<bool, ContractError>;

    /// Deploys a new collection from the owner account and returns its address.
    async fn deploy(&self, args: &ConstructorArgs) -> Result<Address, ContractError>;

    /// Binds a handle for the collection at `address` to the `role` signer.
    fn attach(&self, address: Address, role: SignerRole) -> Result<Self::Contract, ContractError>;
}
