//! Alloy-backed collection client.

use crate::{
    abi::AvatarCollection::{self, AvatarCollectionInstance},
    CollectionContract, ConstructorArgs, ContractBackend, ContractError, MintRequest, SignerRole,
};
use alloy::{
    contract::SolCallBuilder,
    network::{Ethereum, EthereumWallet, ReceiptResponse, TransactionBuilder},
    providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
    sol_types::{SolCall, SolConstructor},
};
use alloy_primitives::{Address, Bytes, TxHash, B256, U256};
use alloy_rpc_types_eth::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use mintctl_primitives::{FeatureInfo, MintCategory};
use serde::Deserialize;
use std::{
    fmt,
    path::{Path, PathBuf},
};
use tracing::debug;
use url::Url;

/// Compiled contract artifact, as written by hardhat or foundry.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractArtifact {
    /// Creation bytecode without constructor arguments.
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// Reads an artifact JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ContractError> {
        let path = path.as_ref();
        let invalid = |reason: String| ContractError::Artifact { path: PathBuf::from(path), reason };

        let raw = std::fs::read_to_string(path).map_err(|err| invalid(err.to_string()))?;
        let artifact: Self = serde_json::from_str(&raw).map_err(|err| invalid(err.to_string()))?;
        if artifact.bytecode.is_empty() {
            return Err(invalid("empty bytecode".to_string()));
        }
        Ok(artifact)
    }
}

#[derive(Clone)]
struct SignedProvider {
    provider: DynProvider,
    address: Address,
}

impl fmt::Debug for SignedProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedProvider").field("address", &self.address).finish_non_exhaustive()
    }
}

impl SignedProvider {
    fn connect(rpc_url: &Url, signer: PrivateKeySigner) -> Self {
        let address = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(rpc_url.clone())
            .erased();
        Self { provider, address }
    }
}

/// JSON-RPC connection holding the owner key and, optionally, the team key.
#[derive(Debug, Clone)]
pub struct AlloyBackend {
    owner: SignedProvider,
    team: Option<SignedProvider>,
    bytecode: Option<Bytes>,
}

impl AlloyBackend {
    /// Connects to `rpc_url` with the owner signer and an optional team signer.
    pub fn connect(
        rpc_url: &Url,
        owner: PrivateKeySigner,
        team: Option<PrivateKeySigner>,
    ) -> Self {
        Self {
            owner: SignedProvider::connect(rpc_url, owner),
            team: team.map(|signer| SignedProvider::connect(rpc_url, signer)),
            bytecode: None,
        }
    }

    /// Sets the creation bytecode used by [`ContractBackend::deploy`].
    pub fn with_artifact(mut self, artifact: ContractArtifact) -> Self {
        self.bytecode = Some(artifact.bytecode);
        self
    }

    fn signed(&self, role: SignerRole) -> Option<&SignedProvider> {
        match role {
            SignerRole::Owner => Some(&self.owner),
            SignerRole::Team => self.team.as_ref(),
        }
    }
}

#[async_trait]
impl ContractBackend for AlloyBackend {
    type Contract = AlloyCollection;

    async fn chain_id(&self) -> Result<u64, ContractError> {
        Ok(self.owner.provider.get_chain_id().await?)
    }

    fn signer_address(&self, role: SignerRole) -> Option<Address> {
        self.signed(role).map(|signed| signed.address)
    }

    async fn has_code(&self, address: Address) -> Result<bool, ContractError> {
        let code = self.owner.provider.get_code_at(address).await?;
        Ok(!code.is_empty())
    }

    async fn deploy(&self, args: &ConstructorArgs) -> Result<Address, ContractError> {
        let bytecode = self.bytecode.as_ref().ok_or(ContractError::MissingBytecode)?;
        let constructor = AvatarCollection::constructorCall {
            name: args.name.clone(),
            symbol: args.symbol.clone(),
            hiddenMetadataUri: args.hidden_metadata_uri.clone(),
        };

        let mut code = bytecode.to_vec();
        code.extend_from_slice(&constructor.abi_encode());

        let tx = TransactionRequest::default().with_deploy_code(code);
        let pending = self.owner.provider.send_transaction(tx).await?;
        debug!(tx_hash = %pending.tx_hash(), "deployment submitted");

        let receipt = pending.get_receipt().await?;
        let tx_hash = receipt.transaction_hash;
        if !ReceiptResponse::status(&receipt) {
            return Err(ContractError::Reverted(tx_hash));
        }
        receipt.contract_address.ok_or(ContractError::NoContractAddress(tx_hash))
    }

    fn attach(&self, address: Address, role: SignerRole) -> Result<AlloyCollection, ContractError> {
        let signed = self.signed(role).ok_or(ContractError::MissingSigner(role))?;
        Ok(AlloyCollection {
            instance: AvatarCollection::new(address, signed.provider.clone()),
            signer: signed.address,
        })
    }
}

/// Collection handle backed by an alloy provider.
#[derive(Clone)]
pub struct AlloyCollection {
    instance: AvatarCollectionInstance<DynProvider>,
    signer: Address,
}

impl fmt::Debug for AlloyCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlloyCollection")
            .field("address", self.instance.address())
            .field("signer", &self.signer)
            .finish()
    }
}

async fn confirm(pending: PendingTransactionBuilder<Ethereum>) -> Result<TxHash, ContractError> {
    let receipt = pending.get_receipt().await?;
    let tx_hash = receipt.transaction_hash;
    if !ReceiptResponse::status(&receipt) {
        return Err(ContractError::Reverted(tx_hash));
    }
    debug!(%tx_hash, block = ?receipt.block_number, "transaction confirmed");
    Ok(tx_hash)
}

async fn send_payable<C: SolCall>(
    call: SolCallBuilder<&DynProvider, C>,
    value: U256,
    gas_limit: Option<u64>,
) -> Result<TxHash, ContractError> {
    let mut call = call.value(value);
    if let Some(gas) = gas_limit {
        call = call.gas(gas);
    }
    confirm(call.send().await?).await
}

#[async_trait]
impl CollectionContract for AlloyCollection {
    fn address(&self) -> Address {
        *self.instance.address()
    }

    fn signer(&self) -> Address {
        self.signer
    }

    async fn feature(&self, id: u8) -> Result<FeatureInfo, ContractError> {
        let feature = self.instance.feature(id).call().await?;
        Ok(FeatureInfo {
            cost: feature.cost,
            supply: feature.supply,
            is_open: feature.isOpen,
            merkle_root: feature.merkleRoot,
        })
    }

    async fn toggle_mint(&self, id: u8, open: bool) -> Result<TxHash, ContractError> {
        confirm(self.instance.toggleMint(id, open).send().await?).await
    }

    async fn set_merkle_root(&self, id: u8, root: B256) -> Result<TxHash, ContractError> {
        confirm(self.instance.setMerkleRoot(id, root).send().await?).await
    }

    async fn claimed(&self, id: u8, account: Address) -> Result<U256, ContractError> {
        Ok(self.instance.claimed(id, account).call().await?)
    }

    async fn mint(&self, request: MintRequest) -> Result<TxHash, ContractError> {
        let quantity = U256::from(request.quantity);
        match request.category {
            MintCategory::Legendary => {
                let call = self.instance.mintLegendary(quantity, request.proof);
                send_payable(call, request.value, request.gas_limit).await
            }
            MintCategory::Epic => {
                let call = self.instance.mintEpic(quantity, request.proof);
                send_payable(call, request.value, request.gas_limit).await
            }
            MintCategory::Rare => {
                let call = self.instance.mintRare(quantity);
                send_payable(call, request.value, request.gas_limit).await
            }
        }
    }

    async fn team_address(&self) -> Result<Address, ContractError> {
        Ok(self.instance.getTeamAddress().call().await?)
    }

    async fn set_team_address(&self, team: Address) -> Result<TxHash, ContractError> {
        confirm(self.instance.setTeamAddress(team).send().await?).await
    }

    async fn set_base_uri(&self, uri: &str) -> Result<TxHash, ContractError> {
        confirm(self.instance.setBaseURI(uri.to_string()).send().await?).await
    }
}
