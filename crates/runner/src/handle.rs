use crate::{ContractRecord, RunnerError, StateStore};
use alloy_primitives::Address;
use mintctl_contract::{CollectionContract, ConstructorArgs, ContractBackend, SignerRole};
use mintctl_primitives::Network;
use tracing::{info, warn};

/// An owner-bound contract handle and how it was obtained.
#[derive(Debug)]
pub struct ResolvedContract<C> {
    /// Owner-bound handle.
    pub contract: C,
    /// True if the contract was deployed by this run.
    pub freshly_deployed: bool,
}

/// Fails unless the backend is connected to `network`.
pub async fn ensure_network<B: ContractBackend>(
    backend: &B,
    network: Network,
) -> Result<(), RunnerError> {
    let actual = backend.chain_id().await?;
    if actual != network.chain_id() {
        if let Some(served) = Network::from_chain_id(actual) {
            warn!(?served, "RPC endpoint serves another known network");
        }
        return Err(RunnerError::WrongChain { network, expected: network.chain_id(), actual });
    }
    info!(?network, chain_id = actual, currency = network.symbol(), "connected");
    Ok(())
}

/// Attaches to an explicitly configured or recorded collection, deploying a
/// new one when there is neither.
///
/// A freshly deployed address is recorded before anything else happens.
pub async fn resolve_contract<B: ContractBackend>(
    backend: &B,
    store: &StateStore,
    configured: Option<Address>,
    args: &ConstructorArgs,
) -> Result<ResolvedContract<B::Contract>, RunnerError> {
    if let Some(address) = known_address(store, configured)? {
        let contract = attach_checked(backend, address).await?;
        return Ok(ResolvedContract { contract, freshly_deployed: false });
    }

    info!(name = %args.name, symbol = %args.symbol, "deploying collection");
    let address = backend.deploy(args).await.map_err(RunnerError::Deploy)?;
    store.save_contract(&ContractRecord { contract: address })?;
    info!(%address, "collection deployed");

    let contract = backend.attach(address, SignerRole::Owner)?;
    Ok(ResolvedContract { contract, freshly_deployed: true })
}

/// Attaches to an explicitly configured or recorded collection without ever
/// deploying.
pub async fn attach_existing<B: ContractBackend>(
    backend: &B,
    store: &StateStore,
    configured: Option<Address>,
) -> Result<B::Contract, RunnerError> {
    let address = known_address(store, configured)?
        .ok_or_else(|| RunnerError::NoContract(store.contract_path()))?;
    attach_checked(backend, address).await
}

/// One-time setup of a freshly deployed collection.
///
/// Returns true if any setup transaction was sent.
pub async fn initialize<C: CollectionContract>(
    resolved: &ResolvedContract<C>,
    base_uri: Option<&str>,
) -> Result<bool, RunnerError> {
    if !resolved.freshly_deployed {
        return Ok(false);
    }
    let Some(uri) = base_uri.filter(|uri| !uri.is_empty()) else {
        warn!("no base URI configured, skipping base URI setup");
        return Ok(false);
    };

    let tx_hash = resolved.contract.set_base_uri(uri).await?;
    info!(%tx_hash, uri, "base URI set");
    Ok(true)
}

fn known_address(
    store: &StateStore,
    configured: Option<Address>,
) -> Result<Option<Address>, RunnerError> {
    if let Some(address) = configured {
        return Ok(Some(address));
    }
    Ok(store.load_contract()?.map(|record| record.contract))
}

async fn attach_checked<B: ContractBackend>(
    backend: &B,
    address: Address,
) -> Result<B::Contract, RunnerError> {
    if !backend.has_code(address).await? {
        return Err(RunnerError::NoCode(address));
    }
    info!(%address, "attaching to deployed collection");
    Ok(backend.attach(address, SignerRole::Owner)?)
}
