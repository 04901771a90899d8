use alloy_primitives::Address;
use eyre::Result;
use mintctl_contract::{CollectionContract, ContractBackend};
use mintctl_primitives::Network;
use mintctl_runner::{
    attach_existing, ensure_network, initialize, resolve_contract, ContractRecord, RunnerError,
};

use crate::common::{test_config, MockBackend, TestDir, Write, DEPLOYER};

#[tokio::test]
async fn deploy_records_the_address_before_setup() -> Result<()> {
    let dir = TestDir::new();
    let backend = MockBackend::default();
    let config = test_config(10);

    let resolved = resolve_contract(&backend, &dir.store, None, &config.constructor_args()).await?;

    assert!(resolved.freshly_deployed);
    assert_eq!(resolved.contract.signer(), DEPLOYER);
    assert_eq!(
        dir.store.load_contract()?,
        Some(ContractRecord { contract: resolved.contract.address() })
    );
    assert_eq!(backend.state().deployments[0], config.constructor_args());

    assert!(initialize(&resolved, Some("ipfs://QmRevealed/")).await?);
    assert_eq!(backend.state().writes, vec![Write::SetBaseUri("ipfs://QmRevealed/".into())]);
    Ok(())
}

#[tokio::test]
async fn recorded_address_is_reused() -> Result<()> {
    let dir = TestDir::new();
    let backend = MockBackend::default();
    let args = test_config(10).constructor_args();

    let first = resolve_contract(&backend, &dir.store, None, &args).await?;
    let second = resolve_contract(&backend, &dir.store, None, &args).await?;

    assert!(!second.freshly_deployed);
    assert_eq!(second.contract.address(), first.contract.address());
    assert_eq!(backend.state().deployments.len(), 1);

    // one-time setup never runs on an attached contract
    assert!(!initialize(&second, Some("ipfs://QmRevealed/")).await?);
    assert!(backend.state().writes.is_empty());
    Ok(())
}

#[tokio::test]
async fn configured_address_wins_over_recorded_one() -> Result<()> {
    let dir = TestDir::new();
    let backend = MockBackend::default();
    let configured = Address::with_last_byte(0xaa);
    backend.install(configured);
    dir.store.save_contract(&ContractRecord { contract: Address::with_last_byte(0xbb) })?;

    let resolved =
        resolve_contract(&backend, &dir.store, Some(configured), &test_config(10).constructor_args())
            .await?;

    assert!(!resolved.freshly_deployed);
    assert_eq!(resolved.contract.address(), configured);
    Ok(())
}

#[tokio::test]
async fn empty_base_uri_is_skipped() -> Result<()> {
    let dir = TestDir::new();
    let backend = MockBackend::default();
    let resolved =
        resolve_contract(&backend, &dir.store, None, &test_config(10).constructor_args()).await?;

    assert!(!initialize(&resolved, Some("")).await?);
    assert!(!initialize(&resolved, None).await?);
    assert!(backend.state().writes.is_empty());
    Ok(())
}

#[tokio::test]
async fn attach_existing_never_deploys() -> Result<()> {
    let dir = TestDir::new();
    let backend = MockBackend::default();

    let err = attach_existing(&backend, &dir.store, None).await.unwrap_err();
    assert!(matches!(err, RunnerError::NoContract(path) if path == dir.store.contract_path()));
    assert!(backend.state().deployments.is_empty());

    let address = Address::with_last_byte(0xaa);
    backend.install(address);
    dir.store.save_contract(&ContractRecord { contract: address })?;
    let contract = attach_existing(&backend, &dir.store, None).await?;
    assert_eq!(contract.address(), address);
    Ok(())
}

#[tokio::test]
async fn network_mismatch_is_reported() -> Result<()> {
    let backend = MockBackend::default();
    ensure_network(&backend, Network::Hardhat).await?;

    let err = ensure_network(&backend, Network::Sepolia).await.unwrap_err();
    assert!(matches!(
        err,
        RunnerError::WrongChain { expected: 11_155_111, actual: 31_337, .. }
    ));
    assert_eq!(backend.chain_id().await?, Network::Hardhat.chain_id());
    Ok(())
}
