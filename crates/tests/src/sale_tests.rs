use alloy_primitives::Address;
use eyre::Result;
use mintctl_allowlist::{AllowList, AllowListError};
use mintctl_contract::{ContractBackend, SignerRole};
use mintctl_primitives::SalePhase;
use mintctl_runner::{set_phase, RunnerError};

use crate::common::{test_config, MockBackend, Write, RESERVE_MEMBERS};

fn attached() -> Result<(MockBackend, mintctl_runner::PhaseIds, crate::common::MockCollection)> {
    let backend = MockBackend::default();
    let address = Address::with_last_byte(0xaa);
    backend.install(address);
    let contract = backend.attach(address, SignerRole::Owner)?;
    Ok((backend, test_config(10).phases, contract))
}

#[tokio::test]
async fn public_toggle_is_idempotent() -> Result<()> {
    let (backend, phases, contract) = attached()?;
    let config = test_config(10);
    let id = phases.public;

    let opened = set_phase(&contract, SalePhase::Public, true, &config).await?;
    assert!(opened.toggled);
    assert!(opened.tx_hash.is_some());
    assert!(!opened.root_updated);

    let again = set_phase(&contract, SalePhase::Public, true, &config).await?;
    assert!(!again.toggled);
    assert_eq!(again.tx_hash, None);
    assert_eq!(backend.state().writes, vec![Write::ToggleMint { id, open: true }]);

    let closed = set_phase(&contract, SalePhase::Public, false, &config).await?;
    assert!(closed.toggled);
    assert!(!closed.open);
    assert!(!set_phase(&contract, SalePhase::Public, false, &config).await?.toggled);

    let state = backend.state();
    assert_eq!(state.writes.len(), 2);
    assert!(!state.features[&id].is_open);
    assert_eq!(closed.supply, state.features[&id].supply);
    Ok(())
}

#[tokio::test]
async fn opening_reserve_publishes_the_reserve_root() -> Result<()> {
    let (backend, phases, contract) = attached()?;
    let config = test_config(10);
    let id = phases.reserve;
    let root = AllowList::new(RESERVE_MEMBERS)?.root();

    let change = set_phase(&contract, SalePhase::Reserve, true, &config).await?;

    assert!(change.root_updated);
    assert!(change.toggled);
    assert_eq!(
        backend.state().writes,
        vec![Write::SetMerkleRoot { id, root }, Write::ToggleMint { id, open: true }]
    );

    // same list, already open: nothing to send
    let again = set_phase(&contract, SalePhase::Reserve, true, &config).await?;
    assert!(!again.root_updated);
    assert!(!again.toggled);
    assert_eq!(backend.state().writes.len(), 2);
    Ok(())
}

#[tokio::test]
async fn changed_reserve_list_updates_the_root() -> Result<()> {
    let (backend, phases, contract) = attached()?;
    let mut config = test_config(10);
    set_phase(&contract, SalePhase::Reserve, true, &config).await?;

    config.allowlists.reserve.truncate(2);
    let change = set_phase(&contract, SalePhase::Reserve, true, &config).await?;

    assert!(change.root_updated);
    assert!(!change.toggled);
    let expected = AllowList::new(RESERVE_MEMBERS[..2].iter().copied())?.root();
    assert_eq!(backend.state().features[&phases.reserve].merkle_root, expected);
    Ok(())
}

#[tokio::test]
async fn closing_reserve_leaves_the_root_alone() -> Result<()> {
    let (backend, phases, contract) = attached()?;
    let config = test_config(10);
    set_phase(&contract, SalePhase::Reserve, true, &config).await?;

    let change = set_phase(&contract, SalePhase::Reserve, false, &config).await?;

    assert!(!change.root_updated);
    assert!(change.toggled);
    assert_eq!(
        backend.state().writes.last(),
        Some(&Write::ToggleMint { id: phases.reserve, open: false })
    );
    Ok(())
}

#[tokio::test]
async fn empty_reserve_list_is_an_error() -> Result<()> {
    let (backend, _, contract) = attached()?;
    let mut config = test_config(10);
    config.allowlists.reserve.clear();

    let err = set_phase(&contract, SalePhase::Reserve, true, &config).await.unwrap_err();

    assert!(matches!(err, RunnerError::AllowList(AllowListError::Empty)));
    assert!(backend.state().writes.is_empty());
    Ok(())
}
