use crate::{AllowListName, CollectionConfig, RunnerError};
use alloy_primitives::{TxHash, U256};
use mintctl_allowlist::AllowList;
use mintctl_contract::CollectionContract;
use mintctl_primitives::SalePhase;
use tracing::{info, instrument};

/// What [`set_phase`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    /// Phase that was set.
    pub phase: SalePhase,
    /// Requested state.
    pub open: bool,
    /// True if a new allow-list root was written.
    pub root_updated: bool,
    /// True if the open flag was flipped.
    pub toggled: bool,
    /// Transaction that flipped the open flag.
    pub tx_hash: Option<TxHash>,
    /// Supply of the phase after the change.
    pub supply: U256,
}

/// Opens or closes a sale phase.
///
/// Opening the reserve phase first publishes the root of the configured
/// reserve list when it differs from the one on chain. The open flag is only
/// flipped when it differs from `open`, so repeating a call sends nothing.
#[instrument(skip_all, fields(%phase, open))]
pub async fn set_phase<C: CollectionContract + ?Sized>(
    contract: &C,
    phase: SalePhase,
    open: bool,
    config: &CollectionConfig,
) -> Result<PhaseChange, RunnerError> {
    let id = config.phases.id(phase);
    let feature = contract.feature(id).await?;

    let mut root_updated = false;
    if open && phase.is_allow_listed() {
        let allow_list = AllowList::new(config.allowlists.get(AllowListName::Reserve).iter().copied())?;
        let root = allow_list.root();
        if feature.root_differs(root) {
            let tx_hash = contract.set_merkle_root(id, root).await?;
            info!(%tx_hash, %root, members = allow_list.len(), "allow-list root updated");
            root_updated = true;
        }
    }

    let toggled = feature.is_open != open;
    let mut tx_hash = None;
    if toggled {
        let hash = contract.toggle_mint(id, open).await?;
        info!(tx_hash = %hash, "{phase} sale {}", if open { "opened" } else { "closed" });
        tx_hash = Some(hash);
    } else {
        info!("{phase} sale already {}", if open { "open" } else { "closed" });
    }

    let supply = contract.feature(id).await?.supply;
    info!(%supply, "{phase} supply");

    Ok(PhaseChange { phase, open, root_updated, toggled, tx_hash, supply })
}
