use crate::{MintSettings, ProgressRecord, RunnerError, StateStore};
use alloy_primitives::B256;
use mintctl_contract::{CollectionContract, MintRequest};
use mintctl_primitives::{FeatureInfo, MintCategory, RoundPlan};
use tracing::{info, instrument};

/// Result of minting one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchOutcome {
    /// Rounds sent by this call.
    pub rounds: u64,
    /// Items minted by this call.
    pub minted: u64,
}

/// Mints the remaining quantity of `category` in rounds of at most
/// `settings.per_round_cap`.
///
/// The remaining quantity is read from `progress` and written back to the
/// store after every confirmed round, before the next round is sent. The
/// first failed round stops the loop; rounds already confirmed stay recorded.
#[instrument(skip_all, fields(%category))]
pub async fn mint_in_rounds<C: CollectionContract + ?Sized>(
    contract: &C,
    store: &StateStore,
    progress: &mut ProgressRecord,
    category: MintCategory,
    feature: &FeatureInfo,
    proof: &[B256],
    settings: &MintSettings,
) -> Result<BatchOutcome, RunnerError> {
    let mut remaining = progress.remaining(category).unwrap_or_default();
    let plan = RoundPlan::new(remaining, settings.per_round_cap);
    let rounds = plan.round_count();
    let mut outcome = BatchOutcome::default();

    if rounds == 0 {
        return Ok(outcome);
    }
    info!(quantity = remaining, rounds, "start minting {category}");

    for (index, quantity) in plan.rounds().enumerate() {
        let round = index as u64 + 1;
        info!(round, rounds, quantity, "minting");

        let request = MintRequest {
            category,
            quantity,
            proof: if category.is_proof_gated() { proof.to_vec() } else { Vec::new() },
            value: feature.payment_for(quantity),
            gas_limit: settings.gas_limit,
        };
        let tx_hash = contract.mint(request).await.map_err(|source| RunnerError::Round {
            category,
            round,
            rounds,
            remaining,
            source,
        })?;

        remaining -= quantity;
        progress.set_remaining(category, remaining);
        store.save_progress(progress)?;

        outcome.rounds += 1;
        outcome.minted += quantity;
        info!(round, %tx_hash, remaining, "round confirmed");
    }

    info!(minted = outcome.minted, "{category} minted");
    Ok(outcome)
}
