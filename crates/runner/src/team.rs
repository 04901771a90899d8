use crate::{
    initialize, mint_in_rounds, resolve_contract, CollectionConfig, ProgressRecord, RunnerError,
    StateStore,
};
use alloy_primitives::{Address, B256};
use mintctl_allowlist::AllowList;
use mintctl_contract::{CollectionContract, ContractBackend, ContractError, SignerRole};
use mintctl_primitives::MintCategory;
use std::{collections::BTreeMap, path::PathBuf};
use tracing::{debug, error, info, instrument, warn};

/// Outcome of a team mint run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMintReport {
    /// Collection minted from.
    pub contract: Address,
    /// True if the collection was deployed by this run.
    pub freshly_deployed: bool,
    /// Items minted by this run, per category.
    pub minted: BTreeMap<MintCategory, u64>,
    /// Error log written for each failed category.
    pub failures: BTreeMap<MintCategory, PathBuf>,
}

impl TeamMintReport {
    /// Returns true if every category finished.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Mints the team's reserved share of every category.
///
/// The run is resumable: the remaining quantity per category lives in the
/// progress file and is updated after every confirmed round. The progress
/// file is only resumed for the collection named in the contract file; for any
/// other collection the remaining quantity is recomputed from what the team
/// has already claimed on chain. A failing category is logged and skipped so
/// the others still run; the progress file (and the contract file, if it names
/// this collection) is only deleted once every category is done.
#[derive(Debug)]
pub struct TeamMint<'a, B> {
    backend: &'a B,
    store: &'a StateStore,
    config: &'a CollectionConfig,
    base_uri: Option<String>,
    contract_address: Option<Address>,
}

impl<'a, B: ContractBackend> TeamMint<'a, B> {
    /// Creates a run over `backend` using the files in `store`.
    pub const fn new(backend: &'a B, store: &'a StateStore, config: &'a CollectionConfig) -> Self {
        Self { backend, store, config, base_uri: None, contract_address: None }
    }

    /// Base URI set on a freshly deployed collection.
    pub fn with_base_uri(mut self, base_uri: Option<String>) -> Self {
        self.base_uri = base_uri;
        self
    }

    /// Attaches to `address` instead of the recorded or a new collection.
    pub fn with_contract_address(mut self, address: Option<Address>) -> Self {
        self.contract_address = address;
        self
    }

    /// Runs the team mint.
    ///
    /// Errors returned here happened before any category was attempted.
    /// Per-category failures are reported in [`TeamMintReport::failures`].
    #[instrument(skip_all)]
    pub async fn run(self) -> Result<TeamMintReport, RunnerError> {
        let lock = self.store.lock()?;
        debug!(path = %lock.path().display(), "state directory locked");

        let deployer = self
            .backend
            .signer_address(SignerRole::Owner)
            .ok_or(ContractError::MissingSigner(SignerRole::Owner))?;
        let team = self
            .backend
            .signer_address(SignerRole::Team)
            .ok_or(ContractError::MissingSigner(SignerRole::Team))?;
        info!(%deployer, %team, state_dir = %self.store.dir().display(), "starting team mint");

        let recorded = self.store.load_contract()?.map(|record| record.contract);
        let configured = self.contract_address.or(self.config.contract_address);
        let resolved = resolve_contract(
            self.backend,
            self.store,
            configured,
            &self.config.constructor_args(),
        )
        .await?;
        initialize(&resolved, self.base_uri.as_deref()).await?;
        let owner = &resolved.contract;

        let resumable = !resolved.freshly_deployed && recorded == Some(owner.address());
        let mut progress = self.load_progress(resumable, recorded, owner.address())?;

        let registered = owner.team_address().await?;
        if registered != team {
            let tx_hash = owner.set_team_address(team).await?;
            info!(%tx_hash, %team, "team address registered");
        }

        let allow_list = AllowList::new([deployer, team])?;
        let root = allow_list.root();
        let proof = allow_list.proof(team)?;
        let minter = self.backend.attach(owner.address(), SignerRole::Team)?;

        let mut report = TeamMintReport {
            contract: owner.address(),
            freshly_deployed: resolved.freshly_deployed,
            minted: BTreeMap::new(),
            failures: BTreeMap::new(),
        };

        for category in MintCategory::ALL {
            match self.mint_category(owner, &minter, &mut progress, category, root, &proof).await {
                Ok(minted) => {
                    report.minted.insert(category, minted);
                }
                Err(err) => {
                    error!(%category, "{err}");
                    let path = match self.store.write_error_log(Some(category), &err) {
                        Ok(path) => path,
                        Err(log_err) => {
                            warn!(%category, %log_err, "failed to write error log");
                            self.store.error_log_path(Some(category))
                        }
                    };
                    report.failures.insert(category, path);
                }
            }
        }

        if report.is_success() && progress.is_complete() {
            self.store.clear_progress()?;
            if recorded_for(self.store, report.contract)? {
                self.store.clear_contract()?;
            }
            info!(contract = %report.contract, "team mint complete");
        } else {
            warn!(
                failed = report.failures.len(),
                "team mint incomplete, rerun to resume from {}",
                self.store.progress_path().display()
            );
        }
        Ok(report)
    }

    /// Loads the progress file when it belongs to `contract`, otherwise starts
    /// over with every category not computed.
    fn load_progress(
        &self,
        resumable: bool,
        recorded: Option<Address>,
        contract: Address,
    ) -> Result<ProgressRecord, RunnerError> {
        let existing = self.store.load_progress()?;
        let progress = match existing {
            Some(_) if !resumable => {
                warn!(
                    path = %self.store.progress_path().display(),
                    recorded = ?recorded,
                    %contract,
                    "discarding progress recorded for another contract"
                );
                ProgressRecord::pending()
            }
            Some(progress) => {
                info!(?progress, "resuming team mint");
                progress
            }
            None => ProgressRecord::pending(),
        };
        self.store.save_progress(&progress)?;
        Ok(progress)
    }

    /// Prepares and mints one category, returning the quantity minted.
    async fn mint_category<C: CollectionContract>(
        &self,
        owner: &C,
        minter: &B::Contract,
        progress: &mut ProgressRecord,
        category: MintCategory,
        root: B256,
        proof: &[B256],
    ) -> Result<u64, RunnerError> {
        let id = category.feature_id();
        let feature = owner.feature(id).await?;

        let remaining = match progress.remaining(category) {
            Some(remaining) => remaining,
            None => {
                let share = feature.team_share(self.config.mint.team_share_divisor);
                let share = u64::try_from(share)
                    .ok()
                    .filter(|share| i64::try_from(*share).is_ok())
                    .ok_or(RunnerError::SupplyOverflow { category, supply: feature.supply })?;
                let claimed = minter.claimed(id, minter.signer()).await?;
                let remaining = share.saturating_sub(u64::try_from(claimed).unwrap_or(u64::MAX));
                progress.set_remaining(category, remaining);
                self.store.save_progress(progress)?;
                info!(
                    %category,
                    supply = %feature.supply,
                    share,
                    %claimed,
                    remaining,
                    "team share computed"
                );
                remaining
            }
        };

        if remaining == 0 {
            info!(%category, "nothing left to mint");
            return Ok(0);
        }

        if !feature.is_open {
            let tx_hash = owner.toggle_mint(id, true).await?;
            info!(%category, %tx_hash, "minting opened");
        }
        if category.is_proof_gated() && feature.root_differs(root) {
            let tx_hash = owner.set_merkle_root(id, root).await?;
            info!(%category, %tx_hash, %root, "merkle root set");
        }

        let outcome = mint_in_rounds(
            minter,
            self.store,
            progress,
            category,
            &feature,
            proof,
            &self.config.mint,
        )
        .await?;
        Ok(outcome.minted)
    }
}

fn recorded_for(store: &StateStore, contract: Address) -> Result<bool, RunnerError> {
    Ok(store.load_contract()?.is_some_and(|record| record.contract == contract))
}
