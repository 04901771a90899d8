//! Minting lifecycle procedures for an NFT collection.
//!
//! This crate provides the procedures run by the `mintctl` binary:
//! - Resolving (or deploying) the collection contract
//! - Opening and closing sale phases
//! - Team-reserved minting in resumable, batched rounds
//!
//! All procedures are sequential; state that must survive a crash lives in
//! small JSON files managed by [`StateStore`].

/// Batched minting of a single category.
pub mod batch;
/// Collection and minting configuration.
pub mod config;
/// Runner error type.
pub mod error;
/// Contract handle resolution and one-time setup.
pub mod handle;
/// Sale phase toggles.
pub mod sale;
/// Progress, contract address, error log and lock files.
pub mod store;
/// Team-reserved minting across all categories.
pub mod team;

pub use batch::{mint_in_rounds, BatchOutcome};
pub use config::{AllowListName, CollectionConfig, ConfigError, MintSettings, PhaseIds};
pub use error::RunnerError;
pub use handle::{attach_existing, ensure_network, initialize, resolve_contract, ResolvedContract};
pub use sale::{set_phase, PhaseChange};
pub use store::{ContractRecord, ProgressRecord, RunLock, StateStore, StoreError};
pub use team::{TeamMint, TeamMintReport};

use std::future::Future;
use tracing::error;

/// Runs a procedure, writing any top-level failure to the store's `error.log`.
pub async fn with_error_log<T, F>(store: &StateStore, procedure: F) -> Result<T, RunnerError>
where
    F: Future<Output = Result<T, RunnerError>>,
{
    match procedure.await {
        Ok(value) => Ok(value),
        Err(err) => {
            match store.write_error_log(None, &err) {
                Ok(path) => error!(log = %path.display(), "{err}"),
                Err(log_err) => error!(%log_err, "{err}, and the error log could not be written"),
            }
            Err(err)
        }
    }
}
