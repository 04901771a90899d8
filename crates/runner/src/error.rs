use crate::{ConfigError, StoreError};
use alloy_primitives::{Address, U256};
use mintctl_allowlist::AllowListError;
use mintctl_contract::ContractError;
use mintctl_primitives::{MintCategory, Network};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the minting procedures.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// A contract read or write failed.
    #[error(transparent)]
    Contract(#[from] ContractError),
    /// A state file could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The allow-list could not be built or queried.
    #[error(transparent)]
    AllowList(#[from] AllowListError),
    /// Deploying a new collection failed.
    #[error("deployment failed: {0}")]
    Deploy(#[source] ContractError),
    /// The recorded or configured address holds no contract.
    #[error("no contract code at {0}")]
    NoCode(Address),
    /// No collection address is configured or recorded.
    #[error("no collection address configured and none recorded in {}", .0.display())]
    NoContract(PathBuf),
    /// The RPC endpoint serves a different chain than the selected network.
    #[error("connected to chain {actual}, but {network:?} is chain {expected}")]
    WrongChain {
        /// Selected network.
        network: Network,
        /// Chain id of the selected network.
        expected: u64,
        /// Chain id reported by the node.
        actual: u64,
    },
    /// A tier's supply is larger than a mint quantity can be.
    #[error("{category} supply {supply} is too large")]
    SupplyOverflow {
        /// Tier involved.
        category: MintCategory,
        /// Supply reported by the contract.
        supply: U256,
    },
    /// A mint round failed; earlier rounds are recorded in the progress file.
    #[error("{category} round {round} of {rounds} failed ({remaining} left to mint): {source}")]
    Round {
        /// Tier involved.
        category: MintCategory,
        /// 1-based round that failed.
        round: u64,
        /// Rounds planned for this run.
        rounds: u64,
        /// Quantity still to mint.
        remaining: u64,
        /// Underlying contract error.
        #[source]
        source: ContractError,
    },
}
