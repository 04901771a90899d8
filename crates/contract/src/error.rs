use crate::collection::SignerRole;
use alloy::{providers::PendingTransactionError, transports::TransportError};
use alloy_primitives::TxHash;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while talking to the collection contract.
#[derive(Debug, Error)]
pub enum ContractError {
    /// A contract call or transaction submission failed.
    #[error("contract call failed: {0}")]
    Call(#[from] alloy::contract::Error),
    /// A submitted transaction could not be confirmed.
    #[error("transaction was not confirmed: {0}")]
    Pending(#[from] PendingTransactionError),
    /// Plain RPC request failed.
    #[error("rpc error: {0}")]
    Transport(#[from] TransportError),
    /// Transaction was mined but reverted.
    #[error("transaction {0} reverted")]
    Reverted(TxHash),
    /// Deployment receipt carried no contract address.
    #[error("deployment transaction {0} created no contract")]
    NoContractAddress(TxHash),
    /// The role has no signing key.
    #[error("no {0} signer configured")]
    MissingSigner(SignerRole),
    /// No creation bytecode was provided, so nothing can be deployed.
    #[error("no contract artifact configured, cannot deploy")]
    MissingBytecode,
    /// The compiled contract artifact could not be used.
    #[error("invalid contract artifact {}: {reason}", path.display())]
    Artifact {
        /// Path of the artifact file.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },
}
