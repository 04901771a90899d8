//! Access to the collection contract.
//!
//! The contract itself is external: this crate only knows its ABI. Procedures
//! are written against the [`CollectionContract`] and [`ContractBackend`]
//! traits so they can run against a live node through alloy or against an
//! in-memory double in tests.

/// Solidity ABI of the collection contract.
pub mod abi;
/// Alloy-backed implementation of the contract traits.
pub mod client;
/// Contract traits and request types.
pub mod collection;
/// Contract error type.
pub mod error;

pub use client::{AlloyBackend, AlloyCollection, ContractArtifact};
pub use collection::{
    CollectionContract, ConstructorArgs, ContractBackend, MintRequest, SignerRole,
};
pub use error::ContractError;
