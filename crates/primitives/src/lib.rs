//! Shared types for driving an NFT collection's minting lifecycle.
//!
//! This crate provides the vocabulary used across the mintctl workspace:
//! - Mint categories (tiers) and sale phases
//! - Round planning for batched minting
//! - Decoded on-chain feature state
//! - The table of supported networks

/// Mint categories and sale phases.
pub mod category;
/// Decoded feature state returned by the collection contract.
pub mod feature;
/// Known networks and their block explorers.
pub mod network;
/// Splitting a quantity into bounded mint rounds.
pub mod plan;

pub use category::{MintCategory, ParseCategoryError, SalePhase};
pub use feature::FeatureInfo;
pub use network::Network;
pub use plan::{RoundPlan, Rounds};
