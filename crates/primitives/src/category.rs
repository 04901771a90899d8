use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// A mintable tier of the collection.
///
/// The discriminant is the tier's feature id on the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MintCategory {
    /// Top tier, allow-list gated.
    Legendary = 0,
    /// Middle tier, allow-list gated.
    Epic = 1,
    /// Open tier, minted without a proof.
    Rare = 2,
}

impl MintCategory {
    /// All categories in the order the team mint processes them.
    pub const ALL: [Self; 3] = [Self::Legendary, Self::Epic, Self::Rare];

    /// Returns the contract feature id of this tier.
    pub const fn feature_id(self) -> u8 {
        self as u8
    }

    /// Returns true if minting this tier requires a Merkle proof.
    pub const fn is_proof_gated(self) -> bool {
        matches!(self, Self::Legendary | Self::Epic)
    }

    /// Lowercase name, as used in the progress file and log file names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Legendary => "legendary",
            Self::Epic => "epic",
            Self::Rare => "rare",
        }
    }
}

impl fmt::Display for MintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known category.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown mint category: {0}")]
pub struct ParseCategoryError(pub String);

impl FromStr for MintCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// A sale window that can be opened or closed on the contract.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SalePhase {
    /// Public sale, no allow-list.
    Public,
    /// Reserve (whitelist) sale gated by the configured reserve list.
    Reserve,
}

impl SalePhase {
    /// Returns true if the phase is gated by an allow-list root.
    pub const fn is_allow_listed(self) -> bool {
        matches!(self, Self::Reserve)
    }
}

impl fmt::Display for SalePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => f.write_str("public"),
            Self::Reserve => f.write_str("reserve"),
        }
    }
}
