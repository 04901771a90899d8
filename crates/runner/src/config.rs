use alloy_primitives::Address;
use mintctl_contract::ConstructorArgs;
use mintctl_primitives::SalePhase;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Default number of items minted per transaction.
pub const DEFAULT_PER_ROUND_CAP: u64 = 55;

/// Default divisor applied to a tier's supply to get the team share (one fifth).
pub const DEFAULT_TEAM_SHARE_DIVISOR: u64 = 5;

/// Default feature id of the public sale.
pub const DEFAULT_PUBLIC_PHASE_ID: u8 = 0;

/// Default feature id of the reserve sale.
pub const DEFAULT_RESERVE_PHASE_ID: u8 = 2;

/// Collection configuration, read from `collection.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionConfig {
    /// Constructor arguments and deployment artifact.
    pub collection: CollectionSection,
    /// Address of an already deployed collection. Takes precedence over the
    /// recorded contract file.
    #[serde(default)]
    pub contract_address: Option<Address>,
    /// Allow-list address sets.
    #[serde(default)]
    pub allowlists: AllowLists,
    /// Batch minting settings.
    #[serde(default)]
    pub mint: MintSettings,
    /// Feature ids of the sale phases.
    #[serde(default)]
    pub phases: PhaseIds,
}

/// The `[collection]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionSection {
    /// Collection name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Metadata URI served before reveal.
    pub hidden_metadata_uri: String,
    /// Compiled contract JSON holding the creation `bytecode`.
    #[serde(default)]
    pub artifact: Option<PathBuf>,
}

/// The `[allowlists]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AllowLists {
    /// Reserve sale addresses.
    #[serde(default)]
    pub reserve: Vec<Address>,
    /// Free mint addresses.
    #[serde(default)]
    pub free_mint: Vec<Address>,
    /// Guaranteed mint addresses.
    #[serde(default)]
    pub guaranteed: Vec<Address>,
}

/// Names of the configured allow-lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllowListName {
    /// `allowlists.reserve`
    Reserve,
    /// `allowlists.free_mint`
    FreeMint,
    /// `allowlists.guaranteed`
    Guaranteed,
}

impl fmt::Display for AllowListName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reserve => f.write_str("reserve"),
            Self::FreeMint => f.write_str("free_mint"),
            Self::Guaranteed => f.write_str("guaranteed"),
        }
    }
}

impl AllowLists {
    /// Addresses of the named list.
    pub fn get(&self, name: AllowListName) -> &[Address] {
        match name {
            AllowListName::Reserve => &self.reserve,
            AllowListName::FreeMint => &self.free_mint,
            AllowListName::Guaranteed => &self.guaranteed,
        }
    }
}

/// Settings of the batch minting loop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MintSettings {
    /// Maximum items per transaction, 0 mints everything in one round.
    pub per_round_cap: u64,
    /// Fixed gas ceiling for mint transactions; estimated when unset.
    pub gas_limit: Option<u64>,
    /// The team receives `ceil(supply / team_share_divisor)` of each tier.
    pub team_share_divisor: u64,
}

impl Default for MintSettings {
    fn default() -> Self {
        Self {
            per_round_cap: DEFAULT_PER_ROUND_CAP,
            gas_limit: None,
            team_share_divisor: DEFAULT_TEAM_SHARE_DIVISOR,
        }
    }
}

/// Feature ids of the sale phases.
///
/// Contract variants disagree on these, so they are configurable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PhaseIds {
    /// Public sale feature id.
    pub public: u8,
    /// Reserve sale feature id.
    pub reserve: u8,
}

impl Default for PhaseIds {
    fn default() -> Self {
        Self { public: DEFAULT_PUBLIC_PHASE_ID, reserve: DEFAULT_RESERVE_PHASE_ID }
    }
}

impl PhaseIds {
    /// Feature id of `phase`.
    pub const fn id(&self, phase: SalePhase) -> u8 {
        match phase {
            SalePhase::Public => self.public,
            SalePhase::Reserve => self.reserve,
        }
    }
}

impl CollectionConfig {
    /// Reads and validates a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let mut config = Self::from_toml(&raw)?;

        // artifact paths are relative to the config file
        if let (Some(artifact), Some(parent)) = (&config.collection.artifact, path.parent()) {
            if artifact.is_relative() {
                config.collection.artifact = Some(parent.join(artifact));
            }
        }
        Ok(config)
    }

    /// Parses and validates a TOML configuration string.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collection.name.trim().is_empty() {
            return Err(ConfigError::Invalid("collection.name must not be empty".into()));
        }
        if self.collection.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("collection.symbol must not be empty".into()));
        }
        if self.mint.team_share_divisor == 0 {
            return Err(ConfigError::Invalid("mint.team_share_divisor must be at least 1".into()));
        }
        if self.mint.gas_limit == Some(0) {
            return Err(ConfigError::Invalid("mint.gas_limit must be positive when set".into()));
        }
        Ok(())
    }

    /// Constructor arguments for deploying this collection.
    pub fn constructor_args(&self) -> ConstructorArgs {
        ConstructorArgs {
            name: self.collection.name.clone(),
            symbol: self.collection.symbol.clone(),
            hidden_metadata_uri: self.collection.hidden_metadata_uri.clone(),
        }
    }
}

/// Errors that can occur while loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The configuration is not valid TOML or has the wrong shape.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}
