use alloy_primitives::{Address, TxHash};
use serde::{Deserialize, Serialize};

/// A network the collection can be deployed to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    /// Local hardhat/anvil node.
    #[default]
    Hardhat,
    /// Ethereum mainnet.
    Mainnet,
    /// Ethereum Sepolia testnet.
    Sepolia,
    /// Ethereum Goerli testnet.
    Goerli,
    /// Polygon PoS mainnet.
    Polygon,
    /// Polygon Mumbai testnet.
    PolygonMumbai,
}

impl Network {
    /// Every known network.
    pub const ALL: [Self; 6] = [
        Self::Hardhat,
        Self::Mainnet,
        Self::Sepolia,
        Self::Goerli,
        Self::Polygon,
        Self::PolygonMumbai,
    ];

    /// EIP-155 chain id.
    pub const fn chain_id(self) -> u64 {
        match self {
            Self::Hardhat => 31337,
            Self::Mainnet => 1,
            Self::Sepolia => 11_155_111,
            Self::Goerli => 5,
            Self::Polygon => 137,
            Self::PolygonMumbai => 80001,
        }
    }

    /// Looks up a network by chain id.
    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|network| network.chain_id() == chain_id)
    }

    /// Native currency symbol.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Hardhat => "ETH (test)",
            Self::Mainnet => "ETH",
            Self::Sepolia => "SepoliaETH",
            Self::Goerli => "ETH (test)",
            Self::Polygon => "MATIC",
            Self::PolygonMumbai => "MATIC (test)",
        }
    }

    /// Human readable block explorer name.
    pub const fn explorer_name(self) -> &'static str {
        match self {
            Self::Hardhat => "Block explorer (not available for local chains)",
            Self::Mainnet => "Etherscan",
            Self::Sepolia => "Etherscan (Sepolia)",
            Self::Goerli => "Etherscan (Goerli)",
            Self::Polygon => "Polygonscan",
            Self::PolygonMumbai => "Polygonscan (Mumbai)",
        }
    }

    const fn explorer_base(self) -> Option<&'static str> {
        match self {
            Self::Hardhat => None,
            Self::Mainnet => Some("https://etherscan.io"),
            Self::Sepolia => Some("https://sepolia.etherscan.io"),
            Self::Goerli => Some("https://goerli.etherscan.io"),
            Self::Polygon => Some("https://polygonscan.com"),
            Self::PolygonMumbai => Some("https://mumbai.polygonscan.com"),
        }
    }

    /// Explorer page for a contract or account, `None` on local chains.
    pub fn address_url(self, address: Address) -> Option<String> {
        self.explorer_base().map(|base| format!("{base}/address/{address}"))
    }

    /// Explorer page for a transaction, `None` on local chains.
    pub fn tx_url(self, tx_hash: TxHash) -> Option<String> {
        self.explorer_base().map(|base| format!("{base}/tx/{tx_hash}"))
    }
}
