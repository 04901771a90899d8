use alloy_primitives::{B256, U256};
use serde::{Deserialize, Serialize};

/// On-chain state of a single contract feature (a tier or a sale phase).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureInfo {
    /// Price per item, in wei.
    pub cost: U256,
    /// Maximum number of items for this feature.
    pub supply: U256,
    /// Whether minting is currently open.
    pub is_open: bool,
    /// Allow-list root, zero when the feature is not gated.
    pub merkle_root: B256,
}

impl FeatureInfo {
    /// Payment value for minting `quantity` items: `cost * quantity`.
    pub fn payment_for(&self, quantity: u64) -> U256 {
        self.cost.saturating_mul(U256::from(quantity))
    }

    /// `ceil(supply / divisor)`, the share reserved for the team.
    ///
    /// A zero divisor reserves the whole supply.
    pub fn team_share(&self, divisor: u64) -> U256 {
        if divisor == 0 {
            return self.supply;
        }
        let divisor = U256::from(divisor);
        let share = self.supply / divisor;
        if (self.supply % divisor).is_zero() {
            share
        } else {
            share + U256::from(1)
        }
    }

    /// Returns true if `root` differs from the root stored on chain.
    pub fn root_differs(&self, root: B256) -> bool {
        self.merkle_root != root
    }
}
