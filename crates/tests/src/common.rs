//! Common test utilities and fixtures for mintctl tests.
//!
//! [`MockBackend`] is an in-memory chain holding a single collection type. It
//! enforces the same rules the contract does for the calls the procedures
//! make (open flag, payment, allow-list proofs, supply) and records every
//! write so tests can assert on what was sent.

use std::{
    collections::{BTreeMap, HashSet},
    sync::{Arc, Mutex, MutexGuard},
};

use alloy_primitives::{address, Address, TxHash, B256, U256};
use async_trait::async_trait;
use mintctl_contract::{
    CollectionContract, ConstructorArgs, ContractBackend, ContractError, MintRequest, SignerRole,
};
use mintctl_primitives::{FeatureInfo, MintCategory};
use mintctl_runner::{CollectionConfig, StateStore};
use tempfile::TempDir;

// Test constants
/// Hardhat chain id
pub const TEST_CHAIN_ID: u64 = 31337;
/// First hardhat account, used as deployer and owner
pub const DEPLOYER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
/// Second hardhat account, used as team wallet
pub const TEAM: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
/// Reserve list members used by sale tests
pub const RESERVE_MEMBERS: [Address; 3] = [
    address!("0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC"),
    address!("0x90F79bf6EB2c4f870365E785982E1f101E93b906"),
    address!("0x15d34AAf54267DB7D7c367839AAf71A00a2C6A65"),
];
/// Supply of each tier on a fresh mock deployment
pub const TIER_SUPPLY: [(MintCategory, u64); 3] =
    [(MintCategory::Legendary, 50), (MintCategory::Epic, 100), (MintCategory::Rare, 250)];

/// A state-changing call recorded by the mock chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    /// `setBaseURI`
    SetBaseUri(String),
    /// `setTeamAddress`
    SetTeamAddress(Address),
    /// `toggleMint`
    ToggleMint {
        /// Feature id.
        id: u8,
        /// New state.
        open: bool,
    },
    /// `setMerkleRoot`
    SetMerkleRoot {
        /// Feature id.
        id: u8,
        /// New root.
        root: B256,
    },
    /// One of the tier mint functions
    Mint {
        /// Transaction sender.
        signer: Address,
        /// Tier.
        category: MintCategory,
        /// Number of items.
        quantity: u64,
    },
}

/// On-chain state shared by the backend and every handle it attaches.
#[derive(Debug)]
pub struct ChainState {
    /// Chain id reported by the node.
    pub chain_id: u64,
    /// Addresses holding collection code.
    pub code: HashSet<Address>,
    /// Features of the collection.
    pub features: BTreeMap<u8, FeatureInfo>,
    /// Items claimed per feature and account.
    pub claimed: BTreeMap<(u8, Address), U256>,
    /// Registered team address.
    pub team_address: Address,
    /// Constructor arguments of every deployment.
    pub deployments: Vec<ConstructorArgs>,
    /// Successful writes, in order.
    pub writes: Vec<Write>,
    /// Fails every deployment when set.
    pub fail_deploy: bool,
    /// Reverts the n-th (1-based) mint call of a category.
    pub fail_mint_at: BTreeMap<MintCategory, usize>,
    mint_calls: BTreeMap<MintCategory, usize>,
    tx_count: u64,
}

impl Default for ChainState {
    fn default() -> Self {
        Self {
            chain_id: TEST_CHAIN_ID,
            code: HashSet::new(),
            features: BTreeMap::new(),
            claimed: BTreeMap::new(),
            team_address: Address::ZERO,
            deployments: Vec::new(),
            writes: Vec::new(),
            fail_deploy: false,
            fail_mint_at: BTreeMap::new(),
            mint_calls: BTreeMap::new(),
            tx_count: 0,
        }
    }
}

impl ChainState {
    fn next_tx(&mut self) -> TxHash {
        self.tx_count += 1;
        TxHash::left_padding_from(&self.tx_count.to_be_bytes())
    }

    fn revert(&mut self) -> ContractError {
        ContractError::Reverted(self.next_tx())
    }

    fn record(&mut self, write: Write) -> TxHash {
        self.writes.push(write);
        self.next_tx()
    }

    /// Mints recorded for `category`, in order.
    pub fn mints(&self, category: MintCategory) -> Vec<u64> {
        self.writes
            .iter()
            .filter_map(|write| match write {
                Write::Mint { category: c, quantity, .. } if *c == category => Some(*quantity),
                _ => None,
            })
            .collect()
    }

    /// Total quantity minted for `category`.
    pub fn minted(&self, category: MintCategory) -> u64 {
        self.mints(category).iter().sum()
    }

    /// Number of recorded writes matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&Write) -> bool) -> usize {
        self.writes.iter().filter(|write| predicate(write)).count()
    }

    fn feature_mut(&mut self, id: u8) -> &mut FeatureInfo {
        self.features.entry(id).or_default()
    }
}

/// Fresh tier features: priced, closed, no root.
pub fn tier_features() -> BTreeMap<u8, FeatureInfo> {
    TIER_SUPPLY
        .into_iter()
        .map(|(category, supply)| {
            let feature = FeatureInfo {
                cost: U256::from(10_000_000_000_000_000u64) * U256::from(category.feature_id() + 1),
                supply: U256::from(supply),
                is_open: false,
                merkle_root: B256::ZERO,
            };
            (category.feature_id(), feature)
        })
        .collect()
}

/// In-memory [`ContractBackend`].
#[derive(Debug, Clone)]
pub struct MockBackend {
    state: Arc<Mutex<ChainState>>,
    owner: Address,
    team: Option<Address>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new(DEPLOYER, Some(TEAM))
    }
}

impl MockBackend {
    /// Creates a backend with the given signers and an empty chain.
    pub fn new(owner: Address, team: Option<Address>) -> Self {
        Self { state: Arc::default(), owner, team }
    }

    /// A backend sharing this chain with a different team signer.
    pub fn with_team(&self, team: Option<Address>) -> Self {
        Self { state: Arc::clone(&self.state), owner: self.owner, team }
    }

    /// Locks the chain state.
    pub fn state(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().expect("chain state lock poisoned")
    }

    /// Puts collection code at `address` without a deployment.
    pub fn install(&self, address: Address) {
        let mut state = self.state();
        state.code.insert(address);
        state.features = tier_features();
    }
}

#[async_trait]
impl ContractBackend for MockBackend {
    type Contract = MockCollection;

    async fn chain_id(&self) -> Result<u64, ContractError> {
        Ok(self.state().chain_id)
    }

    fn signer_address(&self, role: SignerRole) -> Option<Address> {
        match role {
            SignerRole::Owner => Some(self.owner),
            SignerRole::Team => self.team,
        }
    }

    async fn has_code(&self, address: Address) -> Result<bool, ContractError> {
        Ok(self.state().code.contains(&address))
    }

    async fn deploy(&self, args: &ConstructorArgs) -> Result<Address, ContractError> {
        let mut state = self.state();
        if state.fail_deploy {
            return Err(state.revert());
        }
        state.deployments.push(args.clone());
        let address = Address::with_last_byte(0xc0 + state.deployments.len() as u8);
        state.code.insert(address);
        state.features = tier_features();
        state.claimed.clear();
        state.team_address = Address::ZERO;
        Ok(address)
    }

    fn attach(&self, address: Address, role: SignerRole) -> Result<MockCollection, ContractError> {
        let signer = self.signer_address(role).ok_or(ContractError::MissingSigner(role))?;
        Ok(MockCollection { state: Arc::clone(&self.state), address, signer })
    }
}

/// In-memory [`CollectionContract`] bound to one signer.
#[derive(Debug, Clone)]
pub struct MockCollection {
    state: Arc<Mutex<ChainState>>,
    address: Address,
    signer: Address,
}

impl MockCollection {
    fn state(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().expect("chain state lock poisoned")
    }
}

#[async_trait]
impl CollectionContract for MockCollection {
    fn address(&self) -> Address {
        self.address
    }

    fn signer(&self) -> Address {
        self.signer
    }

    async fn feature(&self, id: u8) -> Result<FeatureInfo, ContractError> {
        Ok(self.state().features.get(&id).copied().unwrap_or_default())
    }

    async fn toggle_mint(&self, id: u8, open: bool) -> Result<TxHash, ContractError> {
        let mut state = self.state();
        state.feature_mut(id).is_open = open;
        Ok(state.record(Write::ToggleMint { id, open }))
    }

    async fn set_merkle_root(&self, id: u8, root: B256) -> Result<TxHash, ContractError> {
        let mut state = self.state();
        state.feature_mut(id).merkle_root = root;
        Ok(state.record(Write::SetMerkleRoot { id, root }))
    }

    async fn claimed(&self, id: u8, account: Address) -> Result<U256, ContractError> {
        Ok(self.state().claimed.get(&(id, account)).copied().unwrap_or_default())
    }

    async fn mint(&self, request: MintRequest) -> Result<TxHash, ContractError> {
        let mut state = self.state();
        let category = request.category;
        let id = category.feature_id();

        let calls = state.mint_calls.entry(category).or_default();
        *calls += 1;
        let call = *calls;
        if state.fail_mint_at.get(&category) == Some(&call) {
            return Err(state.revert());
        }

        let feature = state.features.get(&id).copied().unwrap_or_default();
        let quantity = U256::from(request.quantity);
        let claimed = state.claimed.get(&(id, self.signer)).copied().unwrap_or_default();
        let proof_ok = !category.is_proof_gated()
            || mintctl_allowlist::verify(
                feature.merkle_root,
                mintctl_allowlist::AllowList::leaf(self.signer),
                &request.proof,
            );
        if !feature.is_open
            || !proof_ok
            || request.value != feature.cost * quantity
            || claimed + quantity > feature.supply
        {
            return Err(state.revert());
        }

        state.claimed.insert((id, self.signer), claimed + quantity);
        Ok(state.record(Write::Mint { signer: self.signer, category, quantity: request.quantity }))
    }

    async fn team_address(&self) -> Result<Address, ContractError> {
        Ok(self.state().team_address)
    }

    async fn set_team_address(&self, team: Address) -> Result<TxHash, ContractError> {
        let mut state = self.state();
        state.team_address = team;
        Ok(state.record(Write::SetTeamAddress(team)))
    }

    async fn set_base_uri(&self, uri: &str) -> Result<TxHash, ContractError> {
        let mut state = self.state();
        Ok(state.record(Write::SetBaseUri(uri.to_string())))
    }
}

/// Collection configuration used by the tests.
pub fn test_config(per_round_cap: u64) -> CollectionConfig {
    let reserve = RESERVE_MEMBERS.iter().map(|a| format!("\"{a}\"")).collect::<Vec<_>>().join(", ");
    let raw = format!(
        r#"
        [collection]
        name = "TestingLOG"
        symbol = "LOG"
        hidden_metadata_uri = "ipfs://hidden/LOG.json"

        [allowlists]
        reserve = [{reserve}]

        [mint]
        per_round_cap = {per_round_cap}
        "#
    );
    CollectionConfig::from_toml(&raw).expect("valid test config")
}

/// Temporary state directory with its store.
#[derive(Debug)]
pub struct TestDir {
    /// Keeps the directory alive.
    pub dir: TempDir,
    /// Store over `dir`.
    pub store: StateStore,
}

impl Default for TestDir {
    fn default() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let store = StateStore::new(dir.path());
        Self { dir, store }
    }
}

impl TestDir {
    /// Creates an empty state directory.
    pub fn new() -> Self {
        Self::default()
    }
}
