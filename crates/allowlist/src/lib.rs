//! Merkle allow-lists for gated minting.
//!
//! Leaves are `keccak256(address)` over the raw 20 address bytes. Leaves are
//! sorted and deduplicated before the tree is built, and every pair is sorted
//! before hashing, so the root only depends on the set of addresses. Proofs
//! verify against OpenZeppelin's `MerkleProof.verify`.

use alloy_primitives::{keccak256, Address, B256};
use thiserror::Error;

/// Errors raised while building or querying an [`AllowList`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AllowListError {
    /// No addresses were supplied.
    #[error("allow-list is empty, add at least one address to the configuration")]
    Empty,
    /// The address is not part of the list.
    #[error("address {0} is not in the allow-list")]
    NotMember(Address),
}

/// A Merkle tree over a set of addresses.
#[derive(Debug, Clone)]
pub struct AllowList {
    /// `layers[0]` holds the sorted leaves, the last layer holds the root.
    layers: Vec<Vec<B256>>,
}

impl AllowList {
    /// Builds the tree for the given addresses.
    pub fn new<I>(addresses: I) -> Result<Self, AllowListError>
    where
        I: IntoIterator<Item = Address>,
    {
        let mut leaves: Vec<B256> = addresses.into_iter().map(Self::leaf).collect();
        if leaves.is_empty() {
            return Err(AllowListError::Empty);
        }
        leaves.sort_unstable();
        leaves.dedup();

        let mut layers = vec![leaves];
        while let Some(layer) = layers.last().filter(|layer| layer.len() > 1) {
            let next = layer
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_pair(*left, *right),
                    [single] => *single,
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                })
                .collect();
            layers.push(next);
        }

        Ok(Self { layers })
    }

    /// Leaf hash of an address.
    pub fn leaf(address: Address) -> B256 {
        keccak256(address)
    }

    /// Root hash of the tree.
    pub fn root(&self) -> B256 {
        self.layers.last().and_then(|top| top.first()).copied().unwrap_or_default()
    }

    /// Number of distinct addresses in the list.
    pub fn len(&self) -> usize {
        self.layers[0].len()
    }

    /// Returns true if the list holds no addresses. Never true for a built list.
    pub fn is_empty(&self) -> bool {
        self.layers[0].is_empty()
    }

    /// Returns true if `address` is in the list.
    pub fn contains(&self, address: Address) -> bool {
        self.position(address).is_some()
    }

    /// Inclusion proof for `address`, ordered from the leaf upward.
    pub fn proof(&self, address: Address) -> Result<Vec<B256>, AllowListError> {
        let mut index = self.position(address).ok_or(AllowListError::NotMember(address))?;
        let mut proof = Vec::with_capacity(self.layers.len());

        for layer in &self.layers[..self.layers.len() - 1] {
            let sibling = index ^ 1;
            // a promoted odd node has no sibling on this layer
            if let Some(node) = layer.get(sibling) {
                proof.push(*node);
            }
            index /= 2;
        }

        Ok(proof)
    }

    fn position(&self, address: Address) -> Option<usize> {
        self.layers[0].binary_search(&Self::leaf(address)).ok()
    }
}

/// Verifies `proof` for `leaf` against `root` using sorted-pair hashing.
pub fn verify(root: B256, leaf: B256, proof: &[B256]) -> bool {
    proof.iter().fold(leaf, |acc, node| hash_pair(acc, *node)) == root
}

fn hash_pair(a: B256, b: B256) -> B256 {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(low.as_slice());
    buf[32..].copy_from_slice(high.as_slice());
    keccak256(buf)
}
