//! # Domain Entities for Account State
//!
//! ## Type Decisions
//!
//! - `balance` and `energy` are `U256`. Energy accrual multiplies a balance by
//!   a rate and an elapsed time, so the extra headroom over `u128` matters.
//! - `code_hash: Option<Hash>` makes "no code" a distinct shape instead of a
//!   magic all-zero hash.
//! - Storage values are byte strings. An absent slot reads as the empty
//!   string, which is also what deletes a slot when written.

use serde::{Deserialize, Serialize};
use shared_types::ZERO_HASH;

use super::StateError;

pub use shared_types::{Address, BlockTime, Hash, U256};

/// Key of a contract storage slot.
pub type StorageKey = Hash;

/// Value of a contract storage slot. Empty means "absent".
pub type StorageValue = Vec<u8>;

/// Keccak256 hash of an empty RLP-encoded trie.
/// This is the canonical empty trie root.
/// Value: keccak256(RLP("")) = 0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421
pub const EMPTY_TRIE_ROOT: Hash = [
    0x56, 0xe8, 0x1f, 0x17, 0x1b, 0xcc, 0x55, 0xa6, 0xff, 0x83, 0x45, 0xe6, 0x92, 0xc0, 0xf8, 0x6e,
    0x5b, 0x48, 0xe0, 0x1b, 0x99, 0x6c, 0xad, 0xc0, 0x01, 0x62, 0x2f, 0xb5, 0xe3, 0x63, 0xb4, 0x21,
];

/// Returns true if `root` identifies a trie with no entries.
///
/// Both the canonical empty root and the all-zero hash are accepted, the
/// latter being what a never-initialised record carries.
pub fn is_empty_root(root: &Hash) -> bool {
    *root == EMPTY_TRIE_ROOT || *root == ZERO_HASH
}

/// Account record stored in the state trie under its address.
///
/// ## Fields
///
/// - `balance`: primary currency in base units
/// - `energy`: energy realized as of `energy_timestamp` (growth not applied)
/// - `energy_timestamp`: block time at which `energy` was last realized,
///   `None` until the ledger first touches the account
/// - `storage_root`: root of the account's storage trie
/// - `code_hash`: Keccak-256 of the contract code, `None` for plain accounts
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub balance: U256,
    pub energy: U256,
    pub energy_timestamp: Option<BlockTime>,
    pub storage_root: Hash,
    pub code_hash: Option<Hash>,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            balance: U256::zero(),
            energy: U256::zero(),
            energy_timestamp: None,
            storage_root: EMPTY_TRIE_ROOT,
            code_hash: None,
        }
    }
}

impl Account {
    /// Create a new account with the specified balance.
    pub fn new(balance: U256) -> Self {
        Self {
            balance,
            ..Default::default()
        }
    }

    /// Builder method to set the realized energy and its timestamp.
    pub fn with_energy(mut self, energy: U256, timestamp: BlockTime) -> Self {
        self.energy = energy;
        self.energy_timestamp = Some(timestamp);
        self
    }

    /// True for a record that carries nothing worth persisting.
    pub fn is_empty(&self) -> bool {
        self.balance.is_zero()
            && self.energy.is_zero()
            && self.energy_timestamp.is_none()
            && self.code_hash.is_none()
            && is_empty_root(&self.storage_root)
    }

    /// True if the account has contract code.
    pub fn has_code(&self) -> bool {
        self.code_hash.is_some()
    }

    /// Encode the record for the account trie.
    pub fn encode(&self) -> Result<Vec<u8>, StateError> {
        bincode::serialize(self).map_err(|e| StateError::Serialization(e.to_string()))
    }

    /// Decode a record read from the account trie.
    pub fn decode(bytes: &[u8]) -> Result<Self, StateError> {
        bincode::deserialize(bytes).map_err(|e| StateError::Serialization(e.to_string()))
    }
}
