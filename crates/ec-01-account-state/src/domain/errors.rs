use shared_types::{to_hex, Address, Hash};
use thiserror::Error;

/// Integrity and capability failures of the account state layer.
///
/// None of these is retryable: each one means the backing data is corrupt
/// or unreachable and the enclosing transaction must be aborted.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Storage access failed for account {}: {source}", to_hex(.address))]
    StorageAccess {
        address: Address,
        #[source]
        source: Box<StateError>,
    },

    #[error("Code access failed for account {} (code hash {}): {reason}", to_hex(.address), to_hex(.code_hash))]
    CodeAccess {
        address: Address,
        code_hash: Hash,
        reason: String,
    },

    #[error("Trie node missing for root {}", to_hex(.root))]
    MissingTrieNode { root: Hash },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage value too large: {size} bytes, max {max}")]
    StorageValueTooLarge { size: usize, max: usize },

    #[error("Code too large: {size} bytes, max {max}")]
    CodeTooLarge { size: usize, max: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl StateError {
    /// True for the two integrity failures surfaced by cached accounts.
    pub fn is_access_error(&self) -> bool {
        matches!(
            self,
            StateError::StorageAccess { .. } | StateError::CodeAccess { .. }
        )
    }
}
