//! # Core Primitive Entities
//!
//! Fixed-size identifiers and amounts shared across the workspace.
//!
//! ## Conventions
//!
//! - Byte slices longer than the target are truncated from the left, shorter
//!   ones are left-padded with zeros (big-endian alignment), matching how
//!   addresses are derived from arbitrary byte strings on chain.

use sha3::{Digest, Keccak256};

// Re-export the wide integers from primitive-types for use across all crates
pub use primitive_types::{U256, U512};

/// A 32-byte Keccak-256 hash.
pub type Hash = [u8; 32];

/// A 20-byte account address.
pub type Address = [u8; 20];

/// Block time in seconds. All accrual arithmetic is expressed in this unit.
pub type BlockTime = u64;

/// The all-zero hash.
pub const ZERO_HASH: Hash = [0u8; 32];

/// The all-zero address.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// Compute Keccak-256 of `data`.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute Keccak-256 over the concatenation of several byte slices.
pub fn keccak256_concat(parts: &[&[u8]]) -> Hash {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Build an address from arbitrary bytes, right-aligned.
///
/// `address_from_bytes(b"a1")` yields `0x000…6131`.
pub fn address_from_bytes(bytes: &[u8]) -> Address {
    let mut address = ZERO_ADDRESS;
    let take = bytes.len().min(address.len());
    address[20 - take..].copy_from_slice(&bytes[bytes.len() - take..]);
    address
}

/// Build a hash from arbitrary bytes, right-aligned.
pub fn hash_from_bytes(bytes: &[u8]) -> Hash {
    let mut hash = ZERO_HASH;
    let take = bytes.len().min(hash.len());
    hash[32 - take..].copy_from_slice(&bytes[bytes.len() - take..]);
    hash
}

/// Render bytes as `0x`-prefixed lowercase hex, for logs and error messages.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
