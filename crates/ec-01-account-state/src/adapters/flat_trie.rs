//! Flat secure trie backed by a key/value store.
//!
//! Each trie version is a single node: the sorted `keccak256(key) → value`
//! map, serialized with bincode and stored under its own Keccak-256. The
//! node hash is the trie root, so a root commits to the full content just
//! like a Patricia root would, without per-path proofs.

use std::collections::BTreeMap;

use shared_types::{keccak256, to_hex, Hash};
use tracing::trace;

use crate::domain::{is_empty_root, StateError, EMPTY_TRIE_ROOT};
use crate::ports::{KeyValueStore, TrieBackend, TrieReader};

/// Trie backend storing each version as one flat node.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatTrieBackend;

impl FlatTrieBackend {
    pub fn new() -> Self {
        Self
    }

    fn load_entries(
        root: &Hash,
        kv: &dyn KeyValueStore,
    ) -> Result<BTreeMap<Hash, Vec<u8>>, StateError> {
        if is_empty_root(root) {
            return Ok(BTreeMap::new());
        }
        let node = kv
            .get(root)?
            .ok_or(StateError::MissingTrieNode { root: *root })?;
        if keccak256(&node) != *root {
            return Err(StateError::Database(format!(
                "trie node hash mismatch for root {}",
                to_hex(root)
            )));
        }
        bincode::deserialize(&node).map_err(|e| StateError::Serialization(e.to_string()))
    }
}

/// Read handle over one loaded trie version.
#[derive(Debug)]
pub struct FlatTrie {
    entries: BTreeMap<Hash, Vec<u8>>,
}

impl TrieReader for FlatTrie {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.entries.get(&keccak256(key)).cloned())
    }
}

impl TrieBackend for FlatTrieBackend {
    fn open<'a>(
        &self,
        root: &Hash,
        kv: &'a dyn KeyValueStore,
    ) -> Result<Box<dyn TrieReader + 'a>, StateError> {
        let entries = Self::load_entries(root, kv)?;
        trace!(root = %to_hex(root), entries = entries.len(), "Opened flat trie");
        Ok(Box::new(FlatTrie { entries }))
    }

    fn commit(
        &self,
        root: &Hash,
        kv: &dyn KeyValueStore,
        changes: Vec<(Vec<u8>, Option<Vec<u8>>)>,
    ) -> Result<Hash, StateError> {
        let mut entries = Self::load_entries(root, kv)?;
        for (key, value) in changes {
            match value {
                Some(value) => {
                    entries.insert(keccak256(&key), value);
                }
                None => {
                    entries.remove(&keccak256(&key));
                }
            }
        }

        if entries.is_empty() {
            return Ok(EMPTY_TRIE_ROOT);
        }

        let node =
            bincode::serialize(&entries).map_err(|e| StateError::Serialization(e.to_string()))?;
        let new_root = keccak256(&node);
        kv.put(&new_root, node)?;
        Ok(new_root)
    }
}
