use crate::domain::{Hash, StateError};

/// Key/value storage capability.
///
/// Holds code blobs and trie nodes. Shared by every session that runs
/// against it, hence `&self` receivers and `Send + Sync`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError>;
    fn put(&self, key: &[u8], value: Vec<u8>) -> Result<(), StateError>;

    fn batch_put(&self, batch: Vec<(Vec<u8>, Vec<u8>)>) -> Result<(), StateError> {
        for (key, value) in batch {
            self.put(&key, value)?;
        }
        Ok(())
    }
}

/// Read handle over one version of a trie.
pub trait TrieReader {
    /// Look up `key`. `Ok(None)` means the key is absent.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError>;
}

/// Trie capability.
///
/// Implementations are "secure": callers pass raw keys and the backend
/// hashes them before they reach the trie structure.
pub trait TrieBackend: Send + Sync {
    /// Open the trie identified by `root`, reading nodes through `kv`.
    fn open<'a>(
        &self,
        root: &Hash,
        kv: &'a dyn KeyValueStore,
    ) -> Result<Box<dyn TrieReader + 'a>, StateError>;

    /// Apply `changes` on top of the trie at `root`, persist the new nodes
    /// through `kv` and return the new root. A `None` value deletes the key.
    fn commit(
        &self,
        root: &Hash,
        kv: &dyn KeyValueStore,
        changes: Vec<(Vec<u8>, Option<Vec<u8>>)>,
    ) -> Result<Hash, StateError>;
}
