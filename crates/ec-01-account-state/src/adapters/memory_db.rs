use crate::domain::StateError;
use crate::ports::KeyValueStore;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory implementation of KeyValueStore for testing and tooling.
///
/// Counts every `get` so callers can assert how often the store was hit.
#[derive(Debug, Default)]
pub struct InMemoryKvStore {
    entries: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
    reads: AtomicUsize,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `get` calls served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// Reset the read counter.
    pub fn reset_reads(&self) {
        self.reads.store(0, Ordering::Relaxed);
    }

    /// Remove an entry. Used to simulate lost nodes or blobs.
    pub fn remove(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.write().remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for InMemoryKvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: Vec<u8>) -> Result<(), StateError> {
        self.entries.write().insert(key.to_vec(), value);
        Ok(())
    }

    fn batch_put(&self, batch: Vec<(Vec<u8>, Vec<u8>)>) -> Result<(), StateError> {
        let mut entries = self.entries.write();
        for (key, value) in batch {
            entries.insert(key, value);
        }
        Ok(())
    }
}
