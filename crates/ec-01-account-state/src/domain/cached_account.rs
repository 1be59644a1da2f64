//! # Cached Account Object
//!
//! Session-scoped wrapper around one account record that avoids repeated
//! trie traversal.
//!
//! ## Caches
//!
//! - `code`: the contract code, fetched once by code hash
//! - `storage_trie`: handle to the storage trie, opened once from the
//!   record's storage root
//! - `storage`: every slot read so far, including slots that were absent
//!
//! Caches are never invalidated in place. The owning store drops the whole
//! object when the record's roots change or the session ends.

use std::collections::HashMap;

use shared_types::{keccak256, to_hex};
use tracing::{trace, warn};

use super::{Account, Address, StateError, StorageKey, StorageValue};
use crate::ports::{KeyValueStore, TrieBackend, TrieReader};

#[derive(Default)]
struct ObjectCache<'a> {
    code: Option<Vec<u8>>,
    storage_trie: Option<Box<dyn TrieReader + 'a>>,
    storage: HashMap<StorageKey, StorageValue>,
}

/// Account record plus lazily populated code and storage caches.
pub struct CachedAccount<'a> {
    address: Address,
    kv: &'a dyn KeyValueStore,
    tries: &'a dyn TrieBackend,
    data: Account,
    cache: ObjectCache<'a>,
}

impl<'a> CachedAccount<'a> {
    pub fn new(
        address: Address,
        data: Account,
        kv: &'a dyn KeyValueStore,
        tries: &'a dyn TrieBackend,
    ) -> Self {
        Self {
            address,
            kv,
            tries,
            data,
            cache: ObjectCache::default(),
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The account record as loaded (plus any in-session edits).
    pub fn account(&self) -> &Account {
        &self.data
    }

    /// Mutable access to the record.
    ///
    /// Only for fields the caches do not depend on; the store replaces the
    /// whole object when `storage_root` or `code_hash` change.
    pub(crate) fn account_mut(&mut self) -> &mut Account {
        &mut self.data
    }

    /// True once the storage trie has been opened in this session.
    pub fn is_storage_loaded(&self) -> bool {
        self.cache.storage_trie.is_some()
    }

    /// Number of storage slots held in the cache.
    pub fn cached_storage_len(&self) -> usize {
        self.cache.storage.len()
    }

    /// Returns the storage value for `key`, empty if the slot is absent.
    pub fn storage(&mut self, key: &StorageKey) -> Result<StorageValue, StateError> {
        if let Some(value) = self.cache.storage.get(key) {
            return Ok(value.clone());
        }

        let value = self.load_storage(key).map_err(|source| {
            warn!(
                address = %to_hex(&self.address),
                key = %to_hex(key),
                error = %source,
                "Storage access failed"
            );
            StateError::StorageAccess {
                address: self.address,
                source: Box::new(source),
            }
        })?;

        self.cache.storage.insert(*key, value.clone());
        Ok(value)
    }

    fn load_storage(&mut self, key: &StorageKey) -> Result<StorageValue, StateError> {
        let trie = match self.cache.storage_trie.take() {
            Some(trie) => trie,
            None => {
                trace!(
                    address = %to_hex(&self.address),
                    root = %to_hex(&self.data.storage_root),
                    "Opening storage trie"
                );
                self.tries.open(&self.data.storage_root, self.kv)?
            }
        };
        let value = trie.get(key);
        self.cache.storage_trie = Some(trie);
        Ok(value?.unwrap_or_default())
    }

    /// Returns the contract code, empty for accounts without code.
    pub fn code(&mut self) -> Result<&[u8], StateError> {
        let Some(code_hash) = self.data.code_hash else {
            return Ok(&[]);
        };

        if self.cache.code.is_none() {
            let code_access = |reason: String| StateError::CodeAccess {
                address: self.address,
                code_hash,
                reason,
            };

            let code = self
                .kv
                .get(&code_hash)
                .map_err(|e| code_access(e.to_string()))?
                .ok_or_else(|| code_access("code blob not found".to_string()))?;
            if keccak256(&code) != code_hash {
                warn!(address = %to_hex(&self.address), "Code blob does not match code hash");
                return Err(code_access("code blob hash mismatch".to_string()));
            }

            trace!(address = %to_hex(&self.address), size = code.len(), "Loaded code");
            self.cache.code = Some(code);
        }

        Ok(self.cache.code.as_deref().unwrap_or_default())
    }
}

impl std::fmt::Debug for CachedAccount<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedAccount")
            .field("address", &to_hex(&self.address))
            .field("data", &self.data)
            .field("code_cached", &self.cache.code.is_some())
            .field("storage_loaded", &self.is_storage_loaded())
            .field("cached_slots", &self.cache.storage.len())
            .finish()
    }
}
