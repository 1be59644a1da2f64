//! # Account State Store
//!
//! One processing session over a state root.
//!
//! ## Write Path
//!
//! Record edits go straight into the cached object's record and mark the
//! address dirty. Storage and code writes are staged in the session write
//! set so the cached object's read caches stay exactly what the trie holds.
//! `commit()` folds everything into new storage roots, then a new state
//! root, and ends the session.

use std::collections::{BTreeMap, BTreeSet};

use shared_types::{keccak256, to_hex};
use tracing::{debug, info};

use super::{
    Account, Address, CachedAccount, Hash, StateConfig, StateError, StorageKey, StorageValue,
    U256,
};
use crate::ports::{KeyValueStore, TrieBackend, TrieReader};

/// Session-scoped account state over a trie root.
pub struct AccountStateStore<'a> {
    kv: &'a dyn KeyValueStore,
    tries: &'a dyn TrieBackend,
    config: StateConfig,
    root: Hash,
    accounts_trie: Option<Box<dyn TrieReader + 'a>>,
    objects: BTreeMap<Address, CachedAccount<'a>>,
    dirty_accounts: BTreeSet<Address>,
    dirty_storage: BTreeMap<Address, BTreeMap<StorageKey, StorageValue>>,
    dirty_code: BTreeMap<Hash, Vec<u8>>,
}

impl<'a> AccountStateStore<'a> {
    /// Open a session at `root` with the default configuration.
    pub fn new(root: Hash, kv: &'a dyn KeyValueStore, tries: &'a dyn TrieBackend) -> Self {
        Self {
            kv,
            tries,
            config: StateConfig::default(),
            root,
            accounts_trie: None,
            objects: BTreeMap::new(),
            dirty_accounts: BTreeSet::new(),
            dirty_storage: BTreeMap::new(),
            dirty_code: BTreeMap::new(),
        }
    }

    /// Open a session with an explicit, validated configuration.
    pub fn with_config(
        root: Hash,
        kv: &'a dyn KeyValueStore,
        tries: &'a dyn TrieBackend,
        config: StateConfig,
    ) -> Result<Self, StateError> {
        config.validate()?;
        let mut store = Self::new(root, kv, tries);
        store.config = config;
        Ok(store)
    }

    /// The state root this session was opened at, or the last committed one.
    pub fn root(&self) -> Hash {
        self.root
    }

    pub fn config(&self) -> &StateConfig {
        &self.config
    }

    /// True if the session holds uncommitted changes.
    pub fn is_dirty(&self) -> bool {
        !self.dirty_accounts.is_empty()
            || !self.dirty_storage.is_empty()
            || !self.dirty_code.is_empty()
    }

    fn load_account(&mut self, address: &Address) -> Result<Account, StateError> {
        let trie = match self.accounts_trie.take() {
            Some(trie) => trie,
            None => self.tries.open(&self.root, self.kv)?,
        };
        let raw = trie.get(address);
        self.accounts_trie = Some(trie);

        match raw? {
            Some(bytes) => Account::decode(&bytes),
            None => Ok(Account::default()),
        }
    }

    /// Returns the cached object for `address`, creating it on first access.
    pub fn cached_account(&mut self, address: &Address) -> Result<&mut CachedAccount<'a>, StateError> {
        if !self.objects.contains_key(address) {
            let account = self.load_account(address)?;
            self.objects.insert(
                *address,
                CachedAccount::new(*address, account, self.kv, self.tries),
            );
        }
        self.objects
            .get_mut(address)
            .ok_or_else(|| StateError::Database(format!("account {} not cached", to_hex(address))))
    }

    /// Returns a copy of the account record.
    pub fn account(&mut self, address: &Address) -> Result<Account, StateError> {
        Ok(self.cached_account(address)?.account().clone())
    }

    /// Replace the account record.
    ///
    /// If the storage root or code hash changed, the cached object is
    /// rebuilt so its caches cannot serve data from the old roots.
    pub fn put_account(&mut self, address: &Address, account: Account) -> Result<(), StateError> {
        let obj = self.cached_account(address)?;
        let current = obj.account();
        if current.storage_root == account.storage_root && current.code_hash == account.code_hash {
            *obj.account_mut() = account;
        } else {
            debug!(address = %to_hex(address), "Account roots replaced, dropping cached object");
            self.objects.insert(
                *address,
                CachedAccount::new(*address, account, self.kv, self.tries),
            );
        }
        self.dirty_accounts.insert(*address);
        Ok(())
    }

    /// True if the account has a non-empty record.
    pub fn exists(&mut self, address: &Address) -> Result<bool, StateError> {
        let obj = self.cached_account(address)?;
        Ok(!obj.account().is_empty())
    }

    pub fn balance(&mut self, address: &Address) -> Result<U256, StateError> {
        Ok(self.cached_account(address)?.account().balance)
    }

    pub fn set_balance(&mut self, address: &Address, balance: U256) -> Result<(), StateError> {
        self.cached_account(address)?.account_mut().balance = balance;
        self.dirty_accounts.insert(*address);
        Ok(())
    }

    /// Returns the storage value for `key`, preferring staged writes.
    pub fn storage(&mut self, address: &Address, key: &StorageKey) -> Result<StorageValue, StateError> {
        if let Some(value) = self.dirty_storage.get(address).and_then(|slots| slots.get(key)) {
            return Ok(value.clone());
        }
        self.cached_account(address)?.storage(key)
    }

    /// Stage a storage write. An empty value deletes the slot on commit.
    pub fn set_storage(
        &mut self,
        address: &Address,
        key: StorageKey,
        value: StorageValue,
    ) -> Result<(), StateError> {
        if value.len() > self.config.max_storage_value_size {
            return Err(StateError::StorageValueTooLarge {
                size: value.len(),
                max: self.config.max_storage_value_size,
            });
        }
        self.dirty_storage
            .entry(*address)
            .or_default()
            .insert(key, value);
        self.dirty_accounts.insert(*address);
        Ok(())
    }

    /// Returns the account's code, empty for plain accounts.
    pub fn code(&mut self, address: &Address) -> Result<Vec<u8>, StateError> {
        let code_hash = self.cached_account(address)?.account().code_hash;
        if let Some(code) = code_hash.and_then(|h| self.dirty_code.get(&h)) {
            return Ok(code.clone());
        }
        Ok(self.cached_account(address)?.code()?.to_vec())
    }

    /// Install contract code and return its hash.
    pub fn set_code(&mut self, address: &Address, code: Vec<u8>) -> Result<Hash, StateError> {
        if code.len() > self.config.max_code_size {
            return Err(StateError::CodeTooLarge {
                size: code.len(),
                max: self.config.max_code_size,
            });
        }
        let code_hash = keccak256(&code);
        let mut account = self.account(address)?;
        account.code_hash = Some(code_hash);
        self.dirty_code.insert(code_hash, code);
        self.put_account(address, account)?;
        Ok(code_hash)
    }

    /// Write staged changes and return the new state root.
    ///
    /// Ends the session: every cached object is discarded afterwards. On
    /// error the staged write set is kept as it was, so the commit can be
    /// retried.
    pub fn commit(&mut self) -> Result<Hash, StateError> {
        let code_blobs: Vec<(Vec<u8>, Vec<u8>)> = self
            .dirty_code
            .iter()
            .map(|(hash, code)| (hash.to_vec(), code.clone()))
            .collect();
        let code_count = code_blobs.len();
        if !code_blobs.is_empty() {
            self.kv.batch_put(code_blobs)?;
        }

        let storage_owners: Vec<Address> = self.dirty_storage.keys().copied().collect();
        let mut storage_roots = BTreeMap::new();
        for address in storage_owners {
            let old_root = self.cached_account(&address)?.account().storage_root;
            let changes: Vec<(Vec<u8>, Option<Vec<u8>>)> = self
                .dirty_storage
                .get(&address)
                .map(|slots| {
                    slots
                        .iter()
                        .map(|(key, value)| {
                            let value = if value.is_empty() { None } else { Some(value.clone()) };
                            (key.to_vec(), value)
                        })
                        .collect()
                })
                .unwrap_or_default();
            let new_root = self.tries.commit(&old_root, self.kv, changes)?;
            storage_roots.insert(address, new_root);
        }

        let mut changes = Vec::with_capacity(self.dirty_accounts.len());
        for address in &self.dirty_accounts {
            let mut account = self
                .objects
                .get(address)
                .map(|obj| obj.account().clone())
                .ok_or_else(|| StateError::Database(format!("dirty account {} not cached", to_hex(address))))?;
            if let Some(root) = storage_roots.get(address) {
                account.storage_root = *root;
            }
            let value = if account.is_empty() {
                None
            } else {
                Some(account.encode()?)
            };
            changes.push((address.to_vec(), value));
        }
        let touched = changes.len();

        let new_root = self.tries.commit(&self.root, self.kv, changes)?;
        info!(
            old_root = %to_hex(&self.root),
            new_root = %to_hex(&new_root),
            accounts = touched,
            code_blobs = code_count,
            "Committed account state"
        );

        self.root = new_root;
        self.accounts_trie = None;
        self.objects.clear();
        self.dirty_accounts.clear();
        self.dirty_storage.clear();
        self.dirty_code.clear();
        Ok(new_root)
    }
}

impl std::fmt::Debug for AccountStateStore<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountStateStore")
            .field("root", &to_hex(&self.root))
            .field("cached_objects", &self.objects.len())
            .field("dirty_accounts", &self.dirty_accounts.len())
            .finish()
    }
}
