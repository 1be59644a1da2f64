//! # State Session Integration
//!
//! Exercises the account state store across session boundaries with the
//! in-memory key/value store and the flat trie backend.
//!
//! ## Flow Tested
//!
//! 1. Populate accounts, storage and code, commit
//! 2. Reopen at the new root and fault objects in lazily
//! 3. Damage the backing store and check the failure is reported, not hidden

#[cfg(test)]
mod tests {
    use ec_01_account_state::{
        Account, AccountStateStore, FlatTrieBackend, InMemoryKvStore, StateError, StorageKey,
        EMPTY_TRIE_ROOT,
    };
    use rand::Rng;
    use shared_types::{address_from_bytes, keccak256, Address, Hash, U256};

    use crate::init_test_tracing;

    fn slot(n: u8) -> StorageKey {
        let mut key = [0u8; 32];
        key[31] = n;
        key
    }

    fn contract() -> Address {
        address_from_bytes(b"contract")
    }

    /// Commit one contract with two slots and some code.
    fn seed(kv: &InMemoryKvStore, code: &[u8]) -> Hash {
        let mut state = AccountStateStore::new(EMPTY_TRIE_ROOT, kv, &FlatTrieBackend);
        state.set_balance(&contract(), U256::from(7u64)).unwrap();
        state.set_storage(&contract(), slot(1), b"one".to_vec()).unwrap();
        state.set_storage(&contract(), slot(2), b"two".to_vec()).unwrap();
        state.set_code(&contract(), code.to_vec()).unwrap();
        state.commit().unwrap()
    }

    #[test]
    fn test_storage_trie_faulted_in_once_per_session() {
        init_test_tracing();
        let kv = InMemoryKvStore::new();
        let root = seed(&kv, &[0x60, 0x00]);

        let mut state = AccountStateStore::new(root, &kv, &FlatTrieBackend);
        // Load the record first so only storage traffic is counted below
        state.account(&contract()).unwrap();
        kv.reset_reads();

        assert_eq!(state.storage(&contract(), &slot(1)).unwrap(), b"one".to_vec());
        let after_first = kv.reads();
        assert!(after_first > 0);

        assert_eq!(state.storage(&contract(), &slot(2)).unwrap(), b"two".to_vec());
        assert_eq!(state.storage(&contract(), &slot(1)).unwrap(), b"one".to_vec());
        assert!(state.storage(&contract(), &slot(9)).unwrap().is_empty());
        assert_eq!(kv.reads(), after_first);

        let obj = state.cached_account(&contract()).unwrap();
        assert!(obj.is_storage_loaded());
        assert_eq!(obj.cached_storage_len(), 3);
    }

    #[test]
    fn test_code_loaded_once_and_verified() {
        init_test_tracing();
        let kv = InMemoryKvStore::new();
        let code = vec![0x60, 0x80, 0x60, 0x40];
        let root = seed(&kv, &code);

        let mut state = AccountStateStore::new(root, &kv, &FlatTrieBackend);
        state.account(&contract()).unwrap();
        kv.reset_reads();

        assert_eq!(state.code(&contract()).unwrap(), code);
        assert_eq!(kv.reads(), 1);
        assert_eq!(state.code(&contract()).unwrap(), code);
        assert_eq!(kv.reads(), 1);
    }

    #[test]
    fn test_missing_code_blob_is_code_access_error() {
        init_test_tracing();
        let kv = InMemoryKvStore::new();
        let code = vec![0x60, 0x01];
        let root = seed(&kv, &code);
        assert!(kv.remove(&keccak256(&code)).is_some());

        let mut state = AccountStateStore::new(root, &kv, &FlatTrieBackend);
        let err = state.code(&contract()).unwrap_err();
        assert!(err.is_access_error());
        match err {
            StateError::CodeAccess { address, code_hash, .. } => {
                assert_eq!(address, contract());
                assert_eq!(code_hash, keccak256(&code));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_tampered_code_blob_is_rejected() {
        init_test_tracing();
        let kv = InMemoryKvStore::new();
        let code = vec![0x60, 0x02];
        let root = seed(&kv, &code);
        ec_01_account_state::KeyValueStore::put(&kv, &keccak256(&code), vec![0xFF]).unwrap();

        let mut state = AccountStateStore::new(root, &kv, &FlatTrieBackend);
        assert!(matches!(
            state.code(&contract()),
            Err(StateError::CodeAccess { .. })
        ));
    }

    #[test]
    fn test_missing_storage_trie_is_storage_access_error() {
        init_test_tracing();
        let kv = InMemoryKvStore::new();
        let addr = address_from_bytes(b"broken");
        let dangling: Hash = [0x42; 32];

        let mut state = AccountStateStore::new(EMPTY_TRIE_ROOT, &kv, &FlatTrieBackend);
        let account = Account {
            balance: U256::one(),
            storage_root: dangling,
            ..Default::default()
        };
        state.put_account(&addr, account).unwrap();

        let err = state.storage(&addr, &slot(1)).unwrap_err();
        match err {
            StateError::StorageAccess { address, source } => {
                assert_eq!(address, addr);
                assert!(matches!(*source, StateError::MissingTrieNode { root } if root == dangling));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_replaced_storage_root_serves_new_content() {
        init_test_tracing();
        let kv = InMemoryKvStore::new();
        let root = seed(&kv, &[0x01]);

        // A second contract with different content at the same slot
        let other = address_from_bytes(b"other");
        let other_root = {
            let mut state = AccountStateStore::new(root, &kv, &FlatTrieBackend);
            state.set_storage(&other, slot(1), b"uno".to_vec()).unwrap();
            state.commit().unwrap()
        };

        let mut state = AccountStateStore::new(other_root, &kv, &FlatTrieBackend);
        assert_eq!(state.storage(&contract(), &slot(1)).unwrap(), b"one".to_vec());

        let mut account = state.account(&contract()).unwrap();
        account.storage_root = state.account(&other).unwrap().storage_root;
        state.put_account(&contract(), account).unwrap();

        assert!(!state.cached_account(&contract()).unwrap().is_storage_loaded());
        assert_eq!(state.storage(&contract(), &slot(1)).unwrap(), b"uno".to_vec());
    }

    #[test]
    fn test_random_sessions_match_reference_model() {
        init_test_tracing();
        let kv = InMemoryKvStore::new();
        let mut rng = rand::thread_rng();
        let addresses: Vec<Address> = (0u8..4).map(|i| [i + 1; 20]).collect();
        let mut model = std::collections::BTreeMap::new();
        let mut root = EMPTY_TRIE_ROOT;

        for _ in 0..5 {
            let mut state = AccountStateStore::new(root, &kv, &FlatTrieBackend);
            for _ in 0..20 {
                let addr = addresses[rng.gen_range(0..addresses.len())];
                let key = slot(rng.gen_range(0..6));
                let value = if rng.gen_bool(0.2) {
                    Vec::new()
                } else {
                    rng.gen::<[u8; 4]>().to_vec()
                };
                state.set_storage(&addr, key, value.clone()).unwrap();
                model.insert((addr, key), value);
            }
            root = state.commit().unwrap();
        }

        let mut state = AccountStateStore::new(root, &kv, &FlatTrieBackend);
        for ((addr, key), value) in &model {
            assert_eq!(&state.storage(addr, key).unwrap(), value);
        }
    }
}
