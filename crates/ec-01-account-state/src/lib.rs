//! # ec-01-account-state
//!
//! Account State subsystem for Energy-Chain.
//!
//! ## Role in System
//!
//! - **Cached Account Objects**: one per touched account per session, with
//!   fault-in-once caches for contract code, the storage-trie handle and
//!   every storage slot already read
//! - **Account State Store**: hands out cached objects by address, stages
//!   writes and commits them into new storage roots and a new state root
//! - **Capabilities as Ports**: the key/value store and the trie are injected
//!   as borrowed trait objects, never global state
//!
//! ## Session Flow
//!
//! ```text
//! [Energy Ledger / Tx Execution]
//!              │ account(), storage(), code(), set_*()
//!              ↓
//!     [AccountStateStore] ──commit()──→ new state root
//!              │ cached_account()
//!              ↓
//!      [CachedAccount] ──open once──→ [TrieBackend] ──→ [KeyValueStore]
//! ```
//!
//! A store is one session: `commit()` ends it and discards every cached
//! object so nothing cached against the old roots can be served again.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
