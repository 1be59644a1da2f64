pub mod flat_trie;
pub mod memory_db;

pub use flat_trie::*;
pub use memory_db::*;
