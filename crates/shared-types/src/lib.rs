//! # Shared Types Crate
//!
//! Primitive types used by every Energy-Chain crate.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Address`, `Hash`, `U256` and `BlockTime` are
//!   defined once here and re-exported by the state and energy crates.
//! - **Plain Data**: addresses and hashes are fixed-size byte arrays, so they
//!   are `Copy`, hashable and usable as map keys without wrappers.

pub mod entities;

pub use entities::*;
