//! # ec-02-energy-ledger
//!
//! Energy accounting for Energy-Chain.
//!
//! ## Role in System
//!
//! - **Continuous Accrual**: every account's energy grows with its primary
//!   balance, realized lazily whenever the account is touched
//! - **Affordability Checks**: debits report shortfalls as outcomes, not
//!   errors, so fee logic can branch on them every block
//! - **Delegated Consumption**: a contract can let a caller spend the
//!   contract's energy up to a credit that recovers over time and expires
//!
//! ## Growth Formula
//!
//! ```text
//! grown(t) = energy + floor(GrowthRate * balance * (t - energy_timestamp) / Scale)
//! ```
//!
//! An account accrues nothing until the ledger first touches it, which
//! stamps `energy_timestamp`.
//!
//! All arithmetic is integer and order-independent, so every node computes
//! identical balances from the same call sequence.

pub mod domain;
pub mod service;

pub use domain::*;
pub use service::*;
