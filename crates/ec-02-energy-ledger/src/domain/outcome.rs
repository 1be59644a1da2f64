//! Outcomes of debits that may legitimately fall short.
//!
//! Fee logic hits these branches on every block, so they are values the
//! caller matches on rather than errors.

use shared_types::{Address, U256};

/// Result of an energy debit.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Debit {
    /// The amount was subtracted; `remaining` is the realized balance left.
    Applied { remaining: U256 },
    /// Nothing was changed.
    Insufficient { required: U256, available: U256 },
}

impl Debit {
    pub fn is_applied(&self) -> bool {
        matches!(self, Debit::Applied { .. })
    }
}

/// Why a delegated consumption was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefusalReason {
    /// No contract was given to pay.
    NoContract,
    /// The contract never approved this caller.
    NoAllowance,
    /// The approval lapsed.
    Expired { expiration: u64 },
    /// The recovered credit does not cover the amount.
    AllowanceExceeded { allowance: U256, required: U256 },
    /// The contract's own energy does not cover the amount.
    InsufficientEnergy { available: U256, required: U256 },
}

/// Result of a delegated consumption.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Consumption {
    /// `payer`'s energy was debited and its allowance reduced.
    Paid { payer: Address },
    /// Nothing was changed; the caller must find another payer.
    Refused(RefusalReason),
}

impl Consumption {
    pub fn is_paid(&self) -> bool {
        matches!(self, Consumption::Paid { .. })
    }

    /// The account that was debited, if any.
    pub fn payer(&self) -> Option<Address> {
        match self {
            Consumption::Paid { payer } => Some(*payer),
            Consumption::Refused(_) => None,
        }
    }
}
