use ec_01_account_state::StateError;
use thiserror::Error;

/// Hard failures of the energy ledger.
///
/// Shortfalls are not errors; see [`crate::Debit`] and [`crate::Consumption`].
#[derive(Debug, Error)]
pub enum EnergyError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error("Corrupted {kind} record: {reason}")]
    CorruptedRecord { kind: &'static str, reason: String },

    #[error("Invalid energy parameters: {0}")]
    InvalidParams(String),
}
