//! # Consumption Allowance
//!
//! Credit a contract grants a caller against the contract's own energy.
//! The credit recovers linearly from the last approval or consumption and
//! is void from `expiration` on, however much it would have recovered.

use serde::{Deserialize, Serialize};
use shared_types::{BlockTime, U256};

use super::EnergyError;

const RECORD_KIND: &str = "consumption allowance";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionAllowance {
    /// Credit left as of `approval_timestamp`.
    pub credit: U256,
    /// Credit recovered per second.
    pub recovery_rate: U256,
    /// Time of the approval or of the last consumption.
    pub approval_timestamp: BlockTime,
    /// First instant at which the allowance is void.
    pub expiration: BlockTime,
}

impl ConsumptionAllowance {
    pub fn new(credit: U256, recovery_rate: U256, now: BlockTime, expiration: BlockTime) -> Self {
        Self {
            credit,
            recovery_rate,
            approval_timestamp: now,
            expiration,
        }
    }

    pub fn is_expired(&self, now: BlockTime) -> bool {
        now >= self.expiration
    }

    /// Spendable credit at `now`.
    pub fn remaining(&self, now: BlockTime) -> U256 {
        if self.is_expired(now) {
            return U256::zero();
        }
        let elapsed = U256::from(now.saturating_sub(self.approval_timestamp));
        self.credit
            .saturating_add(self.recovery_rate.saturating_mul(elapsed))
    }

    /// The allowance after spending `amount` at `now`, or `None` if it does
    /// not cover the amount.
    ///
    /// Recovered credit is realized into `credit` and the approval time
    /// advances to `now`, so recovery restarts from the spend.
    pub fn consumed(&self, now: BlockTime, amount: U256) -> Option<Self> {
        if self.is_expired(now) {
            return None;
        }
        let credit = self.remaining(now).checked_sub(amount)?;
        Some(Self {
            credit,
            approval_timestamp: self.approval_timestamp.max(now),
            ..self.clone()
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>, EnergyError> {
        bincode::serialize(self).map_err(|e| EnergyError::CorruptedRecord {
            kind: RECORD_KIND,
            reason: e.to_string(),
        })
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, EnergyError> {
        bincode::deserialize(bytes).map_err(|e| EnergyError::CorruptedRecord {
            kind: RECORD_KIND,
            reason: e.to_string(),
        })
    }
}
