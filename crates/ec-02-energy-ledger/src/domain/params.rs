//! Energy protocol parameters
//!
//! The defaults are network-wide protocol constants. They are only ever
//! overridden for test networks, never per call.

use serde::{Deserialize, Serialize};
use shared_types::U256;

use super::EnergyError;

/// Energy wei accrued per primary-currency unit per second.
pub const ENERGY_GROWTH_RATE: u64 = 5_000_000_000;

/// Fixed-point scale of a primary-currency unit (10^18 base units).
pub const ENERGY_SCALE: u64 = 1_000_000_000_000_000_000;

/// Growth parameters of the energy ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyParams {
    /// Energy accrued per `scale` base units of balance per second.
    pub growth_rate: U256,
    /// Divisor applied to `growth_rate * balance * elapsed`.
    pub scale: U256,
}

impl Default for EnergyParams {
    fn default() -> Self {
        Self {
            growth_rate: U256::from(ENERGY_GROWTH_RATE),
            scale: U256::from(ENERGY_SCALE),
        }
    }
}

impl EnergyParams {
    /// Create parameters with validation
    pub fn new(growth_rate: U256, scale: U256) -> Result<Self, EnergyError> {
        let params = Self { growth_rate, scale };
        params.validate()?;
        Ok(params)
    }

    /// Load parameters from JSON. Amounts are `0x`-prefixed hex strings.
    pub fn from_json(json: &str) -> Result<Self, EnergyError> {
        let params: Self =
            serde_json::from_str(json).map_err(|e| EnergyError::InvalidParams(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), EnergyError> {
        if self.scale.is_zero() {
            return Err(EnergyError::InvalidParams("scale cannot be 0".to_string()));
        }
        Ok(())
    }

    /// Builder-style method to set the growth rate
    pub fn with_growth_rate(mut self, growth_rate: U256) -> Self {
        self.growth_rate = growth_rate;
        self
    }
}
