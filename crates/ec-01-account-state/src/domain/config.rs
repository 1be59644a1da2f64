//! Account state configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use ec_01_account_state::StateConfig;
//!
//! let config = StateConfig::default()
//!     .with_max_code_size(48 * 1024)
//!     .with_max_storage_value_size(1024);
//! config.validate()?;
//! ```

use serde::{Deserialize, Serialize};

use super::StateError;

/// Default contract code size limit (24 KiB).
pub const DEFAULT_MAX_CODE_SIZE: usize = 24 * 1024;

/// Default storage value size limit (4 KiB).
pub const DEFAULT_MAX_STORAGE_VALUE_SIZE: usize = 4 * 1024;

/// Limits applied to writes staged in an account state session.
///
/// Reads are never limited: a value already committed is served as stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// Maximum contract code size in bytes (DoS protection).
    pub max_code_size: usize,
    /// Maximum size of a single storage value in bytes.
    pub max_storage_value_size: usize,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            max_code_size: DEFAULT_MAX_CODE_SIZE,
            max_storage_value_size: DEFAULT_MAX_STORAGE_VALUE_SIZE,
        }
    }
}

impl StateConfig {
    /// Load a configuration from JSON, filling omitted fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, StateError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| StateError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the limits.
    pub fn validate(&self) -> Result<(), StateError> {
        if self.max_code_size == 0 {
            return Err(StateError::InvalidConfig(
                "max_code_size cannot be 0".to_string(),
            ));
        }
        if self.max_storage_value_size == 0 {
            return Err(StateError::InvalidConfig(
                "max_storage_value_size cannot be 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder-style method to set the code size limit
    pub fn with_max_code_size(mut self, max: usize) -> Self {
        self.max_code_size = max;
        self
    }

    /// Builder-style method to set the storage value size limit
    pub fn with_max_storage_value_size(mut self, max: usize) -> Self {
        self.max_storage_value_size = max;
        self
    }
}
