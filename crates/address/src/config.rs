use crate::{AddressError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning for address autocomplete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressConfig {
    /// Quiet period after the last keystroke before the account set is queried
    pub debounce_ms: u64,

    /// Maximum number of suggestions shown at once
    pub max_suggestions: usize,

    /// Inputs shorter than this (in characters) never produce suggestions
    pub min_query_chars: usize,
}

impl Default for AddressConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 150,
            max_suggestions: 5,
            min_query_chars: 2,
        }
    }
}

impl AddressConfig {
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate().map_err(AddressError::InvalidConfig)?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_suggestions == 0 {
            return Err("max_suggestions must be > 0".to_string());
        }

        if self.min_query_chars == 0 {
            return Err("min_query_chars must be > 0".to_string());
        }

        if self.debounce_ms > 10_000 {
            return Err(format!(
                "debounce_ms ({}) cannot exceed 10000",
                self.debounce_ms
            ));
        }

        Ok(())
    }
}
