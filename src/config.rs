use std::{env, str::FromStr};

use rust_decimal::Decimal;
use thiserror::Error;

pub const LARGE_DEPOSIT_THRESHOLD_VAR: &str = "LEDGER_LARGE_DEPOSIT_THRESHOLD";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value `{value}` for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Deposits above this amount are logged at `info` level.
    pub large_deposit_threshold: Decimal,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            large_deposit_threshold: Decimal::from(10_000),
        }
    }
}

impl LedgerConfig {
    /// Reads overrides from the environment, unset variables keep defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = lookup(LARGE_DEPOSIT_THRESHOLD_VAR) {
            config.large_deposit_threshold =
                Decimal::from_str(value.trim()).map_err(|err| ConfigError::InvalidValue {
                    var: LARGE_DEPOSIT_THRESHOLD_VAR,
                    value: value.clone(),
                    reason: err.to_string(),
                })?;
        }
        Ok(config)
    }
}
