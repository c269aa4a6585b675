//! Configuration loading and representation.

use core::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use orderdesk_menu::MenuLimits;
use orderdesk_observability::{LogConfig, LogFormat};

pub const ENV_LOG_FILTER: &str = "ORDERDESK_LOG_FILTER";
pub const ENV_LOG_FORMAT: &str = "ORDERDESK_LOG_FORMAT";
pub const ENV_MAX_ITEM_PRICE: &str = "ORDERDESK_MAX_ITEM_PRICE";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Process configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderDeskConfig {
    pub log: LogConfig,
    pub menu: MenuLimits,
}

impl OrderDeskConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup (tests, embedding).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(filter) = lookup(ENV_LOG_FILTER) {
            config.log.filter = filter;
        }

        if let Some(raw) = lookup(ENV_LOG_FORMAT) {
            config.log.format = LogFormat::from_str(&raw).map_err(|message| ConfigError::Invalid {
                key: ENV_LOG_FORMAT,
                message,
            })?;
        }

        if let Some(raw) = lookup(ENV_MAX_ITEM_PRICE) {
            let max_price = Decimal::from_str(raw.trim()).map_err(|e| ConfigError::Invalid {
                key: ENV_MAX_ITEM_PRICE,
                message: e.to_string(),
            })?;
            if max_price <= Decimal::ZERO {
                return Err(ConfigError::Invalid {
                    key: ENV_MAX_ITEM_PRICE,
                    message: "must be positive".to_string(),
                });
            }
            config.menu.max_price = max_price;
        }

        Ok(config)
    }
}
