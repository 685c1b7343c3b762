//! Service configuration
//!
//! Defaults suit a local run; each field can be overridden from the
//! environment.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_LOG: &str = "ORDERBOOK_LOG";
pub const ENV_RECORD_TRADES: &str = "ORDERBOOK_RECORD_TRADES";
pub const ENV_NOTIFY_USERS: &str = "ORDERBOOK_NOTIFY_USERS";
pub const ENV_QUEUE_CONSUMERS: &str = "ORDERBOOK_QUEUE_CONSUMERS";
pub const ENV_SNAPSHOT_DEPTH: &str = "ORDERBOOK_SNAPSHOT_DEPTH";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Configuration for the order service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// `tracing` filter directive, e.g. `info` or `order_service=debug`
    pub log_filter: String,
    /// Persist trades to the trade repository
    pub record_trades: bool,
    /// Send fill messages to order owners
    pub notify_users: bool,
    /// Run the consumers above on background tasks instead of under the book lock
    pub queue_consumers: bool,
    /// Levels per side in logged book snapshots
    pub snapshot_depth: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            record_trades: true,
            notify_users: true,
            queue_consumers: true,
            snapshot_depth: 10,
        }
    }
}

impl ServiceConfig {
    /// Defaults overridden by `ORDERBOOK_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each key
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(filter) = lookup(ENV_LOG) {
            config.log_filter = filter;
        }
        if let Some(value) = lookup(ENV_RECORD_TRADES) {
            config.record_trades = parse_bool(ENV_RECORD_TRADES, &value)?;
        }
        if let Some(value) = lookup(ENV_NOTIFY_USERS) {
            config.notify_users = parse_bool(ENV_NOTIFY_USERS, &value)?;
        }
        if let Some(value) = lookup(ENV_QUEUE_CONSUMERS) {
            config.queue_consumers = parse_bool(ENV_QUEUE_CONSUMERS, &value)?;
        }
        if let Some(value) = lookup(ENV_SNAPSHOT_DEPTH) {
            config.snapshot_depth =
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: ENV_SNAPSHOT_DEPTH,
                        value: value.clone(),
                    })?;
        }

        Ok(config)
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup(&[
            (ENV_LOG, "debug"),
            (ENV_RECORD_TRADES, "false"),
            (ENV_NOTIFY_USERS, "0"),
            (ENV_QUEUE_CONSUMERS, "Off"),
            (ENV_SNAPSHOT_DEPTH, " 3 "),
        ]))
        .unwrap();

        assert_eq!(config.log_filter, "debug");
        assert!(!config.record_trades);
        assert!(!config.notify_users);
        assert!(!config.queue_consumers);
        assert_eq!(config.snapshot_depth, 3);
    }

    #[test]
    fn test_invalid_values() {
        let err = ServiceConfig::from_lookup(lookup(&[(ENV_NOTIFY_USERS, "maybe")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: ENV_NOTIFY_USERS,
                value: "maybe".to_string()
            }
        );

        assert!(ServiceConfig::from_lookup(lookup(&[(ENV_SNAPSHOT_DEPTH, "-1")])).is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ServiceConfig =
            serde_json::from_str(r#"{"notify_users": false, "snapshot_depth": 2}"#).unwrap();

        assert!(!config.notify_users);
        assert_eq!(config.snapshot_depth, 2);
        assert!(config.record_trades);
    }
}
