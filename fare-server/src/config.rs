//! Server configuration from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::engine::{FarePolicy, UnknownPolicy};
use crate::notify::WebhookConfig;
use crate::registry::FareCacheConfig;

/// Default port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;

/// Default webhook request timeout in seconds.
const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 10;

/// Errors from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Policy(#[from] UnknownPolicy),
}

/// Everything `main` needs to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    pub addr: SocketAddr,

    /// Fare computation policy for this deployment
    pub policy: FarePolicy,

    /// Snapshot file for the JSON store; `None` keeps data in memory only
    pub data_path: Option<PathBuf>,

    /// Fare lookup cache sizing
    pub fare_cache: FareCacheConfig,

    /// Outbound notification webhooks
    pub webhooks: WebhookConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
            policy: FarePolicy::default(),
            data_path: None,
            fare_cache: FareCacheConfig::default(),
            webhooks: WebhookConfig {
                timeout_secs: DEFAULT_WEBHOOK_TIMEOUT_SECS,
                ..WebhookConfig::default()
            },
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let host = match get("HOST") {
            Some(value) => value.trim().parse::<IpAddr>().map_err(|e| ConfigError::Invalid {
                var: "HOST",
                value,
                reason: e.to_string(),
            })?,
            None => defaults.addr.ip(),
        };

        let port = match get("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                value,
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let policy = match get("FARE_POLICY") {
            Some(value) => value.parse()?,
            None => defaults.policy,
        };

        let fare_cache = match get("FARE_CACHE_CAPACITY") {
            Some(value) => FareCacheConfig {
                max_capacity: value.trim().parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::Invalid {
                        var: "FARE_CACHE_CAPACITY",
                        value,
                        reason: e.to_string(),
                    }
                })?,
            },
            None => defaults.fare_cache,
        };

        Ok(Self {
            addr: SocketAddr::new(host, port),
            policy,
            data_path: get("FARE_DATA_PATH").map(PathBuf::from),
            fare_cache,
            webhooks: WebhookConfig {
                search: get("SEARCH_WEBHOOK"),
                error: get("ERROR_WEBHOOK"),
                registration: get("REGISTRATION_WEBHOOK"),
                timeout_secs: DEFAULT_WEBHOOK_TIMEOUT_SECS,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|var| map.get(var).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.policy, FarePolicy::TableLookup);
        assert_eq!(config.data_path, None);
        assert_eq!(config.fare_cache.max_capacity, 10_000);
        assert!(!config.webhooks.is_enabled());
        assert_eq!(config.webhooks.timeout_secs, 10);
    }

    #[test]
    fn reads_all_variables() {
        let config = config(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("FARE_POLICY", "distance"),
            ("FARE_DATA_PATH", "/var/lib/fares.json"),
            ("FARE_CACHE_CAPACITY", "500"),
            ("SEARCH_WEBHOOK", "http://hooks/search"),
            ("ERROR_WEBHOOK", "http://hooks/error"),
            ("REGISTRATION_WEBHOOK", "http://hooks/reg"),
        ])
        .unwrap();

        assert_eq!(config.addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.policy, FarePolicy::DistanceDerived);
        assert_eq!(config.data_path, Some(PathBuf::from("/var/lib/fares.json")));
        assert_eq!(config.fare_cache.max_capacity, 500);
        assert_eq!(config.webhooks.search.as_deref(), Some("http://hooks/search"));
        assert_eq!(config.webhooks.error.as_deref(), Some("http://hooks/error"));
        assert_eq!(
            config.webhooks.registration.as_deref(),
            Some("http://hooks/reg")
        );
    }

    #[test]
    fn empty_values_are_unset() {
        let config = config(&[("PORT", ""), ("SEARCH_WEBHOOK", "  ")]).unwrap();
        assert_eq!(config.addr.port(), DEFAULT_PORT);
        assert_eq!(config.webhooks.search, None);
    }

    #[test]
    fn invalid_values_are_errors() {
        let err = config(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));

        let err = config(&[("HOST", "not-an-ip")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "HOST", .. }));

        let err = config(&[("FARE_POLICY", "graph")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown fare policy \"graph\" (expected \"table\" or \"distance\")"
        );
    }
}
