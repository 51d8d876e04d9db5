//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::memo::SweepPolicy;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the portal YAML document
    pub config_path: PathBuf,
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds for the memoized configuration loader
    pub settings_ttl: u64,
    /// TTL in seconds for memoized catalog views
    pub catalog_ttl: u64,
    /// Seconds between memo sweeps
    pub sweep_interval: u64,
    /// Optional fixed age limit in seconds applied by the sweeper
    pub sweep_max_age: Option<u64>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORTAL_CONFIG` - Portal YAML path (default: config.yaml)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SETTINGS_TTL` - Configuration cache TTL in seconds (default: 600)
    /// - `CATALOG_TTL` - Catalog view cache TTL in seconds (default: 300)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 300)
    /// - `SWEEP_MAX_AGE` - Evict anything older than this many seconds (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            config_path: env::var("PORTAL_CONFIG")
                .map(PathBuf::from)
                .unwrap_or(defaults.config_path),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            settings_ttl: parse_var("SETTINGS_TTL").unwrap_or(defaults.settings_ttl),
            catalog_ttl: parse_var("CATALOG_TTL").unwrap_or(defaults.catalog_ttl),
            sweep_interval: parse_var("SWEEP_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.sweep_interval),
            sweep_max_age: parse_var("SWEEP_MAX_AGE"),
        }
    }

    pub fn settings_ttl(&self) -> Duration {
        Duration::from_secs(self.settings_ttl)
    }

    pub fn catalog_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_ttl)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }

    /// `MaxAge` when a limit is configured, otherwise each entry's own TTL.
    pub fn sweep_policy(&self) -> SweepPolicy {
        match self.sweep_max_age {
            Some(secs) => SweepPolicy::MaxAge(Duration::from_secs(secs)),
            None => SweepPolicy::EntryTtl,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("config.yaml"),
            server_port: 3000,
            settings_ttl: 600,
            catalog_ttl: 300,
            sweep_interval: 300,
            sweep_max_age: None,
        }
    }
}
