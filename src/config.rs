//! Configuration Module
//!
//! Handles loading and managing gateway configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Deployment environment name ("production" hides error detail)
    pub environment: String,
    /// JSON-RPC node URL
    pub rpc_endpoint: String,
    /// Per-call timeout for chain-state requests, in seconds
    pub rpc_timeout_secs: u64,
    /// General route class window length, in minutes
    pub rate_limit_window_mins: u64,
    /// General route class request budget per window
    pub rate_limit_max: u32,
    /// Maximum number of cached responses
    pub cache_max_entries: usize,
    /// Background sweep interval in seconds
    pub cleanup_interval: u64,
    /// Optional JSON snapshot used to seed the in-memory storage
    pub storage_snapshot: Option<PathBuf>,
    /// Key clients on `X-Forwarded-For` instead of the socket peer
    pub trust_proxy: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 3001)
    /// - `APP_ENV` - Environment name (default: development)
    /// - `RPC_ENDPOINT` - JSON-RPC node URL
    /// - `RPC_TIMEOUT_SECS` - Chain-state call timeout (default: 10)
    /// - `RATE_LIMIT_WINDOW` - General window in minutes (default: 15)
    /// - `RATE_LIMIT_MAX` - General requests per window (default: 100)
    /// - `CACHE_MAX_ENTRIES` - Response cache capacity (default: 1000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `STORAGE_SNAPSHOT` - Path to a storage snapshot (default: none)
    /// - `TRUST_PROXY` - Honour `X-Forwarded-For` (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("PORT").unwrap_or(defaults.server_port),
            environment: env::var("APP_ENV").unwrap_or(defaults.environment),
            rpc_endpoint: env::var("RPC_ENDPOINT").unwrap_or(defaults.rpc_endpoint),
            rpc_timeout_secs: parse_var("RPC_TIMEOUT_SECS").unwrap_or(defaults.rpc_timeout_secs),
            rate_limit_window_mins: parse_var("RATE_LIMIT_WINDOW")
                .unwrap_or(defaults.rate_limit_window_mins),
            rate_limit_max: parse_var("RATE_LIMIT_MAX").unwrap_or(defaults.rate_limit_max),
            cache_max_entries: parse_var("CACHE_MAX_ENTRIES")
                .unwrap_or(defaults.cache_max_entries),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            storage_snapshot: env::var("STORAGE_SNAPSHOT").ok().map(PathBuf::from),
            trust_proxy: parse_var("TRUST_PROXY").unwrap_or(defaults.trust_proxy),
        }
    }

    /// Whether error responses may carry debug detail.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3001,
            environment: "development".to_string(),
            rpc_endpoint: "https://api.testnet.nexis.network".to_string(),
            rpc_timeout_secs: 10,
            rate_limit_window_mins: 15,
            rate_limit_max: 100,
            cache_max_entries: 1000,
            cleanup_interval: 60,
            storage_snapshot: None,
            trust_proxy: false,
        }
    }
}
