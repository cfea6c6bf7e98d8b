use std::env;
use std::time::Duration;

use tracing::warn;

/// Gas limit used when the caller gives none and no estimate is taken.
pub const DEFAULT_GAS_LIMIT: u64 = 300_000;

/// Per-request timeout applied by the HTTP transport.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

const ENV_RPC_TIMEOUT_SECS: &str = "EVM_WALLET_RPC_TIMEOUT_SECS";
const ENV_DEFAULT_GAS_LIMIT: &str = "EVM_WALLET_DEFAULT_GAS_LIMIT";
const ENV_CACHE_TOKENS: &str = "EVM_WALLET_CACHE_TOKENS";

/// Tunables shared by every wallet instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    /// Timeout for a single JSON-RPC round trip.
    pub rpc_timeout: Duration,
    /// Fallback gas limit for `build_transaction_parameters`.
    pub default_gas_limit: u64,
    /// Whether `get_token` results are memoized per chain and address.
    pub cache_tokens: bool,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
            default_gas_limit: DEFAULT_GAS_LIMIT,
            cache_tokens: true,
        }
    }
}

impl WalletConfig {
    /// Load configuration from environment variables.
    ///
    /// - `EVM_WALLET_RPC_TIMEOUT_SECS`: request timeout in seconds (default 30)
    /// - `EVM_WALLET_DEFAULT_GAS_LIMIT`: fallback gas limit (default 300000)
    /// - `EVM_WALLET_CACHE_TOKENS`: `true`/`false` (default `true`)
    ///
    /// Unparsable values fall back to the default with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let rpc_timeout = parse_var(&lookup, ENV_RPC_TIMEOUT_SECS)
            .filter(|secs: &u64| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.rpc_timeout);

        let default_gas_limit = parse_var(&lookup, ENV_DEFAULT_GAS_LIMIT)
            .filter(|gas: &u64| *gas > 0)
            .unwrap_or(defaults.default_gas_limit);

        let cache_tokens = parse_var(&lookup, ENV_CACHE_TOKENS).unwrap_or(defaults.cache_tokens);

        Self {
            rpc_timeout,
            default_gas_limit,
            cache_tokens,
        }
    }

    pub fn with_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = timeout;
        self
    }

    /// Sets the fallback gas limit. Zero is ignored, as in `from_env`.
    pub fn with_default_gas_limit(mut self, gas: u64) -> Self {
        if gas > 0 {
            self.default_gas_limit = gas;
        } else {
            warn!("ignoring zero default gas limit");
        }
        self
    }

    pub fn with_token_cache(mut self, enabled: bool) -> Self {
        self.cache_tokens = enabled;
        self
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable configuration value");
            None
        }
    }
}
