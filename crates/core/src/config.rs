//! Layered application configuration.
//!
//! Values come from `config/default.toml` and `config/local.toml` (both
//! optional) overridden by `FINDER__`-prefixed environment variables, e.g.
//! `FINDER__SERVER__PORT=18020` or `FINDER__ORACLE__API_KEY=...`.

use config::{Config, ConfigError, Environment, File};
use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub oracle: OracleConfig,
    pub dispatch: DispatchConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub enable_tracing: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 18020,
            enable_cors: true,
            enable_tracing: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OracleConfig {
    /// Base URL of the OpenAI-compatible completion endpoint.
    pub base_url: String,
    /// Model identifier passed in completion requests.
    pub model: String,
    /// API key; falls back to `OPENROUTER_API_KEY` when unset.
    pub api_key: Option<Secret<String>>,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".into(),
            model: "openai/gpt-4o-mini".into(),
            api_key: None,
            timeout_ms: 3000,
        }
    }
}

impl OracleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Configured API key, or the `OPENROUTER_API_KEY` environment variable.
    pub fn resolve_api_key(&self) -> Option<Secret<String>> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENROUTER_API_KEY").ok().map(Secret::new))
    }
}

/// Whether failed classifications are memoized alongside successes.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Cache only successful results, so a transient oracle outage stays
    /// retryable.
    #[default]
    SuccessOnly,
    /// Cache every result, failures included.
    All,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DispatchConfig {
    /// Upper bound on concurrent oracle calls.
    pub max_concurrency: usize,
    pub cache_policy: CachePolicy,
    /// Lowercase and collapse whitespace in cache keys. Off by default:
    /// "Help me" and "help me" are distinct keys.
    pub normalize_keys: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 5,
            cache_policy: CachePolicy::SuccessOnly,
            normalize_keys: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CatalogConfig {
    /// Path to a JSON catalog file; the built-in reference catalog is used
    /// when unset.
    pub path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Map FINDER__SERVER__PORT=18020 to server.port
            .add_source(Environment::with_prefix("FINDER").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_deployment() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 18020);
        assert_eq!(cfg.dispatch.max_concurrency, 5);
        assert_eq!(cfg.dispatch.cache_policy, CachePolicy::SuccessOnly);
        assert!(!cfg.dispatch.normalize_keys);
        assert_eq!(cfg.oracle.timeout(), Duration::from_millis(3000));
        assert!(cfg.oracle.base_url.contains("openrouter.ai"));
    }

    #[test]
    fn cache_policy_parses_snake_case() {
        #[derive(Deserialize)]
        struct Holder {
            policy: CachePolicy,
        }

        let holder: Holder = serde_json::from_str(r#"{"policy": "all"}"#).unwrap();
        assert_eq!(holder.policy, CachePolicy::All);

        let holder: Holder = serde_json::from_str(r#"{"policy": "success_only"}"#).unwrap();
        assert_eq!(holder.policy, CachePolicy::SuccessOnly);
    }
}
