//! Resolver configuration
//!
//! Loadable from YAML, JSON or the process environment:
//!
//! ```yaml
//! encryption_key: "change-me"
//! cache_ttl_ms: 300000
//! providers: [env, binding, vault]
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Environment variable holding the cache encryption key
pub const ENV_ENCRYPTION_KEY: &str = "VAULTLINE_ENCRYPTION_KEY";
/// Environment variable holding the default cache TTL in milliseconds
pub const ENV_CACHE_TTL_MS: &str = "VAULTLINE_CACHE_TTL_MS";
/// Environment variable holding a comma-separated provider chain
pub const ENV_PROVIDERS: &str = "VAULTLINE_PROVIDERS";

/// Settings a resolver is constructed from
///
/// `encryption_key` is optional here so a partially filled config can be
/// loaded and merged; construction rejects a config without one.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Default cache lifetime in milliseconds; `None` means entries never
    /// expire by time
    pub cache_ttl_ms: Option<u64>,
    /// Key the cache's at-rest encoding is derived from
    pub encryption_key: Option<String>,
    /// Provider names, in chain order, for use with a `ProviderRegistry`
    pub providers: Vec<String>,
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the encryption key
    pub fn with_encryption_key(mut self, key: impl Into<String>) -> Self {
        self.encryption_key = Some(key.into());
        self
    }

    /// Set the default cache lifetime
    ///
    /// Stored in whole milliseconds: a non-zero sub-millisecond remainder
    /// rounds up and values beyond `u64::MAX` ms saturate, so a non-zero
    /// TTL never becomes zero.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl_ms = Some(ttl_to_millis(ttl));
        self
    }

    /// Set the provider chain by name
    pub fn with_providers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.providers = names.into_iter().map(Into::into).collect();
        self
    }

    /// The default cache lifetime as a `Duration`
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_ms.map(Duration::from_millis)
    }

    /// Parse a YAML document
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse a JSON document
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read `VAULTLINE_ENCRYPTION_KEY`, `VAULTLINE_CACHE_TTL_MS` and
    /// `VAULTLINE_PROVIDERS` from the process environment
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let encryption_key = lookup(ENV_ENCRYPTION_KEY).filter(|v| !v.is_empty());

        let cache_ttl_ms = match lookup(ENV_CACHE_TTL_MS).filter(|v| !v.trim().is_empty()) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| ConfigError::invalid_value(ENV_CACHE_TTL_MS, e.to_string()))?,
            ),
            None => None,
        };

        let providers = lookup(ENV_PROVIDERS)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            cache_ttl_ms,
            encryption_key,
            providers,
        })
    }

    /// Fill unset fields from `other`
    pub fn merge(mut self, other: ResolverConfig) -> Self {
        if self.cache_ttl_ms.is_none() {
            self.cache_ttl_ms = other.cache_ttl_ms;
        }
        if self.encryption_key.is_none() {
            self.encryption_key = other.encryption_key;
        }
        if self.providers.is_empty() {
            self.providers = other.providers;
        }
        self
    }

    /// The encryption key, if it is set and not blank
    pub(crate) fn require_encryption_key(&self) -> ConfigResult<&str> {
        self.encryption_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingEncryptionKey)
    }
}

fn ttl_to_millis(ttl: Duration) -> u64 {
    let mut millis = ttl.as_millis();
    if ttl.subsec_nanos() % 1_000_000 != 0 {
        millis += 1;
    }
    u64::try_from(millis).unwrap_or(u64::MAX)
}

impl fmt::Debug for ResolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverConfig")
            .field("cache_ttl_ms", &self.cache_ttl_ms)
            .field(
                "encryption_key",
                &self.encryption_key.as_ref().map(|_| "<redacted>"),
            )
            .field("providers", &self.providers)
            .finish()
    }
}
