//! Service configuration: a TOML file, overridden by command-line flags.
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:3001"
//!
//! [store]
//! backend = "redis"
//! prefix = "thoughtbook"
//!
//! [redis]
//! url = "${REDIS_URL}"
//! ```

use std::{net::SocketAddr, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "thoughtbook.toml";
pub const DEFAULT_BIND: &str = "127.0.0.1:3001";
pub const DEFAULT_PREFIX: &str = "thoughtbook";
/// Used when the url is left at `${REDIS_URL}` and the variable is unset.
pub const FALLBACK_REDIS_URL: &str = "redis://127.0.0.1:6379";

const REDIS_URL_PLACEHOLDER: &str = "${REDIS_URL}";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub redis: RedisSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local store; data is lost on exit.
    Memory,
    #[default]
    Redis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            prefix: default_prefix(),
        }
    }
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedisSettings {
    #[serde(default = "default_redis_url")]
    pub url: String,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
        }
    }
}

fn default_redis_url() -> String {
    REDIS_URL_PLACEHOLDER.to_string()
}

/// Values given on the command line; each one replaces its file counterpart.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind: Option<String>,
    pub backend: Option<StoreBackend>,
    pub redis_url: Option<String>,
    pub prefix: Option<String>,
}

/// Fully resolved settings the server starts with.
#[derive(Debug, Clone, PartialEq)]
pub struct ServeSettings {
    pub bind: SocketAddr,
    pub backend: StoreBackend,
    pub prefix: String,
    pub redis_url: String,
}

impl AppConfig {
    /// Reads `path`, or returns the defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(bind) = overrides.bind {
            self.server.bind = bind;
        }
        if let Some(backend) = overrides.backend {
            self.store.backend = backend;
        }
        if let Some(url) = overrides.redis_url {
            self.redis.url = url;
        }
        if let Some(prefix) = overrides.prefix {
            self.store.prefix = prefix;
        }
        self
    }

    /// Expands `${VAR}` references from the process environment and parses the bind address.
    pub fn resolve(&self) -> Result<ServeSettings> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    pub fn resolve_with<F>(&self, lookup: F) -> Result<ServeSettings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = expand_env(&self.server.bind, &lookup)?;
        let bind = bind
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid bind address '{bind}'"))?;

        let redis_url = if self.redis.url == REDIS_URL_PLACEHOLDER {
            lookup("REDIS_URL").unwrap_or_else(|| FALLBACK_REDIS_URL.to_string())
        } else {
            expand_env(&self.redis.url, &lookup)?
        };

        Ok(ServeSettings {
            bind,
            backend: self.store.backend,
            prefix: expand_env(&self.store.prefix, &lookup)?,
            redis_url,
        })
    }
}

/// Replaces a whole-value `${VAR}` with the variable's value.
pub fn expand_env<F>(value: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match value.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
        Some(var_name) => lookup(var_name).with_context(|| format!("Environment variable {var_name} not set")),
        None => Ok(value.to_string()),
    }
}
