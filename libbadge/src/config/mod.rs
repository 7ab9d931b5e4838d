//! Service configuration.
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! `BADGE_*` environment variables (`BADGE_NETWORK__TIMEOUT=5` sets
//! `network.timeout`).

use crate::auth::TokenScheme;
use crate::client::{DEFAULT_TIMEOUT_SECONDS, DEFAULT_USER_AGENT};
use crate::error::{BadgeError, Result};
use crate::format::SizeUnits;
use config::{Config as ConfigRs, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[cfg(test)]
mod tests;

/// Prefix of the environment variables that override settings.
pub const ENV_PREFIX: &str = "BADGE";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub registry: Registry,
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub resolver: Resolver,
    #[serde(default)]
    pub badge: BadgeDefaults,
}

impl Config {
    /// Parses a `Config` from a YAML string, on top of the defaults.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let builder = Self::defaults_builder()?.add_source(File::from_str(s, FileFormat::Yaml));
        Self::from_builder(builder, None)
    }

    /// Loads a `Config` from defaults, an optional YAML file and the environment.
    ///
    /// A given `path` must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::build(path, Self::environment())
    }

    fn build(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Self::defaults_builder()?;

        if let Some(p) = path {
            builder = builder.add_source(File::from(p).required(true));
        }

        let display_path = path.map(|p| p.display().to_string());
        let config = Self::from_builder(builder.add_source(env), display_path)?;
        config.validate()?;
        Ok(config)
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn defaults_builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults = ConfigRs::try_from(&Config::default()).map_err(|e| {
            BadgeError::config_with_source("Failed to serialize default configuration", None, e)
        })?;
        Ok(ConfigRs::builder().add_source(defaults))
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        path: Option<String>,
    ) -> Result<Self> {
        builder
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| {
                BadgeError::config_with_source(
                    "Failed to deserialize configuration".to_string(),
                    path,
                    e,
                )
            })
    }

    /// Rejects values that would make every request fail.
    pub fn validate(&self) -> Result<()> {
        if self.registry.url.trim().is_empty() {
            return Err(BadgeError::config("registry.url must not be empty", None));
        }
        if self.network.timeout == 0 {
            return Err(BadgeError::config("network.timeout must be positive", None));
        }
        if self.resolver.max_depth == 0 {
            return Err(BadgeError::config("resolver.max_depth must be positive", None));
        }
        Ok(())
    }
}

/// Registry endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Registry {
    #[serde(default = "default_registry_url")]
    pub url: String,

    /// Token endpoint; `{url}/token` when unset.
    #[serde(default)]
    pub token_url: Option<String>,

    #[serde(default)]
    pub service: Option<String>,

    #[serde(default)]
    pub token_scheme: TokenScheme,

    /// Basic credentials for private packages.
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            url: default_registry_url(),
            token_url: None,
            service: None,
            token_scheme: TokenScheme::default(),
            username: None,
            password: None,
        }
    }
}

fn default_registry_url() -> String {
    "https://ghcr.io".to_string()
}

/// Network settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Network {
    /// Per-request timeout in seconds.
    #[serde(default = "default_network_timeout")]
    pub timeout: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            timeout: default_network_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_network_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Manifest resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resolver {
    /// Maximum number of manifest fetches for one resolution.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> usize {
    8
}

/// Defaults applied to badge requests that leave a parameter out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BadgeDefaults {
    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_invalid_color")]
    pub invalid_color: String,

    #[serde(default)]
    pub size_units: SizeUnits,

    /// Number of tags shown on the tags badge.
    #[serde(default = "default_tags_count")]
    pub tags_count: u64,

    /// Comma-separated ignore globs.
    #[serde(default = "default_ignore")]
    pub ignore: String,

    /// `""`, `"patch"` or `"major"`.
    #[serde(default)]
    pub trim: String,
}

impl Default for BadgeDefaults {
    fn default() -> Self {
        Self {
            color: default_color(),
            invalid_color: default_invalid_color(),
            size_units: SizeUnits::default(),
            tags_count: default_tags_count(),
            ignore: default_ignore(),
            trim: String::new(),
        }
    }
}

fn default_color() -> String {
    "#44cc11".to_string()
}

fn default_invalid_color() -> String {
    "#e05d44".to_string()
}

fn default_tags_count() -> u64 {
    3
}

fn default_ignore() -> String {
    "latest".to_string()
}
