//! Application configuration management
//!
//! This module handles loading and validating configuration from a TOML file
//! with environment variable overrides. The resulting [`Config`] is built once
//! at startup and never mutated afterwards.

use crate::core::constants::DEFAULT_SEARCH_URL;
use crate::core::source::UpstreamErrorPolicy;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default upstream search timeout in seconds
const DEFAULT_SEARCH_TIMEOUT: u64 = 10;

/// Default page fetch timeout in seconds
const DEFAULT_IMAGE_TIMEOUT: u64 = 5;

/// Default number of page fetches in flight per request
const DEFAULT_ENRICHMENT_CONCURRENCY: usize = 4;

/// Default server port
const DEFAULT_PORT: u16 = 8000;

/// Environment variables holding the upstream credential, in lookup order
const API_KEY_VARS: [&str; 2] = ["GOOGLE_API_KEY", "FACT_CHECK_API_KEY"];

#[derive(Debug, Clone, Deserialize)]
pub struct FactCheckConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_search_url")]
    pub search_url: String,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default = "default_upstream_policy")]
    pub on_upstream_error: String,
}

impl Default for FactCheckConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            search_url: default_search_url(),
            language_code: None,
            page_size: None,
            on_upstream_error: default_upstream_policy(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnrichmentConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            concurrency: DEFAULT_ENRICHMENT_CONCURRENCY,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestConfig {
    #[serde(default = "default_search_timeout")]
    pub search_timeout: u64,
    #[serde(default = "default_image_timeout")]
    pub image_timeout: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
            image_timeout: DEFAULT_IMAGE_TIMEOUT,
        }
    }
}

fn default_search_url() -> String {
    DEFAULT_SEARCH_URL.to_string()
}

fn default_upstream_policy() -> String {
    "propagate".to_string()
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    DEFAULT_ENRICHMENT_CONCURRENCY
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_search_timeout() -> u64 {
    DEFAULT_SEARCH_TIMEOUT
}

fn default_image_timeout() -> u64 {
    DEFAULT_IMAGE_TIMEOUT
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub fact_check: FactCheckConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub request: RequestConfig,
}

/// Application configuration
///
/// Loaded and validated once at startup, then shared read-only. The presence
/// of `api_key` decides between live and mock mode.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream API key; `None` selects mock mode
    pub api_key: Option<String>,

    /// Upstream claims search endpoint
    pub search_url: String,

    /// Optional `languageCode` forwarded upstream
    pub language_code: Option<String>,

    /// Optional `pageSize` forwarded upstream
    pub page_size: Option<u32>,

    /// What to do when the upstream search fails
    pub upstream_error_policy: UpstreamErrorPolicy,

    /// Whether claim source pages are fetched for an image at all
    pub enrichment_enabled: bool,

    /// Maximum page fetches in flight per request
    pub enrichment_concurrency: usize,

    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Logging level
    pub log_level: String,

    /// Upstream search timeout in seconds
    pub search_timeout: u64,

    /// Page fetch timeout in seconds
    pub image_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::assemble(TomlConfig::default(), UpstreamErrorPolicy::default())
    }
}

impl Config {
    /// Build a validated configuration from parsed TOML sections
    fn from_toml(config: TomlConfig) -> Result<Self> {
        let upstream_error_policy =
            UpstreamErrorPolicy::from_str(&config.fact_check.on_upstream_error).context(
                "Invalid on_upstream_error value. Must be one of: propagate, fallback",
            )?;

        let built = Self::assemble(config, upstream_error_policy);
        built.validate()?;
        Ok(built)
    }

    fn assemble(config: TomlConfig, upstream_error_policy: UpstreamErrorPolicy) -> Self {
        Config {
            api_key: normalize_key(config.fact_check.api_key),
            search_url: config.fact_check.search_url,
            language_code: config.fact_check.language_code,
            page_size: config.fact_check.page_size,
            upstream_error_policy,
            enrichment_enabled: config.enrichment.enabled,
            enrichment_concurrency: config.enrichment.concurrency,
            host: config.server.host,
            port: config.server.port,
            log_level: config.server.log_level,
            search_timeout: config.request.search_timeout,
            image_timeout: config.request.image_timeout,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            bail!("server.port must be non-zero");
        }
        if self.search_timeout == 0 || self.image_timeout == 0 {
            bail!("request timeouts must be non-zero");
        }
        if self.enrichment_concurrency == 0 {
            bail!("enrichment.concurrency must be at least 1");
        }
        Ok(())
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The TOML file cannot be read or parsed
    /// - Configuration values are invalid
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read configuration file")?;

        let config: TomlConfig =
            toml::from_str(&content).context("Failed to parse TOML configuration")?;

        Self::from_toml(config)
    }

    /// Load configuration from the config file and environment
    ///
    /// Reads `$CONFIG_PATH` (default `config.toml`) when it exists, then applies
    /// environment overrides. A missing file means built-in defaults.
    pub fn from_env() -> Result<Self> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());

        let base = if Path::new(&config_path).exists() {
            Self::from_file(&config_path)?
        } else {
            Self::default()
        };

        base.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from a variable lookup
    ///
    /// Recognized: `GOOGLE_API_KEY`, `FACT_CHECK_API_KEY`, `HOST`, `PORT`, `LOG_LEVEL`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = API_KEY_VARS.iter().find_map(|name| lookup(*name)) {
            self.api_key = normalize_key(Some(key));
        }
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: {}", port))?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = level;
        }

        self.validate()?;
        Ok(self)
    }

    /// Whether an upstream credential is configured
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Blank keys count as absent
fn normalize_key(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}
