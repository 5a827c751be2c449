use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Application configuration module
/// This module handles the service configuration including loading,
/// validating and applying environment overrides.
/// Represents the service configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Language model backend settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Pipeline behaviour
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// HTTP listener configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Language model backend configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackendConfig {
    /// Ollama base URL
    #[serde(default = "default_backend_address")]
    pub backend_address: String,

    /// Model used for both classification and translation
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Per-call deadline in seconds, applied to every capability call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for transient backend failures
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base backoff in milliseconds, doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Sampling temperature (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            backend_address: default_backend_address(),
            model_name: default_model_name(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
        }
    }
}

/// Which Translator Capability the pipeline is built with
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslatorKind {
    /// Language model backed translation
    #[default]
    Llm,
    /// Exact-match table, for deterministic runs
    Lookup,
}

impl std::fmt::Display for TranslatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Llm => write!(f, "llm"),
            Self::Lookup => write!(f, "lookup"),
        }
    }
}

impl std::str::FromStr for TranslatorKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "llm" => Ok(Self::Llm),
            "lookup" => Ok(Self::Lookup),
            _ => Err(anyhow!("Invalid translator kind: {}", s)),
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PipelineConfig {
    /// The `is_english` flag reported when any stage fails.
    /// The content is always the original text in that case.
    #[serde(default = "default_true")]
    pub fallback_is_english: bool,

    /// Translator implementation
    #[serde(default)]
    pub translator: TranslatorKind,

    /// Known-English text used by the liveness check
    #[serde(default = "default_health_probe")]
    pub health_probe: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fallback_is_english: true,
            translator: TranslatorKind::default(),
            health_probe: default_health_probe(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_backend_address() -> String {
    "http://localhost:11434".to_string()
}

fn default_model_name() -> String {
    "llama3.2:3b".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_temperature() -> f32 {
    0.1
}

fn default_true() -> bool {
    true
}

fn default_health_probe() -> String {
    "Hello, how are you?".to_string()
}

/// Environment variables read by `Config::apply_env_overrides`
pub const ENV_BACKEND_ADDRESS: &str = "OLLAMA_HOST";
pub const ENV_MODEL_NAME: &str = "OLLAMA_MODEL";
pub const ENV_PORT: &str = "PORT";

/// Largest accepted `backend.retry_count`
pub const MAX_RETRY_COUNT: u32 = 10;

impl Config {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load from `path` when it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Overlay process environment values onto this configuration.
    ///
    /// Only the binary calls this; library code receives a finished `Config`.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary lookup, keyed by environment variable name
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(address) = lookup(ENV_BACKEND_ADDRESS).filter(|v| !v.trim().is_empty()) {
            self.backend.backend_address = address.trim().to_string();
        }

        if let Some(model) = lookup(ENV_MODEL_NAME).filter(|v| !v.trim().is_empty()) {
            self.backend.model_name = model.trim().to_string();
        }

        if let Some(port) = lookup(ENV_PORT).filter(|v| !v.trim().is_empty()) {
            self.server.port = port.trim().parse()
                .with_context(|| format!("{} is not a valid port: {}", ENV_PORT, port))?;
        }

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.backend.model_name.trim().is_empty() {
            return Err(anyhow!("Backend model name cannot be empty"));
        }

        parse_backend_address(&self.backend.backend_address)?;

        if self.server.port == 0 {
            return Err(anyhow!("Server port must be non-zero"));
        }

        if self.backend.timeout_secs == 0 {
            return Err(anyhow!("Backend timeout must be at least one second"));
        }

        if self.backend.retry_count > MAX_RETRY_COUNT {
            return Err(anyhow!(
                "Retry count must be at most {}, got {}",
                MAX_RETRY_COUNT,
                self.backend.retry_count
            ));
        }

        if !(0.0..=1.0).contains(&self.backend.temperature) {
            return Err(anyhow!(
                "Temperature must be between 0.0 and 1.0, got {}",
                self.backend.temperature
            ));
        }

        Ok(())
    }
}

/// Parse a backend address, accepting a bare `host:port` as plain HTTP
pub fn parse_backend_address(address: &str) -> Result<Url> {
    let address = address.trim();
    if address.is_empty() {
        return Err(anyhow!("Backend address cannot be empty"));
    }

    let url = if address.starts_with("http://") || address.starts_with("https://") {
        Url::parse(address)?
    } else {
        Url::parse(&format!("http://{}", address))?
    };

    if url.host_str().is_none() {
        return Err(anyhow!("Invalid host in backend address: {}", address));
    }

    Ok(url)
}
