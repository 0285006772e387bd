use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::{DataShapePolicy, SpanLimits};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub nasa: NasaSettings,
    #[serde(default)]
    pub feed: FeedSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 5000 }

/// NeoWs upstream settings
#[derive(Debug, Clone, Deserialize)]
pub struct NasaSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries for timeouts, connection errors, 429 and 5xx responses
    #[serde(default)]
    pub max_retries: u32,
    /// Delay before the first retry, doubled for each further retry
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for NasaSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: default_api_key(),
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_base_url() -> String { "https://api.nasa.gov/neo/rest/v1/feed".to_string() }
fn default_api_key() -> String { "DEMO_KEY".to_string() }
fn default_timeout_secs() -> u64 { 10 }
fn default_retry_delay_ms() -> u64 { 100 }

/// Fan-out and ranking settings
#[derive(Debug, Clone, Deserialize)]
pub struct FeedSettings {
    #[serde(default = "default_max_days_per_request")]
    pub max_days_per_request: u32,
    #[serde(default = "default_max_total_span_days")]
    pub max_total_span_days: u32,
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
    #[serde(default)]
    pub data_shape_policy: DataShapePolicy,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            max_days_per_request: default_max_days_per_request(),
            max_total_span_days: default_max_total_span_days(),
            max_concurrent_requests: default_max_concurrent_requests(),
            data_shape_policy: DataShapePolicy::default(),
        }
    }
}

fn default_max_days_per_request() -> u32 { 7 }
fn default_max_total_span_days() -> u32 { 365 }
fn default_max_concurrent_requests() -> usize { 16 }

impl FeedSettings {
    pub fn span_limits(&self) -> SpanLimits {
        SpanLimits {
            max_days_per_request: self.max_days_per_request,
            max_total_span_days: self.max_total_span_days,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_days_per_request == 0 {
            return Err(ConfigError::Message(
                "feed.max_days_per_request must be at least 1".to_string(),
            ));
        }
        if self.max_concurrent_requests == 0 {
            return Err(ConfigError::Message(
                "feed.max_concurrent_requests must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `pretty` or `compact`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with NEOWS__)
    /// 5. `NASA_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., NEOWS__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        let settings = apply_api_key_override(settings)?;

        Self::finish(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        let settings = apply_api_key_override(settings)?;

        Self::finish(settings)
    }

    fn finish(settings: Config) -> Result<Self, ConfigError> {
        let settings: Settings = settings.try_deserialize()?;
        settings.feed.validate()?;
        Ok(settings)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("NEOWS")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Take the NeoWs API key from `NASA_API_KEY` when set
fn apply_api_key_override(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("NASA_API_KEY") {
        Ok(api_key) if !api_key.is_empty() => Config::builder()
            .add_source(settings)
            .set_override("nasa.api_key", api_key)?
            .build(),
        _ => Ok(settings),
    }
}
