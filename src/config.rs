use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub events: EventSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
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

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

/// Key-value store backend selection
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    /// "memory" or "redis"
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            redis_url: default_redis_url(),
        }
    }
}

fn default_backend() -> String {
    "memory".to_string()
}
fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

/// Match generation thresholds and retention windows
#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Minimum score a pair must exceed to be persisted
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    /// Cap on matches persisted per generation run
    #[serde(default = "default_max_matches")]
    pub max_matches: usize,
    /// Profile retention window
    #[serde(default = "default_profile_ttl_secs")]
    pub profile_ttl_secs: u64,
    /// Match retention window
    #[serde(default = "default_match_ttl_secs")]
    pub match_ttl_secs: u64,
    /// Treat the unordered user pair as a natural key and upsert onto the
    /// existing match instead of appending a new record per run
    #[serde(default = "default_dedup_pairs")]
    pub dedup_pairs: bool,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            max_matches: default_max_matches(),
            profile_ttl_secs: default_profile_ttl_secs(),
            match_ttl_secs: default_match_ttl_secs(),
            dedup_pairs: default_dedup_pairs(),
        }
    }
}

fn default_min_score() -> f64 {
    0.3
}
fn default_max_matches() -> usize {
    10
}
fn default_profile_ttl_secs() -> u64 {
    24 * 60 * 60
}
fn default_match_ttl_secs() -> u64 {
    7 * 24 * 60 * 60
}
fn default_dedup_pairs() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_tags_weight")]
    pub tags: f64,
    #[serde(default = "default_industries_weight")]
    pub industries: f64,
    #[serde(default = "default_experience_weight")]
    pub experience: f64,
    #[serde(default = "default_skills_weight")]
    pub skills: f64,
    #[serde(default = "default_location_weight")]
    pub location: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            tags: default_tags_weight(),
            industries: default_industries_weight(),
            experience: default_experience_weight(),
            skills: default_skills_weight(),
            location: default_location_weight(),
        }
    }
}

impl From<WeightsConfig> for ScoringWeights {
    fn from(value: WeightsConfig) -> Self {
        ScoringWeights {
            tags: value.tags,
            industries: value.industries,
            experience: value.experience,
            skills: value.skills,
            location: value.location,
        }
    }
}

fn default_tags_weight() -> f64 {
    0.30
}
fn default_industries_weight() -> f64 {
    0.25
}
fn default_experience_weight() -> f64 {
    0.20
}
fn default_skills_weight() -> f64 {
    0.15
}
fn default_location_weight() -> f64 {
    0.10
}

/// Event pipeline settings
#[derive(Debug, Clone, Deserialize)]
pub struct EventSettings {
    /// Bound of the in-process event channels
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_channel_capacity() -> usize {
    256
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
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

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml, config/local.toml)
    /// 3. Environment variables (prefixed with CONNECT_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with CONNECT_)
            // e.g., CONNECT_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("CONNECT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("CONNECT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply well-known environment overrides that don't fit the prefix scheme
///
/// REDIS_URL is checked first, then CONNECT_STORE__REDIS_URL.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let redis_url = env::var("REDIS_URL")
        .or_else(|_| env::var("CONNECT_STORE__REDIS_URL"))
        .ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(url) = redis_url {
        builder = builder.set_override("store.redis_url", url)?;
    }

    builder.build()
}
