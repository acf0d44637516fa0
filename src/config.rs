use crate::http_client::FetchConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Port the addon server binds to. The PORT environment variable takes
    /// precedence at startup.
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub fetch: FetchSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub tmdb: TmdbSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FetchSettings {
    /// Timeout for each HTTP request in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum fetch attempts before giving up on a URL
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Base backoff delay in milliseconds; attempt N waits N * base
    #[serde(default = "default_backoff_base")]
    pub backoff_base_ms: u64,

    /// Fixed cooldown after a detected anti-bot challenge page
    #[serde(default = "default_challenge_cooldown")]
    pub challenge_cooldown_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogSettings {
    /// Maximum entries returned per catalog request
    #[serde(default = "default_catalog_limit")]
    pub default_limit: usize,

    /// Elevated limit used when searching sources for a TMDB title
    #[serde(default = "default_stream_search_limit")]
    pub stream_search_limit: usize,

    /// Emit a synthetic placeholder entry when a crawl finds nothing
    #[serde(default = "default_true")]
    pub placeholder_on_empty: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TmdbSettings {
    #[serde(default = "default_tmdb_api_key")]
    pub api_key: String,

    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
}

fn default_port() -> u16 {
    7000
}
fn default_timeout() -> u64 {
    15
}
fn default_max_attempts() -> usize {
    3
}
fn default_backoff_base() -> u64 {
    1000
}
fn default_challenge_cooldown() -> u64 {
    2000
}
fn default_catalog_limit() -> usize {
    50
}
fn default_stream_search_limit() -> usize {
    100
}
fn default_true() -> bool {
    true
}
fn default_tmdb_api_key() -> String {
    "40053dd5e221eea2948a2143f297b48f".to_string()
}
fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base(),
            challenge_cooldown_ms: default_challenge_cooldown(),
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            default_limit: default_catalog_limit(),
            stream_search_limit: default_stream_search_limit(),
            placeholder_on_empty: default_true(),
        }
    }
}

impl Default for TmdbSettings {
    fn default() -> Self {
        Self {
            api_key: default_tmdb_api_key(),
            base_url: default_tmdb_base_url(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            fetch: FetchSettings::default(),
            catalog: CatalogSettings::default(),
            tmdb: TmdbSettings::default(),
        }
    }
}

impl Config {
    /// Load from an optional config.toml next to the binary, falling back to
    /// defaults on a missing or malformed file.
    pub fn load() -> Self {
        let path = Path::new("config.toml");
        if path.exists() {
            if let Ok(content) = fs::read_to_string(path) {
                match toml::from_str::<Config>(&content) {
                    Ok(cfg) => return cfg,
                    Err(e) => log::warn!("config.toml is malformed, using defaults: {}", e),
                }
            }
        }
        Self::default()
    }
}

impl FetchSettings {
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            max_attempts: self.max_attempts,
            backoff_base_ms: self.backoff_base_ms,
            challenge_cooldown_ms: self.challenge_cooldown_ms,
        }
    }
}
