//! Application configuration for ariacrawl.
//!
//! User config lives at `~/.ariacrawl/ariacrawl.toml`; `--config` points at
//! another file. A missing default file means built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AriaCrawlError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "ariacrawl.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".ariacrawl";

/// HTML-ARIA: the role table (document A).
pub const HTML_ARIA_URL: &str = "https://www.w3.org/TR/html-aria";

/// WAI-ARIA 1.1: property/state sections and the value list (document B).
pub const WAI_ARIA_URL: &str = "https://www.w3.org/TR/wai-aria-1.1";

// ---------------------------------------------------------------------------
// Config structs (matching ariacrawl.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Source document URLs.
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Response cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,
}

/// `[sources]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Document holding the role table.
    #[serde(default = "default_role_mapping_url")]
    pub role_mapping_url: String,

    /// Document holding property/state definitions and the value list.
    #[serde(default = "default_definitions_url")]
    pub definitions_url: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            role_mapping_url: default_role_mapping_url(),
            definitions_url: default_definitions_url(),
        }
    }
}

fn default_role_mapping_url() -> String {
    HTML_ARIA_URL.into()
}
fn default_definitions_url() -> String {
    WAI_ARIA_URL.into()
}

/// How the fetcher uses the on-disk response cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheMode {
    /// Serve hits from disk; fetch and store misses.
    #[default]
    Default,
    /// Always fetch, never write the cache.
    NoStore,
    /// Always fetch, overwrite the cache.
    Reload,
    /// Never touch the network; a miss is an error.
    OnlyIfCached,
}

/// `[cache]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory for cached responses.
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,

    /// Cache policy.
    #[serde(default)]
    pub mode: CacheMode,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            mode: CacheMode::default(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./.cache")
}

/// `[http]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra attempts after a transport error or 5xx response.
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Delay before the first retry; grows linearly per attempt.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_retries() -> u32 {
    2
}
fn default_retry_backoff_ms() -> u64 {
    500
}

impl SourcesConfig {
    /// Parse both source URLs.
    pub fn urls(&self) -> Result<(Url, Url)> {
        let parse = |raw: &str| {
            Url::parse(raw).map_err(|e| AriaCrawlError::config(format!("invalid URL {raw:?}: {e}")))
        };
        Ok((parse(&self.role_mapping_url)?, parse(&self.definitions_url)?))
    }
}

// ---------------------------------------------------------------------------
// Fetch config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime fetcher configuration.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Directory for cached responses.
    pub cache_dir: PathBuf,
    /// Cache policy.
    pub cache_mode: CacheMode,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Extra attempts after a retryable failure.
    pub retries: u32,
    /// Base retry delay in ms.
    pub retry_backoff_ms: u64,
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            cache_dir: config.cache.dir.clone(),
            cache_mode: config.cache.mode,
            timeout_secs: config.http.timeout_secs,
            retries: config.http.retries,
            retry_backoff_ms: config.http.retry_backoff_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.ariacrawl/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| AriaCrawlError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.ariacrawl/ariacrawl.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AriaCrawlError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        AriaCrawlError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_w3c_documents() {
        let config = AppConfig::default();
        let (roles, defs) = config.sources.urls().expect("default URLs parse");
        assert_eq!(roles.as_str(), "https://www.w3.org/TR/html-aria");
        assert_eq!(defs.as_str(), "https://www.w3.org/TR/wai-aria-1.1");
        assert_eq!(config.cache.dir, PathBuf::from("./.cache"));
        assert_eq!(config.cache.mode, CacheMode::Default);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let toml_str = r#"
[cache]
dir = "/tmp/aria-cache"
mode = "only-if-cached"

[http]
retries = 0
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.cache.dir, PathBuf::from("/tmp/aria-cache"));
        assert_eq!(config.cache.mode, CacheMode::OnlyIfCached);
        assert_eq!(config.http.retries, 0);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.sources.definitions_url, WAI_ARIA_URL);
    }

    #[test]
    fn fetch_config_from_app_config() {
        let app = AppConfig::default();
        let fetch = FetchConfig::from(&app);
        assert_eq!(fetch.cache_mode, CacheMode::Default);
        assert_eq!(fetch.retries, 2);
        assert_eq!(fetch.retry_backoff_ms, 500);
    }

    #[test]
    fn invalid_source_url_is_config_error() {
        let mut config = AppConfig::default();
        config.sources.role_mapping_url = "not a url".into();
        let err = config.sources.urls().unwrap_err();
        assert!(matches!(err, AriaCrawlError::Config { .. }));
    }

    #[test]
    fn unknown_cache_mode_rejected() {
        let result: std::result::Result<AppConfig, _> = toml::from_str("[cache]\nmode = \"sometimes\"\n");
        assert!(result.is_err());
    }
}
