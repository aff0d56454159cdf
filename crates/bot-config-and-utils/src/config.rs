//! Configuration management for the bot.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Community whose new posts are watched.
pub const DEFAULT_COMMUNITY: &str = "PhotoshopRequest";

/// Flair word marking a post as a paid request.
pub const DEFAULT_FLAIR_KEYWORD: &str = "paid";

/// Base URL for authenticated API calls.
pub const DEFAULT_API_BASE_URL: &str = "https://oauth.reddit.com";

/// Token endpoint for the password grant.
pub const DEFAULT_AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Main bot configuration.
///
/// Stored as JSON in `~/.mikasa/config.json`. Every field has a default, so
/// a partial (or missing) file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Community whose submission feed is watched.
    pub community: String,
    /// Case-insensitive flair word that qualifies a submission.
    pub flair_keyword: String,
    /// Base URL for authenticated API requests.
    pub api_base_url: String,
    /// OAuth token endpoint.
    pub auth_url: String,
    /// Pause after a round in which neither feed had anything new.
    pub idle_interval_ms: u64,
    /// Pause after a round that failed with a transport error.
    pub error_backoff_ms: u64,
    /// How many processed ids to keep per ledger collection. `None` keeps all.
    pub ledger_retention: Option<usize>,
    /// Timeout for a single HTTP request to the platform.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            community: DEFAULT_COMMUNITY.to_string(),
            flair_keyword: DEFAULT_FLAIR_KEYWORD.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            idle_interval_ms: 2_000,
            error_backoff_ms: 5_000,
            ledger_retention: Some(10_000),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from `paths`, falling back to defaults, then apply
    /// environment overrides.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    /// Override fields from `MIKASA_*` variables resolved through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(level) = lookup("MIKASA_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(community) = lookup("MIKASA_COMMUNITY") {
            self.community = community;
        }
        if let Some(keyword) = lookup("MIKASA_FLAIR_KEYWORD") {
            self.flair_keyword = keyword;
        }
    }

    /// Reject values the bot cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.community.trim().is_empty() {
            return Err(CoreError::Config("community must not be empty".to_string()));
        }
        if self.flair_keyword.trim().is_empty() {
            return Err(CoreError::Config(
                "flair_keyword must not be empty".to_string(),
            ));
        }
        if self.ledger_retention == Some(0) {
            return Err(CoreError::Config(
                "ledger_retention must be at least 1 when set".to_string(),
            ));
        }
        self.api_base_url()?;
        self.auth_url()?;
        Ok(())
    }

    /// Get the API base URL as a parsed URL.
    pub fn api_base_url(&self) -> CoreResult<Url> {
        Url::parse(&self.api_base_url).map_err(CoreError::from)
    }

    /// Get the token endpoint as a parsed URL.
    pub fn auth_url(&self) -> CoreResult<Url> {
        Url::parse(&self.auth_url).map_err(CoreError::from)
    }

    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_millis(self.error_backoff_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
