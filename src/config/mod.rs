//! Configuration layer: typed settings with layered precedence (file → env).

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const LOCAL_CONFIG_BASENAME: &str = "vetrina";
const ENV_PREFIX: &str = "VETRINA";

const DEFAULT_SOURCE_BASE_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_BLOG_LIST_TTL_SECS: u64 = 10 * 60;
const DEFAULT_PROJECT_LIST_TTL_SECS: u64 = 60 * 60;
const DEFAULT_TAG_LIST_TTL_SECS: u64 = 10 * 60;
const DEFAULT_BLOG_DETAIL_TTL_SECS: u64 = 10 * 60;
const DEFAULT_PROJECT_DETAIL_TTL_SECS: u64 = 60 * 60;
const DEFAULT_PROFILE_TTL_SECS: u64 = 10 * 60;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),
}

/// Root settings for the content runtime.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub cache: CacheSettings,
    pub source: SourceSettings,
}

impl Settings {
    /// Load settings from an optional TOML file plus `VETRINA_*` environment
    /// overrides (`VETRINA_CACHE__BLOG_LIST_TTL_SECS=30` and friends).
    pub fn load(config_file: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();

        match config_file {
            Some(path) => {
                builder = builder.add_source(File::from(path));
            }
            None => {
                builder = builder.add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));
            }
        }

        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
        }
    }
}

/// Per-class cache max-ages, in seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub blog_list_ttl_secs: u64,
    pub project_list_ttl_secs: u64,
    pub tag_list_ttl_secs: u64,
    pub blog_detail_ttl_secs: u64,
    pub project_detail_ttl_secs: u64,
    pub profile_ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            blog_list_ttl_secs: DEFAULT_BLOG_LIST_TTL_SECS,
            project_list_ttl_secs: DEFAULT_PROJECT_LIST_TTL_SECS,
            tag_list_ttl_secs: DEFAULT_TAG_LIST_TTL_SECS,
            blog_detail_ttl_secs: DEFAULT_BLOG_DETAIL_TTL_SECS,
            project_detail_ttl_secs: DEFAULT_PROJECT_DETAIL_TTL_SECS,
            profile_ttl_secs: DEFAULT_PROFILE_TTL_SECS,
        }
    }
}

/// Where and how to reach the headless CMS.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SOURCE_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let settings = Settings::default();
        assert_eq!(settings.cache.blog_list_ttl_secs, 600);
        assert_eq!(settings.cache.project_detail_ttl_secs, 3600);
        assert_eq!(settings.source.base_url, "http://127.0.0.1:3000");
        assert_eq!(settings.logging.level, LogLevel::Info);
        assert_eq!(settings.logging.format, LogFormat::Compact);
    }

    #[test]
    fn level_maps_to_filter() {
        assert_eq!(LevelFilter::from(LogLevel::Debug), LevelFilter::DEBUG);
        assert_eq!(LevelFilter::from(LogLevel::Error), LevelFilter::ERROR);
    }
}
