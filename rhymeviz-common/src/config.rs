//! Configuration loading for the widget layer
//!
//! Values resolve in priority order:
//! 1. Explicit overrides from the embedding application (highest priority)
//! 2. Environment variables
//! 3. TOML config file in the platform config directory
//! 4. Compiled defaults (fallback)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const ENV_BASE_URL: &str = "RHYMEVIZ_BASE_URL";
const ENV_MAPS_TOKEN: &str = "RHYMEVIZ_MAPS_TOKEN";
const ENV_CSRF_TOKEN: &str = "RHYMEVIZ_CSRF_TOKEN";
const ENV_TIMEOUT_SECS: &str = "RHYMEVIZ_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved widget-layer configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the host application serving the data endpoints
    pub base_url: String,
    /// Access token for the mapping library, when maps are in use
    pub maps_token: Option<String>,
    /// CSRF token mirrored from the host page's session
    pub csrf_token: Option<String>,
    /// Per-request timeout for widget fetches
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            maps_token: None,
            csrf_token: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Partial configuration from one source (explicit, env, or file)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub maps_token: Option<String>,
    pub csrf_token: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    /// Read overrides from the environment
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var(ENV_BASE_URL).ok(),
            maps_token: std::env::var(ENV_MAPS_TOKEN).ok(),
            csrf_token: std::env::var(ENV_CSRF_TOKEN).ok(),
            request_timeout_secs: std::env::var(ENV_TIMEOUT_SECS)
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }

    /// Parse overrides from a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("cannot parse {}: {e}", path.display())))
    }
}

/// Platform config file location (`<config dir>/rhymeviz/config.toml`)
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rhymeviz").join("config.toml"))
}

impl AppConfig {
    /// Resolve configuration from all sources, explicit overrides winning
    pub fn resolve(explicit: ConfigOverrides) -> Self {
        let file = config_file_path()
            .filter(|p| p.exists())
            .and_then(|p| ConfigOverrides::from_file(&p).ok())
            .unwrap_or_default();
        Self::from_layers(explicit, ConfigOverrides::from_env(), file)
    }

    /// Layering rule, separated out for tests
    fn from_layers(explicit: ConfigOverrides, env: ConfigOverrides, file: ConfigOverrides) -> Self {
        let defaults = AppConfig::default();
        AppConfig {
            base_url: explicit
                .base_url
                .or(env.base_url)
                .or(file.base_url)
                .unwrap_or(defaults.base_url),
            maps_token: explicit.maps_token.or(env.maps_token).or(file.maps_token),
            csrf_token: explicit.csrf_token.or(env.csrf_token).or(file.csrf_token),
            request_timeout_secs: explicit
                .request_timeout_secs
                .or(env.request_timeout_secs)
                .or(file.request_timeout_secs)
                .unwrap_or(defaults.request_timeout_secs),
        }
    }
}
