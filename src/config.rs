//! Configuration loading and API key resolution.
//!
//! Everything the pipeline needs is resolved once at startup into an
//! `AppConfig` and passed down; no module reads env vars or the keychain
//! on its own.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::FinLensError;
use crate::keystore;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_FALLBACK_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
/// Files at or above this size are not inlined into the request body;
/// a web-search placeholder is sent instead.
pub const DEFAULT_INLINE_LIMIT_MB: u64 = 20;

/// Effective configuration for one invocation.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model: String,
    pub fallback_model: String,
    pub temperature: f32,
    pub inline_limit_bytes: u64,
    pub enable_search: bool,
    pub api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            fallback_model: DEFAULT_FALLBACK_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            inline_limit_bytes: DEFAULT_INLINE_LIMIT_MB * 1024 * 1024,
            enable_search: true,
            api_key: None,
        }
    }
}

/// On-disk config file shape. All fields optional; missing fields fall back
/// to compiled-in defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub model: Option<String>,
    pub fallback_model: Option<String>,
    pub temperature: Option<f32>,
    pub inline_limit_mb: Option<u64>,
    pub enable_search: Option<bool>,
    pub api_key: Option<String>,
}

/// Path of the user config file: `<config_dir>/finlens/config.toml`.
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("finlens").join("config.toml"))
}

/// Load the config file if present. A missing file is not an error;
/// a malformed one is.
pub fn load_config_file() -> Result<ConfigFile, FinLensError> {
    let Some(path) = config_file_path() else {
        warn!("No config directory available on this platform");
        return Ok(ConfigFile::default());
    };
    if !path.exists() {
        debug!("No config file at {:?}, using defaults", path);
        return Ok(ConfigFile::default());
    }
    let content = std::fs::read_to_string(&path)
        .map_err(|e| FinLensError::Config(format!("Failed to read {:?}: {}", path, e)))?;
    parse_config_file(&content, &path.display().to_string())
}

fn parse_config_file(content: &str, origin: &str) -> Result<ConfigFile, FinLensError> {
    toml::from_str(content)
        .map_err(|e| FinLensError::Config(format!("Invalid TOML in {}: {}", origin, e)))
}

/// Overrides collected from CLI flags. `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub model: Option<String>,
    pub fallback_model: Option<String>,
    pub temperature: Option<f32>,
    pub disable_search: bool,
    pub api_key: Option<String>,
}

/// Build the effective config. Precedence per setting:
/// CLI flag > env var > config file > default.
pub fn resolve(file: ConfigFile, overrides: &Overrides) -> AppConfig {
    let defaults = AppConfig::default();

    let model = overrides
        .model
        .clone()
        .or_else(|| env_string("FINLENS_MODEL"))
        .or(file.model)
        .unwrap_or(defaults.model);

    let fallback_model = overrides
        .fallback_model
        .clone()
        .or_else(|| env_string("FINLENS_FALLBACK_MODEL"))
        .or(file.fallback_model)
        .unwrap_or(defaults.fallback_model);

    let temperature = overrides
        .temperature
        .or_else(|| env_parsed("FINLENS_TEMPERATURE"))
        .or(file.temperature)
        .unwrap_or(defaults.temperature);

    let inline_limit_mb: Option<u64> = env_parsed("FINLENS_INLINE_LIMIT_MB").or(file.inline_limit_mb);
    let inline_limit_bytes = inline_limit_mb
        .map(|mb| mb * 1024 * 1024)
        .unwrap_or(defaults.inline_limit_bytes);

    let enable_search = if overrides.disable_search {
        false
    } else {
        file.enable_search.unwrap_or(true)
    };

    let api_key = overrides
        .api_key
        .clone()
        .or_else(|| env_string("GEMINI_API_KEY"))
        .or(file.api_key);

    AppConfig {
        model,
        fallback_model,
        temperature,
        inline_limit_bytes,
        enable_search,
        api_key,
    }
}

/// Resolve the API key for an analysis run. The config carries keys from
/// flag/env/file; the OS keychain is consulted last so an explicitly
/// provided key always wins.
pub fn resolve_api_key(config: &AppConfig) -> Result<String, FinLensError> {
    if let Some(key) = &config.api_key {
        if !key.trim().is_empty() {
            return Ok(key.trim().to_string());
        }
    }
    match keystore::get_api_key()? {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(FinLensError::MissingApiKey),
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring unparseable {}={:?}", name, raw);
                None
            }
        },
        Err(_) => None,
    }
}
