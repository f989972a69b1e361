//! Environment-driven application configuration.
//!
//! Loaded once at startup (after `dotenvy`), then shared immutably. The
//! inference section covers both deployment variants: a local inference
//! server (no credential) and a hosted API (bearer token).

use std::env;

use tracing::{info, warn};

use crate::errors::{LinkforgeError, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub inference: InferenceConfig,
    pub analytics: AnalyticsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Public base used when rendering short URLs in API responses.
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// OpenAI-compatible endpoint root, e.g. `http://localhost:1234/v1`.
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub alias_timeout_secs: u64,
    pub categorize_timeout_secs: u64,
    pub insights_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// Path to a MaxMind GeoLite2 City database. Unset disables geo lookup.
    pub maxminddb_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// "plain" or "json"
    pub format: String,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| {
            LinkforgeError::configuration(format!("invalid value for {}: '{}'", key, raw))
        }),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig {
                host: env_or("SERVER_HOST", "127.0.0.1"),
                port: env_parse("SERVER_PORT", 8080)?,
                base_url: env_or("BASE_URL", "http://localhost:8080"),
            },
            inference: InferenceConfig {
                base_url: env_or("INFERENCE_BASE_URL", "http://localhost:1234/v1"),
                api_key: env_opt("INFERENCE_API_KEY"),
                model: env_or("INFERENCE_MODEL", "phi-3-mini-4k-instruct"),
                alias_timeout_secs: env_parse("AI_ALIAS_TIMEOUT_SECS", 30)?,
                categorize_timeout_secs: env_parse("AI_CATEGORIZE_TIMEOUT_SECS", 30)?,
                insights_timeout_secs: env_parse("AI_INSIGHTS_TIMEOUT_SECS", 60)?,
            },
            analytics: AnalyticsConfig {
                maxminddb_path: env_opt("MAXMINDDB_PATH"),
            },
            logging: LoggingConfig {
                level: env_or("LOG_LEVEL", "info"),
                format: env_or("LOG_FORMAT", "plain"),
            },
        })
    }

    /// Structured startup diagnostics.
    ///
    /// Configuration gaps that only degrade optional subsystems are warned
    /// about here instead of failing the boot.
    pub fn log_startup_diagnostics(&self) {
        if self.inference.api_key.is_none() {
            warn!(
                endpoint = %self.inference.base_url,
                "No inference API key configured; AI calls will be sent \
                 unauthenticated (fine for a local inference server)"
            );
        } else {
            info!(
                endpoint = %self.inference.base_url,
                model = %self.inference.model,
                "Inference endpoint configured"
            );
        }

        match &self.analytics.maxminddb_path {
            Some(path) => info!("GeoIP: MaxMind database at {}", path),
            None => info!("GeoIP: no database configured, geo fields will default"),
        }
    }
}
