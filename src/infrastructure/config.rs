use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;
use url::Url;

#[derive(Debug)]
pub enum ConfigError {
    Missing(String),
    Invalid { key: String, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} not set", key),
            ConfigError::Invalid { key, value } => write!(f, "Invalid value for {}: {}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Whether agent tools are discovered through an external gateway.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GatewayConfig {
    pub gateway_enabled: bool,
    pub gateway_url: Option<String>,
}

impl GatewayConfig {
    /// An enabled gateway without a URL falls back to the local tool list.
    pub fn effective_url(&self) -> Option<&str> {
        if !self.gateway_enabled {
            return None;
        }
        match self.gateway_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Some(url),
            _ => {
                warn!("GATEWAY_ENABLED is set but GATEWAY_URL is empty; using local tools");
                None
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub object_store_dir: PathBuf,
    pub object_store_bucket: String,
    pub extraction_service_url: String,
    pub embeddings_service_url: String,
    pub dispatch_workers: usize,
    pub dispatch_max_attempts: u32,
    pub gateway: GatewayConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| ConfigError::Missing("DATABASE_URL".into()))?;

        Ok(Self {
            database_url,
            port: parse_or(&lookup, "PORT", 3000)?,
            object_store_dir: PathBuf::from(
                lookup("OBJECT_STORE_DIR").unwrap_or_else(|| "./objects".to_string()),
            ),
            object_store_bucket: lookup("OBJECT_STORE_BUCKET")
                .unwrap_or_else(|| "clinic-intake".to_string()),
            extraction_service_url: service_url(
                &lookup,
                "EXTRACTION_SERVICE_URL",
                "http://localhost:8001",
            )?,
            embeddings_service_url: service_url(
                &lookup,
                "EMBEDDINGS_SERVICE_URL",
                "http://localhost:8000",
            )?,
            dispatch_workers: parse_or(&lookup, "DISPATCH_WORKERS", 3)?,
            dispatch_max_attempts: parse_or(&lookup, "DISPATCH_MAX_ATTEMPTS", 3)?,
            gateway: GatewayConfig {
                gateway_enabled: parse_or(&lookup, "GATEWAY_ENABLED", false)?,
                gateway_url: lookup("GATEWAY_URL"),
            },
        })
    }
}

/// Service base URLs must be absolute http(s) URLs; a trailing slash is dropped.
fn service_url<F>(lookup: &F, key: &str, default: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| default.to_string());
    let invalid = || ConfigError::Invalid {
        key: key.to_string(),
        value: value.clone(),
    };
    let parsed = Url::parse(value.trim()).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    Ok(value.trim().trim_end_matches('/').to_string())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
    }
}
