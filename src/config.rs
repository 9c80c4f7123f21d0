//! Configuration management for the signing server

use std::env;
use std::str::FromStr;

use serde::Deserialize;

use crate::placement::PlacementConfig;

pub const DEFAULT_SIGNATURE_API_URL: &str = "https://onlinesignatures.net/api/get-signatures-data";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub signature_api: SignatureApiConfig,
    pub placement: PlacementConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted PDF upload, in bytes
    pub max_file_size: usize,
    pub environment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignatureApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3001,
                max_file_size: 10 * 1024 * 1024,
                environment: "development".to_string(),
            },
            signature_api: SignatureApiConfig {
                base_url: DEFAULT_SIGNATURE_API_URL.to_string(),
                timeout_secs: 20,
            },
            placement: PlacementConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Unset or blank variables take their defaults; malformed numbers are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Config {
            server: ServerConfig {
                host: var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse(&var, "PORT", defaults.server.port)?,
                max_file_size: parse(&var, "MAX_FILE_SIZE", defaults.server.max_file_size)?,
                environment: var("APP_ENV")
                    .or_else(|| var("NODE_ENV"))
                    .unwrap_or(defaults.server.environment),
            },
            signature_api: SignatureApiConfig {
                base_url: var("SIGNATURE_API_URL").unwrap_or(defaults.signature_api.base_url),
                timeout_secs: parse(
                    &var,
                    "SIGNATURE_API_TIMEOUT_SECS",
                    defaults.signature_api.timeout_secs,
                )?,
            },
            placement: PlacementConfig {
                default_x: parse(&var, "SIGNATURE_X", defaults.placement.default_x)?,
                default_y: parse(&var, "SIGNATURE_Y", defaults.placement.default_y)?,
                default_page: parse(&var, "SIGNATURE_PAGE", defaults.placement.default_page)?,
                max_width_fraction: parse(
                    &var,
                    "SIGNATURE_MAX_WIDTH_FRACTION",
                    defaults.placement.max_width_fraction,
                )?,
                max_height_fraction: parse(
                    &var,
                    "SIGNATURE_MAX_HEIGHT_FRACTION",
                    defaults.placement.max_height_fraction,
                )?,
            },
        })
    }

    /// Upload limit in whole megabytes, for messages
    pub fn max_file_size_mb(&self) -> usize {
        (self.server.max_file_size as f64 / (1024.0 * 1024.0)).round() as usize
    }
}

fn parse<T, F>(var: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value: raw,
        }),
        None => Ok(default),
    }
}
