use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

use crate::store::DEFAULT_MAX_GENERATION_ATTEMPTS;

/// Default location of the links file, relative to the working directory.
pub const DEFAULT_LINKS_DATA_PATH: &str = "data/link.json";
/// Port assumed when building short URLs for processes that do not bind HTTP.
pub const DEFAULT_PORT: u16 = 3000;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the Rusty Link server.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path of the JSON file holding the code→target mapping.
    pub links_data_path: PathBuf,
    /// Backend used to persist the mapping.
    pub storage_backend: StorageBackend,
    /// Optional scheme+host prefix for short URLs; derived from the bound port when absent.
    pub public_base_url: Option<String>,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Generated codes tried per create before giving up.
    pub code_generation_max_attempts: usize,
}

/// Supported persistence backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON file at `LINKS_DATA_PATH`.
    File,
    /// Process memory; lost on restart.
    Memory,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            links_data_path: load_env_optional("LINKS_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LINKS_DATA_PATH)),
            storage_backend: load_env_optional("STORAGE_BACKEND")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|()| ConfigError::InvalidValue("STORAGE_BACKEND".into()))
                })
                .transpose()?
                .unwrap_or(StorageBackend::File),
            public_base_url: load_env_optional("PUBLIC_BASE_URL")
                .map(|value| value.trim().trim_end_matches('/').to_string()),
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
            code_generation_max_attempts: load_env_optional("CODE_GENERATION_MAX_ATTEMPTS")
                .map(|value| match value.parse::<usize>() {
                    Ok(attempts) if attempts >= 1 => Ok(attempts),
                    _ => Err(ConfigError::InvalidValue(
                        "CODE_GENERATION_MAX_ATTEMPTS".into(),
                    )),
                })
                .transpose()?
                .unwrap_or(DEFAULT_MAX_GENERATION_ATTEMPTS),
        })
    }

    /// Base URL for short links, falling back to `http://localhost:{port}`.
    pub fn base_url_for_port(&self, port: u16) -> String {
        self.public_base_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{port}"))
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

impl std::str::FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" | "json" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            _ => Err(()),
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        links_data_path = %config.links_data_path.display(),
        storage_backend = ?config.storage_backend,
        public_base_url = ?config.public_base_url,
        server_port = ?config.server_port,
        code_generation_max_attempts = config.code_generation_max_attempts,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            links_data_path: PathBuf::from(DEFAULT_LINKS_DATA_PATH),
            storage_backend: StorageBackend::File,
            public_base_url: None,
            server_port: None,
            code_generation_max_attempts: DEFAULT_MAX_GENERATION_ATTEMPTS,
        }
    }

    #[test]
    fn storage_backend_parses_case_insensitively() {
        assert_eq!("FILE".parse::<StorageBackend>(), Ok(StorageBackend::File));
        assert_eq!(" memory ".parse::<StorageBackend>(), Ok(StorageBackend::Memory));
        assert!("redis".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn base_url_prefers_public_override() {
        let mut config = sample();
        assert_eq!(config.base_url_for_port(3001), "http://localhost:3001");
        config.public_base_url = Some("https://sho.rt".into());
        assert_eq!(config.base_url_for_port(3001), "https://sho.rt");
    }
}
