use crate::constants::{
    DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_REVEAL_MAX_DELAY_MS,
    DEFAULT_REVEAL_MIN_DELAY_MS,
};
use crate::errors::{AskmeError, AskmeResult};
use once_cell::sync::Lazy;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::RwLock,
    time::Duration,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub request_timeout_secs: u64,
    pub reveal_min_delay_ms: u64,
    pub reveal_max_delay_ms: u64,
    pub simulate_streaming: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            reveal_min_delay_ms: DEFAULT_REVEAL_MIN_DELAY_MS,
            reveal_max_delay_ms: DEFAULT_REVEAL_MAX_DELAY_MS,
            simulate_streaming: true,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Applies `ASKME_ENDPOINT` / `ASKME_LOG_LEVEL` on top of the file values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = env::var("ASKME_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                self.endpoint = endpoint.trim().to_string();
            }
        }
        if let Ok(level) = env::var("ASKME_LOG_LEVEL") {
            if !level.trim().is_empty() {
                self.log_level = level.trim().to_string();
            }
        }
        self
    }
}

static CONFIG: Lazy<RwLock<Config>> = Lazy::new(|| RwLock::new(Config::default()));

pub fn initialize_config() -> AskmeResult<()> {
    dotenv::dotenv().ok();

    let config_path = get_config_path()?;
    let config = load_or_create(&config_path)?.with_env_overrides();
    validate_config(&config)?;

    store(config)
}

/// Reads the config file at `path`, writing a default one first if it
/// does not exist yet.
pub fn load_or_create(path: &Path) -> AskmeResult<Config> {
    if path.exists() {
        let config_str = fs::read_to_string(path).map_err(|e| {
            AskmeError::config_error(format!("Failed to read config file: {}", e))
        })?;

        let config: Config = serde_json::from_str(&config_str)
            .map_err(|e| AskmeError::config_error(format!("Failed to parse config: {}", e)))?;

        validate_config(&config)?;
        Ok(config)
    } else {
        let config = Config::default();
        write_config(path, &config)?;
        Ok(config)
    }
}

fn write_config(path: &Path, config: &Config) -> AskmeResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AskmeError::config_error(format!("Failed to create config directory: {}", e))
        })?;
    }

    let config_str = serde_json::to_string_pretty(config)
        .map_err(|e| AskmeError::config_error(format!("Failed to serialize config: {}", e)))?;

    fs::write(path, config_str)
        .map_err(|e| AskmeError::config_error(format!("Failed to write config file: {}", e)))
}

fn get_config_path() -> AskmeResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| AskmeError::config_error("Could not determine config directory"))?;

    Ok(config_dir.join("askme").join("config.json"))
}

pub fn validate_config(config: &Config) -> AskmeResult<()> {
    let url = Url::parse(&config.endpoint)
        .map_err(|e| AskmeError::config_error(format!("Invalid endpoint URL: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AskmeError::config_error(
            "Endpoint must use the http or https scheme",
        ));
    }

    if config.request_timeout_secs == 0 {
        return Err(AskmeError::config_error(
            "request_timeout_secs must be greater than 0",
        ));
    }

    if config.reveal_min_delay_ms > config.reveal_max_delay_ms {
        return Err(AskmeError::config_error(
            "reveal_min_delay_ms must not exceed reveal_max_delay_ms",
        ));
    }

    if config.log_level.trim().is_empty() {
        return Err(AskmeError::config_error("log_level is required"));
    }

    Ok(())
}

fn store(config: Config) -> AskmeResult<()> {
    let mut guard = CONFIG
        .write()
        .map_err(|_| AskmeError::config_error("Config lock poisoned"))?;
    *guard = config;
    Ok(())
}

pub fn get_config() -> Config {
    match CONFIG.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
