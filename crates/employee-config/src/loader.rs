//! Configuration loading: file, then environment, then validation.

use crate::config::FacadeConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "EMPLOYEE_FACADE_CONFIG";

const ENV_UPSTREAM_URL: &str = "EMPLOYEE_FACADE_UPSTREAM_URL";
const ENV_HOST: &str = "EMPLOYEE_FACADE_HOST";
const ENV_PORT: &str = "EMPLOYEE_FACADE_PORT";
const ENV_CACHE_TTL: &str = "EMPLOYEE_FACADE_CACHE_TTL";
const ENV_RETRY_MAX_ATTEMPTS: &str = "EMPLOYEE_FACADE_RETRY_MAX_ATTEMPTS";
const ENV_RETRY_BASE_DELAY: &str = "EMPLOYEE_FACADE_RETRY_BASE_DELAY";
const ENV_CIRCUIT_COOL_DOWN: &str = "EMPLOYEE_FACADE_CIRCUIT_COOL_DOWN";
const ENV_LOG_LEVEL: &str = "EMPLOYEE_FACADE_LOG_LEVEL";

/// Load configuration.
///
/// `path` wins over `EMPLOYEE_FACADE_CONFIG`; with neither, defaults are used.
/// Environment overrides are applied afterwards and the result is validated.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, an override is
/// malformed, or validation fails.
pub async fn load_config(path: Option<&Path>) -> ConfigResult<FacadeConfig> {
    let env_path = std::env::var(CONFIG_PATH_ENV).ok();
    let path = path.or_else(|| env_path.as_deref().map(Path::new));

    let mut config = match path {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration file");
            read_file(path).await?
        }
        None => {
            debug!("No configuration file given, using defaults");
            FacadeConfig::default()
        }
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    config.check()?;

    Ok(config)
}

async fn read_file(path: &Path) -> ConfigResult<FacadeConfig> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match extension.as_str() {
        "yaml" | "yml" => Ok(serde_yaml::from_str(&contents)?),
        "toml" => Ok(toml::from_str(&contents)?),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

/// Apply `EMPLOYEE_FACADE_*` overrides using the given lookup.
///
/// # Errors
/// Returns `ConfigError::InvalidEnv` if a numeric or duration value does not parse.
pub fn apply_env_overrides<F>(config: &mut FacadeConfig, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_UPSTREAM_URL) {
        config.upstream.base_url = url;
    }
    if let Some(host) = lookup(ENV_HOST) {
        config.server.host = host;
    }
    if let Some(port) = lookup(ENV_PORT) {
        config.server.port = parse_number(ENV_PORT, &port)?;
    }
    if let Some(ttl) = lookup(ENV_CACHE_TTL) {
        config.cache.ttl = parse_duration(ENV_CACHE_TTL, &ttl)?;
    }
    if let Some(attempts) = lookup(ENV_RETRY_MAX_ATTEMPTS) {
        config.retry.max_attempts = parse_number(ENV_RETRY_MAX_ATTEMPTS, &attempts)?;
    }
    if let Some(delay) = lookup(ENV_RETRY_BASE_DELAY) {
        config.retry.base_delay = parse_duration(ENV_RETRY_BASE_DELAY, &delay)?;
    }
    if let Some(cool_down) = lookup(ENV_CIRCUIT_COOL_DOWN) {
        config.circuit_breaker.cool_down = parse_duration(ENV_CIRCUIT_COOL_DOWN, &cool_down)?;
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.logging.level = level;
    }
    Ok(())
}

fn parse_number<T>(key: &str, value: &str) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnv {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn parse_duration(key: &str, value: &str) -> ConfigResult<Duration> {
    humantime_serde::re::humantime::parse_duration(value.trim()).map_err(|e| {
        ConfigError::InvalidEnv {
            key: key.to_string(),
            message: e.to_string(),
        }
    })
}
