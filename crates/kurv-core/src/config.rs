use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;
    use std::str::FromStr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_num = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        u64::from_str(raw.trim()).map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let narrow = |var: &str, value: u64| -> Result<u32, ConfigError> {
        u32::try_from(value).map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("KURV_ENV", "development"))?;
    let log_level = or_default("KURV_LOG_LEVEL", "info");
    let retailers_path = PathBuf::from(or_default(
        "KURV_RETAILERS_PATH",
        "./config/retailers.yaml",
    ));
    let list_path = PathBuf::from(or_default(
        "KURV_LIST_PATH",
        "./data/shopping-list.json",
    ));
    let retailer_api_token = lookup("KURV_RETAILER_API_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty());

    let fetch_request_timeout_secs = parse_num("KURV_FETCH_REQUEST_TIMEOUT_SECS", "30")?;
    let fetch_user_agent = or_default("KURV_FETCH_USER_AGENT", "kurv/0.1 (price-comparison)");

    let raw_concurrency = parse_num("KURV_FETCH_MAX_CONCURRENT_RETAILERS", "4")?;
    let fetch_max_concurrent_retailers =
        usize::try_from(raw_concurrency).map_err(|e| ConfigError::InvalidEnvVar {
            var: "KURV_FETCH_MAX_CONCURRENT_RETAILERS".to_string(),
            reason: e.to_string(),
        })?;
    if fetch_max_concurrent_retailers == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "KURV_FETCH_MAX_CONCURRENT_RETAILERS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let fetch_page_limit = narrow(
        "KURV_FETCH_PAGE_LIMIT",
        parse_num("KURV_FETCH_PAGE_LIMIT", "50")?,
    )?;
    let fetch_max_retries = narrow(
        "KURV_FETCH_MAX_RETRIES",
        parse_num("KURV_FETCH_MAX_RETRIES", "3")?,
    )?;
    let fetch_retry_backoff_base_secs = parse_num("KURV_FETCH_RETRY_BACKOFF_BASE_SECS", "2")?;

    Ok(AppConfig {
        env,
        log_level,
        retailers_path,
        list_path,
        retailer_api_token,
        fetch_request_timeout_secs,
        fetch_user_agent,
        fetch_max_concurrent_retailers,
        fetch_page_limit,
        fetch_max_retries,
        fetch_retry_backoff_base_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "KURV_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
