use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("ROSTER_ENV", "development"));
    let bind_addr = parse_addr("ROSTER_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("ROSTER_LOG_LEVEL", "info");

    let modash_api_key = lookup("MODASH_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());
    let modash_base_url = or_default("ROSTER_MODASH_BASE_URL", "https://api.modash.io/v1");
    let modash_request_timeout_secs = parse_u64("ROSTER_MODASH_REQUEST_TIMEOUT_SECS", "30")?;
    let modash_user_agent = or_default(
        "ROSTER_MODASH_USER_AGENT",
        "roster/0.1 (influencer-analytics)",
    );
    let modash_max_retries = parse_u32("ROSTER_MODASH_MAX_RETRIES", "2")?;
    let modash_retry_backoff_base_secs = parse_u64("ROSTER_MODASH_RETRY_BACKOFF_BASE_SECS", "2")?;

    let db_max_connections = parse_u32("ROSTER_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("ROSTER_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("ROSTER_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let analytics_link_timeout_secs = parse_u64("ROSTER_ANALYTICS_LINK_TIMEOUT_SECS", "10")?;
    let analytics_max_concurrent_links =
        parse_usize("ROSTER_ANALYTICS_MAX_CONCURRENT_LINKS", "1")?;
    let analytics_inter_request_delay_ms =
        parse_u64("ROSTER_ANALYTICS_INTER_REQUEST_DELAY_MS", "250")?;

    if analytics_max_concurrent_links == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "ROSTER_ANALYTICS_MAX_CONCURRENT_LINKS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        modash_api_key,
        modash_base_url,
        modash_request_timeout_secs,
        modash_user_agent,
        modash_max_retries,
        modash_retry_backoff_base_secs,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        analytics_link_timeout_secs,
        analytics_max_concurrent_links,
        analytics_inter_request_delay_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
