use std::net::SocketAddr;
use std::path::PathBuf;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str = "shopgate/0.1 (creator-shop-gateway)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    // Blank values count as unset so an empty `SHOPGATE_AGENT_TOKEN=` line in
    // a .env file never produces an empty credential header.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let bind_raw = or_default("SHOPGATE_BIND_ADDR", "0.0.0.0:3000");
    let bind_addr = bind_raw
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "SHOPGATE_BIND_ADDR".to_string(),
            reason: e.to_string(),
        })?;

    let env = parse_environment(&or_default("SHOPGATE_ENV", "development"))?;

    let http_url = |var: &str| -> Result<Option<String>, ConfigError> {
        optional(var)
            .map(|raw| {
                if raw.starts_with("http://") || raw.starts_with("https://") {
                    Ok(raw)
                } else {
                    Err(ConfigError::InvalidEnvVar {
                        var: var.to_string(),
                        reason: format!("expected an http(s) URL, got \"{raw}\""),
                    })
                }
            })
            .transpose()
    };
    let base_url = |var: &str| -> Result<Option<String>, ConfigError> {
        Ok(http_url(var)?.map(|url| url.trim_end_matches('/').to_string()))
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level: or_default("SHOPGATE_LOG_LEVEL", "info"),
        user_agent: or_default("SHOPGATE_USER_AGENT", DEFAULT_USER_AGENT),
        creators_path: optional("SHOPGATE_CREATORS_PATH").map(PathBuf::from),
        // The agent URL is a full endpoint, not a base; keep it verbatim.
        agent_url: http_url("SHOPGATE_AGENT_URL")?,
        agent_token: optional("SHOPGATE_AGENT_TOKEN"),
        agent_api_key: optional("SHOPGATE_AGENT_API_KEY"),
        merchant_base_url: base_url("SHOPGATE_MERCHANT_BASE_URL")?,
        merchant_admin_key: optional("SHOPGATE_MERCHANT_ADMIN_KEY"),
        accounts_base_url: base_url("SHOPGATE_ACCOUNTS_BASE_URL")?,
        reviews_base_url: base_url("SHOPGATE_REVIEWS_BASE_URL")?,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SHOPGATE_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
