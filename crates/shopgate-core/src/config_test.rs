use std::collections::HashMap;
use std::env::VarError;

use super::*;
use crate::Backend;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with every backend configured.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("SHOPGATE_AGENT_URL", "https://agent.example.com/agent/shop/v1/invoke");
    m.insert("SHOPGATE_AGENT_TOKEN", "agent-token");
    m.insert("SHOPGATE_AGENT_API_KEY", "agent-key");
    m.insert("SHOPGATE_MERCHANT_BASE_URL", "https://merchant.example.com/");
    m.insert("SHOPGATE_MERCHANT_ADMIN_KEY", "admin-key");
    m.insert("SHOPGATE_ACCOUNTS_BASE_URL", "https://accounts.example.com");
    m
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_rejects_unknown() {
    let result = parse_environment("staging");
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPGATE_ENV"),
        "expected InvalidEnvVar(SHOPGATE_ENV), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("empty env is valid");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.user_agent, "shopgate/0.1 (creator-shop-gateway)");
    assert!(cfg.creators_path.is_none());
    assert!(cfg.agent_url.is_none());
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("SHOPGATE_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPGATE_BIND_ADDR"),
        "expected InvalidEnvVar(SHOPGATE_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_http_backend_url() {
    let mut map = full_env();
    map.insert("SHOPGATE_MERCHANT_BASE_URL", "merchant.example.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPGATE_MERCHANT_BASE_URL"),
        "expected InvalidEnvVar(SHOPGATE_MERCHANT_BASE_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_trims_trailing_slash_on_base_urls() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.merchant_base_url.as_deref(),
        Some("https://merchant.example.com")
    );
}

#[test]
fn build_app_config_keeps_agent_url_verbatim() {
    let mut map = full_env();
    map.insert("SHOPGATE_AGENT_URL", "https://agent.example.com/invoke/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.agent_url.as_deref(),
        Some("https://agent.example.com/invoke/")
    );
}

#[test]
fn blank_credentials_are_treated_as_absent() {
    let mut map = full_env();
    map.insert("SHOPGATE_AGENT_TOKEN", "   ");
    map.insert("SHOPGATE_AGENT_API_KEY", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let agent = cfg.agent().expect("agent url is set");
    assert!(agent.bearer_token.is_none());
    assert!(agent.api_key.is_none());
}

#[test]
fn agent_settings_require_url_only() {
    let mut map = HashMap::new();
    map.insert("SHOPGATE_AGENT_URL", "https://agent.example.com/invoke");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let agent = cfg.agent().expect("url alone is enough");
    assert_eq!(agent.url, "https://agent.example.com/invoke");
    assert!(agent.bearer_token.is_none());
}

#[test]
fn merchant_settings_require_url_and_key() {
    let mut map = full_env();
    map.remove("SHOPGATE_MERCHANT_ADMIN_KEY");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(matches!(
        cfg.merchant(),
        Err(ConfigError::BackendNotConfigured {
            backend: Backend::Merchant
        })
    ));
    assert!(!cfg.is_configured(Backend::Merchant));
}

#[test]
fn reviews_falls_back_to_accounts_base_url() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.reviews().unwrap().base_url,
        "https://accounts.example.com"
    );
}

#[test]
fn reviews_override_wins_over_accounts() {
    let mut map = full_env();
    map.insert("SHOPGATE_REVIEWS_BASE_URL", "https://reviews.example.com");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.reviews().unwrap().base_url, "https://reviews.example.com");
}

#[test]
fn debug_output_redacts_credentials() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("agent-token"));
    assert!(!rendered.contains("admin-key"));
    assert!(rendered.contains("[redacted]"));
}
