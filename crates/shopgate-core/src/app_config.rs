use std::net::SocketAddr;
use std::path::PathBuf;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Upstream services the gateway forwards to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Agent,
    Merchant,
    Accounts,
    Reviews,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Agent => write!(f, "agent"),
            Backend::Merchant => write!(f, "merchant"),
            Backend::Accounts => write!(f, "accounts"),
            Backend::Reviews => write!(f, "reviews"),
        }
    }
}

/// Process-wide configuration, read once at startup.
///
/// Backend URLs and credentials are optional at load time. A missing value
/// only disables the routes that need it; the per-backend accessors
/// ([`AppConfig::agent`], [`AppConfig::merchant`], ...) return
/// [`ConfigError::BackendNotConfigured`] for those routes.
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub user_agent: String,
    pub creators_path: Option<PathBuf>,
    pub agent_url: Option<String>,
    pub agent_token: Option<String>,
    pub agent_api_key: Option<String>,
    pub merchant_base_url: Option<String>,
    pub merchant_admin_key: Option<String>,
    pub accounts_base_url: Option<String>,
    pub reviews_base_url: Option<String>,
}

/// Agent endpoint plus its two independent credential slots.
#[derive(Clone, PartialEq, Eq)]
pub struct AgentSettings {
    pub url: String,
    pub bearer_token: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct MerchantSettings {
    pub base_url: String,
    pub admin_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountsSettings {
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewsSettings {
    pub base_url: String,
}

impl AppConfig {
    /// Settings for the shopping-agent backend.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BackendNotConfigured`] when no agent URL is set.
    /// Credentials are optional and never cause this error.
    pub fn agent(&self) -> Result<AgentSettings, ConfigError> {
        let url = self.agent_url.clone().ok_or(ConfigError::BackendNotConfigured {
            backend: Backend::Agent,
        })?;
        Ok(AgentSettings {
            url,
            bearer_token: self.agent_token.clone(),
            api_key: self.agent_api_key.clone(),
        })
    }

    /// Settings for the merchant admin backend. Both base URL and admin key
    /// are required.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BackendNotConfigured`] when either is missing.
    pub fn merchant(&self) -> Result<MerchantSettings, ConfigError> {
        match (&self.merchant_base_url, &self.merchant_admin_key) {
            (Some(base_url), Some(admin_key)) => Ok(MerchantSettings {
                base_url: base_url.clone(),
                admin_key: admin_key.clone(),
            }),
            _ => Err(ConfigError::BackendNotConfigured {
                backend: Backend::Merchant,
            }),
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::BackendNotConfigured`] when no accounts URL is set.
    pub fn accounts(&self) -> Result<AccountsSettings, ConfigError> {
        self.accounts_base_url
            .clone()
            .map(|base_url| AccountsSettings { base_url })
            .ok_or(ConfigError::BackendNotConfigured {
                backend: Backend::Accounts,
            })
    }

    /// Reviews upstream. Falls back to the accounts base URL when no override
    /// is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BackendNotConfigured`] when neither is set.
    pub fn reviews(&self) -> Result<ReviewsSettings, ConfigError> {
        self.reviews_base_url
            .clone()
            .or_else(|| self.accounts_base_url.clone())
            .map(|base_url| ReviewsSettings { base_url })
            .ok_or(ConfigError::BackendNotConfigured {
                backend: Backend::Reviews,
            })
    }

    #[must_use]
    pub fn is_configured(&self, backend: Backend) -> bool {
        match backend {
            Backend::Agent => self.agent().is_ok(),
            Backend::Merchant => self.merchant().is_ok(),
            Backend::Accounts => self.accounts().is_ok(),
            Backend::Reviews => self.reviews().is_ok(),
        }
    }
}

fn redact(value: Option<&String>) -> Option<&'static str> {
    value.map(|_| "[redacted]")
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("user_agent", &self.user_agent)
            .field("creators_path", &self.creators_path)
            .field("agent_url", &self.agent_url)
            .field("agent_token", &redact(self.agent_token.as_ref()))
            .field("agent_api_key", &redact(self.agent_api_key.as_ref()))
            .field("merchant_base_url", &self.merchant_base_url)
            .field(
                "merchant_admin_key",
                &redact(self.merchant_admin_key.as_ref()),
            )
            .field("accounts_base_url", &self.accounts_base_url)
            .field("reviews_base_url", &self.reviews_base_url)
            .finish()
    }
}

impl std::fmt::Debug for AgentSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentSettings")
            .field("url", &self.url)
            .field("bearer_token", &redact(self.bearer_token.as_ref()))
            .field("api_key", &redact(self.api_key.as_ref()))
            .finish()
    }
}

impl std::fmt::Debug for MerchantSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MerchantSettings")
            .field("base_url", &self.base_url)
            .field("admin_key", &"[redacted]")
            .finish()
    }
}
