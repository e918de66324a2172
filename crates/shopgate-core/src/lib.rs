pub mod app_config;
mod config;
pub mod creators;
pub mod products;

use thiserror::Error;

pub use app_config::{
    AccountsSettings, AgentSettings, AppConfig, Backend, Environment, MerchantSettings,
    ReviewsSettings,
};
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use creators::{load_creators, CreatorConfig, CreatorDirectory, CreatorsFile};
pub use products::{BeautyMeta, Deal, Product, UrgencyLevel, Variant, VariantOption};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    /// A route needs a backend whose URL or credential was never configured.
    #[error("{backend} backend not configured")]
    BackendNotConfigured { backend: Backend },

    #[error("failed to read creators file {path}: {source}")]
    CreatorsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse creators file: {0}")]
    CreatorsFileParse(#[source] serde_yaml::Error),

    #[error("creator config validation failed: {0}")]
    Validation(String),
}
