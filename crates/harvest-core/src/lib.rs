mod app_config;
mod config;
mod merchant;

pub use app_config::{AppConfig, InvalidPriceField, PriceField, DEFAULT_USER_AGENT};
pub use config::{load_app_config, load_app_config_from_env};
pub use merchant::{InvalidMerchantId, MerchantId};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
