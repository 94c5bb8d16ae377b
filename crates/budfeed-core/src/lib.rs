pub mod config;
pub mod record;

use thiserror::Error;

pub use config::{load_app_config, load_app_config_from_env, AppConfig};
pub use record::{ProductRecord, SubmissionPayload, TerpeneProfile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("unknown site key \"{key}\" (known sites: {known})")]
    UnknownSite { key: String, known: String },
}
