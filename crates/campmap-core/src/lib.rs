mod app_config;
pub mod campsites;
mod config;

pub use app_config::{AppConfig, Environment};
pub use campsites::{campsites_within, load_campsites, parse_campsites, Campsite, DatasetError};
pub use config::{load_app_config, load_app_config_from_env};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
