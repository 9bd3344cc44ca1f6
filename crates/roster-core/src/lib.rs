//! Shared domain types and configuration for the roster workspace.

pub mod analytics;
pub mod app_config;
pub mod config;
pub mod platform;

use thiserror::Error;

pub use analytics::{AggregatedAnalytics, ContentAnalytics, DerivedMetrics};
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use platform::{detect_platform_from_url, Platform};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
