//! Shared configuration, canonical data model, and static mapping tables.

pub mod app_config;
pub mod config;
pub mod format;
pub mod labels;
pub mod metrics;
pub mod model;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, OAuthConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use model::{
    AgeBucket, AgeGenderRow, AnalyticsScope, AnalyticsSnapshot, Channel, CountryShare,
    Demographics, DeviceShare, GenderBucket, ReportKind, ReportStatus, SnapshotStatus, Video,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
