//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field carries a default, so an empty or missing file
//! yields a usable configuration.

pub mod logging;
pub mod post_auth;
pub mod store;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use self::logging::LoggingConfig;
pub use self::post_auth::PostAuthConfig;
pub use self::store::{StoreConfig, StoreProvider};

use crate::error::AppError;

/// Prefix for environment variable overrides (`MACLOCK__POST_AUTH__SYNCHRONOUS`).
pub const ENV_PREFIX: &str = "MACLOCK";

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML configuration
/// (base file + environment overlay + environment variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// MAC address binding policy settings.
    #[serde(default)]
    pub post_auth: PostAuthConfig,
    /// User property store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// The base file at `path` is merged with an optional sibling overlay
    /// named after `env` (e.g. `config/production.toml`) and with
    /// environment variables prefixed with `MACLOCK__`. Missing files are
    /// not an error.
    pub fn load(path: &str, env: &str) -> Result<Self, AppError> {
        let overlay = Path::new(path)
            .with_file_name(env)
            .to_string_lossy()
            .into_owned();

        tracing::debug!(path = %path, overlay = %overlay, "Loading configuration");

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&overlay).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Parse configuration from a TOML string. Used by tests and `config validate`.
    pub fn from_toml_str(source: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;
        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.post_auth.hook_timeout_seconds == 0 {
            return Err(AppError::configuration(
                "post_auth.hook_timeout_seconds must be greater than zero",
            ));
        }
        if self.store.provider == StoreProvider::File && self.store.path.trim().is_empty() {
            return Err(AppError::configuration(
                "store.path is required when store.provider = \"file\"",
            ));
        }
        Ok(())
    }
}
