//! CLI command definitions and dispatch.

pub mod check;
pub mod config;
pub mod mac;
pub mod prop;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use maclock_core::config::AppConfig;
use maclock_core::error::AppError;
use maclock_core::traits::property_store::UserPropertyStore;

/// Environment variable naming the configuration overlay.
const ENV_VAR: &str = "MACLOCK_ENV";

/// MacLock: per-account MAC address binding for VPN logins
#[derive(Debug, Parser)]
#[command(name = "maclock-cli", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// User property management
    Prop(prop::PropArgs),
    /// Simulate a VPN login through the post-auth hook
    Check(check::CheckArgs),
    /// MAC address helpers
    Mac(mac::MacArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Prop(args) => prop::execute(args, &self.config, self.format).await,
            Commands::Check(args) => check::execute(args, &self.config, self.format).await,
            Commands::Mac(args) => mac::execute(args, self.format),
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file plus the `MACLOCK_ENV` overlay
pub async fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    let env = std::env::var(ENV_VAR).unwrap_or_else(|_| "development".to_string());
    AppConfig::load(config_path, &env)
}

/// Helper: open the property store named by configuration
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn UserPropertyStore>, AppError> {
    maclock_store::open_store(&config.store).await
}
