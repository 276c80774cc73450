//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use maclock_core::error::AppError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Validate configuration file
    Validate,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = super::load_config(config_path).await?;
            output::print_item(&config, format);
        }
        ConfigCommand::Validate => match super::load_config(config_path).await {
            Ok(config) => {
                output::print_success(&format!("Configuration '{config_path}' is valid"));
                output::print_kv(
                    "first_login_ip_addr",
                    config.post_auth.allow_ip().unwrap_or("<any>"),
                );
                output::print_kv("synchronous", &config.post_auth.synchronous.to_string());
                output::print_kv(
                    "hook_timeout_seconds",
                    &config.post_auth.hook_timeout_seconds.to_string(),
                );
                output::print_kv("store", &config.store.provider.to_string());
                output::print_kv("store path", &config.store.path);
                let logging = format!("{} ({})", config.logging.level, config.logging.format);
                output::print_kv("logging", &logging);
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {e}"));
                return Err(e);
            }
        },
    }

    Ok(())
}
