//! MacLock post-auth hook.
//!
//! Reads one post-auth request as JSON on stdin, runs it through the MAC
//! lock plugin and writes the amended `authret` plus `proplist_save` as JSON
//! on stdout. Logs go to stderr.

use tracing_subscriber::{EnvFilter, fmt};

use maclock_core::config::AppConfig;
use maclock_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Post-auth hook error: {e:#}");
        std::process::exit(1);
    }
}

/// Load configuration from file, environment overlay and variables
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("MACLOCK_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let env = std::env::var("MACLOCK_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load(&config_path, &env)
}

/// Initialize tracing/logging on stderr
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// Handle a single post-auth invocation
async fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::debug!("Starting MacLock hook v{}", env!("CARGO_PKG_VERSION"));

    let response = maclock::run_hook(config, tokio::io::stdin(), tokio::io::stdout()).await?;
    tracing::debug!(status = %response.authret.status, "Post-auth response written");
    Ok(())
}
