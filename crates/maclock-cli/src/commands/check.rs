//! Simulated login through the post-auth hook.

use clap::Args;

use crate::output::{self, OutputFormat};
use maclock_core::error::AppError;
use maclock_core::types::auth::{AuthAttributes, AuthCredentials, AuthReturn, PostAuthRequest};
use maclock_service::{Host, WriteMode};

/// Arguments for the check command
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Username
    #[arg(short, long)]
    pub username: String,
    /// Public IP address of the simulated client
    #[arg(long)]
    pub client_ip: String,
    /// MAC address the simulated client reports
    #[arg(long)]
    pub hw_addr: Option<String>,
    /// Simulate a non-VPN (e.g. web admin) login
    #[arg(long)]
    pub no_vpn: bool,
    /// Do not persist a first-login registration
    #[arg(long)]
    pub dry_run: bool,
}

impl CheckArgs {
    fn request(&self) -> PostAuthRequest {
        PostAuthRequest {
            authcred: AuthCredentials {
                username: self.username.clone(),
                client_ip_addr: self.client_ip.clone(),
                client_hw_addr: self.hw_addr.clone(),
            },
            attributes: AuthAttributes {
                vpn_auth: !self.no_vpn,
            },
            authret: AuthReturn::default(),
        }
    }
}

/// Execute the check command
pub async fn execute(
    args: &CheckArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path).await?;
    let host = Host::build(config).await?;

    let mode = if args.dry_run {
        WriteMode::DryRun
    } else {
        WriteMode::Persist
    };
    let response = host.post_auth.run(args.request(), mode).await?;
    host.shutdown().await;

    match format {
        OutputFormat::Json => output::print_item(&response, format),
        OutputFormat::Table => {
            let authret = &response.authret;
            if authret.is_success() {
                output::print_success(&format!("Login for '{}' allowed", args.username));
            } else {
                output::print_error(&format!("Login for '{}' denied", args.username));
            }
            output::print_kv("status", &authret.status.to_string());
            if let Some(reason) = &authret.reason {
                output::print_kv("reason", reason);
            }
            if let Some(client_reason) = &authret.client_reason {
                output::print_kv("client_reason", client_reason);
            }
            for (key, value) in &response.proplist_save {
                let label = if args.dry_run { "would save" } else { "saved" };
                output::print_kv(&format!("{label} {key}"), value);
            }
        }
    }

    Ok(())
}
