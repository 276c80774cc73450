//! User property management commands.
//!
//! These replace editing the access server's user database by hand: reset a
//! user's MAC binding with `prop del`, or provision one up front with
//! `prop put` so the first login is not the one that decides.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use maclock_core::error::AppError;
use maclock_core::traits::property_store::UserPropertyStore;
use maclock_core::types::auth::HW_ADDR_PROPERTY;

/// Arguments for prop commands
#[derive(Debug, Args)]
pub struct PropArgs {
    /// Prop subcommand
    #[command(subcommand)]
    pub command: PropCommand,
}

/// Prop subcommands
#[derive(Debug, Subcommand)]
pub enum PropCommand {
    /// Show one or all properties of a user
    Get {
        /// Username
        #[arg(short, long)]
        user: String,
        /// Property key (all properties when omitted)
        #[arg(short, long)]
        key: Option<String>,
    },
    /// Set a property
    Put {
        /// Username
        #[arg(short, long)]
        user: String,
        /// Property key
        #[arg(short, long, default_value = HW_ADDR_PROPERTY)]
        key: String,
        /// Property value
        #[arg(short, long)]
        value: String,
    },
    /// Delete a property
    Del {
        /// Username
        #[arg(short, long)]
        user: String,
        /// Property key
        #[arg(short, long, default_value = HW_ADDR_PROPERTY)]
        key: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List users and their registered MAC address
    List,
}

/// Property display row for table output
#[derive(Debug, Serialize, Tabled)]
struct PropertyRow {
    /// Property key
    key: String,
    /// Property value
    value: String,
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct BindingRow {
    /// Username
    username: String,
    /// Registered MAC address
    hw_addr: String,
}

/// Execute prop commands
pub async fn execute(
    args: &PropArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path).await?;
    let store = super::open_store(&config).await?;
    run(&args.command, store.as_ref(), format).await
}

/// Run one prop subcommand against `store`
async fn run(
    command: &PropCommand,
    store: &dyn UserPropertyStore,
    format: OutputFormat,
) -> Result<(), AppError> {
    match command {
        PropCommand::Get { user, key } => {
            let rows: Vec<PropertyRow> = match key {
                Some(key) => {
                    let value = store.get(user, key).await?.ok_or_else(|| {
                        AppError::not_found(format!("Property '{key}' not set for user '{user}'"))
                    })?;
                    vec![PropertyRow {
                        key: key.clone(),
                        value,
                    }]
                }
                None => store
                    .get_properties(user)
                    .await?
                    .into_iter()
                    .map(|(key, value)| PropertyRow { key, value })
                    .collect(),
            };
            output::print_list(&rows, format);
        }
        PropCommand::Put { user, key, value } => {
            if user.trim().is_empty() || key.trim().is_empty() {
                return Err(AppError::validation("User and key must not be blank"));
            }
            if key == HW_ADDR_PROPERTY && has_uppercase(value) {
                output::print_warning(
                    "VPN clients report MAC addresses in lower case; comparison is case-sensitive",
                );
            }
            store.put(user, key, value).await?;
            output::print_success(&format!("Set '{key}' for user '{user}'"));
        }
        PropCommand::Del { user, key, yes } => {
            if !yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete '{key}' for user '{user}'?"))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            if store.delete(user, key).await? {
                output::print_success(&format!("Deleted '{key}' for user '{user}'"));
            } else {
                output::print_warning(&format!("Property '{key}' was not set for user '{user}'"));
            }
        }
        PropCommand::List => {
            let mut rows = Vec::new();
            for username in store.list_users().await? {
                let hw_addr = store
                    .get(&username, HW_ADDR_PROPERTY)
                    .await?
                    .unwrap_or_default();
                rows.push(BindingRow { username, hw_addr });
            }
            output::print_list(&rows, format);
        }
    }

    Ok(())
}

fn has_uppercase(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_uppercase())
}
